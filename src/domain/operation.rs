use apollo_compiler::ast::{OperationType, Type};
use apollo_compiler::Name;
use std::collections::HashMap;
use std::sync::Arc;

/// One node of a compiled selection tree.
///
/// Child selections are shared behind `Arc`, so cloning a node (for example
/// to inject a list index) does not copy the subtree.
#[derive(Debug, Clone)]
pub struct FieldDetails {
    pub field_name: String,
    /// Alias if present, otherwise the field name
    pub response_key: String,
    /// Position within the enclosing list, set while filling list items
    pub index: Option<usize>,
    pub ty: Type,
    pub fields: Arc<Vec<FieldDetails>>,
    /// Sub-selections keyed by concrete type name, for abstract-typed fields
    pub inline_fragments: Arc<HashMap<String, InlineFragment>>,
    /// Set only on the synthetic node standing for the operation itself
    pub operation_type: Option<OperationType>,
}

#[derive(Debug, Clone)]
pub struct InlineFragment {
    pub type_condition: String,
    pub fields: Arc<Vec<FieldDetails>>,
}

#[derive(Debug, Clone)]
pub struct VariableDetails {
    pub name: String,
    /// Non-null without a default value
    pub required: bool,
}

/// A compiled operation rooted at a concrete object type
#[derive(Debug, Clone)]
pub struct Operation {
    pub name: Option<String>,
    pub operation_type: OperationType,
    pub root_type: Name,
    pub variables: Vec<VariableDetails>,
    /// The operation seen as a field: its children are the root selections
    pub root: FieldDetails,
}

impl FieldDetails {
    /// `responseKey` or `responseKey[index]`
    pub fn keypath_element(&self) -> String {
        match self.index {
            Some(index) => format!("{}[{}]", self.response_key, index),
            None => self.response_key.clone(),
        }
    }

    pub fn is_typename(&self) -> bool {
        self.field_name == "__typename"
    }

    pub fn with_index(&self, index: usize) -> Self {
        Self {
            index: Some(index),
            ..self.clone()
        }
    }

    /// This field narrowed to a concrete type: the inline fragment's
    /// selection when one exists, otherwise the field's own selection.
    pub fn for_concrete_type(&self, type_name: &str) -> Self {
        match self.inline_fragments.get(type_name) {
            Some(fragment) => Self {
                fields: fragment.fields.clone(),
                ..self.clone()
            },
            None => self.clone(),
        }
    }
}

impl Operation {
    pub fn required_variables(&self) -> impl Iterator<Item = &VariableDetails> {
        self.variables.iter().filter(|variable| variable.required)
    }
}
