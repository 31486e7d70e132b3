//! Boundary to the external document compiler.
//!
//! `apollo-compiler` parses and validates the document against the schema;
//! this module flattens its selection sets into the [`Operation`] tree the
//! filler walks: fields grouped by response key, fragments merged into the
//! types they apply to, and `__typename` selected on every nested object.

use crate::adapters::document::document_source;
use crate::adapters::schema::PossibleTypes;
use crate::domain::{
    Document, FieldDetails, FillError, FillResult, InlineFragment, Operation, VariableDetails,
};
use apollo_compiler::ast::{OperationType, Type};
use apollo_compiler::executable::{self, Field, Selection, SelectionSet};
use apollo_compiler::validation::Valid;
use apollo_compiler::{name, ExecutableDocument, Node, Schema};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

const DEFAULT_SOURCE_NAME: &str = "operation.graphql";

/// Compile `document` and build the tree for the named operation, or for
/// the first operation when no name is given.
pub fn compile_operation(
    schema: &Valid<Schema>,
    document: &Document,
    operation_name: Option<&str>,
) -> FillResult<Operation> {
    let source = document_source(document)?;
    let source_name = document.source_name().unwrap_or(DEFAULT_SOURCE_NAME);
    let executable = ExecutableDocument::parse_and_validate(schema, source, source_name)
        .map_err(|with_errors| FillError::Compile(with_errors.errors.to_string()))?;

    let operation = select_operation(&executable, operation_name)?;
    let builder = SelectionBuilder {
        document: &executable,
        possible_types: PossibleTypes::new(schema),
    };

    let root_type = operation.selection_set.ty.clone();
    let fields = builder.selection(
        &[&operation.selection_set],
        Target::Concrete(root_type.as_str()),
        false,
    );
    let name = operation.name.as_ref().map(|name| name.to_string());
    let root_key = name
        .clone()
        .unwrap_or_else(|| operation_keyword(operation.operation_type).to_string());

    debug!(
        operation = %root_key,
        root_type = %root_type,
        fields = fields.len(),
        "compiled operation"
    );

    Ok(Operation {
        name,
        operation_type: operation.operation_type,
        root_type: root_type.clone(),
        variables: operation
            .variables
            .iter()
            .map(|variable| VariableDetails {
                name: variable.name.to_string(),
                required: variable.ty.is_non_null() && variable.default_value.is_none(),
            })
            .collect(),
        root: FieldDetails {
            field_name: root_key.clone(),
            response_key: root_key,
            index: None,
            ty: Type::NonNullNamed(root_type),
            fields: Arc::new(fields),
            inline_fragments: Arc::new(HashMap::new()),
            operation_type: Some(operation.operation_type),
        },
    })
}

fn select_operation<'d>(
    document: &'d ExecutableDocument,
    operation_name: Option<&str>,
) -> FillResult<&'d Node<executable::Operation>> {
    let operations = &document.operations;
    match operation_name {
        Some(requested) => operations
            .named
            .iter()
            .find(|(name, _)| name.as_str() == requested)
            .map(|(_, operation)| operation)
            .ok_or_else(|| FillError::OperationNotFound(requested.to_string())),
        None => operations
            .anonymous
            .iter()
            .chain(operations.named.values())
            .next()
            .ok_or(FillError::NoOperation),
    }
}

fn operation_keyword(operation_type: OperationType) -> &'static str {
    match operation_type {
        OperationType::Query => "query",
        OperationType::Mutation => "mutation",
        OperationType::Subscription => "subscription",
    }
}

/// Which fragments a selection is collected for
#[derive(Clone, Copy)]
enum Target<'a> {
    /// Every fragment whose condition the concrete type satisfies
    Concrete(&'a str),
    /// Only unconditioned fragments and those on the abstract type itself
    Abstract(&'a str),
}

struct SelectionBuilder<'d> {
    document: &'d ExecutableDocument,
    possible_types: PossibleTypes,
}

type FieldGroup<'d> = (String, Vec<&'d Node<Field>>);

impl<'d> SelectionBuilder<'d> {
    fn selection(
        &self,
        sets: &[&'d SelectionSet],
        target: Target<'_>,
        with_typename: bool,
    ) -> Vec<FieldDetails> {
        let mut groups: Vec<FieldGroup<'d>> = Vec::new();
        for set in sets {
            self.collect(set, target, &mut groups);
        }

        let mut fields: Vec<FieldDetails> = groups
            .into_iter()
            .map(|(response_key, group)| self.field(response_key, group))
            .collect();

        if with_typename && !fields.iter().any(|field| field.response_key == "__typename") {
            fields.push(typename_field());
        }
        fields
    }

    fn collect(&self, set: &'d SelectionSet, target: Target<'_>, groups: &mut Vec<FieldGroup<'d>>) {
        for selection in &set.selections {
            match selection {
                Selection::Field(field) => {
                    let key = field.response_key().as_str();
                    match groups.iter_mut().find(|(existing, _)| existing.as_str() == key) {
                        Some((_, group)) => group.push(field),
                        None => groups.push((key.to_string(), vec![field])),
                    }
                }
                Selection::InlineFragment(inline) => {
                    let condition = inline.type_condition.as_ref().map(|name| name.as_str());
                    if self.matches(condition, target) {
                        self.collect(&inline.selection_set, target, groups);
                    }
                }
                Selection::FragmentSpread(spread) => match spread.fragment_def(self.document) {
                    Some(fragment) => {
                        if self.matches(Some(fragment.selection_set.ty.as_str()), target) {
                            self.collect(&fragment.selection_set, target, groups);
                        }
                    }
                    None => warn!(
                        fragment = %spread.fragment_name,
                        "fragment spread has no definition in the document"
                    ),
                },
            }
        }
    }

    fn matches(&self, condition: Option<&str>, target: Target<'_>) -> bool {
        match (condition, target) {
            (None, _) => true,
            (Some(condition), Target::Concrete(concrete)) => {
                self.possible_types.applies_to(condition, concrete)
            }
            (Some(condition), Target::Abstract(abstract_type)) => condition == abstract_type,
        }
    }

    fn field(&self, response_key: String, group: Vec<&'d Node<Field>>) -> FieldDetails {
        let first = group[0];
        let ty = first.ty().clone();
        let sets: Vec<&'d SelectionSet> = group.iter().map(|field| &field.selection_set).collect();
        let named = ty.inner_named_type().as_str();

        let mut inline_fragments = HashMap::new();
        let fields = if sets.iter().all(|set| set.selections.is_empty()) {
            Vec::new()
        } else if self.possible_types.is_abstract(named) {
            if sets.iter().any(|set| self.narrows(set, named)) {
                for concrete in self.possible_types.get(named) {
                    let fields = self.selection(&sets, Target::Concrete(concrete.as_str()), true);
                    inline_fragments.insert(
                        concrete.to_string(),
                        InlineFragment {
                            type_condition: concrete.to_string(),
                            fields: Arc::new(fields),
                        },
                    );
                }
            }
            self.selection(&sets, Target::Abstract(named), true)
        } else {
            self.selection(&sets, Target::Concrete(named), true)
        };

        FieldDetails {
            field_name: first.name.to_string(),
            response_key,
            index: None,
            ty,
            fields: Arc::new(fields),
            inline_fragments: Arc::new(inline_fragments),
            operation_type: None,
        }
    }

    /// Whether `set` holds a fragment conditioned on something narrower than
    /// the abstract type it selects from
    fn narrows(&self, set: &'d SelectionSet, abstract_type: &str) -> bool {
        set.selections.iter().any(|selection| match selection {
            Selection::Field(_) => false,
            Selection::InlineFragment(inline) => match &inline.type_condition {
                Some(condition) if condition.as_str() != abstract_type => true,
                _ => self.narrows(&inline.selection_set, abstract_type),
            },
            Selection::FragmentSpread(spread) => spread
                .fragment_def(self.document)
                .map(|fragment| {
                    fragment.selection_set.ty.as_str() != abstract_type
                        || self.narrows(&fragment.selection_set, abstract_type)
                })
                .unwrap_or(false),
        })
    }
}

fn typename_field() -> FieldDetails {
    FieldDetails {
        field_name: "__typename".to_string(),
        response_key: "__typename".to_string(),
        index: None,
        ty: Type::NonNullNamed(name!("String")),
        fields: Arc::new(Vec::new()),
        inline_fragments: Arc::new(HashMap::new()),
        operation_type: None,
    }
}
