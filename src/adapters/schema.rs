use apollo_compiler::schema::ExtendedType;
use apollo_compiler::{Name, Schema};
use std::collections::HashMap;

/// Concrete object types per interface or union, in schema order
#[derive(Debug, Clone, Default)]
pub struct PossibleTypes {
    by_abstract_type: HashMap<String, Vec<Name>>,
}

impl PossibleTypes {
    pub fn new(schema: &Schema) -> Self {
        let mut by_abstract_type: HashMap<String, Vec<Name>> = HashMap::new();

        for (name, ty) in &schema.types {
            match ty {
                ExtendedType::Union(union_type) => {
                    let members = by_abstract_type.entry(name.to_string()).or_default();
                    members.extend(union_type.members.iter().map(|member| member.name.clone()));
                }
                ExtendedType::Interface(_) => {
                    by_abstract_type.entry(name.to_string()).or_default();
                }
                ExtendedType::Object(object) => {
                    for interface in &object.implements_interfaces {
                        by_abstract_type
                            .entry(interface.name.to_string())
                            .or_default()
                            .push(name.clone());
                    }
                }
                _ => {}
            }
        }

        Self { by_abstract_type }
    }

    pub fn get(&self, abstract_type: &str) -> &[Name] {
        self.by_abstract_type
            .get(abstract_type)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn is_abstract(&self, type_name: &str) -> bool {
        self.by_abstract_type.contains_key(type_name)
    }

    /// Whether a fragment with `condition` applies to `concrete`
    pub fn applies_to(&self, condition: &str, concrete: &str) -> bool {
        condition == concrete
            || self
                .get(condition)
                .iter()
                .any(|possible| possible.as_str() == concrete)
    }
}
