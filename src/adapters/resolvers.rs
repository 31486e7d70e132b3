use crate::adapters::thunk::{resolver, Resolver, Thunk};
use serde_json::{json, Value};
use std::collections::HashMap;

/// Resolvers by exact type name: built-in scalar generators first, caller
/// resolvers layered on top.
#[derive(Clone)]
pub struct ResolverRegistry {
    resolvers: HashMap<String, Resolver>,
}

impl ResolverRegistry {
    pub fn new(custom: HashMap<String, Resolver>) -> Self {
        let mut registry = Self::with_defaults();
        registry.resolvers.extend(custom);
        registry
    }

    pub fn with_defaults() -> Self {
        let resolvers = default_resolvers()
            .into_iter()
            .map(|(name, resolver)| (name.to_string(), resolver))
            .collect();
        Self { resolvers }
    }

    pub fn get(&self, type_name: &str) -> Option<&Resolver> {
        self.resolvers.get(type_name)
    }

    pub fn insert(&mut self, type_name: impl Into<String>, resolver: Resolver) -> Option<Resolver> {
        self.resolvers.insert(type_name.into(), resolver)
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.resolvers.contains_key(type_name)
    }

    pub fn len(&self) -> usize {
        self.resolvers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resolvers.is_empty()
    }

    /// A resolver that always yields the same JSON value
    pub fn literal(value: Value) -> Resolver {
        resolver(move |_, _| Thunk::Literal(value.clone()))
    }
}

impl Default for ResolverRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

fn default_resolvers() -> [(&'static str, Resolver); 5] {
    [
        ("String", resolver(|_, details| json!(details.random.word()).into())),
        ("Int", resolver(|_, details| json!(details.random.integer()).into())),
        ("Float", resolver(|_, details| json!(details.random.float()).into())),
        ("Boolean", resolver(|_, details| json!(details.random.boolean()).into())),
        ("ID", resolver(|_, details| json!(details.random.uuid()).into())),
    ]
}
