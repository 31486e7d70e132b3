use crate::adapters::random::RandomSource;
use crate::domain::{FieldDetails, GraphQLRequest};
use apollo_compiler::ast::Type;
use apollo_compiler::Name;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use tracing::warn;

/// Longest chain of resolvers returning resolvers that [`Thunk::unwrap`] follows
pub const MAX_DEFERRED_DEPTH: usize = 64;

/// A per-type or per-path value provider, invoked lazily while filling
pub type Resolver = Arc<dyn Fn(&GraphQLRequest, &ResolveDetails<'_>) -> Thunk + Send + Sync>;

/// Wrap a closure as a [`Resolver`]
pub fn resolver<F>(func: F) -> Resolver
where
    F: Fn(&GraphQLRequest, &ResolveDetails<'_>) -> Thunk + Send + Sync + 'static,
{
    Arc::new(func)
}

/// What a resolver gets to see about the node being filled
pub struct ResolveDetails<'a> {
    /// Static type of the node; non-null is stripped before a resolver runs
    pub ty: Type,
    /// Concrete object type that owns the field
    pub parent: &'a Name,
    pub field: &'a FieldDetails,
    /// Ancestor chain from the operation root, excluding `field`
    pub parent_fields: &'a [FieldDetails],
    pub random: &'a RandomSource,
}

impl ResolveDetails<'_> {
    fn nullable(&self) -> Self {
        Self {
            ty: strip_non_null(&self.ty),
            parent: self.parent,
            field: self.field,
            parent_fields: self.parent_fields,
            random: self.random,
        }
    }
}

fn strip_non_null(ty: &Type) -> Type {
    match ty {
        Type::NonNullNamed(name) => Type::Named(name.clone()),
        Type::NonNullList(item) => Type::List(item.clone()),
        other => other.clone(),
    }
}

/// A node of an override tree, or the output of a resolver.
///
/// `Undefined` means "no opinion" and falls through to the next layer, while
/// `Literal(Value::Null)` is an explicit `null` that always wins.
#[derive(Clone, Default)]
pub enum Thunk {
    #[default]
    Undefined,
    Literal(Value),
    Object(BTreeMap<String, Thunk>),
    List(Vec<Thunk>),
    Deferred(Resolver),
}

impl Thunk {
    pub fn null() -> Self {
        Thunk::Literal(Value::Null)
    }

    pub fn object<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Thunk)>,
    {
        Thunk::Object(
            entries
                .into_iter()
                .map(|(key, value)| (key.into(), value))
                .collect(),
        )
    }

    pub fn deferred<F>(func: F) -> Self
    where
        F: Fn(&GraphQLRequest, &ResolveDetails<'_>) -> Thunk + Send + Sync + 'static,
    {
        Thunk::Deferred(resolver(func))
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Thunk::Undefined)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Thunk::Literal(Value::Null))
    }

    /// Neither a value nor an explicit object
    pub fn is_absent(&self) -> bool {
        self.is_undefined() || self.is_null()
    }

    /// Child entry for a response key; anything but an object has none
    pub fn field(&self, key: &str) -> Thunk {
        match self {
            Thunk::Object(entries) => entries.get(key).cloned().unwrap_or_default(),
            Thunk::Literal(Value::Object(entries)) => entries
                .get(key)
                .cloned()
                .map(Thunk::Literal)
                .unwrap_or_default(),
            _ => Thunk::Undefined,
        }
    }

    pub fn typename(&self) -> Thunk {
        self.field("__typename")
    }

    /// Elements when this is a list; anything else is handed back
    pub fn into_items(self) -> Result<Vec<Thunk>, Thunk> {
        match self {
            Thunk::List(items) => Ok(items),
            Thunk::Literal(Value::Array(items)) => {
                Ok(items.into_iter().map(Thunk::Literal).collect())
            }
            other => Err(other),
        }
    }

    /// Invoke a deferred thunk with the non-null-stripped details; any other
    /// thunk is returned unchanged.
    ///
    /// Resolvers returning further resolvers are followed up to
    /// [`MAX_DEFERRED_DEPTH`] times; a longer chain yields `Undefined`.
    pub fn unwrap(self, request: &GraphQLRequest, details: &ResolveDetails<'_>) -> Thunk {
        let mut thunk = self;
        let details = details.nullable();
        for _ in 0..MAX_DEFERRED_DEPTH {
            match thunk {
                Thunk::Deferred(resolver) => thunk = resolver(request, &details),
                resolved => return resolved,
            }
        }
        if let Thunk::Deferred(_) = thunk {
            warn!(
                field = %details.field.response_key,
                parent = %details.parent,
                "resolver chain did not settle on a value"
            );
            return Thunk::Undefined;
        }
        thunk
    }

    /// Collapse into plain JSON. Nested resolvers are invoked with `details`;
    /// `Undefined` entries are dropped from objects and become `null` elsewhere.
    pub fn into_value(self, request: &GraphQLRequest, details: &ResolveDetails<'_>) -> Value {
        match self.unwrap(request, details) {
            Thunk::Undefined => Value::Null,
            Thunk::Literal(value) => value,
            Thunk::Object(entries) => Value::Object(
                entries
                    .into_iter()
                    .filter(|(_, value)| !value.is_undefined())
                    .map(|(key, value)| (key, value.into_value(request, details)))
                    .collect::<Map<String, Value>>(),
            ),
            Thunk::List(items) => Value::Array(
                items
                    .into_iter()
                    .map(|item| item.into_value(request, details))
                    .collect(),
            ),
            Thunk::Deferred(_) => Value::Null,
        }
    }
}

impl fmt::Debug for Thunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Thunk::Undefined => f.write_str("Undefined"),
            Thunk::Literal(value) => f.debug_tuple("Literal").field(value).finish(),
            Thunk::Object(entries) => f.debug_tuple("Object").field(entries).finish(),
            Thunk::List(items) => f.debug_tuple("List").field(items).finish(),
            Thunk::Deferred(_) => f.write_str("Deferred(..)"),
        }
    }
}

impl From<Value> for Thunk {
    fn from(value: Value) -> Self {
        Thunk::Literal(value)
    }
}

impl From<Resolver> for Thunk {
    fn from(resolver: Resolver) -> Self {
        Thunk::Deferred(resolver)
    }
}

impl<T: Into<Thunk>> From<Option<T>> for Thunk {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or_default()
    }
}
