use crate::adapters::operation_cache::OperationCache;
use crate::adapters::random::RandomSource;
use crate::adapters::resolvers::ResolverRegistry;
use crate::adapters::schema::PossibleTypes;
use crate::adapters::thunk::{ResolveDetails, Resolver, Thunk};
use crate::domain::{Document, FieldDetails, FillError, FillResult, GraphQLRequest, Operation};
use apollo_compiler::ast::Type;
use apollo_compiler::schema::ExtendedType;
use apollo_compiler::validation::Valid;
use apollo_compiler::{Name, Schema};
use serde_json::{json, Map, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

pub const DEFAULT_NULL_PROBABILITY: f64 = 0.5;

#[derive(Clone)]
pub struct FillerOptions {
    /// Resolvers by type name, layered over the built-in scalar resolvers
    pub resolvers: HashMap<String, Resolver>,
    /// Chance that a nullable value without an override comes out `null`
    pub null_probability: f64,
}

impl Default for FillerOptions {
    fn default() -> Self {
        Self {
            resolvers: HashMap::new(),
            null_probability: DEFAULT_NULL_PROBABILITY,
        }
    }
}

impl FillerOptions {
    pub fn with_resolver(mut self, type_name: impl Into<String>, resolver: Resolver) -> Self {
        self.resolvers.insert(type_name.into(), resolver);
        self
    }

    pub fn with_null_probability(mut self, null_probability: f64) -> Self {
        self.null_probability = null_probability;
        self
    }
}

/// Everything a fill call reads and nothing it writes
pub struct Context {
    pub schema: Arc<Valid<Schema>>,
    pub resolvers: ResolverRegistry,
    pub possible_types: PossibleTypes,
    pub null_probability: f64,
}

/// Shape of a field's static type once non-null is stripped
enum FieldKind<'a> {
    Typename,
    Leaf(Leaf<'a>),
    List(&'a Type),
    Abstract(&'a Name),
    Object(&'a Name),
}

enum Leaf<'a> {
    Scalar(&'a Name),
    Enum(&'a Name, Vec<&'a Name>),
}

impl Context {
    fn kind_of<'a>(&'a self, field: &FieldDetails, ty: &'a Type) -> FillResult<FieldKind<'a>> {
        if field.is_typename() {
            return Ok(FieldKind::Typename);
        }
        let name = match ty {
            Type::List(item) | Type::NonNullList(item) => return Ok(FieldKind::List(&**item)),
            Type::Named(name) | Type::NonNullNamed(name) => name,
        };
        match self.schema.types.get(name) {
            Some(ExtendedType::Scalar(_)) => Ok(FieldKind::Leaf(Leaf::Scalar(name))),
            Some(ExtendedType::Enum(enum_type)) => Ok(FieldKind::Leaf(Leaf::Enum(
                name,
                enum_type.values.keys().collect(),
            ))),
            Some(ExtendedType::Object(_)) => Ok(FieldKind::Object(name)),
            Some(ExtendedType::Interface(_)) | Some(ExtendedType::Union(_)) => {
                Ok(FieldKind::Abstract(name))
            }
            _ => Err(FillError::UnknownType(name.to_string())),
        }
    }
}

fn is_non_null(ty: &Type) -> bool {
    matches!(ty, Type::NonNullNamed(_) | Type::NonNullList(_))
}

/// A schema bound to a resolver registry, producing fixtures for any
/// operation on that schema. Cheap to clone; clones share the operation cache.
#[derive(Clone)]
pub struct Filler {
    context: Arc<Context>,
    cache: Arc<OperationCache>,
}

/// Create a filler for `schema`
pub fn create_filler(schema: impl Into<Arc<Valid<Schema>>>, options: FillerOptions) -> Filler {
    Filler::new(schema, options)
}

impl Filler {
    pub fn new(schema: impl Into<Arc<Valid<Schema>>>, options: FillerOptions) -> Self {
        let schema = schema.into();
        let possible_types = PossibleTypes::new(&schema);
        let resolvers = ResolverRegistry::new(options.resolvers);
        debug!(resolvers = resolvers.len(), "created filler");
        Self {
            context: Arc::new(Context {
                schema,
                resolvers,
                possible_types,
                null_probability: options.null_probability,
            }),
            cache: Arc::new(OperationCache::new()),
        }
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    pub fn cache(&self) -> &OperationCache {
        &self.cache
    }

    /// Bind `document` and an override tree; the returned [`Fill`] answers
    /// requests.
    pub fn fill(&self, document: Document, overrides: impl Into<Thunk>) -> Fill {
        Fill {
            filler: self.clone(),
            document,
            overrides: overrides.into(),
        }
    }
}

#[derive(Clone)]
pub struct Fill {
    filler: Filler,
    document: Document,
    overrides: Thunk,
}

impl Fill {
    /// Fill the response for `request`. Each call gets its own random
    /// source, so concurrent calls do not disturb each other.
    pub fn call(&self, request: &GraphQLRequest) -> FillResult<Value> {
        let context = &*self.filler.context;
        let operation = self.filler.cache.compile_or_get(
            &context.schema,
            &request.query,
            request.operation_name.as_deref(),
        )?;
        check_variables(&operation, request);

        debug!(operation = ?operation.name, root_type = %operation.root_type, "filling response");
        let random = RandomSource::new(context.null_probability);
        let state = FillState {
            context,
            request,
            random: &random,
        };
        // Root resolvers and overrides unwrap under the empty keypath.
        random.with_seed(&[], 0, || {
            state.fill_object(
                &operation.root_type,
                &operation.root_type,
                std::slice::from_ref(&operation.root),
                self.overrides.clone(),
            )
        })
    }

    /// Fill the bound document, without an operation name or variables
    pub fn generate(&self) -> FillResult<Value> {
        self.call(&GraphQLRequest::new(self.document.clone()))
    }

    pub fn document(&self) -> &Document {
        &self.document
    }
}

fn check_variables(operation: &Operation, request: &GraphQLRequest) {
    let missing: Vec<&str> = operation
        .required_variables()
        .filter(|variable| {
            request
                .variables
                .as_ref()
                .map_or(true, |variables| !variables.contains_key(&variable.name))
        })
        .map(|variable| variable.name.as_str())
        .collect();
    if !missing.is_empty() {
        warn!(
            operation = ?operation.name,
            missing = ?missing,
            "request is missing required variables"
        );
    }
}

struct FillState<'a> {
    context: &'a Context,
    request: &'a GraphQLRequest,
    random: &'a RandomSource,
}

impl<'a> FillState<'a> {
    fn details<'d>(
        &'d self,
        ty: Type,
        parent: &'d Name,
        field: &'d FieldDetails,
        parent_fields: &'d [FieldDetails],
    ) -> ResolveDetails<'d> {
        ResolveDetails {
            ty,
            parent,
            field,
            parent_fields,
            random: self.random,
        }
    }

    /// Registered resolver for `type_name`, unwrapped; `Undefined` if none
    fn resolve(&self, type_name: &Name, details: &ResolveDetails<'_>) -> Thunk {
        match self.context.resolvers.get(type_name.as_str()) {
            Some(resolver) => Thunk::Deferred(resolver.clone()).unwrap(self.request, details),
            None => Thunk::Undefined,
        }
    }

    /// `keypath` ends with the field holding this object
    fn fill_object(
        &self,
        ty: &Name,
        parent: &Name,
        keypath: &[FieldDetails],
        partial: Thunk,
    ) -> FillResult<Value> {
        let Some((own_field, ancestors)) = keypath.split_last() else {
            return Ok(Value::Null);
        };
        let details = self.details(Type::Named(ty.clone()), parent, own_field, ancestors);

        let resolver_object = self.resolve(ty, &details);
        let partial_object = partial.unwrap(self.request, &details);

        if (resolver_object.is_null() && partial_object.is_absent())
            || (partial_object.is_null() && resolver_object.is_absent())
        {
            return Ok(Value::Null);
        }

        // Root selections hang off the operation, which is not part of any keypath.
        let parent_fields: &[FieldDetails] = if own_field.operation_type.is_some() {
            &[]
        } else {
            keypath
        };

        let mut object = Map::new();
        for field in own_field.fields.iter() {
            let from_partial = partial_object.field(&field.response_key);
            let value = if from_partial.is_undefined() {
                resolver_object.field(&field.response_key)
            } else {
                from_partial
            };
            let filled = self.fill_type(&field.ty, field, value, ty, parent_fields)?;
            object.insert(field.response_key.clone(), filled);
        }
        Ok(Value::Object(object))
    }

    fn fill_type(
        &self,
        ty: &Type,
        field: &FieldDetails,
        partial: Thunk,
        parent: &Name,
        parent_fields: &[FieldDetails],
    ) -> FillResult<Value> {
        let details = self.details(ty.clone(), parent, field, parent_fields);

        match self.context.kind_of(field, ty)? {
            FieldKind::Typename => Ok(Value::String(parent.to_string())),
            FieldKind::Leaf(leaf) => self.create_value(
                partial,
                &details,
                || Ok(self.generate_leaf(&leaf, &details)),
                |value| Ok(value.into_value(self.request, &details)),
            ),
            FieldKind::List(item_type) => self.create_value(
                partial,
                &details,
                || Ok(Thunk::List(Vec::new())),
                |list| match list.into_items() {
                    Ok(items) => items
                        .into_iter()
                        .enumerate()
                        .map(|(index, item)| {
                            let element = field.with_index(index);
                            self.fill_type(item_type, &element, item, parent, parent_fields)
                        })
                        .collect::<FillResult<Vec<_>>>()
                        .map(Value::Array),
                    Err(other) => Ok(other.into_value(self.request, &details)),
                },
            ),
            FieldKind::Object(object_type) => self.fill_composite(partial, &details, |partial| {
                let mut keypath = parent_fields.to_vec();
                keypath.push(field.clone());
                self.fill_object(object_type, parent, &keypath, partial)
            }),
            FieldKind::Abstract(abstract_type) => {
                let mut keypath = parent_fields.to_vec();
                keypath.push(field.clone());
                let (resolver_object, partial) = self.random.with_seed(&keypath, 0, || {
                    (
                        self.resolve(abstract_type, &details),
                        partial.unwrap(self.request, &details),
                    )
                });
                let concrete =
                    self.concrete_type(abstract_type, &resolver_object, &partial, &details)?;
                let narrowed = field.for_concrete_type(concrete.as_str());
                self.fill_composite(partial, &details, |partial| {
                    let mut keypath = parent_fields.to_vec();
                    keypath.push(narrowed);
                    self.fill_object(&concrete, parent, &keypath, partial)
                })
            }
        }
    }

    /// Null-or-generate decision for leaves and lists, seeded by the
    /// ancestor path and the field's list index. `finish` collapses the
    /// chosen thunk under the same seed.
    fn create_value(
        &self,
        partial: Thunk,
        details: &ResolveDetails<'_>,
        generate: impl FnOnce() -> FillResult<Thunk>,
        finish: impl FnOnce(Thunk) -> FillResult<Value>,
    ) -> FillResult<Value> {
        let offset = details.field.index.unwrap_or(0);
        self.random.with_seed(details.parent_fields, offset, || {
            let value = if !partial.is_undefined() {
                partial.unwrap(self.request, details)
            } else if is_non_null(&details.ty) || !self.random.choose_null() {
                generate()?
            } else {
                Thunk::null()
            };
            finish(value)
        })
    }

    /// The same decision for objects: an explicit `null` stays `null`, any
    /// other override is filled, and no override flips the null coin.
    fn fill_composite(
        &self,
        partial: Thunk,
        details: &ResolveDetails<'_>,
        fill: impl FnOnce(Thunk) -> FillResult<Value>,
    ) -> FillResult<Value> {
        let offset = details.field.index.unwrap_or(0);
        self.random.with_seed(details.parent_fields, offset, || {
            if partial.is_null() {
                Ok(Value::Null)
            } else if !partial.is_undefined()
                || is_non_null(&details.ty)
                || !self.random.choose_null()
            {
                fill(partial)
            } else {
                Ok(Value::Null)
            }
        })
    }

    fn generate_leaf(&self, leaf: &Leaf<'_>, details: &ResolveDetails<'_>) -> Thunk {
        let (Leaf::Scalar(name) | Leaf::Enum(name, _)) = leaf;
        if let Some(resolver) = self.context.resolvers.get(name.as_str()) {
            return Thunk::Deferred(resolver.clone()).unwrap(self.request, details);
        }
        match leaf {
            Leaf::Enum(_, values) => self
                .random
                .choose(values)
                .map(|value| Thunk::from(json!(value.as_str())))
                .unwrap_or_else(Thunk::null),
            Leaf::Scalar(_) => json!(self.random.word()).into(),
        }
    }

    /// Explicit `__typename` from the override, then from the resolver;
    /// otherwise a seeded pick among the possible types.
    fn concrete_type(
        &self,
        abstract_type: &Name,
        resolver_object: &Thunk,
        partial_object: &Thunk,
        details: &ResolveDetails<'_>,
    ) -> FillResult<Name> {
        let possible_types = self.context.possible_types.get(abstract_type.as_str());

        let from_partial = partial_object.typename();
        let typename = if from_partial.is_undefined() {
            resolver_object.typename()
        } else {
            from_partial
        };
        let typename = match typename.unwrap(self.request, details) {
            Thunk::Undefined | Thunk::Literal(Value::Null) => None,
            Thunk::Literal(Value::String(typename)) => Some(typename),
            other => Some(other.into_value(self.request, details).to_string()),
        };

        let resolved = match &typename {
            Some(typename) => possible_types
                .iter()
                .find(|possible| possible.as_str() == typename.as_str()),
            None => {
                let mut keypath = details.parent_fields.to_vec();
                keypath.push(details.field.clone());
                self.random
                    .with_seed(&keypath, 0, || self.random.choose(possible_types))
            }
        };

        resolved
            .cloned()
            .ok_or_else(|| FillError::UnresolvedAbstractType {
                abstract_type: abstract_type.to_string(),
                typename,
            })
    }
}
