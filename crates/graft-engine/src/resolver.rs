use crate::data_source::AdapterError;
use crate::loader::Loader;
use crate::response::ErrorKind;
use crate::JsonMap;
use crate::JsonValue;
use futures::future::BoxFuture;
use futures::FutureExt as _;
use indexmap::IndexMap;
use std::fmt;
use std::sync::Arc;

/// Produces the value of a field, given its parent object and arguments.
///
/// Resolvers are bound to fields when the schema is built and looked up once
/// per selection when a query is planned. The returned JSON is then checked
/// against the field type: objects for object types, arrays for list types,
/// matching scalars or enum names for leaf types, and null anywhere null is
/// allowed.
pub trait Resolve: Send + Sync {
    fn resolve<'a>(
        &'a self,
        ctx: ResolveContext<'a>,
    ) -> BoxFuture<'a, Result<JsonValue, FieldError>>;
}

/// Information passed to [`Resolve::resolve`].
#[derive(Clone, Copy)]
pub struct ResolveContext<'a> {
    pub(crate) parent: &'a JsonMap,
    pub(crate) arguments: &'a JsonMap,
    pub(crate) field_name: &'a str,
    pub(crate) parent_type: &'a str,
    pub(crate) loader: &'a Loader,
}

impl<'a> ResolveContext<'a> {
    /// The resolved value of the enclosing object. Empty for root fields.
    pub fn parent(&self) -> &'a JsonMap {
        self.parent
    }

    /// Coerced argument values. Arguments with a default are always present.
    pub fn arguments(&self) -> &'a JsonMap {
        self.arguments
    }

    pub fn argument(&self, name: &str) -> Option<&'a JsonValue> {
        self.arguments.get(name)
    }

    pub fn field_name(&self) -> &'a str {
        self.field_name
    }

    pub fn parent_type(&self) -> &'a str {
        self.parent_type
    }

    /// The execution's loader: reads through it are deduplicated.
    pub fn loader(&self) -> &'a Loader {
        self.loader
    }
}

/// The error type returned by [`Resolve::resolve`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct FieldError {
    pub message: String,
    pub kind: ErrorKind,
}

impl FieldError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: ErrorKind::Resolver,
        }
    }
}

impl From<AdapterError> for FieldError {
    fn from(error: AdapterError) -> Self {
        let kind = match &error {
            AdapterError::Storage { .. } => ErrorKind::DataSource,
            AdapterError::Domain(_) => ErrorKind::Domain,
        };
        Self {
            message: error.to_string(),
            kind,
        }
    }
}

/// Resolves a field to the property of the parent object with the same
/// name, or null when there is no such property. Used for fields without a
/// registered resolver.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultResolver;

impl Resolve for DefaultResolver {
    fn resolve<'a>(
        &'a self,
        ctx: ResolveContext<'a>,
    ) -> BoxFuture<'a, Result<JsonValue, FieldError>> {
        let value = ctx.parent.get(ctx.field_name).cloned();
        futures::future::ready(Ok(value.unwrap_or(JsonValue::Null))).boxed()
    }
}

/// Resolves a field to a differently named property of the parent object.
#[derive(Debug, Clone)]
pub struct Property(pub String);

impl Property {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

impl Resolve for Property {
    fn resolve<'a>(
        &'a self,
        ctx: ResolveContext<'a>,
    ) -> BoxFuture<'a, Result<JsonValue, FieldError>> {
        let value = ctx.parent.get(self.0.as_str()).cloned();
        futures::future::ready(Ok(value.unwrap_or(JsonValue::Null))).boxed()
    }
}

/// Where a lookup takes a value from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeySource {
    /// A property of the parent object, such as a foreign key
    Parent(String),
    /// An argument of the field
    Argument(String),
}

impl KeySource {
    fn get<'a>(&self, ctx: &ResolveContext<'a>) -> &'a JsonValue {
        let value = match self {
            KeySource::Parent(name) => ctx.parent.get(name.as_str()),
            KeySource::Argument(name) => ctx.arguments.get(name.as_str()),
        };
        value.unwrap_or(&NULL)
    }
}

static NULL: JsonValue = JsonValue::Null;

/// Resolves a field to one entity, through [`Loader::load_one`].
///
/// A null or missing key resolves to null without calling the data source.
#[derive(Debug, Clone)]
pub struct FetchOne {
    kind: String,
    key: KeySource,
}

impl FetchOne {
    /// Look up an entity by the value of a parent property, such as `authorId`.
    pub fn by_parent(kind: impl Into<String>, property: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            key: KeySource::Parent(property.into()),
        }
    }

    /// Look up an entity by the value of a field argument, such as `id`.
    pub fn by_argument(kind: impl Into<String>, argument: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            key: KeySource::Argument(argument.into()),
        }
    }
}

impl Resolve for FetchOne {
    fn resolve<'a>(
        &'a self,
        ctx: ResolveContext<'a>,
    ) -> BoxFuture<'a, Result<JsonValue, FieldError>> {
        async move {
            let key = self.key.get(&ctx);
            if key.is_null() {
                return Ok(JsonValue::Null);
            }
            let entity = ctx.loader.load_one(&self.kind, key).await?;
            Ok(entity.map_or(JsonValue::Null, JsonValue::Object))
        }
        .boxed()
    }
}

/// Resolves a field to a list of entities, through [`Loader::load_many`].
///
/// The filter maps entity properties to values taken from the parent or the
/// arguments. Filter entries whose value is null or missing are left out.
#[derive(Debug, Clone)]
pub struct FetchMany {
    kind: String,
    filter: Vec<(String, KeySource)>,
}

impl FetchMany {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            filter: Vec::new(),
        }
    }

    /// Keep entities whose `property` equals the parent's `parent_property`.
    pub fn filter_by_parent(
        mut self,
        property: impl Into<String>,
        parent_property: impl Into<String>,
    ) -> Self {
        self.filter
            .push((property.into(), KeySource::Parent(parent_property.into())));
        self
    }

    /// Keep entities whose `property` equals the value of `argument`.
    pub fn filter_by_argument(
        mut self,
        property: impl Into<String>,
        argument: impl Into<String>,
    ) -> Self {
        self.filter
            .push((property.into(), KeySource::Argument(argument.into())));
        self
    }
}

impl Resolve for FetchMany {
    fn resolve<'a>(
        &'a self,
        ctx: ResolveContext<'a>,
    ) -> BoxFuture<'a, Result<JsonValue, FieldError>> {
        async move {
            let mut filter = JsonMap::new();
            for (property, source) in &self.filter {
                let value = source.get(&ctx);
                if !value.is_null() {
                    filter.insert(property.as_str(), value.clone());
                }
            }
            let entities = ctx.loader.load_many(&self.kind, &filter).await?;
            Ok(entities.into_iter().map(JsonValue::Object).collect())
        }
        .boxed()
    }
}

/// Resolves a field by applying a named write with the field's arguments,
/// through [`Loader::mutate`].
#[derive(Debug, Clone)]
pub struct Mutate {
    operation: String,
}

impl Mutate {
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
        }
    }
}

impl Resolve for Mutate {
    fn resolve<'a>(
        &'a self,
        ctx: ResolveContext<'a>,
    ) -> BoxFuture<'a, Result<JsonValue, FieldError>> {
        async move { Ok(ctx.loader.mutate(&self.operation, ctx.arguments).await?) }.boxed()
    }
}

/// Resolvers to bind to schema fields, keyed by type name and field name.
#[derive(Clone, Default)]
pub struct ResolverRegistry {
    resolvers: IndexMap<(String, String), Arc<dyn Resolve>>,
}

impl ResolverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the resolver of `type_name.field_name`, replacing any previous one.
    pub fn insert(
        &mut self,
        type_name: impl Into<String>,
        field_name: impl Into<String>,
        resolver: impl Resolve + 'static,
    ) -> &mut Self {
        self.resolvers
            .insert((type_name.into(), field_name.into()), Arc::new(resolver));
        self
    }

    /// Builder-style [`insert`][Self::insert]
    pub fn with(
        mut self,
        type_name: impl Into<String>,
        field_name: impl Into<String>,
        resolver: impl Resolve + 'static,
    ) -> Self {
        self.insert(type_name, field_name, resolver);
        self
    }

    pub fn len(&self) -> usize {
        self.resolvers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resolvers.is_empty()
    }

    pub(crate) fn into_entries(
        self,
    ) -> impl Iterator<Item = ((String, String), Arc<dyn Resolve>)> {
        self.resolvers.into_iter()
    }
}

impl fmt::Debug for ResolverRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set()
            .entries(
                self.resolvers
                    .keys()
                    .map(|(type_name, field_name)| format!("{type_name}.{field_name}")),
            )
            .finish()
    }
}
