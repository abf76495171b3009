//! The type system a query is validated and executed against.

use crate::resolver::Resolve;
use crate::JsonValue;
use graft_parser::ast::Type;
use graft_parser::Location;
use indexmap::IndexMap;
use indexmap::IndexSet;
use std::fmt;
use std::sync::Arc;

mod builder;
mod from_ast;

pub use self::builder::ArgDescriptor;
pub use self::builder::FieldDescriptor;
pub use self::builder::TypeDescriptor;

/// Names of the scalar types every schema contains
pub(crate) const BUILT_IN_SCALARS: [&str; 5] = ["Int", "Float", "String", "Boolean", "ID"];

/// An immutable, validated set of types with their bound resolvers.
///
/// Build one with [`Schema::build`] or [`Schema::parse`], then share it by
/// reference between any number of concurrent validations and executions.
#[derive(Debug)]
pub struct Schema {
    pub(crate) types: IndexMap<String, TypeDef>,
    pub(crate) query_type: String,
    pub(crate) mutation_type: Option<String>,
}

#[derive(Debug, Clone)]
pub struct TypeDef {
    pub name: String,
    pub description: Option<String>,
    pub kind: TypeKind,
    /// Fields of an object type, in declaration order. Empty for other kinds.
    pub fields: IndexMap<String, FieldDef>,
    /// Values of an enum type, in declaration order. Empty for other kinds.
    pub values: IndexSet<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Object,
    Scalar,
    Enum,
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self {
            TypeKind::Object => "object",
            TypeKind::Scalar => "scalar",
            TypeKind::Enum => "enum",
        };
        f.write_str(kind)
    }
}

impl TypeDef {
    /// Scalars and enums can be used as argument and variable types.
    pub fn is_input_type(&self) -> bool {
        self.kind != TypeKind::Object
    }

    /// Scalars and enums complete without a selection set.
    pub fn is_leaf(&self) -> bool {
        self.kind != TypeKind::Object
    }

    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.get(name)
    }
}

/// A field of an object type.
///
/// Nullability and list wrapping are carried by `ty` at every level, so a
/// field can be `[T!]!`, `[T]!`, `[T!]` or `[T]`.
#[derive(Clone)]
pub struct FieldDef {
    pub name: String,
    pub description: Option<String>,
    pub ty: Type,
    pub arguments: Vec<ArgDef>,
    pub(crate) resolver: Option<Arc<dyn Resolve>>,
}

impl FieldDef {
    pub fn is_non_null(&self) -> bool {
        self.ty.is_non_null()
    }

    pub fn is_list(&self) -> bool {
        self.ty.is_list()
    }

    pub fn argument(&self, name: &str) -> Option<&ArgDef> {
        self.arguments.iter().find(|arg| arg.name == name)
    }

    /// Whether a resolver is registered for this field. Fields without one
    /// read the property of their parent object with the same name.
    pub fn has_resolver(&self) -> bool {
        self.resolver.is_some()
    }
}

impl fmt::Debug for FieldDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDef")
            .field("name", &self.name)
            .field("ty", &self.ty)
            .field("arguments", &self.arguments)
            .field("has_resolver", &self.has_resolver())
            .finish_non_exhaustive()
    }
}

/// An argument of a field. `default_value` is already coerced to `ty`.
#[derive(Debug, Clone, PartialEq)]
pub struct ArgDef {
    pub name: String,
    pub description: Option<String>,
    pub ty: Type,
    pub default_value: Option<JsonValue>,
}

impl ArgDef {
    /// Non-null without a default: the argument must be given.
    pub fn is_required(&self) -> bool {
        self.ty.is_non_null() && self.default_value.is_none()
    }
}

/// Why a schema could not be built.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SchemaError {
    #[error("syntax error at {location}: {message}")]
    Syntax { message: String, location: Location },

    #[error("type `{name}` is defined more than once")]
    DuplicateType { name: String },

    #[error("field `{type_name}.{field}` is defined more than once")]
    DuplicateField { type_name: String, field: String },

    #[error("argument `{coordinate}({argument}:)` is defined more than once")]
    DuplicateArgument {
        coordinate: String,
        argument: String,
    },

    #[error("enum value `{type_name}.{value}` is defined more than once")]
    DuplicateEnumValue { type_name: String, value: String },

    #[error("`{coordinate}` references undefined type `{name}`")]
    UnknownTypeReference { coordinate: String, name: String },

    #[error("object type `{name}` must define at least one field")]
    EmptyObjectType { name: String },

    #[error("argument `{coordinate}` has object type `{ty}`, expected a scalar or enum")]
    NonInputArgumentType { coordinate: String, ty: Type },

    #[error("invalid default value for `{coordinate}`: {message}")]
    InvalidDefaultValue { coordinate: String, message: String },

    #[error("the schema must define a `Query` object type")]
    MissingQueryType,

    #[error("a resolver is registered for `{type_name}.{field}`, which is not defined")]
    UnknownResolverTarget { type_name: String, field: String },
}

impl Schema {
    pub fn lookup_type(&self, name: &str) -> Option<&TypeDef> {
        self.types.get(name)
    }

    pub fn lookup_field(&self, type_name: &str, field_name: &str) -> Option<&FieldDef> {
        self.types.get(type_name)?.fields.get(field_name)
    }

    /// All types, built-in scalars first, then in declaration order.
    pub fn types(&self) -> impl Iterator<Item = &TypeDef> {
        self.types.values()
    }

    pub fn query_type(&self) -> &TypeDef {
        // `build` only succeeds with an object type named `Query`
        &self.types[self.query_type.as_str()]
    }

    pub fn mutation_type(&self) -> Option<&TypeDef> {
        self.types.get(self.mutation_type.as_deref()?)
    }
}
