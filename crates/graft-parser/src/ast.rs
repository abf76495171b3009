//! Abstract syntax tree for query documents and schema definitions.
//!
//! The tree is syntax only: nothing here knows whether a field or type
//! exists. Every node that can be the subject of a later error carries the
//! [`Location`] of its first token.

use crate::Location;
use std::fmt;

/// A parsed source text: a sequence of definitions, in source order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Document {
    pub definitions: Vec<Definition>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Definition {
    Operation(OperationDefinition),
    ObjectType(ObjectTypeDefinition),
    ScalarType(ScalarTypeDefinition),
    EnumType(EnumTypeDefinition),
}

impl Definition {
    pub fn location(&self) -> Location {
        match self {
            Definition::Operation(def) => def.location,
            Definition::ObjectType(def) => def.location,
            Definition::ScalarType(def) => def.location,
            Definition::EnumType(def) => def.location,
        }
    }

    /// Operations are executable, everything else belongs to a schema.
    pub fn is_executable(&self) -> bool {
        matches!(self, Definition::Operation(_))
    }

    /// The name of the defined operation or type, if any.
    pub fn name(&self) -> Option<&str> {
        match self {
            Definition::Operation(def) => def.name.as_deref(),
            Definition::ObjectType(def) => Some(&def.name),
            Definition::ScalarType(def) => Some(&def.name),
            Definition::EnumType(def) => Some(&def.name),
        }
    }
}

impl Document {
    pub fn operations(&self) -> impl Iterator<Item = &OperationDefinition> {
        self.definitions.iter().filter_map(|def| match def {
            Definition::Operation(op) => Some(op),
            _ => None,
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OperationType {
    Query,
    Mutation,
    Subscription,
}

impl OperationType {
    pub fn as_str(self) -> &'static str {
        match self {
            OperationType::Query => "query",
            OperationType::Mutation => "mutation",
            OperationType::Subscription => "subscription",
        }
    }
}

impl fmt::Display for OperationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// <https://spec.graphql.org/October2021/#OperationDefinition>
///
/// The `{ ... }` shorthand is an anonymous query without variables.
#[derive(Clone, Debug, PartialEq)]
pub struct OperationDefinition {
    pub operation_type: OperationType,
    pub name: Option<String>,
    pub variables: Vec<VariableDefinition>,
    pub directives: Vec<Directive>,
    pub selection_set: Vec<Field>,
    pub location: Location,
}

#[derive(Clone, Debug, PartialEq)]
pub struct VariableDefinition {
    pub name: String,
    pub ty: Type,
    pub default_value: Option<Value>,
    pub location: Location,
}

/// A field selection. `selection_set` is `None` when no braces were written.
#[derive(Clone, Debug, PartialEq)]
pub struct Field {
    pub alias: Option<String>,
    pub name: String,
    pub arguments: Vec<Argument>,
    pub directives: Vec<Directive>,
    pub selection_set: Option<Vec<Field>>,
    pub location: Location,
}

impl Field {
    /// The key of this field in response data: its alias if present.
    pub fn response_key(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Argument {
    pub name: String,
    pub value: Value,
    pub location: Location,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Directive {
    pub name: String,
    pub arguments: Vec<Argument>,
    pub location: Location,
}

impl Directive {
    pub fn argument_by_name(&self, name: &str) -> Option<&Value> {
        self.arguments
            .iter()
            .find(|arg| arg.name == name)
            .map(|arg| &arg.value)
    }
}

/// <https://spec.graphql.org/October2021/#Value>
///
/// String values are already unescaped.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Variable(String),
    Int(i64),
    Float(f64),
    String(String),
    Boolean(bool),
    Null,
    Enum(String),
    List(Vec<Value>),
    Object(Vec<(String, Value)>),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Variable(name) => write!(f, "${name}"),
            Value::Int(int) => write!(f, "{int}"),
            Value::Float(float) => write!(f, "{float:?}"),
            Value::String(string) => write!(f, "{string:?}"),
            Value::Boolean(boolean) => write!(f, "{boolean}"),
            Value::Null => f.write_str("null"),
            Value::Enum(name) => f.write_str(name),
            Value::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Value::Object(fields) => {
                f.write_str("{")?;
                for (i, (name, value)) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, " {name}: {value}")?;
                }
                f.write_str(" }")
            }
        }
    }
}

/// A type reference, such as `[Tweet!]!`.
///
/// Nullability and list wrapping are independent at every level.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Type {
    /// A nullable named type: `T`
    Named(String),
    /// A non-null named type: `T!`
    NonNullNamed(String),
    /// A nullable list: `[T]`
    List(Box<Type>),
    /// A non-null list: `[T]!`
    NonNullList(Box<Type>),
}

impl Type {
    pub fn named(name: impl Into<String>) -> Self {
        Type::Named(name.into())
    }

    pub fn non_null_named(name: impl Into<String>) -> Self {
        Type::NonNullNamed(name.into())
    }

    pub fn list(item: Type) -> Self {
        Type::List(Box::new(item))
    }

    pub fn non_null_list(item: Type) -> Self {
        Type::NonNullList(Box::new(item))
    }

    /// Returns this type made non-null
    pub fn non_null(self) -> Self {
        match self {
            Type::Named(name) => Type::NonNullNamed(name),
            Type::List(item) => Type::NonNullList(item),
            ty => ty,
        }
    }

    /// Returns this type made nullable
    pub fn nullable(self) -> Self {
        match self {
            Type::NonNullNamed(name) => Type::Named(name),
            Type::NonNullList(item) => Type::List(item),
            ty => ty,
        }
    }

    pub fn is_non_null(&self) -> bool {
        matches!(self, Type::NonNullNamed(_) | Type::NonNullList(_))
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Type::List(_) | Type::NonNullList(_))
    }

    /// The item type of a list type
    pub fn item_type(&self) -> Option<&Type> {
        match self {
            Type::List(item) | Type::NonNullList(item) => Some(item),
            Type::Named(_) | Type::NonNullNamed(_) => None,
        }
    }

    /// The named type at the core of any list wrapping
    pub fn inner_named_type(&self) -> &str {
        match self {
            Type::Named(name) | Type::NonNullNamed(name) => name,
            Type::List(item) | Type::NonNullList(item) => item.inner_named_type(),
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Named(name) => write!(f, "{name}"),
            Type::NonNullNamed(name) => write!(f, "{name}!"),
            Type::List(item) => write!(f, "[{item}]"),
            Type::NonNullList(item) => write!(f, "[{item}]!"),
        }
    }
}

/// `type Tweet { ... }`
#[derive(Clone, Debug, PartialEq)]
pub struct ObjectTypeDefinition {
    pub description: Option<String>,
    pub name: String,
    pub fields: Vec<FieldDefinition>,
    pub location: Location,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FieldDefinition {
    pub description: Option<String>,
    pub name: String,
    pub arguments: Vec<InputValueDefinition>,
    pub ty: Type,
    pub location: Location,
}

/// An argument definition: `id: ID!` or `first: Int = 10`
#[derive(Clone, Debug, PartialEq)]
pub struct InputValueDefinition {
    pub description: Option<String>,
    pub name: String,
    pub ty: Type,
    pub default_value: Option<Value>,
    pub location: Location,
}

/// `scalar DateTime`
#[derive(Clone, Debug, PartialEq)]
pub struct ScalarTypeDefinition {
    pub description: Option<String>,
    pub name: String,
    pub location: Location,
}

/// `enum Order { ASC DESC }`
#[derive(Clone, Debug, PartialEq)]
pub struct EnumTypeDefinition {
    pub description: Option<String>,
    pub name: String,
    pub values: Vec<EnumValueDefinition>,
    pub location: Location,
}

#[derive(Clone, Debug, PartialEq)]
pub struct EnumValueDefinition {
    pub description: Option<String>,
    pub value: String,
    pub location: Location,
}
