use crate::resolver::DefaultResolver;
use crate::resolver::Resolve;
use crate::schema::FieldDef;
use crate::schema::Schema;
use crate::schema::TypeDef;
use crate::JsonMap;
use graft_parser::ast::OperationType;
use graft_parser::Location;
use std::fmt;

pub(crate) static DEFAULT_RESOLVER: DefaultResolver = DefaultResolver;

/// A validated operation, ready to execute.
///
/// Fields excluded by `@skip` or `@include` are already left out, fields
/// with the same response key are merged, and each field carries its
/// coerced arguments and resolver.
///
/// Displays as an indented tree of response keys:
///
/// ```
/// use graft_engine::{validate, JsonMap, ResolverRegistry, Schema};
///
/// let schema = Schema::parse(
///     "type Query { tweet(id: ID!): Tweet } type Tweet { id: ID! text: String }",
///     ResolverRegistry::new(),
/// )
/// .unwrap();
/// let plan = validate(&schema, r#"{ t: tweet(id: 1) { text } }"#, &JsonMap::new()).unwrap();
/// assert_eq!(plan.to_string(), "query {\n  t: tweet(id: \"1\") {\n    text\n  }\n}\n");
/// ```
pub struct ExecutionPlan<'s> {
    pub(crate) schema: &'s Schema,
    pub(crate) operation_type: OperationType,
    pub(crate) operation_name: Option<String>,
    pub(crate) root_type: &'s TypeDef,
    pub(crate) selections: Vec<SelectionNode<'s>>,
    pub(crate) variables: JsonMap,
}

impl<'s> ExecutionPlan<'s> {
    pub fn schema(&self) -> &'s Schema {
        self.schema
    }

    pub fn operation_type(&self) -> OperationType {
        self.operation_type
    }

    pub fn operation_name(&self) -> Option<&str> {
        self.operation_name.as_deref()
    }

    /// `Query` or `Mutation`
    pub fn root_type(&self) -> &'s TypeDef {
        self.root_type
    }

    pub fn selections(&self) -> &[SelectionNode<'s>] {
        &self.selections
    }

    /// Coerced variable values, defaults included.
    pub fn variables(&self) -> &JsonMap {
        &self.variables
    }
}

/// One field of the plan.
pub struct SelectionNode<'s> {
    pub(crate) response_key: String,
    pub(crate) name: String,
    pub(crate) alias: Option<String>,
    pub(crate) arguments: JsonMap,
    /// Set when a variable value does not fit its argument. Executing the
    /// field then fails without calling the resolver.
    pub(crate) argument_error: Option<String>,
    pub(crate) target: FieldTarget<'s>,
    pub(crate) selections: Vec<SelectionNode<'s>>,
    pub(crate) location: Location,
}

pub(crate) enum FieldTarget<'s> {
    Typename,
    Field {
        definition: &'s FieldDef,
        resolver: &'s dyn Resolve,
    },
}

impl<'s> SelectionNode<'s> {
    /// The key of this field in response data: its alias if present.
    pub fn response_key(&self) -> &str {
        &self.response_key
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    /// Coerced argument values, with defaults for arguments not given.
    pub fn arguments(&self) -> &JsonMap {
        &self.arguments
    }

    /// The field definition. `None` for `__typename`.
    pub fn definition(&self) -> Option<&'s FieldDef> {
        match self.target {
            FieldTarget::Typename => None,
            FieldTarget::Field { definition, .. } => Some(definition),
        }
    }

    /// Child selections. Empty for leaf fields.
    pub fn selections(&self) -> &[SelectionNode<'s>] {
        &self.selections
    }

    pub fn location(&self) -> Location {
        self.location
    }
}

impl fmt::Debug for SelectionNode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectionNode")
            .field("response_key", &self.response_key)
            .field("name", &self.name)
            .field("arguments", &self.arguments)
            .field("argument_error", &self.argument_error)
            .field("selections", &self.selections)
            .finish_non_exhaustive()
    }
}

impl fmt::Debug for ExecutionPlan<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecutionPlan")
            .field("operation_type", &self.operation_type)
            .field("operation_name", &self.operation_name)
            .field("root_type", &self.root_type.name)
            .field("selections", &self.selections)
            .field("variables", &self.variables)
            .finish()
    }
}

impl fmt::Display for ExecutionPlan<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.operation_type.as_str())?;
        if let Some(name) = &self.operation_name {
            write!(f, " {name}")?;
        }
        f.write_str(" {\n")?;
        for node in &self.selections {
            node.fmt_indented(f, 1)?;
        }
        f.write_str("}\n")
    }
}

impl SelectionNode<'_> {
    fn fmt_indented(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        let indent = "  ".repeat(depth);
        f.write_str(&indent)?;
        if let Some(alias) = &self.alias {
            write!(f, "{alias}: ")?;
        }
        f.write_str(&self.name)?;
        if !self.arguments.is_empty() {
            f.write_str("(")?;
            for (i, (name, value)) in self.arguments.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{}: {value}", name.as_str())?;
            }
            f.write_str(")")?;
        }
        if self.selections.is_empty() {
            return f.write_str("\n");
        }
        f.write_str(" {\n")?;
        for node in &self.selections {
            node.fmt_indented(f, depth + 1)?;
        }
        writeln!(f, "{indent}}}")
    }
}
