//! Turns a query document into an [`ExecutionPlan`], or reports every
//! problem found in it.

use crate::config::ValidationConfig;
use crate::plan::ExecutionPlan;
use crate::schema::Schema;
use crate::JsonMap;
use graft_parser::ast::Document;
use graft_parser::ast::OperationDefinition;
use graft_parser::ast::OperationType;
use graft_parser::ast::Type;
use graft_parser::LineIndex;
use graft_parser::Location;
use graft_parser::Parser;
use std::collections::HashSet;

mod arguments;
mod selection;
mod variables;

use self::selection::SelectionValidator;

/// A problem found in a query document. Execution never starts for a
/// document with validation errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("syntax error: {message}")]
    Syntax { message: String, location: Location },

    #[error("type `{type_name}` has no field `{field}`")]
    UnknownField {
        type_name: String,
        field: String,
        location: Location,
    },

    #[error("field `{coordinate}` of type `{ty}` must have a selection of subfields")]
    MissingSubselection {
        coordinate: String,
        ty: Type,
        location: Location,
    },

    #[error("field `{coordinate}` of type `{ty}` cannot have a selection of subfields")]
    UnexpectedSubselection {
        coordinate: String,
        ty: Type,
        location: Location,
    },

    #[error("missing required argument `{argument}` of `{coordinate}`")]
    MissingRequiredArgument {
        coordinate: String,
        argument: String,
        location: Location,
    },

    #[error("variable `${name}` is not defined")]
    UndefinedVariable { name: String, location: Location },

    #[error("type definition `{name}` cannot appear in an executable document")]
    NonExecutableDefinition { name: String, location: Location },

    #[error("no operation named `{name}`")]
    UnknownOperation { name: String },

    #[error("the document has several operations but no operation name was given")]
    AmbiguousOperation,

    #[error("the document has no operation")]
    NoOperation,

    #[error("operation `{name}` is defined more than once")]
    DuplicateOperationName { name: String, location: Location },

    #[error("{operation_type} operations are not supported")]
    UnsupportedOperation {
        operation_type: OperationType,
        location: Location,
    },

    #[error("the schema has no root type for {operation_type} operations")]
    MissingRootType {
        operation_type: OperationType,
        location: Location,
    },

    #[error("`{coordinate}` has no argument `{argument}`")]
    UnknownArgument {
        coordinate: String,
        argument: String,
        location: Location,
    },

    #[error("argument `{argument}` of `{coordinate}` is given more than once")]
    DuplicateArgument {
        coordinate: String,
        argument: String,
        location: Location,
    },

    #[error("invalid value for argument `{argument}` of `{coordinate}`: {message}")]
    InvalidArgumentValue {
        coordinate: String,
        argument: String,
        message: String,
        location: Location,
    },

    #[error(
        "variable `${name}` of type `{variable_type}` cannot be used where `{expected_type}` is expected"
    )]
    VariableTypeMismatch {
        name: String,
        variable_type: Type,
        expected_type: Type,
        location: Location,
    },

    #[error("variable `${name}` is defined more than once")]
    DuplicateVariable { name: String, location: Location },

    #[error("type `{name}` is not defined")]
    UnknownType { name: String, location: Location },

    #[error("variable `${name}` has type `{ty}`, expected a scalar or enum")]
    NonInputVariableType {
        name: String,
        ty: Type,
        location: Location,
    },

    #[error("variable `${name}` is never used")]
    UnusedVariable { name: String, location: Location },

    #[error("missing value for non-null variable `${name}`")]
    MissingVariableValue { name: String, location: Location },

    #[error("invalid value for variable `${name}`: {message}")]
    InvalidVariableValue {
        name: String,
        message: String,
        location: Location,
    },

    #[error("directive `@{name}` is not supported here")]
    UnknownDirective { name: String, location: Location },

    #[error("conflicting selections for response key `{response_key}`: {reason}")]
    ConflictingResponseKey {
        response_key: String,
        reason: String,
        location: Location,
    },

    #[error("selection sets are nested deeper than the maximum of {max_depth}")]
    ExcessiveDepth { max_depth: usize, location: Location },
}

impl ValidationError {
    /// Where in the document the problem is, if it is anywhere in particular.
    pub fn location(&self) -> Option<Location> {
        match self {
            ValidationError::UnknownOperation { .. }
            | ValidationError::AmbiguousOperation
            | ValidationError::NoOperation => None,
            ValidationError::Syntax { location, .. }
            | ValidationError::UnknownField { location, .. }
            | ValidationError::MissingSubselection { location, .. }
            | ValidationError::UnexpectedSubselection { location, .. }
            | ValidationError::MissingRequiredArgument { location, .. }
            | ValidationError::UndefinedVariable { location, .. }
            | ValidationError::NonExecutableDefinition { location, .. }
            | ValidationError::DuplicateOperationName { location, .. }
            | ValidationError::UnsupportedOperation { location, .. }
            | ValidationError::MissingRootType { location, .. }
            | ValidationError::UnknownArgument { location, .. }
            | ValidationError::DuplicateArgument { location, .. }
            | ValidationError::InvalidArgumentValue { location, .. }
            | ValidationError::VariableTypeMismatch { location, .. }
            | ValidationError::DuplicateVariable { location, .. }
            | ValidationError::UnknownType { location, .. }
            | ValidationError::NonInputVariableType { location, .. }
            | ValidationError::UnusedVariable { location, .. }
            | ValidationError::MissingVariableValue { location, .. }
            | ValidationError::InvalidVariableValue { location, .. }
            | ValidationError::UnknownDirective { location, .. }
            | ValidationError::ConflictingResponseKey { location, .. }
            | ValidationError::ExcessiveDepth { location, .. } => Some(*location),
        }
    }
}

/// Validate a query document with the default [`ValidationConfig`].
///
/// See [`validate_with`].
pub fn validate<'s>(
    schema: &'s Schema,
    document: &str,
    variables: &JsonMap,
) -> Result<ExecutionPlan<'s>, Vec<ValidationError>> {
    validate_with(schema, document, variables, &ValidationConfig::default())
}

/// Validate a query document against a schema and plan the selected
/// operation with the given variable values.
///
/// Every operation of the document is checked and all errors are returned,
/// in document order. A syntax error stops validation before any other
/// check. Validation never calls resolvers or data sources.
pub fn validate_with<'s>(
    schema: &'s Schema,
    document: &str,
    variables: &JsonMap,
    config: &ValidationConfig,
) -> Result<ExecutionPlan<'s>, Vec<ValidationError>> {
    let result = validate_document(schema, document, variables, config);
    if let Err(errors) = &result {
        tracing::debug!(errors = errors.len(), "document failed validation");
    }
    result
}

fn validate_document<'s>(
    schema: &'s Schema,
    source: &str,
    variables: &JsonMap,
    config: &ValidationConfig,
) -> Result<ExecutionPlan<'s>, Vec<ValidationError>> {
    let (document, parse_errors) = Parser::new(source)
        .recursion_limit(config.recursion_limit)
        .token_limit(config.token_limit)
        .parse()
        .into_parts();
    if !parse_errors.is_empty() {
        let line_index = LineIndex::new(source);
        return Err(parse_errors
            .iter()
            .map(|error| ValidationError::Syntax {
                message: error.message().to_owned(),
                location: line_index.location(error.index()),
            })
            .collect());
    }

    let mut errors = Vec::new();
    for definition in &document.definitions {
        if !definition.is_executable() {
            errors.push(ValidationError::NonExecutableDefinition {
                name: definition.name().unwrap_or_default().to_owned(),
                location: definition.location(),
            });
        }
    }
    let mut names = HashSet::new();
    for operation in document.operations() {
        if let Some(name) = &operation.name {
            if !names.insert(name.as_str()) {
                errors.push(ValidationError::DuplicateOperationName {
                    name: name.clone(),
                    location: operation.location,
                });
            }
        }
    }
    for operation in document.operations() {
        errors.extend(SelectionValidator::new(schema, config, operation).validate());
    }

    let operation = match get_operation(&document, config.operation_name.as_deref()) {
        Ok(operation) => operation,
        Err(error) => {
            errors.push(error);
            return Err(errors);
        }
    };
    let variable_values =
        variables::coerce_variable_values(schema, operation, variables, &mut errors);
    if !errors.is_empty() {
        return Err(errors);
    }
    let root_type = match operation.operation_type {
        OperationType::Query => Some(schema.query_type()),
        OperationType::Mutation => schema.mutation_type(),
        OperationType::Subscription => None,
    };
    let Some(root_type) = root_type else {
        // Reported by `SelectionValidator`
        return Err(vec![ValidationError::MissingRootType {
            operation_type: operation.operation_type,
            location: operation.location,
        }]);
    };
    let root_fields: Vec<_> = operation.selection_set.iter().collect();
    let selections =
        selection::build_selection_set(schema, root_type, &root_fields, &variable_values);
    Ok(ExecutionPlan {
        schema,
        operation_type: operation.operation_type,
        operation_name: operation.name.clone(),
        root_type,
        selections,
        variables: variable_values,
    })
}

/// Select one operation from a document, based on an optional requested operation name
///
/// <https://spec.graphql.org/October2021/#GetOperation()>
fn get_operation<'doc>(
    document: &'doc Document,
    operation_name: Option<&str>,
) -> Result<&'doc OperationDefinition, ValidationError> {
    if let Some(name) = operation_name {
        return document
            .operations()
            .find(|operation| operation.name.as_deref() == Some(name))
            .ok_or_else(|| ValidationError::UnknownOperation {
                name: name.to_owned(),
            });
    }
    let mut operations = document.operations();
    match (operations.next(), operations.next()) {
        (Some(operation), None) => Ok(operation),
        (None, _) => Err(ValidationError::NoOperation),
        (Some(_), Some(_)) => Err(ValidationError::AmbiguousOperation),
    }
}
