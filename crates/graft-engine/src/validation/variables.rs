use crate::input_coercion::coerce_input_value;
use crate::input_coercion::literal_to_json;
use crate::schema::Schema;
use crate::validation::ValidationError;
use crate::JsonMap;
use crate::JsonValue;
use graft_parser::ast::OperationDefinition;
use graft_parser::ast::VariableDefinition;
use std::collections::HashSet;

/// Check declared variable types and defaults.
pub(super) fn check_variable_definitions(
    schema: &Schema,
    operation: &OperationDefinition,
    errors: &mut Vec<ValidationError>,
) {
    let mut seen = HashSet::new();
    for variable in &operation.variables {
        if !seen.insert(variable.name.as_str()) {
            errors.push(ValidationError::DuplicateVariable {
                name: variable.name.clone(),
                location: variable.location,
            });
            continue;
        }
        let ty_name = variable.ty.inner_named_type();
        let Some(type_def) = schema.lookup_type(ty_name) else {
            errors.push(ValidationError::UnknownType {
                name: ty_name.to_owned(),
                location: variable.location,
            });
            continue;
        };
        if !type_def.is_input_type() {
            errors.push(ValidationError::NonInputVariableType {
                name: variable.name.clone(),
                ty: variable.ty.clone(),
                location: variable.location,
            });
            continue;
        }
        if let Err(message) = coerce_default(schema, variable).transpose() {
            errors.push(ValidationError::InvalidVariableValue {
                name: variable.name.clone(),
                message,
                location: variable.location,
            });
        }
    }
}

/// <https://spec.graphql.org/October2021/#CoerceVariableValues()>
///
/// Variables whose definition is invalid were reported by
/// [`check_variable_definitions`] and are left out.
pub(super) fn coerce_variable_values(
    schema: &Schema,
    operation: &OperationDefinition,
    values: &JsonMap,
    errors: &mut Vec<ValidationError>,
) -> JsonMap {
    let mut coerced_values = JsonMap::new();
    for variable in &operation.variables {
        if coerced_values.contains_key(variable.name.as_str()) {
            continue;
        }
        if !schema
            .lookup_type(variable.ty.inner_named_type())
            .is_some_and(|type_def| type_def.is_input_type())
        {
            continue;
        }
        if let Some(value) = values.get(variable.name.as_str()) {
            match coerce_input_value(&schema.types, &variable.ty, value) {
                Ok(value) => {
                    coerced_values.insert(variable.name.as_str(), value);
                }
                Err(message) => errors.push(ValidationError::InvalidVariableValue {
                    name: variable.name.clone(),
                    message,
                    location: variable.location,
                }),
            }
        } else if let Some(default) = coerce_default(schema, variable) {
            if let Ok(default) = default {
                coerced_values.insert(variable.name.as_str(), default);
            }
        } else if variable.ty.is_non_null() {
            errors.push(ValidationError::MissingVariableValue {
                name: variable.name.clone(),
                location: variable.location,
            });
        }
    }
    coerced_values
}

fn coerce_default(
    schema: &Schema,
    variable: &VariableDefinition,
) -> Option<Result<JsonValue, String>> {
    let default = variable.default_value.as_ref()?;
    let value = literal_to_json(default, &JsonMap::new());
    Some(coerce_input_value(&schema.types, &variable.ty, &value))
}
