use crate::schema::TypeDef;
use crate::schema::TypeKind;
use crate::JsonMap;
use crate::JsonValue;
use graft_parser::ast::Type;
use graft_parser::ast::Value;
use indexmap::IndexMap;

/// Coerce a JSON input value (a variable value, an argument default, or a
/// literal already converted with [`literal_to_json`]) to an input type.
///
/// Integers given for an `ID` become strings and a single value given for a
/// list type becomes a list of one.
///
/// <https://spec.graphql.org/October2021/#sec-Coercing-Variable-Values>
pub(crate) fn coerce_input_value(
    types: &IndexMap<String, TypeDef>,
    ty: &Type,
    value: &JsonValue,
) -> Result<JsonValue, String> {
    if value.is_null() {
        if ty.is_non_null() {
            return Err(format!("null value for non-null type {ty}"));
        } else {
            return Ok(JsonValue::Null);
        }
    }
    let ty_name = match ty {
        Type::List(inner) | Type::NonNullList(inner) => {
            // https://spec.graphql.org/October2021/#sec-List.Input-Coercion
            return value
                .as_array()
                .map(Vec::as_slice)
                // If not an array, treat the value as an array of size one:
                .unwrap_or(std::slice::from_ref(value))
                .iter()
                .map(|item| coerce_input_value(types, inner, item))
                .collect();
        }
        Type::Named(ty_name) | Type::NonNullNamed(ty_name) => ty_name,
    };
    let Some(ty_def) = types.get(ty_name) else {
        return Err(format!("undefined type {ty_name}"));
    };
    match ty_def.kind {
        TypeKind::Object => return Err(format!("{ty_name} is not an input type")),
        TypeKind::Scalar => match ty_name.as_str() {
            "Int" => {
                // https://spec.graphql.org/October2021/#sec-Int.Input-Coercion
                if value
                    .as_i64()
                    .is_some_and(|value| i32::try_from(value).is_ok())
                {
                    return Ok(value.clone());
                }
            }
            "Float" => {
                // https://spec.graphql.org/October2021/#sec-Float.Input-Coercion
                // Integer input values are accepted too
                if value.is_number() {
                    return Ok(value.clone());
                }
            }
            "String" => {
                if value.is_string() {
                    return Ok(value.clone());
                }
            }
            "Boolean" => {
                if value.is_boolean() {
                    return Ok(value.clone());
                }
            }
            "ID" => {
                // https://spec.graphql.org/October2021/#sec-ID.Input-Coercion
                if value.is_string() {
                    return Ok(value.clone());
                }
                if let Some(int) = value.as_i64() {
                    return Ok(int.to_string().into());
                }
            }
            _ => {
                // Custom scalar: any JSON value, including an array or object
                return Ok(value.clone());
            }
        },
        TypeKind::Enum => {
            // https://spec.graphql.org/October2021/#sec-Enums.Input-Coercion
            if value
                .as_str()
                .is_some_and(|name| ty_def.values.contains(name))
            {
                return Ok(value.clone());
            }
        }
    }
    Err(format!("{value} cannot be coerced to type {ty_name}"))
}

/// Convert a document literal to JSON, substituting variable values.
/// Variables without a value become null.
pub(crate) fn literal_to_json(value: &Value, variables: &JsonMap) -> JsonValue {
    match value {
        Value::Variable(name) => variables
            .get(name.as_str())
            .cloned()
            .unwrap_or(JsonValue::Null),
        Value::Int(int) => (*int).into(),
        Value::Float(float) => (*float).into(),
        Value::String(string) => string.as_str().into(),
        Value::Boolean(boolean) => (*boolean).into(),
        Value::Null => JsonValue::Null,
        Value::Enum(name) => name.as_str().into(),
        Value::List(items) => items
            .iter()
            .map(|item| literal_to_json(item, variables))
            .collect(),
        Value::Object(fields) => JsonValue::Object(
            fields
                .iter()
                .map(|(name, value)| (name.as_str().into(), literal_to_json(value, variables)))
                .collect(),
        ),
    }
}
