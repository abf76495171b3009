use crate::schema::ArgDef;
use crate::schema::TypeKind;
use crate::validation::selection::SelectionValidator;
use crate::validation::ValidationError;
use graft_parser::ast::Argument;
use graft_parser::ast::Type;
use graft_parser::ast::Value;
use graft_parser::ast::VariableDefinition;
use graft_parser::Location;
use std::collections::HashSet;

impl<'a> SelectionValidator<'a> {
    pub(super) fn check_arguments(
        &mut self,
        coordinate: &str,
        definitions: &'a [ArgDef],
        arguments: &'a [Argument],
        field_location: Location,
    ) {
        let mut seen = HashSet::new();
        for argument in arguments {
            if !seen.insert(argument.name.as_str()) {
                self.errors.push(ValidationError::DuplicateArgument {
                    coordinate: coordinate.to_owned(),
                    argument: argument.name.clone(),
                    location: argument.location,
                });
                continue;
            }
            match definitions.iter().find(|def| def.name == argument.name) {
                Some(def) => {
                    let has_default = def.default_value.is_some();
                    self.check_argument_value(coordinate, argument, &def.ty, has_default)
                }
                None => {
                    self.errors.push(ValidationError::UnknownArgument {
                        coordinate: coordinate.to_owned(),
                        argument: argument.name.clone(),
                        location: argument.location,
                    });
                    self.record_variables(&argument.value, argument.location);
                }
            }
        }
        for def in definitions {
            if def.is_required() && !seen.contains(def.name.as_str()) {
                self.errors.push(ValidationError::MissingRequiredArgument {
                    coordinate: coordinate.to_owned(),
                    argument: def.name.clone(),
                    location: field_location,
                });
            }
        }
    }

    pub(super) fn check_argument_value(
        &mut self,
        coordinate: &str,
        argument: &'a Argument,
        ty: &Type,
        has_default: bool,
    ) {
        if let Err(message) = self.check_value(&argument.value, ty, has_default, argument.location)
        {
            self.errors.push(ValidationError::InvalidArgumentValue {
                coordinate: coordinate.to_owned(),
                argument: argument.name.clone(),
                message,
                location: argument.location,
            });
        }
    }

    /// Check a literal against an input type. Variables found inside are
    /// checked against the position they are used in. Returns the first
    /// mismatch of the literal itself.
    fn check_value(
        &mut self,
        value: &'a Value,
        ty: &Type,
        has_default: bool,
        location: Location,
    ) -> Result<(), String> {
        if let Value::Variable(name) = value {
            self.check_variable_usage(name, Some((ty, has_default)), location);
            return Ok(());
        }
        if let Value::Null = value {
            if ty.is_non_null() {
                return Err(format!("null value for non-null type {ty}"));
            }
            return Ok(());
        }
        if let Some(item_type) = ty.item_type() {
            let Value::List(items) = value else {
                return self.check_value(value, item_type, false, location);
            };
            let mut result = Ok(());
            for item in items {
                let checked = self.check_value(item, item_type, false, location);
                if result.is_ok() {
                    result = checked;
                }
            }
            return result;
        }

        let ty_name = ty.inner_named_type();
        let Some(type_def) = self.schema.lookup_type(ty_name) else {
            return Err(format!("undefined type {ty_name}"));
        };
        let valid = match (type_def.kind, ty_name, value) {
            (TypeKind::Enum, _, Value::Enum(name)) => type_def.values.contains(name.as_str()),
            (TypeKind::Enum, _, _) => false,
            (TypeKind::Scalar, "Int", Value::Int(int)) => i32::try_from(*int).is_ok(),
            (TypeKind::Scalar, "Float", Value::Int(_) | Value::Float(_)) => true,
            (TypeKind::Scalar, "String", Value::String(_)) => true,
            (TypeKind::Scalar, "Boolean", Value::Boolean(_)) => true,
            (TypeKind::Scalar, "ID", Value::String(_) | Value::Int(_)) => true,
            (TypeKind::Scalar, "Int" | "Float" | "String" | "Boolean" | "ID", _) => false,
            // Custom scalars accept any literal
            (TypeKind::Scalar, _, _) => true,
            (TypeKind::Object, _, _) => false,
        };
        self.record_variables(value, location);
        if valid {
            Ok(())
        } else {
            Err(format!("{value} cannot be coerced to type {ty_name}"))
        }
    }

    /// Mark variables nested in a value as used, without a type to check
    /// them against.
    fn record_variables(&mut self, value: &'a Value, location: Location) {
        match value {
            Value::Variable(name) => self.check_variable_usage(name, None, location),
            Value::List(items) => {
                for item in items {
                    self.record_variables(item, location)
                }
            }
            Value::Object(fields) => {
                for (_, value) in fields {
                    self.record_variables(value, location)
                }
            }
            _ => {}
        }
    }

    fn check_variable_usage(
        &mut self,
        name: &'a str,
        expected: Option<(&Type, bool)>,
        location: Location,
    ) {
        self.used_variables.insert(name);
        let Some(variable) = self.operation.variables.iter().find(|v| v.name == name) else {
            self.errors.push(ValidationError::UndefinedVariable {
                name: name.to_owned(),
                location,
            });
            return;
        };
        let Some((location_type, location_has_default)) = expected else {
            return;
        };
        if !is_variable_usage_allowed(variable, location_type, location_has_default) {
            self.errors.push(ValidationError::VariableTypeMismatch {
                name: name.to_owned(),
                variable_type: variable.ty.clone(),
                expected_type: location_type.clone(),
                location,
            });
        }
    }
}

/// <https://spec.graphql.org/October2021/#IsVariableUsageAllowed()>
fn is_variable_usage_allowed(
    variable: &VariableDefinition,
    location_type: &Type,
    location_has_default: bool,
) -> bool {
    if location_type.is_non_null() && !variable.ty.is_non_null() {
        let has_non_null_default = variable
            .default_value
            .as_ref()
            .is_some_and(|value| *value != Value::Null);
        if !has_non_null_default && !location_has_default {
            return false;
        }
        return are_types_compatible(&variable.ty, &location_type.clone().nullable());
    }
    are_types_compatible(&variable.ty, location_type)
}

/// <https://spec.graphql.org/October2021/#AreTypesCompatible()>
fn are_types_compatible(variable_type: &Type, location_type: &Type) -> bool {
    match (variable_type, location_type) {
        (Type::NonNullNamed(variable), Type::NonNullNamed(location))
        | (Type::Named(variable), Type::Named(location)) => variable == location,
        (Type::NonNullList(variable), Type::NonNullList(location))
        | (Type::List(variable), Type::List(location)) => are_types_compatible(variable, location),
        // A non-null variable fits a nullable location
        (Type::NonNullNamed(_) | Type::NonNullList(_), Type::Named(_) | Type::List(_)) => {
            are_types_compatible(&variable_type.clone().nullable(), location_type)
        }
        _ => false,
    }
}
