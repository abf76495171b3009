use crate::config::ValidationConfig;
use crate::input_coercion::coerce_input_value;
use crate::input_coercion::literal_to_json;
use crate::plan::FieldTarget;
use crate::plan::SelectionNode;
use crate::plan::DEFAULT_RESOLVER;
use crate::schema::FieldDef;
use crate::schema::Schema;
use crate::schema::TypeDef;
use crate::validation::variables;
use crate::validation::ValidationError;
use crate::JsonMap;
use graft_parser::ast::Argument;
use graft_parser::ast::Field;
use graft_parser::ast::OperationDefinition;
use graft_parser::ast::OperationType;
use graft_parser::ast::Type;
use graft_parser::ast::Value;
use indexmap::IndexMap;
use std::collections::HashSet;

/// Checks one operation of a document. Independent of variable values, so
/// that every operation can be checked, not just the one being planned.
pub(super) struct SelectionValidator<'a> {
    pub(super) schema: &'a Schema,
    config: &'a ValidationConfig,
    pub(super) operation: &'a OperationDefinition,
    pub(super) errors: Vec<ValidationError>,
    pub(super) used_variables: HashSet<&'a str>,
    depth_reported: bool,
}

impl<'a> SelectionValidator<'a> {
    pub(super) fn new(
        schema: &'a Schema,
        config: &'a ValidationConfig,
        operation: &'a OperationDefinition,
    ) -> Self {
        Self {
            schema,
            config,
            operation,
            errors: Vec::new(),
            used_variables: HashSet::new(),
            depth_reported: false,
        }
    }

    pub(super) fn validate(mut self) -> Vec<ValidationError> {
        let operation = self.operation;
        let root_type = match operation.operation_type {
            OperationType::Query => Some(self.schema.query_type()),
            OperationType::Mutation => self.schema.mutation_type(),
            OperationType::Subscription => {
                self.errors.push(ValidationError::UnsupportedOperation {
                    operation_type: operation.operation_type,
                    location: operation.location,
                });
                return self.errors;
            }
        };
        let Some(root_type) = root_type else {
            self.errors.push(ValidationError::MissingRootType {
                operation_type: operation.operation_type,
                location: operation.location,
            });
            return self.errors;
        };

        variables::check_variable_definitions(self.schema, operation, &mut self.errors);
        for directive in &operation.directives {
            self.errors.push(ValidationError::UnknownDirective {
                name: directive.name.clone(),
                location: directive.location,
            });
        }
        let fields: Vec<&Field> = operation.selection_set.iter().collect();
        self.check_selection_set(root_type, &fields, 1);

        for variable in &operation.variables {
            if !self.used_variables.contains(variable.name.as_str()) {
                self.errors.push(ValidationError::UnusedVariable {
                    name: variable.name.clone(),
                    location: variable.location,
                });
            }
        }
        self.errors
    }

    /// Fields with the same response key are checked together: they must
    /// select the same field with the same arguments, and their selection
    /// sets are checked as one.
    fn check_selection_set(&mut self, type_def: &'a TypeDef, fields: &[&'a Field], depth: usize) {
        if depth > self.config.max_depth {
            if let Some(first) = fields.first().filter(|_| !self.depth_reported) {
                self.depth_reported = true;
                self.errors.push(ValidationError::ExcessiveDepth {
                    max_depth: self.config.max_depth,
                    location: first.location,
                });
            }
            return;
        }
        for (response_key, group) in group_by_response_key(fields.iter().copied()) {
            let first = group[0];
            let mut merged = vec![first];
            for &other in &group[1..] {
                match conflict(first, other) {
                    Some(reason) => self.errors.push(ValidationError::ConflictingResponseKey {
                        response_key: response_key.to_owned(),
                        reason,
                        location: other.location,
                    }),
                    None => merged.push(other),
                }
            }
            let mut target = None;
            for (index, &field) in group.iter().enumerate() {
                self.check_directives(field);
                let field_target = self.check_field(type_def, field);
                if index == 0 {
                    target = field_target;
                }
            }
            if let Some(target) = target {
                let children: Vec<&'a Field> = merged
                    .iter()
                    .filter_map(|field| field.selection_set.as_ref())
                    .flatten()
                    .collect();
                if !children.is_empty() {
                    self.check_selection_set(target, &children, depth + 1);
                }
            }
        }
    }

    /// Returns the object type to check the field's selection set against.
    fn check_field(&mut self, type_def: &'a TypeDef, field: &'a Field) -> Option<&'a TypeDef> {
        let coordinate = format!("{}.{}", type_def.name, field.name);
        if field.name == "__typename" {
            for argument in &field.arguments {
                self.errors.push(ValidationError::UnknownArgument {
                    coordinate: coordinate.clone(),
                    argument: argument.name.clone(),
                    location: argument.location,
                });
            }
            if field.selection_set.is_some() {
                self.errors.push(ValidationError::UnexpectedSubselection {
                    coordinate,
                    ty: Type::non_null_named("String"),
                    location: field.location,
                });
            }
            return None;
        }
        let Some(field_def) = type_def.field(&field.name) else {
            self.errors.push(ValidationError::UnknownField {
                type_name: type_def.name.clone(),
                field: field.name.clone(),
                location: field.location,
            });
            return None;
        };
        self.check_arguments(&coordinate, &field_def.arguments, &field.arguments, field.location);

        let target = self.schema.lookup_type(field_def.ty.inner_named_type())?;
        match (target.is_leaf(), field.selection_set.is_some()) {
            (true, true) => {
                self.errors.push(ValidationError::UnexpectedSubselection {
                    coordinate,
                    ty: field_def.ty.clone(),
                    location: field.location,
                });
                None
            }
            (false, false) => {
                self.errors.push(ValidationError::MissingSubselection {
                    coordinate,
                    ty: field_def.ty.clone(),
                    location: field.location,
                });
                None
            }
            (true, false) => None,
            (false, true) => Some(target),
        }
    }

    /// Only `@skip(if: Boolean!)` and `@include(if: Boolean!)` are supported.
    fn check_directives(&mut self, field: &'a Field) {
        let condition = Type::non_null_named("Boolean");
        for directive in &field.directives {
            if directive.name != "skip" && directive.name != "include" {
                self.errors.push(ValidationError::UnknownDirective {
                    name: directive.name.clone(),
                    location: directive.location,
                });
                continue;
            }
            let coordinate = format!("@{}", directive.name);
            let mut seen = HashSet::new();
            for argument in &directive.arguments {
                if argument.name != "if" {
                    self.errors.push(ValidationError::UnknownArgument {
                        coordinate: coordinate.clone(),
                        argument: argument.name.clone(),
                        location: argument.location,
                    });
                } else if !seen.insert(argument.name.as_str()) {
                    self.errors.push(ValidationError::DuplicateArgument {
                        coordinate: coordinate.clone(),
                        argument: argument.name.clone(),
                        location: argument.location,
                    });
                } else {
                    self.check_argument_value(&coordinate, argument, &condition, false);
                }
            }
            if seen.is_empty() {
                self.errors.push(ValidationError::MissingRequiredArgument {
                    coordinate,
                    argument: "if".to_owned(),
                    location: directive.location,
                });
            }
        }
    }
}

fn group_by_response_key<'a>(
    fields: impl IntoIterator<Item = &'a Field>,
) -> IndexMap<&'a str, Vec<&'a Field>> {
    let mut groups: IndexMap<&str, Vec<&Field>> = IndexMap::new();
    for field in fields {
        groups.entry(field.response_key()).or_default().push(field);
    }
    groups
}

/// Why two fields with the same response key cannot be merged, if they cannot
fn conflict(first: &Field, other: &Field) -> Option<String> {
    if first.name != other.name {
        return Some(format!(
            "`{}` and `{}` are different fields",
            first.name, other.name
        ));
    }
    let same_arguments = first.arguments.len() == other.arguments.len()
        && first.arguments.iter().all(|argument| {
            other
                .arguments
                .iter()
                .any(|o| o.name == argument.name && o.value == argument.value)
        });
    if !same_arguments {
        return Some(format!("`{}` is selected with different arguments", first.name));
    }
    None
}

/// Build the planned selections of a validated selection set: drop fields
/// excluded by `@skip`/`@include`, merge fields with the same response key
/// and coerce arguments.
pub(super) fn build_selection_set<'s>(
    schema: &'s Schema,
    type_def: &'s TypeDef,
    fields: &[&Field],
    variables: &JsonMap,
) -> Vec<SelectionNode<'s>> {
    let included = fields
        .iter()
        .copied()
        .filter(|field| is_included(field, variables));
    group_by_response_key(included)
        .into_iter()
        .filter_map(|(response_key, group)| {
            let first = group[0];
            let target = if first.name == "__typename" {
                FieldTarget::Typename
            } else {
                let definition = type_def.field(&first.name)?;
                FieldTarget::Field {
                    definition,
                    resolver: definition.resolver.as_deref().unwrap_or(&DEFAULT_RESOLVER),
                }
            };
            let (arguments, argument_error, selections) = match &target {
                FieldTarget::Typename => (JsonMap::new(), None, Vec::new()),
                FieldTarget::Field { definition, .. } => {
                    let coerced =
                        coerce_argument_values(schema, definition, &first.arguments, variables);
                    let (arguments, argument_error) = match coerced {
                        Ok(arguments) => (arguments, None),
                        Err(error) => (JsonMap::new(), Some(error)),
                    };
                    let selections = match schema.lookup_type(definition.ty.inner_named_type()) {
                        Some(target) if !target.is_leaf() => {
                            let children: Vec<&Field> = group
                                .iter()
                                .filter_map(|field| field.selection_set.as_ref())
                                .flatten()
                                .collect();
                            build_selection_set(schema, target, &children, variables)
                        }
                        _ => Vec::new(),
                    };
                    (arguments, argument_error, selections)
                }
            };
            Some(SelectionNode {
                response_key: response_key.to_owned(),
                name: first.name.clone(),
                alias: first.alias.clone(),
                arguments,
                argument_error,
                target,
                selections,
                location: first.location,
            })
        })
        .collect()
}

/// <https://spec.graphql.org/October2021/#sec--skip>
fn is_included(field: &Field, variables: &JsonMap) -> bool {
    let condition = |name: &str| {
        let directive = field.directives.iter().find(|d| d.name == name)?;
        match directive.argument_by_name("if")? {
            Value::Boolean(value) => Some(*value),
            Value::Variable(variable) => variables.get(variable.as_str())?.as_bool(),
            _ => None,
        }
    };
    !condition("skip").unwrap_or(false) && condition("include").unwrap_or(true)
}

/// <https://spec.graphql.org/October2021/#CoerceArgumentValues()>
///
/// Arguments given as a variable without a value are treated as absent.
/// A variable value that does not fit the argument type, such as null for a
/// non-null argument with a default, is an error for the field.
fn coerce_argument_values(
    schema: &Schema,
    definition: &FieldDef,
    arguments: &[Argument],
    variables: &JsonMap,
) -> Result<JsonMap, String> {
    let mut coerced = JsonMap::new();
    for arg_def in &definition.arguments {
        let given = arguments
            .iter()
            .find(|argument| argument.name == arg_def.name)
            .filter(|argument| match &argument.value {
                Value::Variable(name) => variables.contains_key(name.as_str()),
                _ => true,
            });
        if let Some(argument) = given {
            let value = literal_to_json(&argument.value, variables);
            let value =
                coerce_input_value(&schema.types, &arg_def.ty, &value).map_err(|error| {
                    format!("invalid value for argument `{}`: {error}", arg_def.name)
                })?;
            coerced.insert(arg_def.name.as_str(), value);
        } else if let Some(default) = &arg_def.default_value {
            coerced.insert(arg_def.name.as_str(), default.clone());
        }
    }
    Ok(coerced)
}
