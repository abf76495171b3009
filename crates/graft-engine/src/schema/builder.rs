use crate::input_coercion::coerce_input_value;
use crate::resolver::ResolverRegistry;
use crate::schema::ArgDef;
use crate::schema::FieldDef;
use crate::schema::Schema;
use crate::schema::SchemaError;
use crate::schema::TypeDef;
use crate::schema::TypeKind;
use crate::schema::BUILT_IN_SCALARS;
use crate::JsonValue;
use graft_parser::ast::Type;
use indexmap::IndexMap;
use indexmap::IndexSet;
use std::collections::HashSet;

/// The declaration of one type, as given to [`Schema::build`].
///
/// ```
/// use graft_engine::{FieldDescriptor, ArgDescriptor, TypeDescriptor, Type};
///
/// let query = TypeDescriptor::object(
///     "Query",
///     [FieldDescriptor::new("tweet", Type::named("Tweet"))
///         .argument(ArgDescriptor::new("id", Type::non_null_named("ID")))],
/// );
/// ```
#[derive(Debug, Clone)]
pub struct TypeDescriptor {
    pub(crate) name: String,
    pub(crate) description: Option<String>,
    pub(crate) kind: TypeKind,
    pub(crate) fields: Vec<FieldDescriptor>,
    pub(crate) values: Vec<String>,
}

impl TypeDescriptor {
    pub fn object(
        name: impl Into<String>,
        fields: impl IntoIterator<Item = FieldDescriptor>,
    ) -> Self {
        Self {
            name: name.into(),
            description: None,
            kind: TypeKind::Object,
            fields: fields.into_iter().collect(),
            values: Vec::new(),
        }
    }

    pub fn scalar(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            kind: TypeKind::Scalar,
            fields: Vec::new(),
            values: Vec::new(),
        }
    }

    pub fn enumeration<V: Into<String>>(
        name: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        Self {
            name: name.into(),
            description: None,
            kind: TypeKind::Enum,
            fields: Vec::new(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    pub(crate) name: String,
    pub(crate) description: Option<String>,
    pub(crate) ty: Type,
    pub(crate) arguments: Vec<ArgDescriptor>,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        Self {
            name: name.into(),
            description: None,
            ty,
            arguments: Vec::new(),
        }
    }

    pub fn argument(mut self, argument: ArgDescriptor) -> Self {
        self.arguments.push(argument);
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

#[derive(Debug, Clone)]
pub struct ArgDescriptor {
    pub(crate) name: String,
    pub(crate) description: Option<String>,
    pub(crate) ty: Type,
    pub(crate) default_value: Option<JsonValue>,
}

impl ArgDescriptor {
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        Self {
            name: name.into(),
            description: None,
            ty,
            default_value: None,
        }
    }

    pub fn default_value(mut self, value: impl Into<JsonValue>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

impl Schema {
    /// Build a schema from type declarations and the resolvers to bind to
    /// their fields.
    ///
    /// Declarations are checked in order and the first problem is returned.
    /// The built-in scalars `Int`, `Float`, `String`, `Boolean` and `ID` are
    /// always defined and must not be declared again.
    pub fn build(
        descriptors: impl IntoIterator<Item = TypeDescriptor>,
        resolvers: ResolverRegistry,
    ) -> Result<Self, SchemaError> {
        let descriptors: Vec<TypeDescriptor> = descriptors.into_iter().collect();

        // Kinds and enum values of every declared type, so that references and
        // defaults can be checked regardless of declaration order
        let mut declared = built_in_scalars();
        for descriptor in &descriptors {
            declared
                .entry(descriptor.name.clone())
                .or_insert_with(|| TypeDef {
                    name: descriptor.name.clone(),
                    description: None,
                    kind: descriptor.kind,
                    fields: IndexMap::new(),
                    values: descriptor.values.iter().cloned().collect(),
                });
        }

        let mut types = built_in_scalars();
        for descriptor in descriptors {
            if types.contains_key(&descriptor.name) {
                return Err(SchemaError::DuplicateType {
                    name: descriptor.name,
                });
            }
            let type_def = build_type(&declared, descriptor)?;
            types.insert(type_def.name.clone(), type_def);
        }

        let query_type = match types.get("Query") {
            Some(def) if def.kind == TypeKind::Object => def.name.clone(),
            _ => return Err(SchemaError::MissingQueryType),
        };
        let mutation_type = types
            .get("Mutation")
            .filter(|def| def.kind == TypeKind::Object)
            .map(|def| def.name.clone());

        for ((type_name, field_name), resolver) in resolvers.into_entries() {
            let Some(field) = types
                .get_mut(&type_name)
                .and_then(|def| def.fields.get_mut(&field_name))
            else {
                return Err(SchemaError::UnknownResolverTarget {
                    type_name,
                    field: field_name,
                });
            };
            field.resolver = Some(resolver);
        }

        Ok(Schema {
            types,
            query_type,
            mutation_type,
        })
    }
}

fn built_in_scalars() -> IndexMap<String, TypeDef> {
    BUILT_IN_SCALARS
        .iter()
        .map(|name| {
            let def = TypeDef {
                name: name.to_string(),
                description: None,
                kind: TypeKind::Scalar,
                fields: IndexMap::new(),
                values: IndexSet::new(),
            };
            (name.to_string(), def)
        })
        .collect()
}

fn build_type(
    declared: &IndexMap<String, TypeDef>,
    descriptor: TypeDescriptor,
) -> Result<TypeDef, SchemaError> {
    let TypeDescriptor {
        name,
        description,
        kind,
        fields: field_descriptors,
        values: value_list,
    } = descriptor;

    let mut values = IndexSet::new();
    for value in value_list {
        if values.contains(&value) {
            return Err(SchemaError::DuplicateEnumValue {
                type_name: name,
                value,
            });
        }
        values.insert(value);
    }

    if kind == TypeKind::Object && field_descriptors.is_empty() {
        return Err(SchemaError::EmptyObjectType { name });
    }
    let mut fields = IndexMap::new();
    for field in field_descriptors {
        if fields.contains_key(&field.name) {
            return Err(SchemaError::DuplicateField {
                type_name: name,
                field: field.name,
            });
        }
        let field = build_field(declared, &name, field)?;
        fields.insert(field.name.clone(), field);
    }

    Ok(TypeDef {
        name,
        description,
        kind,
        fields,
        values,
    })
}

fn build_field(
    declared: &IndexMap<String, TypeDef>,
    type_name: &str,
    descriptor: FieldDescriptor,
) -> Result<FieldDef, SchemaError> {
    let coordinate = format!("{type_name}.{}", descriptor.name);
    check_type_reference(declared, &coordinate, &descriptor.ty)?;

    let mut seen = HashSet::new();
    let mut arguments = Vec::with_capacity(descriptor.arguments.len());
    for argument in descriptor.arguments {
        if !seen.insert(argument.name.clone()) {
            return Err(SchemaError::DuplicateArgument {
                coordinate,
                argument: argument.name,
            });
        }
        let argument_coordinate = format!("{coordinate}({}:)", argument.name);
        check_type_reference(declared, &argument_coordinate, &argument.ty)?;
        if declared
            .get(argument.ty.inner_named_type())
            .is_some_and(|def| !def.is_input_type())
        {
            return Err(SchemaError::NonInputArgumentType {
                coordinate: argument_coordinate,
                ty: argument.ty,
            });
        }
        let default_value = match &argument.default_value {
            Some(value) => Some(coerce_input_value(declared, &argument.ty, value).map_err(
                |message| SchemaError::InvalidDefaultValue {
                    coordinate: argument_coordinate.clone(),
                    message,
                },
            )?),
            None => None,
        };
        arguments.push(ArgDef {
            name: argument.name,
            description: argument.description,
            ty: argument.ty,
            default_value,
        });
    }

    Ok(FieldDef {
        name: descriptor.name,
        description: descriptor.description,
        ty: descriptor.ty,
        arguments,
        resolver: None,
    })
}

fn check_type_reference(
    declared: &IndexMap<String, TypeDef>,
    coordinate: &str,
    ty: &Type,
) -> Result<(), SchemaError> {
    let name = ty.inner_named_type();
    if declared.contains_key(name) {
        Ok(())
    } else {
        Err(SchemaError::UnknownTypeReference {
            coordinate: coordinate.to_owned(),
            name: name.to_owned(),
        })
    }
}
