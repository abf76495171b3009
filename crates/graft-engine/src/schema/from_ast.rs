use crate::input_coercion::literal_to_json;
use crate::resolver::ResolverRegistry;
use crate::schema::ArgDescriptor;
use crate::schema::FieldDescriptor;
use crate::schema::Schema;
use crate::schema::SchemaError;
use crate::schema::TypeDescriptor;
use crate::JsonMap;
use graft_parser::ast::Definition;
use graft_parser::ast::InputValueDefinition;
use graft_parser::LineIndex;
use graft_parser::Parser;

impl Schema {
    /// Parse type definitions and build a schema from them.
    ///
    /// ```
    /// use graft_engine::{ResolverRegistry, Schema};
    ///
    /// let schema = Schema::parse(
    ///     "type Query { tweet(id: ID!): Tweet } type Tweet { id: ID! text: String }",
    ///     ResolverRegistry::new(),
    /// )
    /// .unwrap();
    /// assert!(schema.lookup_field("Tweet", "text").is_some());
    /// ```
    ///
    /// Only object, scalar and enum definitions are allowed. Operations in the
    /// source text are a [`SchemaError::Syntax`] error.
    pub fn parse(source: &str, resolvers: ResolverRegistry) -> Result<Self, SchemaError> {
        let (document, errors) = Parser::new(source).parse().into_parts();
        let line_index = LineIndex::new(source);
        if let Some(error) = errors.into_iter().next() {
            return Err(SchemaError::Syntax {
                message: error.message().to_owned(),
                location: line_index.location(error.index()),
            });
        }
        let mut descriptors = Vec::with_capacity(document.definitions.len());
        for definition in document.definitions {
            let descriptor = match definition {
                Definition::Operation(operation) => {
                    return Err(SchemaError::Syntax {
                        message: format!(
                            "{} operations cannot appear in a schema",
                            operation.operation_type
                        ),
                        location: operation.location,
                    })
                }
                Definition::ObjectType(def) => {
                    let fields = def.fields.into_iter().map(|field| {
                        let mut descriptor = FieldDescriptor::new(field.name, field.ty);
                        descriptor.description = field.description;
                        descriptor.arguments =
                            field.arguments.into_iter().map(argument).collect();
                        descriptor
                    });
                    let mut descriptor = TypeDescriptor::object(def.name, fields);
                    descriptor.description = def.description;
                    descriptor
                }
                Definition::ScalarType(def) => {
                    let mut descriptor = TypeDescriptor::scalar(def.name);
                    descriptor.description = def.description;
                    descriptor
                }
                Definition::EnumType(def) => {
                    let values = def.values.into_iter().map(|value| value.value);
                    let mut descriptor = TypeDescriptor::enumeration(def.name, values);
                    descriptor.description = def.description;
                    descriptor
                }
            };
            descriptors.push(descriptor);
        }
        Self::build(descriptors, resolvers)
    }
}

fn argument(def: InputValueDefinition) -> ArgDescriptor {
    ArgDescriptor {
        name: def.name,
        description: def.description,
        ty: def.ty,
        // Constant values: the parser rejects variables here
        default_value: def
            .default_value
            .map(|value| literal_to_json(&value, &JsonMap::new())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::JsonValue;
    use crate::TypeKind;

    #[test]
    fn parses_descriptions_and_defaults() {
        let schema = Schema::parse(
            r#"
            "A short message"
            type Tweet { id: ID! "Body" text: String }
            enum Order { ASC DESC }
            type Query {
              allTweets(first: Int = 10, order: Order = DESC): [Tweet!]!
            }
            "#,
            ResolverRegistry::new(),
        )
        .unwrap();
        let tweet = schema.lookup_type("Tweet").unwrap();
        assert_eq!(tweet.kind, TypeKind::Object);
        assert_eq!(tweet.description.as_deref(), Some("A short message"));
        assert_eq!(tweet.fields["text"].description.as_deref(), Some("Body"));
        let all_tweets = schema.lookup_field("Query", "allTweets").unwrap();
        assert_eq!(all_tweets.ty.to_string(), "[Tweet!]!");
        assert_eq!(
            all_tweets.argument("order").unwrap().default_value,
            Some(JsonValue::from("DESC"))
        );
        let order = schema.lookup_type("Order").unwrap();
        assert!(order.values.contains("DESC"));
    }

    #[test]
    fn syntax_errors_carry_a_location() {
        let err = Schema::parse("type Query {\n  a: [Int\n}", ResolverRegistry::new()).unwrap_err();
        assert_eq!(err.to_string(), "syntax error at 3:1: expected ], got }");

        let err =
            Schema::parse("type Query { a: Int } { a }", ResolverRegistry::new()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "syntax error at 1:23: query operations cannot appear in a schema"
        );
    }

    #[test]
    fn invalid_enum_default() {
        let err = Schema::parse(
            "enum Order { ASC } type Query { a(order: Order = UP): Int }",
            ResolverRegistry::new(),
        )
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid default value for `Query.a(order:)`: \"UP\" cannot be coerced to type Order"
        );
    }
}
