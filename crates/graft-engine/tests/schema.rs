use crate::tweets;
use graft_engine::ArgDescriptor;
use graft_engine::FieldDescriptor;
use graft_engine::ResolverRegistry;
use graft_engine::Schema;
use graft_engine::SchemaError;
use graft_engine::Type;
use graft_engine::TypeDescriptor;
use graft_engine::TypeKind;

#[test]
fn tweet_schema() {
    let schema = tweets::schema().unwrap();
    assert_eq!(schema.query_type().name, "Query");
    assert_eq!(schema.mutation_type().map(|ty| ty.name.as_str()), Some("Mutation"));

    let tweet = schema.lookup_field("Query", "tweet").unwrap();
    assert_eq!(tweet.ty, Type::named("Tweet"));
    assert!(tweet.argument("id").unwrap().is_required());
    assert!(tweet.has_resolver());

    let all_tweets = schema.lookup_field("Query", "allTweets").unwrap();
    assert!(all_tweets.is_list() && all_tweets.is_non_null());
    assert_eq!(all_tweets.ty.to_string(), "[Tweet!]!");

    let text = schema.lookup_field("Tweet", "text").unwrap();
    assert!(!text.has_resolver());
    assert_eq!(
        schema.lookup_field("User", "fullName").unwrap().description.as_deref(),
        Some("First and last name, separated by a space")
    );

    assert!(schema.lookup_type("Retweet").is_none());
    assert!(schema.lookup_field("Tweet", "likes").is_none());
    assert!(schema.lookup_field("Retweet", "id").is_none());
    assert_eq!(schema.lookup_type("ID").unwrap().kind, TypeKind::Scalar);
}

#[test]
fn built_and_parsed_schemas_agree() {
    let built = Schema::build(
        [
            TypeDescriptor::enumeration("Order", ["ASC", "DESC"]),
            TypeDescriptor::object(
                "Query",
                [FieldDescriptor::new(
                    "numbers",
                    Type::non_null_list(Type::non_null_named("Int")),
                )
                .argument(ArgDescriptor::new("order", Type::named("Order")).default_value("ASC"))],
            ),
        ],
        ResolverRegistry::new(),
    )
    .unwrap();
    let parsed = Schema::parse(
        "enum Order { ASC DESC } type Query { numbers(order: Order = ASC): [Int!]! }",
        ResolverRegistry::new(),
    )
    .unwrap();
    let names = |schema: &Schema| schema.types().map(|ty| ty.name.clone()).collect::<Vec<_>>();
    assert_eq!(names(&built), names(&parsed));
    assert_eq!(
        built.lookup_field("Query", "numbers").unwrap().arguments,
        parsed.lookup_field("Query", "numbers").unwrap().arguments
    );
}

#[test]
fn schema_errors() {
    let error = |sdl: &str| Schema::parse(sdl, ResolverRegistry::new()).unwrap_err();
    assert_eq!(
        error("type Query { a: Int } type Query { b: Int }"),
        SchemaError::DuplicateType {
            name: "Query".into()
        }
    );
    assert_eq!(
        error("type Query { a: Int a: String }"),
        SchemaError::DuplicateField {
            type_name: "Query".into(),
            field: "a".into()
        }
    );
    assert_eq!(
        error("type Query { tweets: [Tweet] }").to_string(),
        "`Query.tweets` references undefined type `Tweet`"
    );
    assert_eq!(error("type Tweet { id: ID }"), SchemaError::MissingQueryType);

    let unknown_target = Schema::parse(
        "type Query { a: Int }",
        ResolverRegistry::new().with("Query", "b", graft_engine::DefaultResolver),
    )
    .unwrap_err();
    assert_eq!(
        unknown_target.to_string(),
        "a resolver is registered for `Query.b`, which is not defined"
    );
}
