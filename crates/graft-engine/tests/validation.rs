use crate::support::object;
use crate::tweets;
use expect_test::expect;
use graft_engine::validate;
use graft_engine::validate_with;
use graft_engine::JsonMap;
use graft_engine::JsonValue;
use graft_engine::RequestErrorResponse;
use graft_engine::Schema;
use graft_engine::ValidationConfig;
use graft_engine::ValidationError;
use pretty_assertions::assert_eq;
use serde_json_bytes::json;
use unindent::unindent;

fn errors(schema: &Schema, query: &str, variables: JsonValue) -> Vec<String> {
    errors_with(schema, query, variables, &ValidationConfig::default())
}

fn errors_with(
    schema: &Schema,
    query: &str,
    variables: JsonValue,
    config: &ValidationConfig,
) -> Vec<String> {
    match validate_with(schema, query, &object(variables), config) {
        Ok(plan) => panic!("expected validation errors, got a plan:\n{plan}"),
        Err(errors) => errors
            .iter()
            .map(|error| match error.location() {
                Some(location) => format!("{location}: {error}"),
                None => error.to_string(),
            })
            .collect(),
    }
}

#[test]
fn unknown_fields() {
    let schema = tweets::schema().unwrap();
    let errors = validate(
        &schema,
        "{ allTweets { id body author { nickname } } }",
        &JsonMap::new(),
    )
    .unwrap_err();
    assert!(errors
        .iter()
        .any(|error| matches!(error, ValidationError::UnknownField { .. })));
    assert_eq!(
        errors.iter().map(ToString::to_string).collect::<Vec<_>>(),
        [
            "type `Tweet` has no field `body`",
            "type `User` has no field `nickname`",
        ]
    );
}

#[test]
fn collects_every_error() {
    let schema = tweets::schema().unwrap();
    let query = unindent(
        "
        query Feed($unused: Int, $id: ID!) {
          tweet { text }
          allTweets(first: 3) { author }
          allUsers { username { x } }
          ghost
        }
        ",
    );
    expect![[r#"
        [
            "2:3: missing required argument `id` of `Query.tweet`",
            "3:13: `Query.allTweets` has no argument `first`",
            "3:25: field `Tweet.author` of type `User!` must have a selection of subfields",
            "4:14: field `User.username` of type `String!` cannot have a selection of subfields",
            "5:3: type `Query` has no field `ghost`",
            "1:12: variable `$unused` is never used",
            "1:26: variable `$id` is never used",
            "1:26: missing value for non-null variable `$id`",
        ]
    "#]]
    .assert_debug_eq(&errors(&schema, &query, json!({})));
}

#[test]
fn syntax_errors_stop_validation() {
    let schema = tweets::schema().unwrap();
    assert_eq!(
        errors(&schema, "{ allTweets { ...TweetFields } ghost }", json!({})),
        ["1:15: syntax error: fragments are not supported, got ..."]
    );
    assert_eq!(
        errors(&schema, "type Query { a: Int }", json!({})),
        [
            "1:1: type definition `Query` cannot appear in an executable document",
            "the document has no operation",
        ]
    );
}

#[test]
fn arguments_and_variables() {
    let schema = tweets::schema().unwrap();
    let query = unindent(
        "
        query($id: ID, $text: String = 3, $tweet: Tweet, $missing: Whatever) {
          tweet(id: $id, id: 1) { id }
          a: tweet(id: true) { id }
          b: tweet(id: $nope) { id }
          c: tweet(id: null) { id }
        }
        ",
    );
    expect![[r#"
        [
            "1:16: invalid value for variable `$text`: 3 cannot be coerced to type String",
            "1:35: variable `$tweet` has type `Tweet`, expected a scalar or enum",
            "1:50: type `Whatever` is not defined",
            "2:9: variable `$id` of type `ID` cannot be used where `ID!` is expected",
            "2:18: argument `id` of `Query.tweet` is given more than once",
            "3:12: invalid value for argument `id` of `Query.tweet`: true cannot be coerced to type ID",
            "4:12: variable `$nope` is not defined",
            "5:12: invalid value for argument `id` of `Query.tweet`: null value for non-null type ID!",
            "1:16: variable `$text` is never used",
            "1:35: variable `$tweet` is never used",
            "1:50: variable `$missing` is never used",
        ]
    "#]]
    .assert_debug_eq(&errors(&schema, &query, json!({})));
}

#[test]
fn variable_values_are_coerced() {
    let schema = tweets::schema().unwrap();
    let query =
        "query($id: ID!, $first: Int) { tweet(id: $id) { id } a: tweet(id: $first) { id } }";
    assert_eq!(
        errors(&schema, query, json!({ "id": [], "first": 4_000_000_000_u64 })),
        [
            "1:63: variable `$first` of type `Int` cannot be used where `ID!` is expected",
            "1:7: invalid value for variable `$id`: [] cannot be coerced to type ID",
            "1:17: invalid value for variable `$first`: 4000000000 cannot be coerced to type Int",
        ]
    );

    let query = "query($id: ID!) { tweet(id: $id) { id } }";
    assert_eq!(
        errors(&schema, query, json!({})),
        ["1:7: missing value for non-null variable `$id`"]
    );
    assert_eq!(
        errors(&schema, query, json!({ "id": null })),
        ["1:7: invalid value for variable `$id`: null value for non-null type ID!"]
    );

    // A default makes a nullable variable usable where a value is required
    let plan = validate(
        &schema,
        "query($id: ID = 2) { tweet(id: $id) { id } }",
        &JsonMap::new(),
    )
    .unwrap();
    assert_eq!(plan.variables(), &object(json!({ "id": "2" })));
    assert_eq!(plan.selections()[0].arguments(), &object(json!({ "id": "2" })));

    let plan = validate(&schema, query, &object(json!({ "id": 7 }))).unwrap();
    assert_eq!(plan.variables(), &object(json!({ "id": "7" })));
}

#[test]
fn operation_selection() {
    let schema = tweets::schema().unwrap();
    let document = "query A { allTweets { id } } query B { allUsers { id } }";
    assert_eq!(
        errors(&schema, document, json!({})),
        ["the document has several operations but no operation name was given"]
    );

    let config = ValidationConfig::default().operation_name("C");
    assert_eq!(
        errors_with(&schema, document, json!({}), &config),
        ["no operation named `C`"]
    );

    let config = ValidationConfig::default().operation_name("B");
    let plan = validate_with(&schema, document, &JsonMap::new(), &config).unwrap();
    assert_eq!(plan.operation_name(), Some("B"));
    assert_eq!(plan.selections()[0].name(), "allUsers");

    // Operations that are not selected are still checked
    let document = "query A { allTweets { id } } query A { ghost }";
    let config = ValidationConfig::default().operation_name("A");
    assert_eq!(
        errors_with(&schema, document, json!({}), &config),
        [
            "1:30: operation `A` is defined more than once",
            "1:40: type `Query` has no field `ghost`",
        ]
    );
}

#[test]
fn unsupported_operations() {
    let schema = tweets::schema().unwrap();
    assert_eq!(
        errors(&schema, "subscription { allTweets { id } }", json!({})),
        ["1:1: subscription operations are not supported"]
    );

    let read_only = Schema::parse("type Query { a: Int }", Default::default()).unwrap();
    assert_eq!(
        errors(&read_only, "mutation { a }", json!({})),
        ["1:1: the schema has no root type for mutation operations"]
    );
}

#[test]
fn directives() {
    let schema = tweets::schema().unwrap();
    let query = r#"
        query($withText: Boolean!) {
          allTweets {
            id @skip(if: true)
            text @include(if: $withText)
            author @include(if: false) { id }
          }
          allUsers @skip(if: false) { username }
        }
    "#;
    let plan = validate(&schema, query, &object(json!({ "withText": false }))).unwrap();
    expect![[r#"
        query {
          allTweets
          allUsers {
            username
          }
        }
    "#]]
    .assert_eq(&plan.to_string());

    let query = "query { allTweets @cached { id @skip(unless: true) text @include } }";
    assert_eq!(
        errors(&schema, query, json!({})),
        [
            "1:19: directive `@cached` is not supported here",
            "1:38: `@skip` has no argument `unless`",
            "1:32: missing required argument `if` of `@skip`",
            "1:57: missing required argument `if` of `@include`",
        ]
    );
}

#[test]
fn typename() {
    let schema = tweets::schema().unwrap();
    assert!(validate(&schema, "{ __typename allTweets { __typename } }", &JsonMap::new()).is_ok());
    assert_eq!(
        errors(
            &schema,
            "{ __typename(full: true) allTweets { __typename { x } } }",
            json!({})
        ),
        [
            "1:14: `Query.__typename` has no argument `full`",
            "1:38: field `Tweet.__typename` of type `String!` cannot have a selection of subfields",
        ]
    );
}

#[test]
fn fields_with_the_same_response_key() {
    let schema = tweets::schema().unwrap();
    let query = "{
        tweet(id: 1) { id }
        tweet(id: 1) { text author { id } }
        tweet(id: 1) { author { username } }
    }";
    let plan = validate(&schema, query, &JsonMap::new()).unwrap();
    expect![[r#"
        query {
          tweet(id: "1") {
            id
            text
            author {
              id
              username
            }
          }
        }
    "#]]
    .assert_eq(&plan.to_string());

    let query = "{ a: tweet(id: 1) { id } a: tweet(id: 2) { id } a: allTweets { id } }";
    assert_eq!(
        errors(&schema, query, json!({})),
        [
            "1:26: conflicting selections for response key `a`: `tweet` is selected with different arguments",
            "1:49: conflicting selections for response key `a`: `tweet` and `allTweets` are different fields",
        ]
    );
}

#[test]
fn excessive_depth() {
    let schema = tweets::schema().unwrap();
    let config = ValidationConfig {
        max_depth: 2,
        ..Default::default()
    };
    let query = "{ allTweets { author { id } } tweet(id: 1) { author { id } } }";
    assert_eq!(
        errors_with(&schema, query, json!({}), &config),
        ["1:24: selection sets are nested deeper than the maximum of 2"]
    );
    let query = "{ allTweets { author { id } } }";
    let config = ValidationConfig {
        max_depth: 3,
        ..Default::default()
    };
    assert!(validate_with(&schema, query, &JsonMap::new(), &config).is_ok());
}

#[test]
fn request_error_response() {
    let schema = tweets::schema().unwrap();
    let errors = validate(&schema, "{ allTweets { likes } }", &JsonMap::new()).unwrap_err();
    let response: RequestErrorResponse = errors.iter().collect();
    expect![[r#"
        {
          "errors": [
            {
              "message": "type `Tweet` has no field `likes`",
              "locations": [
                {
                  "line": 1,
                  "column": 15
                }
              ]
            }
          ]
        }"#]]
    .assert_eq(&serde_json::to_string_pretty(&response).unwrap());
}
