use crate::support::object;
use crate::support::run;
use crate::support::run_with_variables;
use crate::support::schema;
use crate::support::to_json;
use crate::support::Const;
use crate::support::Fail;
use crate::support::FakeSource;
use crate::tweets;
use expect_test::expect;
use graft_engine::ErrorKind;
use graft_engine::FetchOne;
use graft_engine::PathElement;
use graft_engine::ResolverRegistry;
use pretty_assertions::assert_eq;
use serde_json_bytes::json;
use std::sync::Arc;
use std::time::Duration;

fn store() -> Arc<tweets::TweetStore> {
    Arc::new(tweets::TweetStore::seeded())
}

fn messages(response: &graft_engine::Response) -> Vec<&str> {
    response.errors.iter().map(|e| e.message.as_str()).collect()
}

#[tokio::test]
async fn data_follows_the_selection_tree() {
    let schema = tweets::schema().unwrap();
    let query = "{ allTweets { id text writer: author { username fullName } } }";
    let response = run(&schema, query, store()).await;
    expect![[r#"
        {
          "data": {
            "allTweets": [
              {
                "id": "1",
                "text": "first one!",
                "writer": {
                  "username": "elon",
                  "fullName": "Elon"
                }
              },
              {
                "id": "2",
                "text": "second one",
                "writer": {
                  "username": "nico",
                  "fullName": "Nico Las"
                }
              }
            ]
          }
        }"#]]
    .assert_eq(&to_json(&response));
}

#[tokio::test]
async fn typename_and_missing_entities() {
    let schema = tweets::schema().unwrap();
    let query = "{ __typename tweet(id: 1) { __typename id } missing: tweet(id: 99) { id } }";
    let response = run(&schema, query, store()).await;
    assert!(response.is_ok());
    assert_eq!(
        response.data.map(serde_json_bytes::Value::Object),
        Some(json!({
            "__typename": "Query",
            "tweet": { "__typename": "Tweet", "id": "1" },
            "missing": null,
        }))
    );
}

#[tokio::test]
async fn null_propagates_to_the_root() {
    let resolvers = ResolverRegistry::new()
        .with("Query", "a", Const::new(json!({})))
        .with("X", "b", Fail::new("boom"));
    let schema = schema("type Query { a: X! } type X { b: Int! }", resolvers);
    let response = run(&schema, "{ a { b } }", Arc::new(FakeSource::new())).await;
    expect![[r#"
        {
          "errors": [
            {
              "message": "boom",
              "locations": [
                {
                  "line": 1,
                  "column": 7
                }
              ],
              "path": [
                "a",
                "b"
              ],
              "kind": "RESOLVER"
            }
          ],
          "data": null
        }"#]]
    .assert_eq(&to_json(&response));
}

#[tokio::test]
async fn null_stops_at_a_nullable_field() {
    let resolvers = ResolverRegistry::new()
        .with("Query", "a", Const::new(json!({})))
        .with("Query", "c", Const::new(json!(3)))
        .with("X", "b", Fail::new("boom"));
    let schema = schema("type Query { a: X c: Int } type X { b: Int! }", resolvers);
    let response = run(&schema, "{ a { b } c }", Arc::new(FakeSource::new())).await;
    assert_eq!(messages(&response), ["boom"]);
    assert_eq!(
        response.errors[0].path,
        [PathElement::Field("a".into()), PathElement::Field("b".into())]
    );
    assert_eq!(
        response.data.map(serde_json_bytes::Value::Object),
        Some(json!({ "a": null, "c": 3 }))
    );
}

#[tokio::test]
async fn nulls_in_lists() {
    let items = json!([{ "n": 1 }, { "n": null }, { "n": 3 }]);
    let run_items = |item_type: &str| {
        let resolvers = ResolverRegistry::new().with("Query", "items", Const::new(items.clone()));
        let sdl = format!("type Query {{ items: {item_type} }} type Item {{ n: Int! }}");
        let schema = schema(&sdl, resolvers);
        async move {
            let response = run(&schema, "{ items { n } }", Arc::new(FakeSource::new())).await;
            assert_eq!(messages(&response), ["non-null type Int! resolved to null"]);
            assert_eq!(response.errors[0].kind, ErrorKind::NonNull);
            assert_eq!(
                response.errors[0].path,
                [
                    PathElement::Field("items".into()),
                    PathElement::ListIndex(1),
                    PathElement::Field("n".into()),
                ]
            );
            response.data.map(serde_json_bytes::Value::Object)
        }
    };
    assert_eq!(run_items("[Item!]!").await, None);
    assert_eq!(run_items("[Item!]").await, Some(json!({ "items": null })));
    assert_eq!(
        run_items("[Item]!").await,
        Some(json!({ "items": [{ "n": 1 }, null, { "n": 3 }] }))
    );
}

#[tokio::test]
async fn result_coercion() {
    let resolvers = ResolverRegistry::new()
        .with("Query", "count", Const::new(json!("x")))
        .with("Query", "id", Const::new(json!(7)))
        .with("Query", "big", Const::new(json!(3_000_000_000_u64)))
        .with("Query", "ratio", Const::new(json!(2)))
        .with("Query", "color", Const::new(json!("BLUE")))
        .with("Query", "tags", Const::new(json!("a")))
        .with("Query", "item", Const::new(json!(1)))
        .with("Query", "raw", Const::new(json!({ "any": ["thing"] })));
    let schema = schema(
        "
        enum Color { RED }
        scalar Raw
        type Item { n: Int }
        type Query {
            count: Int id: ID big: Int ratio: Float color: Color
            tags: [String] item: Item raw: Raw
        }
        ",
        resolvers,
    );
    let query = "{ count id big ratio color tags item { n } raw }";
    let response = run(&schema, query, Arc::new(FakeSource::new())).await;
    assert_eq!(
        messages(&response),
        [
            r#"resolver returned "x", expected Int"#,
            "resolver returned 3000000000 which overflows Int",
            r#"resolver returned "BLUE", expected enum Color"#,
            r#"resolver returned "a", expected list type [String]"#,
            "resolver returned 1, expected an object of type Item",
        ]
    );
    assert!(response
        .errors
        .iter()
        .all(|error| error.kind == ErrorKind::Coercion));
    assert_eq!(
        response.data.map(serde_json_bytes::Value::Object),
        Some(json!({
            "count": null,
            "id": "7",
            "big": null,
            "ratio": 2,
            "color": null,
            "tags": null,
            "item": null,
            "raw": { "any": ["thing"] },
        }))
    );
}

#[tokio::test]
async fn data_source_failures_are_field_errors() {
    let source = FakeSource::new().failing("User");
    let resolvers =
        ResolverRegistry::new().with("Query", "user", FetchOne::by_argument("User", "id"));
    let schema = schema(
        "type Query { user(id: ID!): User } type User { id: ID! }",
        resolvers,
    );
    let response = run(&schema, "{ user(id: 1) { id } }", Arc::new(source)).await;
    assert_eq!(messages(&response), ["data source error: User is unavailable"]);
    assert_eq!(response.errors[0].kind, ErrorKind::DataSource);
    assert_eq!(
        response.data.map(serde_json_bytes::Value::Object),
        Some(json!({ "user": null }))
    );
}

#[tokio::test]
async fn sibling_fields_run_concurrently() {
    let latency = Duration::from_millis(50);
    let source = Arc::new(
        FakeSource::new()
            .with_entities("User", json!([{ "id": "1" }]))
            .with_entities("Tweet", json!([{ "id": "1" }]))
            .with_latency("User", latency)
            .with_latency("Tweet", latency),
    );
    let resolvers = ResolverRegistry::new()
        .with("Query", "user", FetchOne::by_argument("User", "id"))
        .with("Query", "tweet", FetchOne::by_argument("Tweet", "id"));
    let schema = schema(
        "type Query { user(id: ID!): User tweet(id: ID!): Tweet } type User { id: ID! } type Tweet { id: ID! }",
        resolvers,
    );
    let response = run(&schema, "{ user(id: 1) { id } tweet(id: 1) { id } }", source.clone()).await;
    assert!(response.is_ok());
    let events = source.events();
    assert_eq!(&events[..2], [r#"start one User "1""#, r#"start one Tweet "1""#]);
    assert_eq!(events.len(), 4);
}

#[tokio::test]
async fn errors_follow_selection_order() {
    let resolvers = ResolverRegistry::new()
        .with("Query", "slow", Fail("slow", Duration::from_millis(30)))
        .with("Query", "fast", Fail::new("fast"));
    let schema = schema("type Query { slow: Int fast: Int }", resolvers);
    let response = run(&schema, "{ slow fast }", Arc::new(FakeSource::new())).await;
    assert_eq!(messages(&response), ["slow", "fast"]);
    let keys: Vec<_> = response.data.unwrap().keys().map(|k| k.as_str().to_owned()).collect();
    assert_eq!(keys, ["slow", "fast"]);
}

#[tokio::test]
async fn null_variable_for_a_non_null_argument() {
    let resolvers = ResolverRegistry::new().with("Query", "f", Const::new(json!("called")));
    let schema = schema("type Query { f(n: Int! = 5): String }", resolvers);
    // Allowed by validation because the argument has a default
    let response = run_with_variables(
        &schema,
        "query($n: Int) { f(n: $n) g: f }",
        object(json!({ "n": null })),
        Arc::new(FakeSource::new()),
    )
    .await;
    assert_eq!(
        messages(&response),
        ["invalid value for argument `n`: null value for non-null type Int!"]
    );
    assert_eq!(response.errors[0].kind, ErrorKind::Coercion);
    assert_eq!(response.errors[0].path, [PathElement::Field("f".into())]);
    assert_eq!(response.errors[0].locations[0].column, 18);
    assert_eq!(
        response.data.map(serde_json_bytes::Value::Object),
        Some(json!({ "f": null, "g": "called" }))
    );
}
