use crate::support::object;
use crate::support::run;
use crate::support::run_with_variables;
use crate::support::schema;
use crate::support::to_json;
use crate::support::FakeSource;
use crate::tweets;
use expect_test::expect;
use graft_engine::ErrorKind;
use graft_engine::FetchMany;
use graft_engine::Mutate;
use graft_engine::ResolverRegistry;
use graft_engine::Schema;
use pretty_assertions::assert_eq;
use serde_json_bytes::json;
use std::sync::Arc;
use std::time::Duration;

fn writes_schema() -> Schema {
    let resolvers = ResolverRegistry::new()
        .with("Query", "items", FetchMany::new("Item"))
        .with("Mutation", "items", FetchMany::new("Item"))
        .with("Mutation", "m1", Mutate::new("m1"))
        .with("Mutation", "m2", Mutate::new("m2"))
        .with("Mutation", "rejectMe", Mutate::new("rejectMe"));
    schema(
        "
        scalar Json
        type Item { id: ID! }
        type Query { items: [Item!]! }
        type Mutation { items: [Item!]! m1: Json m2: Json rejectMe: Json! }
        ",
        resolvers,
    )
}

#[tokio::test]
async fn root_fields_run_one_after_the_other() {
    let source = Arc::new(FakeSource::new().with_latency("m1", Duration::from_millis(30)));
    let response = run(&writes_schema(), "mutation { m1 m2 }", source.clone()).await;
    assert!(response.is_ok());
    assert_eq!(
        source.events(),
        ["start mutate m1", "end mutate m1", "start mutate m2", "end mutate m2"]
    );
}

#[tokio::test]
async fn a_null_at_the_root_stops_the_mutation() {
    let source = Arc::new(FakeSource::new());
    let response = run(&writes_schema(), "mutation { m1 rejectMe m2 }", source.clone()).await;
    assert_eq!(response.data, None);
    assert_eq!(response.errors.len(), 1);
    assert_eq!(response.errors[0].kind, ErrorKind::Domain);
    assert_eq!(response.errors[0].message, "REJECTED: rejectMe was rejected");
    assert_eq!(
        source.events(),
        [
            "start mutate m1",
            "end mutate m1",
            "start mutate rejectMe",
            "end mutate rejectMe",
        ]
    );
}

#[tokio::test]
async fn reads_after_a_write_are_not_memoized() {
    let source = Arc::new(FakeSource::new());
    let response = run(
        &writes_schema(),
        "mutation { before: items { id } m1 after: items { id } }",
        source.clone(),
    )
    .await;
    assert!(response.is_ok());
    assert_eq!(source.calls(), 3);

    // Reads of a query are memoized for the whole execution
    let source = Arc::new(FakeSource::new());
    let response = run(
        &writes_schema(),
        "{ before: items { id } after: items { id } }",
        source.clone(),
    )
    .await;
    assert!(response.is_ok());
    assert_eq!(source.calls(), 1);
}

#[tokio::test]
async fn tweets_are_posted_and_deleted() {
    let schema = tweets::schema().unwrap();
    let store = Arc::new(tweets::TweetStore::seeded());
    let post = "mutation($text: String!) { \
        postTweet(text: $text, userId: 1) { id text author { username } } }";
    let response = run_with_variables(
        &schema,
        post,
        object(json!({ "text": "hello" })),
        store.clone(),
    )
    .await;
    expect![[r#"
        {
          "data": {
            "postTweet": {
              "id": "3",
              "text": "hello",
              "author": {
                "username": "nico"
              }
            }
          }
        }"#]]
    .assert_eq(&to_json(&response));

    let response = run(&schema, "mutation { deleteTweet(id: 1) }", store.clone()).await;
    assert_eq!(
        response.data.map(serde_json_bytes::Value::Object),
        Some(json!({ "deleteTweet": true }))
    );

    // Ids are never reused
    let response = run_with_variables(
        &schema,
        post,
        object(json!({ "text": "again" })),
        store.clone(),
    )
    .await;
    let data = serde_json_bytes::Value::Object(response.data.unwrap());
    assert_eq!(data["postTweet"]["id"], json!("4"));

    let response = run(&schema, "{ allTweets { id } }", store).await;
    assert_eq!(
        response.data.map(serde_json_bytes::Value::Object),
        Some(json!({ "allTweets": [{ "id": "2" }, { "id": "3" }, { "id": "4" }] }))
    );
}

#[tokio::test]
async fn domain_errors_are_field_errors() {
    let schema = tweets::schema().unwrap();
    let store = Arc::new(tweets::TweetStore::seeded());
    let response = run(
        &schema,
        r#"mutation { postTweet(text: "hi", userId: 99) { id } }"#,
        store.clone(),
    )
    .await;
    expect![[r#"
        {
          "errors": [
            {
              "message": "UNKNOWN_USER: no user with id 99",
              "locations": [
                {
                  "line": 1,
                  "column": 12
                }
              ],
              "path": [
                "postTweet"
              ],
              "kind": "DOMAIN"
            }
          ],
          "data": null
        }"#]]
    .assert_eq(&to_json(&response));

    let response = run(&schema, "mutation { deleteTweet(id: 42) }", store).await;
    assert_eq!(response.data, None);
    assert_eq!(response.errors[0].kind, ErrorKind::Domain);
    assert_eq!(response.errors[0].message, "TWEET_NOT_FOUND: no tweet with id 42");
}
