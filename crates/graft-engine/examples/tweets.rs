//! Serves the tweet schema from an in-memory store.
//!
//! ```sh
//! RUST_LOG=graft_engine=debug cargo run --example tweets
//! ```

use futures::future::BoxFuture;
use futures::FutureExt as _;
use graft_engine::AdapterError;
use graft_engine::DataSource;
use graft_engine::DomainError;
use graft_engine::FetchMany;
use graft_engine::FetchOne;
use graft_engine::FieldError;
use graft_engine::JsonMap;
use graft_engine::JsonValue;
use graft_engine::Mutate;
use graft_engine::Resolve;
use graft_engine::ResolveContext;
use graft_engine::ResolverRegistry;
use graft_engine::Schema;
use graft_engine::SchemaError;
use parking_lot::Mutex;
use serde_json_bytes::json;
use std::sync::Arc;

pub const SCHEMA: &str = r#"
type User {
    id: ID!
    username: String!
    firstName: String!
    lastName: String
    "First and last name, separated by a space"
    fullName: String!
}

type Tweet {
    id: ID!
    text: String!
    author: User!
}

type Query {
    allTweets: [Tweet!]!
    tweet(id: ID!): Tweet
    allUsers: [User!]!
}

type Mutation {
    postTweet(text: String!, userId: ID!): Tweet!
    "Fails if there is no tweet with this id"
    deleteTweet(id: ID!): Boolean!
}
"#;

pub fn schema() -> Result<Schema, SchemaError> {
    let resolvers = ResolverRegistry::new()
        .with("Query", "allTweets", FetchMany::new("Tweet"))
        .with("Query", "tweet", FetchOne::by_argument("Tweet", "id"))
        .with("Query", "allUsers", FetchMany::new("User"))
        .with("Tweet", "author", FetchOne::by_parent("User", "userId"))
        .with("User", "fullName", FullName)
        .with("Mutation", "postTweet", Mutate::new("postTweet"))
        .with("Mutation", "deleteTweet", Mutate::new("deleteTweet"));
    Schema::parse(SCHEMA, resolvers)
}

struct FullName;

impl Resolve for FullName {
    fn resolve<'a>(
        &'a self,
        ctx: ResolveContext<'a>,
    ) -> BoxFuture<'a, Result<JsonValue, FieldError>> {
        let name = |property: &str| ctx.parent().get(property).and_then(JsonValue::as_str);
        let full_name = match (name("firstName"), name("lastName")) {
            (Some(first), Some(last)) => Ok(format!("{first} {last}").into()),
            (Some(first), None) => Ok(first.into()),
            (None, _) => Err(FieldError::new("user has no first name")),
        };
        futures::future::ready(full_name).boxed()
    }
}

/// Users and tweets, with ids never reused.
#[derive(Debug, Default)]
pub struct TweetStore {
    state: Mutex<State>,
}

#[derive(Debug, Default)]
struct State {
    users: Vec<JsonMap>,
    tweets: Vec<JsonMap>,
    last_tweet_id: u64,
}

impl TweetStore {
    /// The store with two users and two tweets
    pub fn seeded() -> Self {
        let store = Self::default();
        {
            let mut state = store.state.lock();
            state.users = vec![
                entity(json!({
                    "id": "1",
                    "username": "nico",
                    "firstName": "Nico",
                    "lastName": "Las"
                })),
                entity(json!({ "id": "2", "username": "elon", "firstName": "Elon" })),
            ];
            state.tweets = vec![
                entity(json!({ "id": "1", "text": "first one!", "userId": "2" })),
                entity(json!({ "id": "2", "text": "second one", "userId": "1" })),
            ];
            state.last_tweet_id = 2;
        }
        store
    }

    fn collection<'s>(state: &'s State, kind: &str) -> Result<&'s [JsonMap], AdapterError> {
        match kind {
            "User" => Ok(&state.users),
            "Tweet" => Ok(&state.tweets),
            _ => Err(AdapterError::storage(format!("no collection for {kind}"))),
        }
    }

    fn post_tweet(&self, arguments: &JsonMap) -> Result<JsonValue, AdapterError> {
        let mut state = self.state.lock();
        let user_id = string_argument(arguments, "userId");
        if !state.users.iter().any(|user| has_id(user, &user_id)) {
            let message = format!("no user with id {user_id}");
            return Err(DomainError::new("UNKNOWN_USER", message).into());
        }
        state.last_tweet_id += 1;
        let tweet = entity(json!({
            "id": state.last_tweet_id.to_string(),
            "text": string_argument(arguments, "text"),
            "userId": user_id,
        }));
        state.tweets.push(tweet.clone());
        Ok(JsonValue::Object(tweet))
    }

    fn delete_tweet(&self, arguments: &JsonMap) -> Result<JsonValue, AdapterError> {
        let mut state = self.state.lock();
        let id = string_argument(arguments, "id");
        let Some(index) = state.tweets.iter().position(|tweet| has_id(tweet, &id)) else {
            let message = format!("no tweet with id {id}");
            return Err(DomainError::new("TWEET_NOT_FOUND", message).into());
        };
        state.tweets.remove(index);
        Ok(true.into())
    }
}

impl DataSource for TweetStore {
    fn fetch_one<'a>(
        &'a self,
        kind: &'a str,
        key: &'a JsonValue,
    ) -> BoxFuture<'a, Result<Option<JsonMap>, AdapterError>> {
        let result = Self::collection(&self.state.lock(), kind).map(|entities| {
            entities
                .iter()
                .find(|entity| entity.get("id") == Some(key))
                .cloned()
        });
        futures::future::ready(result).boxed()
    }

    fn fetch_many<'a>(
        &'a self,
        kind: &'a str,
        filter: &'a JsonMap,
    ) -> BoxFuture<'a, Result<Vec<JsonMap>, AdapterError>> {
        let result = Self::collection(&self.state.lock(), kind).map(|entities| {
            entities
                .iter()
                .filter(|entity| {
                    filter
                        .iter()
                        .all(|(property, value)| entity.get(property.as_str()) == Some(value))
                })
                .cloned()
                .collect()
        });
        futures::future::ready(result).boxed()
    }

    fn mutate<'a>(
        &'a self,
        operation: &'a str,
        arguments: &'a JsonMap,
    ) -> BoxFuture<'a, Result<JsonValue, AdapterError>> {
        let result = match operation {
            "postTweet" => self.post_tweet(arguments),
            "deleteTweet" => self.delete_tweet(arguments),
            _ => Err(AdapterError::storage(format!("unknown mutation {operation}"))),
        };
        futures::future::ready(result).boxed()
    }
}

fn string_argument(arguments: &JsonMap, name: &str) -> String {
    arguments
        .get(name)
        .and_then(JsonValue::as_str)
        .unwrap_or_default()
        .to_owned()
}

fn has_id(entity: &JsonMap, id: &str) -> bool {
    entity.get("id").and_then(JsonValue::as_str) == Some(id)
}

fn entity(value: JsonValue) -> JsonMap {
    match value {
        JsonValue::Object(map) => map,
        _ => JsonMap::new(),
    }
}

#[allow(dead_code)]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let schema = schema()?;
    let store: Arc<dyn DataSource> = Arc::new(TweetStore::seeded());
    let documents = [
        "{ allTweets { id text author { username fullName } } }",
        r#"mutation { postTweet(text: "hello", userId: 1) { id author { username } } }"#,
        r#"mutation { deleteTweet(id: 42) }"#,
        "{ allTweets { id text } allUsers { username } }",
    ];
    for document in documents {
        println!("{document}");
        match graft_engine::validate(&schema, document, &JsonMap::new()) {
            Ok(plan) => {
                let response = graft_engine::execute(&plan, Arc::clone(&store)).await;
                println!("{}", serde_json::to_string_pretty(&response)?);
            }
            Err(errors) => {
                let response: graft_engine::RequestErrorResponse = errors.iter().collect();
                println!("{}", serde_json::to_string_pretty(&response)?);
            }
        }
    }
    Ok(())
}
