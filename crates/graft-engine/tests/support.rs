//! A scriptable in-memory data source that records its calls.

use futures::future::BoxFuture;
use futures::FutureExt as _;
use graft_engine::AdapterError;
use graft_engine::DataSource;
use graft_engine::DomainError;
use graft_engine::FieldError;
use graft_engine::JsonMap;
use graft_engine::JsonValue;
use graft_engine::Resolve;
use graft_engine::ResolveContext;
use graft_engine::Response;
use graft_engine::Schema;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::collections::HashSet;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

/// Entities are looked up by their `id` property. Every call is logged as a
/// `start` and an `end` event, such as `start one User "1"`.
#[derive(Default)]
pub struct FakeSource {
    entities: HashMap<String, Vec<JsonMap>>,
    /// Per entity kind or mutation name
    latency: HashMap<String, Duration>,
    failing: HashSet<String>,
    events: Mutex<Vec<String>>,
    in_flight: AtomicUsize,
}

impl FakeSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entities(mut self, kind: &str, entities: JsonValue) -> Self {
        let entities = match entities {
            JsonValue::Array(items) => items.into_iter().map(object).collect(),
            other => vec![object(other)],
        };
        self.entities.insert(kind.to_owned(), entities);
        self
    }

    pub fn with_latency(mut self, name: &str, latency: Duration) -> Self {
        self.latency.insert(name.to_owned(), latency);
        self
    }

    /// Calls for this kind or mutation fail with a storage error.
    pub fn failing(mut self, name: &str) -> Self {
        self.failing.insert(name.to_owned());
        self
    }

    pub fn events(&self) -> Vec<String> {
        self.events.lock().clone()
    }

    /// Number of calls started, of any kind
    pub fn calls(&self) -> usize {
        self.events
            .lock()
            .iter()
            .filter(|event| event.starts_with("start "))
            .count()
    }

    /// Number of calls started but neither finished nor dropped
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    async fn call<T>(
        &self,
        name: &str,
        call: String,
        result: impl FnOnce() -> T,
    ) -> Result<T, AdapterError> {
        let _guard = InFlight::new(&self.in_flight);
        self.events.lock().push(format!("start {call}"));
        if let Some(latency) = self.latency.get(name) {
            tokio::time::sleep(*latency).await;
        }
        self.events.lock().push(format!("end {call}"));
        if self.failing.contains(name) {
            return Err(AdapterError::storage(format!("{name} is unavailable")));
        }
        Ok(result())
    }
}

impl DataSource for FakeSource {
    fn fetch_one<'a>(
        &'a self,
        kind: &'a str,
        key: &'a JsonValue,
    ) -> BoxFuture<'a, Result<Option<JsonMap>, AdapterError>> {
        self.call(kind, format!("one {kind} {key}"), move || {
            self.entities
                .get(kind)?
                .iter()
                .find(|entity| entity.get("id") == Some(key))
                .cloned()
        })
        .boxed()
    }

    fn fetch_many<'a>(
        &'a self,
        kind: &'a str,
        filter: &'a JsonMap,
    ) -> BoxFuture<'a, Result<Vec<JsonMap>, AdapterError>> {
        let call = format!("many {kind} {}", JsonValue::Object(filter.clone()));
        self.call(kind, call, move || {
            self.entities
                .get(kind)
                .into_iter()
                .flatten()
                .filter(|entity| {
                    filter
                        .iter()
                        .all(|(property, value)| entity.get(property.as_str()) == Some(value))
                })
                .cloned()
                .collect()
        })
        .boxed()
    }

    fn mutate<'a>(
        &'a self,
        operation: &'a str,
        arguments: &'a JsonMap,
    ) -> BoxFuture<'a, Result<JsonValue, AdapterError>> {
        async move {
            let call = format!("mutate {operation}");
            let written = self
                .call(operation, call, || JsonValue::Object(arguments.clone()))
                .await?;
            if operation.starts_with("reject") {
                let message = format!("{operation} was rejected");
                return Err(DomainError::new("REJECTED", message).into());
            }
            Ok(written)
        }
        .boxed()
    }
}

struct InFlight<'a>(&'a AtomicUsize);

impl<'a> InFlight<'a> {
    fn new(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

pub fn object(value: JsonValue) -> JsonMap {
    match value {
        JsonValue::Object(map) => map,
        other => panic!("expected an object, got {other}"),
    }
}

pub fn schema(sdl: &str, resolvers: graft_engine::ResolverRegistry) -> Schema {
    match Schema::parse(sdl, resolvers) {
        Ok(schema) => schema,
        Err(error) => panic!("{error}"),
    }
}

/// Validate and execute, panicking on validation errors
pub async fn run(schema: &Schema, query: &str, source: Arc<dyn DataSource>) -> Response {
    run_with_variables(schema, query, JsonMap::new(), source).await
}

pub async fn run_with_variables(
    schema: &Schema,
    query: &str,
    variables: JsonMap,
    source: Arc<dyn DataSource>,
) -> Response {
    let plan = match graft_engine::validate(schema, query, &variables) {
        Ok(plan) => plan,
        Err(errors) => panic!("{errors:#?}"),
    };
    graft_engine::execute(&plan, source).await
}

pub fn to_json(response: &Response) -> String {
    serde_json::to_string_pretty(response).unwrap()
}

/// Resolves to a fixed value, after an optional delay
pub struct Const(pub JsonValue, pub Duration);

impl Const {
    pub fn new(value: JsonValue) -> Self {
        Self(value, Duration::ZERO)
    }
}

impl Resolve for Const {
    fn resolve<'a>(
        &'a self,
        _ctx: ResolveContext<'a>,
    ) -> BoxFuture<'a, Result<JsonValue, FieldError>> {
        async move {
            tokio::time::sleep(self.1).await;
            Ok(self.0.clone())
        }
        .boxed()
    }
}

/// Fails with this message, after an optional delay
pub struct Fail(pub &'static str, pub Duration);

impl Fail {
    pub fn new(message: &'static str) -> Self {
        Self(message, Duration::ZERO)
    }
}

impl Resolve for Fail {
    fn resolve<'a>(
        &'a self,
        _ctx: ResolveContext<'a>,
    ) -> BoxFuture<'a, Result<JsonValue, FieldError>> {
        async move {
            tokio::time::sleep(self.1).await;
            Err(FieldError::new(self.0))
        }
        .boxed()
    }
}
