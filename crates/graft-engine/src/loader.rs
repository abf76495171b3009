//! Per-execution deduplication of data source reads.

use crate::data_source::AdapterError;
use crate::data_source::DataSource;
use crate::JsonMap;
use crate::JsonValue;
use futures::future::BoxFuture;
use futures::future::Shared;
use futures::FutureExt as _;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

type SharedLoad = Shared<BoxFuture<'static, Result<JsonValue, AdapterError>>>;

/// A logical read against the data source.
///
/// Two keys are equal when they have the same kind and equal JSON, regardless
/// of the order of object keys.
#[derive(Debug, Clone)]
pub enum LoadKey {
    /// [`DataSource::fetch_one`]
    One { kind: String, key: JsonValue },
    /// [`DataSource::fetch_many`]
    Many { kind: String, filter: JsonMap },
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct Identity {
    many: bool,
    kind: String,
    canonical: String,
}

impl LoadKey {
    pub fn one(kind: impl Into<String>, key: impl Into<JsonValue>) -> Self {
        Self::One {
            kind: kind.into(),
            key: key.into(),
        }
    }

    pub fn many(kind: impl Into<String>, filter: JsonMap) -> Self {
        Self::Many {
            kind: kind.into(),
            filter,
        }
    }

    fn identity(&self) -> Identity {
        match self {
            LoadKey::One { kind, key } => Identity {
                many: false,
                kind: kind.clone(),
                canonical: canonical(key).to_string(),
            },
            LoadKey::Many { kind, filter } => Identity {
                many: true,
                kind: kind.clone(),
                canonical: canonical(&JsonValue::Object(filter.clone())).to_string(),
            },
        }
    }
}

impl PartialEq for LoadKey {
    fn eq(&self, other: &Self) -> bool {
        self.identity() == other.identity()
    }
}

impl Eq for LoadKey {}

impl fmt::Display for LoadKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let identity = self.identity();
        let lookup = if identity.many { "many" } else { "one" };
        write!(f, "{lookup} {} {}", identity.kind, identity.canonical)
    }
}

/// Sorts object keys recursively
fn canonical(value: &JsonValue) -> JsonValue {
    match value {
        JsonValue::Object(map) => {
            let mut entries: Vec<_> = map.iter().collect();
            entries.sort_by(|(a, _), (b, _)| a.as_str().cmp(b.as_str()));
            JsonValue::Object(
                entries
                    .into_iter()
                    .map(|(key, value)| (key.clone(), canonical(value)))
                    .collect(),
            )
        }
        JsonValue::Array(items) => JsonValue::Array(items.iter().map(canonical).collect()),
        other => other.clone(),
    }
}

/// Coalesces identical reads issued during one execution into a single
/// [`DataSource`] call.
///
/// Every caller scheduling a key equal to one whose call is still pending
/// awaits that same call and observes its result, success or failure. With
/// `cache_loads`, settled results are kept too, until [`Loader::clear`].
/// Writes are never coalesced.
///
/// Pending calls are owned by the futures awaiting them and by this table:
/// dropping both cancels the call.
pub struct Loader {
    source: Arc<dyn DataSource>,
    cache_loads: bool,
    pending: Mutex<HashMap<Identity, SharedLoad>>,
}

impl Loader {
    pub fn new(source: Arc<dyn DataSource>, cache_loads: bool) -> Self {
        Self {
            source,
            cache_loads,
            pending: Mutex::new(HashMap::new()),
        }
    }

    /// Resolve a read, sharing any pending or memoized call for an equal key.
    pub async fn schedule(&self, key: LoadKey) -> Result<JsonValue, AdapterError> {
        let identity = key.identity();
        let load = {
            let mut pending = self.pending.lock();
            match pending.get(&identity) {
                Some(load) => {
                    tracing::debug!(key = %key, "sharing data source call");
                    load.clone()
                }
                None => {
                    tracing::debug!(key = %key, "dispatching data source call");
                    let load = self.dispatch(key).shared();
                    pending.insert(identity.clone(), load.clone());
                    load
                }
            }
        };
        let result = load.clone().await;
        if !self.cache_loads {
            let mut pending = self.pending.lock();
            // A `clear` followed by a new call may have replaced the entry
            if pending
                .get(&identity)
                .is_some_and(|current| current.ptr_eq(&load))
            {
                pending.remove(&identity);
            }
        }
        result
    }

    fn dispatch(&self, key: LoadKey) -> BoxFuture<'static, Result<JsonValue, AdapterError>> {
        let source = Arc::clone(&self.source);
        async move {
            let result = match &key {
                LoadKey::One { kind, key } => source
                    .fetch_one(kind, key)
                    .await
                    .map(|entity| entity.map_or(JsonValue::Null, JsonValue::Object)),
                LoadKey::Many { kind, filter } => source
                    .fetch_many(kind, filter)
                    .await
                    .map(|entities| entities.into_iter().map(JsonValue::Object).collect()),
            };
            if let Err(error) = &result {
                tracing::warn!(key = %key, %error, "data source call failed");
            }
            result
        }
        .boxed()
    }

    /// [`DataSource::fetch_one`] through the loader
    pub async fn load_one(
        &self,
        kind: &str,
        key: &JsonValue,
    ) -> Result<Option<JsonMap>, AdapterError> {
        match self.schedule(LoadKey::one(kind, key.clone())).await? {
            JsonValue::Object(entity) => Ok(Some(entity)),
            _ => Ok(None),
        }
    }

    /// [`DataSource::fetch_many`] through the loader
    pub async fn load_many(
        &self,
        kind: &str,
        filter: &JsonMap,
    ) -> Result<Vec<JsonMap>, AdapterError> {
        match self.schedule(LoadKey::many(kind, filter.clone())).await? {
            JsonValue::Array(entities) => Ok(entities
                .into_iter()
                .filter_map(|entity| match entity {
                    JsonValue::Object(entity) => Some(entity),
                    _ => None,
                })
                .collect()),
            _ => Ok(Vec::new()),
        }
    }

    /// [`DataSource::mutate`], never shared with another call
    pub async fn mutate(
        &self,
        operation: &str,
        arguments: &JsonMap,
    ) -> Result<JsonValue, AdapterError> {
        tracing::debug!(operation, "dispatching mutation");
        let result = self.source.mutate(operation, arguments).await;
        if let Err(error) = &result {
            tracing::warn!(operation, %error, "mutation failed");
        }
        result
    }

    /// Forget settled and pending reads, so later reads observe prior writes.
    /// Callers already awaiting a pending read still receive its result.
    pub fn clear(&self) {
        self.pending.lock().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json_bytes::json;

    #[test]
    fn keys_ignore_object_key_order() {
        let a = LoadKey::many(
            "Tweet",
            json!({ "authorId": "1", "text": "hi" })
                .as_object()
                .cloned()
                .unwrap(),
        );
        let b = LoadKey::many(
            "Tweet",
            json!({ "text": "hi", "authorId": "1" })
                .as_object()
                .cloned()
                .unwrap(),
        );
        assert_eq!(a, b);
        assert_eq!(a.to_string(), r#"many Tweet {"authorId":"1","text":"hi"}"#);
        assert_ne!(LoadKey::one("User", "1"), LoadKey::one("User", 1));
        assert_ne!(LoadKey::one("User", "1"), LoadKey::one("Tweet", "1"));
    }
}
