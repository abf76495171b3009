use crate::JsonMap;
use crate::JsonValue;
use futures::future::BoxFuture;

/// The backing store the engine reads from and writes to.
///
/// Entities are JSON objects. Implementations may be in-memory, call a REST
/// service or query a database: the engine only relies on this contract.
/// Futures returned here are dropped when the execution that awaits them is
/// cancelled, and must tolerate that.
pub trait DataSource: Send + Sync {
    /// Fetch the entity of this kind with this key. `Ok(None)` means not found.
    fn fetch_one<'a>(
        &'a self,
        kind: &'a str,
        key: &'a JsonValue,
    ) -> BoxFuture<'a, Result<Option<JsonMap>, AdapterError>>;

    /// Fetch every entity of this kind whose properties equal those of the filter.
    fn fetch_many<'a>(
        &'a self,
        kind: &'a str,
        filter: &'a JsonMap,
    ) -> BoxFuture<'a, Result<Vec<JsonMap>, AdapterError>>;

    /// Apply a named write. The result is usually the written entity, but may
    /// be any JSON value such as a boolean for a deletion.
    fn mutate<'a>(
        &'a self,
        operation: &'a str,
        arguments: &'a JsonMap,
    ) -> BoxFuture<'a, Result<JsonValue, AdapterError>>;
}

/// Failure of a [`DataSource`] call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AdapterError {
    /// The store could not be reached or failed to answer
    #[error("data source error: {message}")]
    Storage { message: String },

    /// The store refused the operation
    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl AdapterError {
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }
}

/// A business rule violation, such as a write referencing a missing entity.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{code}: {message}")]
pub struct DomainError {
    /// Stable machine-readable identifier, e.g. `UNKNOWN_USER`
    pub code: String,
    pub message: String,
}

impl DomainError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}
