//! A graph-query resolution engine.
//!
//! A [`Schema`] describes object, scalar and enum types and binds fields to
//! [`Resolve`] capabilities. [`validate`] turns a query document into an
//! [`ExecutionPlan`], or reports every problem it finds. [`execute`] runs a
//! plan against a [`DataSource`], deduplicating identical lookups and
//! propagating nulls the way GraphQL execution does.
//!
//! # Example
//!
//! ```
#![doc = include_str!("../tests/doc_example.rs")]
//! ```

mod config;
mod data_source;
mod execution;
mod input_coercion;
mod loader;
mod plan;
mod resolver;
mod response;
mod schema;
mod validation;

pub use self::config::ExecutionConfig;
pub use self::config::ValidationConfig;
pub use self::data_source::AdapterError;
pub use self::data_source::DataSource;
pub use self::data_source::DomainError;
pub use self::execution::execute;
pub use self::execution::Execution;
pub use self::loader::LoadKey;
pub use self::loader::Loader;
pub use self::plan::ExecutionPlan;
pub use self::plan::SelectionNode;
pub use self::resolver::DefaultResolver;
pub use self::resolver::FetchMany;
pub use self::resolver::FetchOne;
pub use self::resolver::FieldError;
pub use self::resolver::KeySource;
pub use self::resolver::Mutate;
pub use self::resolver::Property;
pub use self::resolver::Resolve;
pub use self::resolver::ResolveContext;
pub use self::resolver::ResolverRegistry;
pub use self::response::ErrorKind;
pub use self::response::ExecutionError;
pub use self::response::Location;
pub use self::response::PathElement;
pub use self::response::RequestError;
pub use self::response::RequestErrorResponse;
pub use self::response::Response;
pub use self::schema::ArgDef;
pub use self::schema::ArgDescriptor;
pub use self::schema::FieldDef;
pub use self::schema::FieldDescriptor;
pub use self::schema::Schema;
pub use self::schema::SchemaError;
pub use self::schema::TypeDef;
pub use self::schema::TypeDescriptor;
pub use self::schema::TypeKind;
pub use self::validation::validate;
pub use self::validation::validate_with;
pub use self::validation::ValidationError;
pub use futures::future::AbortHandle;
pub use futures::future::AbortRegistration;
pub use futures::future::Aborted;
pub use graft_parser::ast::OperationType;
pub use graft_parser::ast::Type;
pub use serde_json_bytes::ByteString;
pub use serde_json_bytes::Value as JsonValue;

/// Represents a JSON object
pub type JsonMap = serde_json_bytes::Map<ByteString, JsonValue>;
