use serde::Deserialize;

/// Options for [`validate_with`][crate::validate_with].
///
/// Deserializable so a host can embed it in its own configuration file:
///
/// ```
/// use graft_engine::ValidationConfig;
///
/// let config: ValidationConfig = serde_json::from_str(r#"{ "max_depth": 8 }"#).unwrap();
/// assert_eq!(config.max_depth, 8);
/// assert_eq!(config.recursion_limit, 500);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ValidationConfig {
    /// Which operation of the document to plan. Required when the document
    /// holds more than one.
    pub operation_name: Option<String>,
    /// Maximum nesting of selection sets. The root selection set has depth 1.
    pub max_depth: usize,
    /// Maximum nesting the parser accepts, lists and input objects included.
    pub recursion_limit: usize,
    /// Maximum number of tokens the parser accepts.
    pub token_limit: usize,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            operation_name: None,
            max_depth: 32,
            recursion_limit: graft_parser::DEFAULT_RECURSION_LIMIT,
            token_limit: 15_000,
        }
    }
}

impl ValidationConfig {
    pub fn operation_name(mut self, name: impl Into<String>) -> Self {
        self.operation_name = Some(name.into());
        self
    }
}

/// Options for [`Execution`][crate::Execution].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExecutionConfig {
    /// Keep settled loads for the rest of the execution, so that equal
    /// lookups issued later share the first result. When `false`, only
    /// lookups that overlap in time are shared.
    pub cache_loads: bool,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self { cache_loads: true }
    }
}
