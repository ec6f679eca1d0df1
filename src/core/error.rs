//! Error types for the logging pipeline

use serde_json::Value;

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// Odd number of key-value arguments at dispatch
    #[error("odd number of arguments passed as key-value pairs for logging")]
    OddKeyValues,

    /// Key position in a key-value sequence held a non-string value
    #[error("logging keys must be strings, got {kind}: {value}")]
    NonStringKey { kind: &'static str, value: String },

    /// Value marshalling failure
    #[error("failed to encode log entry as JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Underlying writer failure
    #[error("failed to write log entry: {0}")]
    Io(#[from] std::io::Error),
}

impl LoggerError {
    /// Create a non-string-key error describing the offending value
    pub fn non_string_key(key: &Value) -> Self {
        let kind = match key {
            Value::Null => "null",
            Value::Bool(_) => "a boolean",
            Value::Number(_) => "a number",
            Value::String(_) => "a string",
            Value::Array(_) => "an array",
            Value::Object(_) => "an object",
        };
        LoggerError::NonStringKey {
            kind,
            value: key.to_string(),
        }
    }
}
