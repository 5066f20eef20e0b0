//! Typed access to tool call arguments.

use crate::error::ToolwrightError;

/// Wrapper around tool call arguments providing typed extraction.
#[derive(Debug, Clone)]
pub struct ToolArguments {
    value: serde_json::Value,
}

impl ToolArguments {
    pub fn new(value: serde_json::Value) -> Self {
        Self { value }
    }

    /// Get the raw JSON value.
    pub fn raw(&self) -> &serde_json::Value {
        &self.value
    }

    /// Get a string argument by key.
    pub fn get_str(&self, key: &str) -> Result<&str, ToolwrightError> {
        self.value.get(key).and_then(|v| v.as_str()).ok_or_else(|| {
            ToolwrightError::InvalidArgument(format!("Missing string argument: {key}"))
        })
    }

    /// Get an optional string argument.
    pub fn get_str_opt(&self, key: &str) -> Option<&str> {
        self.value.get(key).and_then(|v| v.as_str())
    }

    /// Get an integer argument.
    pub fn get_i64(&self, key: &str) -> Result<i64, ToolwrightError> {
        self.value.get(key).and_then(|v| v.as_i64()).ok_or_else(|| {
            ToolwrightError::InvalidArgument(format!("Missing integer argument: {key}"))
        })
    }

    /// Get an optional integer argument.
    pub fn get_i64_opt(&self, key: &str) -> Option<i64> {
        self.value.get(key).and_then(|v| v.as_i64())
    }

    /// Get an optional float argument.
    pub fn get_f64_opt(&self, key: &str) -> Option<f64> {
        self.value.get(key).and_then(|v| v.as_f64())
    }

    /// Deserialize the entire arguments into a typed struct.
    pub fn deserialize<T: serde::de::DeserializeOwned>(&self) -> Result<T, ToolwrightError> {
        let value = match &self.value {
            serde_json::Value::Null => serde_json::json!({}),
            other => other.clone(),
        };
        serde_json::from_value(value).map_err(|e| {
            ToolwrightError::InvalidArgument(format!("Failed to deserialize arguments: {e}"))
        })
    }
}
