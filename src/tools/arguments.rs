//! Typed access to function-call arguments.

use crate::error::FoundryError;

/// Arguments of a function call, as decoded from the service.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolArguments {
    value: serde_json::Value,
}

impl ToolArguments {
    pub fn new(value: serde_json::Value) -> Self {
        Self { value }
    }

    /// Decode the JSON string the service sends. Blank input means no arguments.
    pub fn parse(raw: &str) -> Result<Self, FoundryError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(Self::new(serde_json::json!({})));
        }
        serde_json::from_str(trimmed)
            .map(Self::new)
            .map_err(|e| FoundryError::InvalidArgument(format!("Arguments are not valid JSON: {e}")))
    }

    /// Get the raw JSON value.
    pub fn raw(&self) -> &serde_json::Value {
        &self.value
    }

    pub fn get_str(&self, key: &str) -> Result<&str, FoundryError> {
        self.value
            .get(key)
            .and_then(|v| v.as_str())
            .ok_or_else(|| missing("string", key))
    }

    pub fn get_str_opt(&self, key: &str) -> Option<&str> {
        self.value.get(key).and_then(|v| v.as_str())
    }

    pub fn get_i64(&self, key: &str) -> Result<i64, FoundryError> {
        self.value
            .get(key)
            .and_then(|v| v.as_i64())
            .ok_or_else(|| missing("integer", key))
    }

    /// Accepts integers as well as floats.
    pub fn get_f64(&self, key: &str) -> Result<f64, FoundryError> {
        self.value
            .get(key)
            .and_then(|v| v.as_f64())
            .ok_or_else(|| missing("number", key))
    }

    pub fn get_bool(&self, key: &str) -> Result<bool, FoundryError> {
        self.value
            .get(key)
            .and_then(|v| v.as_bool())
            .ok_or_else(|| missing("boolean", key))
    }

    /// Deserialize the whole argument object into a typed struct.
    pub fn deserialize<T: serde::de::DeserializeOwned>(&self) -> Result<T, FoundryError> {
        serde_json::from_value(self.value.clone()).map_err(|e| {
            FoundryError::InvalidArgument(format!("Failed to deserialize arguments: {e}"))
        })
    }
}

fn missing(kind: &str, key: &str) -> FoundryError {
    FoundryError::InvalidArgument(format!("Missing {kind} argument: {key}"))
}
