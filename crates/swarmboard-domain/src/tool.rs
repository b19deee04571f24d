//! Tool metadata and the typed tool error

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Errors a tool invocation can fail with
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "message", rename_all = "snake_case")]
pub enum ToolError {
    /// Input did not match the tool's schema (or the tool is not available)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The tool ran and failed
    #[error("Execution failed: {0}")]
    ExecutionFailed(String),

    /// The tool did not answer in time
    #[error("Tool timed out: {0}")]
    Timeout(String),
}

impl ToolError {
    /// Short machine-readable kind
    pub fn kind(&self) -> &'static str {
        match self {
            ToolError::InvalidInput(_) => "invalid_input",
            ToolError::ExecutionFailed(_) => "execution_failed",
            ToolError::Timeout(_) => "timeout",
        }
    }
}

/// Metadata describing a tool to planners and specialists
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolSpec {
    /// Unique tool name
    pub name: String,

    /// What the tool does, in one sentence
    pub description: String,

    /// JSON schema of the expected input object
    pub input_schema: Value,

    /// Capabilities offered (used for capability lookups)
    #[serde(default)]
    pub capabilities: Vec<String>,

    /// Domain the tool belongs to (e.g. "math", "text")
    #[serde(default)]
    pub domain: String,
}

impl ToolSpec {
    /// Create a tool spec with an input schema
    pub fn new(name: impl Into<String>, description: impl Into<String>, input_schema: Value) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema,
            capabilities: Vec::new(),
            domain: "general".to_string(),
        }
    }

    /// Set capabilities
    pub fn with_capabilities<I, S>(mut self, capabilities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.capabilities = capabilities.into_iter().map(Into::into).collect();
        self
    }

    /// Set domain
    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = domain.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_error_kinds() {
        assert_eq!(ToolError::InvalidInput("x".into()).kind(), "invalid_input");
        assert_eq!(ToolError::ExecutionFailed("x".into()).kind(), "execution_failed");
        assert_eq!(ToolError::Timeout("x".into()).kind(), "timeout");
    }

    #[test]
    fn test_error_serializes_with_kind_tag() {
        let value = serde_json::to_value(ToolError::Timeout("slow".into())).unwrap();
        assert_eq!(value, json!({"kind": "timeout", "message": "slow"}));
    }

    #[test]
    fn test_spec_builder() {
        let spec = ToolSpec::new("calc", "Evaluate arithmetic", json!({"type": "object"}))
            .with_capabilities(["arithmetic"])
            .with_domain("math");
        assert_eq!(spec.domain, "math");
        assert_eq!(spec.capabilities, vec!["arithmetic".to_string()]);
    }
}
