//! Error types for the Specialist Runner

use serde::{Deserialize, Serialize};
use swarmboard_domain::ToolError;
use thiserror::Error;

/// Why a specialist turn did not fully succeed
///
/// Every variant is recovered: the runner reports it in the turn's result and
/// the swarm carries on.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum SpecialistFailure {
    /// The language model call failed
    #[error("Model invocation failed: {0}")]
    ModelInvocation(String),

    /// The response could not be interpreted
    #[error("Response unparseable: {0}")]
    ResponseUnparseable(String),

    /// The requested tool failed
    #[error("Tool failed: {0}")]
    Tool(ToolError),

    /// The model call exceeded its time limit
    #[error("Timed out: {0}")]
    Timeout(String),
}

impl SpecialistFailure {
    /// Short machine-readable kind
    pub fn kind(&self) -> &'static str {
        match self {
            SpecialistFailure::ModelInvocation(_) => "model_invocation",
            SpecialistFailure::ResponseUnparseable(_) => "response_unparseable",
            SpecialistFailure::Tool(_) => "tool",
            SpecialistFailure::Timeout(_) => "timeout",
        }
    }
}

impl From<ToolError> for SpecialistFailure {
    fn from(e: ToolError) -> Self {
        SpecialistFailure::Tool(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_serializes_with_kind() {
        let failure = SpecialistFailure::Tool(ToolError::InvalidInput("bad".into()));
        let value = serde_json::to_value(&failure).unwrap();
        assert_eq!(
            value,
            json!({"kind": "tool", "detail": {"kind": "invalid_input", "message": "bad"}})
        );
        assert_eq!(failure.kind(), "tool");
    }
}
