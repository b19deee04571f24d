//! Error types for registry operations.

use swarmboard_domain::ToolError;
use thiserror::Error;

/// Registry error types
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// A tool with this name is already registered
    #[error("Tool already registered: {0}")]
    Duplicate(String),

    /// No tool with this name
    #[error("Tool not found: {0}")]
    ToolNotFound(String),
}

impl From<RegistryError> for ToolError {
    fn from(error: RegistryError) -> Self {
        ToolError::InvalidInput(error.to_string())
    }
}
