//! Error types for the CLI application.

use swarmboard_orchestrator::{OrchestratorError, SettingsError};
use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Persisted settings could not be read or written
    #[error("Settings error: {0}")]
    Settings(#[from] SettingsError),

    /// The swarm run could not start
    #[error("Swarm error: {0}")]
    Orchestrator(#[from] OrchestratorError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
