//! Error types for the Swarm Orchestrator

use thiserror::Error;

/// Errors that abort a swarm run
///
/// Everything below planning is recovered and recorded in the trace; only
/// these reach the caller.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OrchestratorError {
    /// The language model could not be reached during planning
    #[error("Planning unavailable: {0}")]
    PlanningUnavailable(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Errors from persisted settings
#[derive(Error, Debug)]
pub enum SettingsError {
    /// Reading or writing the settings file failed
    #[error("Settings I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The settings file is not valid TOML
    #[error("Failed to parse settings: {0}")]
    Parse(String),

    /// The settings could not be serialized
    #[error("Failed to serialize settings: {0}")]
    Serialize(String),
}
