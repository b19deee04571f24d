//! Configuration management for the CLI.

use crate::cli::RunArgs;
use crate::error::{CliError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use swarmboard_orchestrator::OrchestratorConfig;

/// Directory under the home directory holding swarmboard files.
pub const CONFIG_DIR: &str = ".swarmboard";

/// File name of the persisted settings.
pub const SETTINGS_FILE: &str = "settings.toml";

/// Get the default settings file path.
pub fn default_settings_path() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
    Ok(home.join(CONFIG_DIR).join(SETTINGS_FILE))
}

/// Resolve the settings path, preferring an explicit one.
pub fn settings_path(explicit: Option<&Path>) -> Result<PathBuf> {
    match explicit {
        Some(path) => Ok(path.to_path_buf()),
        None => default_settings_path(),
    }
}

/// Load the orchestrator configuration for a run.
///
/// Starts from the file given with `--config` (or the defaults) and applies
/// command-line overrides on top.
pub fn orchestrator_config(args: &RunArgs) -> Result<OrchestratorConfig> {
    let mut config = match &args.config {
        Some(path) => load_orchestrator_config(path)?,
        None => OrchestratorConfig::default(),
    };

    if let Some(rounds) = args.rounds {
        config.max_rounds = rounds;
    }

    config.validate().map_err(CliError::Config)?;
    Ok(config)
}

fn load_orchestrator_config(path: &Path) -> Result<OrchestratorConfig> {
    let contents = fs::read_to_string(path)?;
    OrchestratorConfig::from_toml(&contents)
        .map_err(|e| CliError::Config(format!("{}: {}", path.display(), e)))
}
