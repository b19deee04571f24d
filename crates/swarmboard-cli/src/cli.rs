//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Swarmboard - Run a team of LLM specialists on a shared blackboard.
#[derive(Debug, Parser)]
#[command(name = "swarmboard")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true, default_value = "text")]
    pub format: CliFormat,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Settings file path (defaults to ~/.swarmboard/settings.toml)
    #[arg(long, global = true, env = "SWARMBOARD_SETTINGS")]
    pub settings: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum CliFormat {
    /// Human-readable text with live progress (default)
    Text,
    /// One JSON document with the full result
    Json,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run a swarm on a task
    Run(RunArgs),

    /// Show or change persisted settings
    Config(ConfigArgs),
}

/// Arguments for the run command.
#[derive(Debug, Parser)]
pub struct RunArgs {
    /// Task for the swarm
    pub task: String,

    /// Team size for this run only (clamped to 1-10)
    #[arg(short, long, allow_negative_numbers = true)]
    pub max_specialists: Option<i64>,

    /// Ollama endpoint
    #[arg(long, env = "SWARMBOARD_ENDPOINT", default_value = swarmboard_llm::ollama::DEFAULT_ENDPOINT)]
    pub endpoint: String,

    /// Model name
    #[arg(long, env = "SWARMBOARD_MODEL", default_value = "llama3.1")]
    pub model: String,

    /// Maximum number of rounds
    #[arg(long)]
    pub rounds: Option<u32>,

    /// Orchestrator configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

/// Arguments for the config command.
#[derive(Debug, Parser)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Settings actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Show the persisted settings
    Show,

    /// Persist the default team size (clamped to 1-10)
    SetMaxSpecialists {
        /// New default team size
        #[arg(allow_negative_numbers = true)]
        value: i64,
    },
}
