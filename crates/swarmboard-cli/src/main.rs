//! Swarmboard CLI - Run LLM specialist swarms from the command line.

use clap::Parser;
use swarmboard_cli::commands;
use swarmboard_cli::config::settings_path;
use swarmboard_cli::{Cli, Command, Formatter};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    init_tracing();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run() -> swarmboard_cli::Result<()> {
    let cli = Cli::parse();

    let settings = settings_path(cli.settings.as_deref())?;
    let formatter = Formatter::new(cli.format, !cli.no_color);

    match cli.command {
        Command::Run(args) => commands::execute_run(args, &settings, &formatter).await?,
        Command::Config(args) => commands::execute_config(args, &settings, &formatter)?,
    }

    Ok(())
}
