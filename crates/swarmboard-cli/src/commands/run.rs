//! Run command implementation.

use crate::cli::RunArgs;
use crate::config::orchestrator_config;
use crate::error::Result;
use crate::output::Formatter;
use std::path::Path;
use std::sync::Arc;
use swarmboard_domain::LlmProvider;
use swarmboard_llm::OllamaProvider;
use swarmboard_orchestrator::{
    ExecuteOptions, FileSettingsStore, SwarmEvent, SwarmOrchestrator, SwarmResult,
};
use swarmboard_tools::ToolRegistry;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Execute the run command against Ollama.
///
/// Ctrl-C cancels the run between specialist turns; the partial result is
/// still printed.
pub async fn execute_run(args: RunArgs, settings_path: &Path, formatter: &Formatter) -> Result<()> {
    let llm = Arc::new(OllamaProvider::new(&args.endpoint, &args.model));
    info!(endpoint = %llm.endpoint(), model = %args.model, "Using Ollama");

    let cancel = CancellationToken::new();
    let ctrl_c = cancel_on_ctrl_c(cancel.clone());

    let outcome = run_swarm(llm, &args, settings_path, *formatter, cancel).await;
    ctrl_c.abort();

    let result = outcome?;
    println!("{}", formatter.format_result(&result)?);
    Ok(())
}

/// Run a swarm with the mock tools and stream progress to stderr.
pub async fn run_swarm<L: LlmProvider>(
    llm: Arc<L>,
    args: &RunArgs,
    settings_path: &Path,
    formatter: Formatter,
    cancel: CancellationToken,
) -> Result<SwarmResult> {
    let config = orchestrator_config(args)?;
    let settings = FileSettingsStore::open(settings_path)?;
    let orchestrator = SwarmOrchestrator::new(
        llm,
        Arc::new(ToolRegistry::with_mock_tools()),
        settings,
        config,
    );

    let (sender, receiver) = mpsc::unbounded_channel();
    let printer = print_progress(receiver, formatter);

    let mut options = ExecuteOptions::new()
        .with_cancellation(cancel)
        .with_progress(sender);
    if let Some(max) = args.max_specialists {
        options = options.with_max_specialists(max);
    }

    let outcome = orchestrator.execute_with(&args.task, options).await;

    // The sender was dropped with the options, so the printer drains and stops.
    if let Err(e) = printer.await {
        warn!("Progress printer stopped: {}", e);
    }

    Ok(outcome?)
}

fn print_progress(
    mut receiver: mpsc::UnboundedReceiver<SwarmEvent>,
    formatter: Formatter,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(event) = receiver.recv().await {
            if let Some(line) = formatter.format_event(&event) {
                eprintln!("{}", line);
            }
        }
    })
}

fn cancel_on_ctrl_c(cancel: CancellationToken) -> JoinHandle<()> {
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                warn!("Interrupted, stopping after the current specialist turn");
                cancel.cancel();
            }
            Err(e) => warn!("Could not listen for Ctrl-C: {}", e),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::CliFormat;
    use crate::error::CliError;
    use clap::Parser;
    use std::fs;
    use swarmboard_llm::MockProvider;
    use swarmboard_orchestrator::OrchestratorError;
    use tempfile::TempDir;

    const PLAN: &str = r#"[
        {"id": "counter", "role": "Statistician", "priority": 1, "tools": ["stats"]},
        {"id": "writer", "role": "Synthesizer", "priority": 2},
        {"id": "extra", "role": "Reviewer", "priority": 3}
    ]"#;

    fn args(extra: &[&str]) -> RunArgs {
        let mut argv = vec!["run", "Summarize the ratings 4, 5 and 3"];
        argv.extend_from_slice(extra);
        RunArgs::try_parse_from(argv).unwrap()
    }

    fn scripted() -> Arc<MockProvider> {
        let llm = MockProvider::new(r#"{"answer": "ok", "confidence": 0.9}"#);
        llm.add_response("planner", PLAN);
        llm.add_response(
            "specialist `counter`",
            r#"{"tool_call": {"tool": "stats", "input": {"values": [4, 5, 3]}}, "confidence": 0.95}"#,
        );
        llm.add_response(
            "specialist `writer`",
            r#"{"answer": "Average rating is 4", "confidence": 0.9, "final": true}"#,
        );
        Arc::new(llm)
    }

    fn quiet() -> Formatter {
        Formatter::new(CliFormat::Json, false)
    }

    #[tokio::test]
    async fn test_run_uses_persisted_team_size() {
        let dir = TempDir::new().unwrap();
        let settings = dir.path().join("settings.toml");
        fs::write(&settings, "max_specialists = 2\n").unwrap();

        let result = run_swarm(
            scripted(),
            &args(&["--rounds", "1"]),
            &settings,
            quiet(),
            CancellationToken::new(),
        )
        .await
        .unwrap();

        assert!(result.success);
        assert_eq!(result.team.len(), 2);
        assert_eq!(result.final_answer, "Average rating is 4");
        assert!(result.specialist_trace.iter().all(|t| t.specialist_id != "extra"));
    }

    #[tokio::test]
    async fn test_run_override_beats_settings() {
        let dir = TempDir::new().unwrap();
        let settings = dir.path().join("settings.toml");
        fs::write(&settings, "max_specialists = 2\n").unwrap();

        let result = run_swarm(
            scripted(),
            &args(&["--max-specialists", "1", "--rounds", "1"]),
            &settings,
            quiet(),
            CancellationToken::new(),
        )
        .await
        .unwrap();

        assert_eq!(result.team.len(), 1);
        // Settings file is not touched by a one-off override.
        assert_eq!(
            fs::read_to_string(&settings).unwrap(),
            "max_specialists = 2\n"
        );
    }

    #[tokio::test]
    async fn test_cancelled_run_returns_partial_result() {
        let dir = TempDir::new().unwrap();
        let cancel = CancellationToken::new();
        cancel.cancel();

        let result = run_swarm(
            scripted(),
            &args(&[]),
            &dir.path().join("settings.toml"),
            quiet(),
            cancel,
        )
        .await
        .unwrap();

        assert!(result.cancelled);
        assert!(!result.success);
        assert!(result.specialist_trace.is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_model_is_an_error() {
        let dir = TempDir::new().unwrap();
        let outcome = run_swarm(
            Arc::new(MockProvider::unreachable()),
            &args(&[]),
            &dir.path().join("settings.toml"),
            quiet(),
            CancellationToken::new(),
        )
        .await;

        assert!(matches!(
            outcome,
            Err(CliError::Orchestrator(OrchestratorError::PlanningUnavailable(_)))
        ));
    }
}
