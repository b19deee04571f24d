//! Swarmboard Orchestrator
//!
//! Top-level coordinator of a swarm run: meta-plans a team of specialists,
//! runs them against a shared blackboard, checks convergence and synthesizes
//! the final answer.
//!
//! # Overview
//!
//! ```text
//! PLANNING → EXECUTING → CONVERGENCE_CHECK → (EXECUTING | FINALIZING) → DONE
//! ```
//!
//! - **Planning**: one model call (plus one stricter retry) yields the team;
//!   the team size cap is applied once, keeping the lowest priority numbers.
//!   An unusable plan degrades to a single generic specialist.
//! - **Executing**: specialists run strictly in priority order, each seeing
//!   the blackboard delta since its own previous turn.
//! - **Convergence**: no write below the low-confidence threshold and at
//!   least one final output; otherwise another round, up to `max_rounds`.
//! - **Finalizing**: the finalizer's contribution, else the
//!   highest-confidence facts.
//!
//! Only an unreachable model during planning aborts a run
//! ([`OrchestratorError::PlanningUnavailable`]). Specialist, tool and parse
//! failures are recorded in the trace.
//!
//! # Usage
//!
//! ```
//! use std::sync::Arc;
//! use swarmboard_llm::MockProvider;
//! use swarmboard_orchestrator::{ExecuteOptions, InMemorySettings, SwarmOrchestrator};
//! use swarmboard_tools::ToolRegistry;
//! use tokio_util::sync::CancellationToken;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let orchestrator = SwarmOrchestrator::with_defaults(
//!     Arc::new(MockProvider::new(r#"{"answer": "done", "final": true}"#)),
//!     Arc::new(ToolRegistry::with_mock_tools()),
//!     InMemorySettings::new(4),
//! );
//!
//! let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
//! let options = ExecuteOptions::new()
//!     .with_max_specialists(2)
//!     .with_cancellation(CancellationToken::new())
//!     .with_progress(tx);
//!
//! let result = orchestrator.execute_with("Summarize the reviews", options).await.unwrap();
//! assert!(result.team.len() <= 2);
//! while let Ok(event) = rx.try_recv() {
//!     println!("{:?}", event);
//! }
//! # }
//! ```
//!
//! # Configuration
//!
//! The orchestrator can be configured via TOML:
//!
//! ```toml
//! max_rounds = 2
//! low_confidence_threshold = 0.4
//! planning_timeout_secs = 60
//! include_snapshot = true
//! summary_facts = 5
//!
//! [pricing]
//! prompt_per_million = 0.15
//! completion_per_million = 0.6
//!
//! [specialist]
//! call_timeout_secs = 45
//! tool_timeout_secs = 45
//! ```

#![warn(missing_docs)]

mod config;
mod convergence;
mod error;
mod events;
mod metrics;
mod orchestrator;
mod planner;
mod settings;

pub use config::OrchestratorConfig;
pub use convergence::ConvergenceCheck;
pub use error::{OrchestratorError, SettingsError};
pub use events::SwarmEvent;
pub use metrics::{Pricing, UsageMetrics};
pub use orchestrator::{ExecuteOptions, SwarmOrchestrator, SwarmResult};
pub use planner::FALLBACK_SPECIALIST_ID;
pub use settings::{FileSettingsStore, InMemorySettings};
