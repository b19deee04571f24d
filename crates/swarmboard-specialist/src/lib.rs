//! Swarmboard Specialist Runner
//!
//! Executes exactly one specialist's turn against the shared blackboard.
//!
//! # Overview
//!
//! A turn is one model call plus at most one tool call:
//!
//! ```text
//! Blackboard delta (TOON) + role + tools → LLM → response
//!     → tool call? → ToolRegistry → "{id}.{tool}"
//!     → answer?    → "{id}.answer" / "{id}.{key}"
//! ```
//!
//! Every failure (model error, timeout, unparseable output, tool error) is
//! recovered and reported in the [`SpecialistResult`]. The runner never
//! aborts the swarm.
//!
//! # Example Usage
//!
//! ```
//! use std::sync::Arc;
//! use swarmboard_blackboard::Blackboard;
//! use swarmboard_domain::SpecialistDefinition;
//! use swarmboard_llm::MockProvider;
//! use swarmboard_specialist::{RunContext, SpecialistRunner};
//! use swarmboard_tools::ToolRegistry;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let llm = Arc::new(MockProvider::new(r#"{"answer": "Mostly positive", "confidence": 0.8}"#));
//! let runner = SpecialistRunner::with_defaults(llm, Arc::new(ToolRegistry::with_mock_tools()));
//!
//! let analyst = SpecialistDefinition::new("analyst", "Sentiment Analyst", "Judge the tone", 1);
//! let mut board = Blackboard::new();
//! let ctx = RunContext { task: "Summarize the reviews", last_seen_version: 0, round: 1, finalizer: false };
//!
//! let result = runner.run(&analyst, &mut board, ctx).await;
//! assert!(result.success);
//! assert_eq!(board.read("analyst.answer").unwrap().confidence, 0.8);
//! # }
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod parser;
mod prompt;
mod runner;
mod types;

#[cfg(test)]
mod tests;

pub use config::SpecialistConfig;
pub use error::SpecialistFailure;
pub use prompt::PromptBuilder;
pub use runner::SpecialistRunner;
pub use types::{RunContext, SpecialistResult, ToolInvocation};
