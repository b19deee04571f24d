//! Swarmboard Domain Layer
//!
//! This crate contains the core vocabulary shared by every other Swarmboard crate.
//! It defines the value objects that flow through a swarm run and the trait
//! interfaces for the capabilities the swarm consumes but does not implement.
//!
//! ## Key Concepts
//!
//! - **Fact**: One named, versioned unit of knowledge on the Blackboard
//! - **Confidence**: Specialist-reported certainty in [0, 1], used as the conflict tie-breaker
//! - **Specialist**: A data-driven worker definition produced by meta-planning
//! - **Round**: An orchestrator-owned counter scoping conflict resolution
//! - **Capabilities**: Language model, tools and settings, all behind traits
//!
//! ## Architecture
//!
//! - Pure domain logic only (no I/O)
//! - Infrastructure implementations live in other crates
//! - Trait definitions for all external interactions

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod budget;
pub mod confidence;
pub mod conflict;
pub mod fact;
pub mod specialist;
pub mod tool;
pub mod traits;

// Re-exports for convenience
pub use budget::{clamp_max_specialists, SwarmConfig};
pub use confidence::normalize_confidence;
pub use conflict::{resolve_conflict, Resolution};
pub use fact::{now_millis, Fact, FactId};
pub use specialist::SpecialistDefinition;
pub use tool::{ToolError, ToolSpec};
pub use traits::{Completion, LlmProvider, SettingsStore, TokenUsage, Tool};
