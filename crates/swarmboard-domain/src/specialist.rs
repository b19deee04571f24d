//! Specialist definitions produced by meta-planning
//!
//! A specialist is data, not a type: role, instructions and tools drive one
//! generic runner. There is no per-role implementation.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Definition of one specialist in a swarm team
///
/// Created by the orchestrator's planning step and immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecialistDefinition {
    /// Unique identifier within the team (also the Blackboard key namespace)
    pub id: String,

    /// Human-readable specialization (e.g. "Sentiment Analyst")
    pub role: String,

    /// Task-specific prompt fragment
    pub instructions: String,

    /// Execution priority; lower runs first
    pub priority: i32,

    /// Tools this specialist may invoke
    #[serde(default)]
    pub tool_names: BTreeSet<String>,

    /// Whether this specialist produces the final synthesis
    #[serde(default)]
    pub is_finalizer: bool,
}

impl SpecialistDefinition {
    /// Create a new specialist definition without tools
    pub fn new(
        id: impl Into<String>,
        role: impl Into<String>,
        instructions: impl Into<String>,
        priority: i32,
    ) -> Self {
        Self {
            id: id.into(),
            role: role.into(),
            instructions: instructions.into(),
            priority,
            tool_names: BTreeSet::new(),
            is_finalizer: false,
        }
    }

    /// Grant access to the given tools
    pub fn with_tools<I, S>(mut self, tools: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tool_names.extend(tools.into_iter().map(Into::into));
        self
    }

    /// Mark this specialist as the team's finalizer
    pub fn as_finalizer(mut self) -> Self {
        self.is_finalizer = true;
        self
    }

    /// Whether the role text reads like a synthesis role
    pub fn looks_like_synthesizer(&self) -> bool {
        self.role.to_lowercase().contains("synthesi")
    }

    /// Whether this specialist may call the named tool
    pub fn can_use(&self, tool: &str) -> bool {
        self.tool_names.contains(tool)
    }
}
