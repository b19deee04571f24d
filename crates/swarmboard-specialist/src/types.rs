//! Request and result types for a specialist turn

use crate::error::SpecialistFailure;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use swarmboard_domain::{TokenUsage, ToolError};

/// Per-turn inputs the orchestrator supplies
#[derive(Debug, Clone, Copy)]
pub struct RunContext<'a> {
    /// The user's task
    pub task: &'a str,

    /// Blackboard version this specialist saw at the end of its previous turn
    pub last_seen_version: u64,

    /// Current orchestrator round (1-based)
    pub round: u32,

    /// Whether this specialist is the team's finalizer
    pub finalizer: bool,
}

/// Outcome of one specialist turn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecialistResult {
    /// Specialist that ran
    pub specialist_id: String,

    /// Round the turn belongs to
    pub round: u32,

    /// True when the turn completed without any failure
    pub success: bool,

    /// Blackboard keys written during the turn
    pub facts_written: Vec<String>,

    /// Raw model output (possibly truncated)
    pub raw_output: String,

    /// Recovered failure, if any
    pub error: Option<SpecialistFailure>,

    /// Token usage of the model call
    pub tokens_used: TokenUsage,

    /// Wall-clock duration of the turn in milliseconds
    pub duration_ms: u64,

    /// The response was tagged final or came from a successful finalizer
    pub is_final: bool,

    /// Tool calls made during the turn
    pub tool_invocations: Vec<ToolInvocation>,
}

impl SpecialistResult {
    /// Total tokens of the turn
    pub fn total_tokens(&self) -> u64 {
        self.tokens_used.total()
    }
}

/// Record of one tool call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolInvocation {
    /// Tool name as requested
    pub tool: String,

    /// Whether the call returned a value
    pub success: bool,

    /// Failure returned by the tool
    pub error: Option<ToolError>,

    /// Duration of the call in milliseconds
    pub duration_ms: u64,
}

/// Tool call requested by a response
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ToolCall {
    pub tool: String,
    pub input: Value,
}

/// Interpreted model response
#[derive(Debug, Clone, PartialEq, Default)]
pub(crate) struct ParsedResponse {
    pub tool_call: Option<ToolCall>,
    pub answer: Option<Value>,
    pub key: Option<String>,
    pub confidence: Option<f64>,
    pub is_final: bool,
}
