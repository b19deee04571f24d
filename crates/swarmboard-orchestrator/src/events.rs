//! Progress events streamed during a run

use serde::Serialize;
use swarmboard_domain::SpecialistDefinition;
use swarmboard_specialist::SpecialistResult;

/// Progress of a swarm run, sent over the optional progress channel
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SwarmEvent {
    /// Planning finished and the team is fixed
    PlanReady {
        /// Run identifier
        run_id: String,
        /// Team in execution order
        team: Vec<SpecialistDefinition>,
        /// Team size cap applied
        max_specialists: u8,
        /// The plan fell back to a single generic specialist
        fallback: bool,
    },

    /// A specialist turn is about to start
    SpecialistStarted {
        /// Round number (1-based)
        round: u32,
        /// Specialist id
        specialist_id: String,
        /// Specialist role
        role: String,
    },

    /// A specialist turn finished
    SpecialistFinished {
        /// Result of the turn
        result: SpecialistResult,
        /// Tokens used by the run so far
        total_tokens: u64,
        /// Estimated cost of the run so far in USD
        estimated_cost_usd: f64,
    },

    /// A full round finished and convergence was checked
    RoundCompleted {
        /// Round number (1-based)
        round: u32,
        /// Whether the swarm converged in this round
        converged: bool,
        /// Facts written below the confidence threshold
        low_confidence_facts: usize,
    },
}
