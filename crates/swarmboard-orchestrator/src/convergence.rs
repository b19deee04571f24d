//! Convergence check after each round

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use swarmboard_domain::Fact;
use swarmboard_specialist::SpecialistResult;

/// Outcome of the check run after a full round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConvergenceCheck {
    /// Round that was checked
    pub round: u32,

    /// Keys written this round below the low-confidence threshold
    pub low_confidence_keys: Vec<String>,

    /// Whether some turn produced a final output
    pub final_output: bool,
}

impl ConvergenceCheck {
    /// Evaluate one round from its writes and its results
    pub fn evaluate(
        round: u32,
        round_facts: &[Fact],
        round_results: &[SpecialistResult],
        threshold: f64,
    ) -> Self {
        let low_confidence_keys: Vec<String> = round_facts
            .iter()
            .filter(|f| f.round == round && f.confidence < threshold)
            .map(|f| f.key.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        Self {
            round,
            low_confidence_keys,
            final_output: round_results.iter().any(|r| r.round == round && r.is_final),
        }
    }

    /// No uncertain writes and a final output exists
    pub fn converged(&self) -> bool {
        self.low_confidence_keys.is_empty() && self.final_output
    }
}
