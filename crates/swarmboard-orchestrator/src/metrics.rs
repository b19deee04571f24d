//! Usage and cost accounting for swarm runs

use serde::{Deserialize, Serialize};
use swarmboard_domain::TokenUsage;
use swarmboard_specialist::SpecialistResult;

/// Token prices in USD per million tokens
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Pricing {
    /// Price of one million prompt tokens
    pub prompt_per_million: f64,

    /// Price of one million completion tokens
    pub completion_per_million: f64,
}

impl Default for Pricing {
    /// Small hosted model prices
    fn default() -> Self {
        Self {
            prompt_per_million: 0.15,
            completion_per_million: 0.60,
        }
    }
}

impl Pricing {
    /// Free pricing, e.g. a local model
    pub fn free() -> Self {
        Self {
            prompt_per_million: 0.0,
            completion_per_million: 0.0,
        }
    }

    /// Estimated USD cost of the given token counts
    pub fn cost(&self, prompt_tokens: u64, completion_tokens: u64) -> f64 {
        (prompt_tokens as f64 * self.prompt_per_million
            + completion_tokens as f64 * self.completion_per_million)
            / 1_000_000.0
    }

    /// Validate the prices
    pub fn validate(&self) -> Result<(), String> {
        let valid = |p: f64| p.is_finite() && p >= 0.0;
        if !valid(self.prompt_per_million) || !valid(self.completion_per_million) {
            return Err("prices must be finite and non-negative".to_string());
        }
        Ok(())
    }
}

/// Usage accumulated over a swarm run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageMetrics {
    /// Prompt tokens across planning and specialist calls
    pub prompt_tokens: u64,

    /// Completion tokens across planning and specialist calls
    pub completion_tokens: u64,

    /// Meta-planning calls made
    pub planning_calls: usize,

    /// Specialist turns run
    pub specialist_turns: usize,

    /// Specialist turns that ended with a failure
    pub specialist_failures: usize,

    /// Tool calls made
    pub tool_calls: usize,

    /// Tool calls that failed
    pub tool_failures: usize,
}

impl UsageMetrics {
    /// Create new empty metrics
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a meta-planning call
    pub fn record_planning(&mut self, usage: TokenUsage) {
        self.planning_calls += 1;
        self.add_tokens(usage);
    }

    /// Record a specialist turn
    pub fn record_turn(&mut self, result: &SpecialistResult) {
        self.specialist_turns += 1;
        if !result.success {
            self.specialist_failures += 1;
        }
        self.tool_calls += result.tool_invocations.len();
        self.tool_failures += result.tool_invocations.iter().filter(|t| !t.success).count();
        self.add_tokens(result.tokens_used);
    }

    fn add_tokens(&mut self, usage: TokenUsage) {
        self.prompt_tokens += usage.prompt_tokens;
        self.completion_tokens += usage.completion_tokens;
    }

    /// Model calls made, planning included
    pub fn model_calls(&self) -> usize {
        self.planning_calls + self.specialist_turns
    }

    /// Total tokens
    pub fn total_tokens(&self) -> u64 {
        self.prompt_tokens + self.completion_tokens
    }

    /// Estimated cost in USD
    pub fn cost(&self, pricing: &Pricing) -> f64 {
        pricing.cost(self.prompt_tokens, self.completion_tokens)
    }

    /// Generate a summary report of metrics
    pub fn summary(&self, pricing: &Pricing) -> String {
        [
            "Swarm Usage Summary".to_string(),
            "===================".to_string(),
            format!(
                "Model calls: {} ({} planning, {} specialist)",
                self.model_calls(),
                self.planning_calls,
                self.specialist_turns
            ),
            format!(
                "Tokens: {} ({} prompt, {} completion)",
                self.total_tokens(),
                self.prompt_tokens,
                self.completion_tokens
            ),
            format!("Tool calls: {} ({} failed)", self.tool_calls, self.tool_failures),
            format!("Specialist failures: {}", self.specialist_failures),
            format!("Estimated cost: ${:.6}", self.cost(pricing)),
        ]
        .join("\n")
    }
}
