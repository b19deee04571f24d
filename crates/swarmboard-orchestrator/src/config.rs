//! Configuration for swarm runs
//!
//! Defines the round cap, the convergence threshold, planning limits and the
//! per-specialist settings.

use crate::metrics::Pricing;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use swarmboard_domain::confidence::LOW_CONFIDENCE_THRESHOLD;
use swarmboard_specialist::SpecialistConfig;

/// Configuration for the Swarm Orchestrator
///
/// # Examples
///
/// ```
/// use swarmboard_orchestrator::OrchestratorConfig;
///
/// // Default configuration (balanced)
/// let config = OrchestratorConfig::default();
/// assert_eq!(config.max_rounds, 2);
///
/// // Single round, stricter convergence
/// let config = OrchestratorConfig::aggressive();
/// assert_eq!(config.max_rounds, 1);
///
/// // More rounds for slow local models
/// let config = OrchestratorConfig::lenient();
/// assert_eq!(config.max_rounds, 3);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrchestratorConfig {
    /// Hard cap on execution rounds
    /// Default: 2
    pub max_rounds: u32,

    /// Facts written below this confidence block convergence
    /// Default: 0.4
    pub low_confidence_threshold: f64,

    /// Maximum time for one meta-planning call (seconds)
    /// Default: 60
    pub planning_timeout_secs: u64,

    /// Attach a blackboard snapshot to the result
    /// Default: true
    pub include_snapshot: bool,

    /// Number of top facts in a fallback final answer
    /// Default: 5
    pub summary_facts: usize,

    /// Token prices used for the cost estimate
    pub pricing: Pricing,

    /// Settings for each specialist turn
    pub specialist: SpecialistConfig,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            max_rounds: 2,
            low_confidence_threshold: LOW_CONFIDENCE_THRESHOLD,
            planning_timeout_secs: 60,
            include_snapshot: true,
            summary_facts: 5,
            pricing: Pricing::default(),
            specialist: SpecialistConfig::default(),
        }
    }
}

impl OrchestratorConfig {
    /// Aggressive configuration: one round, short timeouts
    ///
    /// Suitable when cost matters more than answer quality.
    pub fn aggressive() -> Self {
        Self {
            max_rounds: 1,
            low_confidence_threshold: 0.5,
            planning_timeout_secs: 30,
            include_snapshot: false,
            summary_facts: 3,
            pricing: Pricing::default(),
            specialist: SpecialistConfig::aggressive(),
        }
    }

    /// Lenient configuration: extra round, long timeouts
    ///
    /// Suitable for slow local models.
    pub fn lenient() -> Self {
        Self {
            max_rounds: 3,
            low_confidence_threshold: 0.3,
            planning_timeout_secs: 180,
            include_snapshot: true,
            summary_facts: 8,
            pricing: Pricing::default(),
            specialist: SpecialistConfig::lenient(),
        }
    }

    /// Get the planning timeout as Duration
    pub fn planning_timeout(&self) -> Duration {
        Duration::from_secs(self.planning_timeout_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_rounds == 0 {
            return Err("max_rounds must be at least 1".to_string());
        }
        if !(0.0..=1.0).contains(&self.low_confidence_threshold) {
            return Err(format!(
                "low_confidence_threshold {} out of range [0.0, 1.0]",
                self.low_confidence_threshold
            ));
        }
        if self.planning_timeout_secs == 0 {
            return Err("planning_timeout_secs must be greater than 0".to_string());
        }
        if self.summary_facts == 0 {
            return Err("summary_facts must be at least 1".to_string());
        }
        self.pricing.validate()?;
        self.specialist.validate()
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = OrchestratorConfig::default();
        assert_eq!(config.max_rounds, 2);
        assert_eq!(config.low_confidence_threshold, 0.4);
        assert_eq!(config.planning_timeout(), Duration::from_secs(60));
        assert!(config.include_snapshot);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_presets() {
        let aggressive = OrchestratorConfig::aggressive();
        let lenient = OrchestratorConfig::lenient();
        assert!(aggressive.max_rounds < OrchestratorConfig::default().max_rounds);
        assert!(lenient.max_rounds > OrchestratorConfig::default().max_rounds);
        assert!(aggressive.validate().is_ok());
        assert!(lenient.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let config = OrchestratorConfig {
            max_rounds: 0,
            ..OrchestratorConfig::default()
        };
        assert!(config.validate().is_err());

        let config = OrchestratorConfig {
            low_confidence_threshold: 1.2,
            ..OrchestratorConfig::default()
        };
        assert!(config.validate().is_err());

        let mut config = OrchestratorConfig::default();
        config.specialist.call_timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = OrchestratorConfig::lenient();
        let serialized = config.to_toml().unwrap();
        let parsed = OrchestratorConfig::from_toml(&serialized).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_nested_partial_toml() {
        let parsed = OrchestratorConfig::from_toml(
            "max_rounds = 4\n\n[specialist]\ncall_timeout_secs = 10\n",
        )
        .unwrap();
        assert_eq!(parsed.max_rounds, 4);
        assert_eq!(parsed.specialist.call_timeout_secs, 10);
        assert_eq!(parsed.specialist.tool_timeout_secs, 45);
        assert_eq!(parsed.pricing, Pricing::default());
    }
}
