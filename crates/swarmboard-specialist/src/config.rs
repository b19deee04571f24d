//! Configuration for the Specialist Runner

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the Specialist Runner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpecialistConfig {
    /// Maximum time for a single model call (seconds)
    pub call_timeout_secs: u64,

    /// Maximum time for a single tool call (seconds)
    pub tool_timeout_secs: u64,

    /// Confidence used when a response does not report one
    pub default_confidence: f64,

    /// Confidence for tool results when the response does not report one
    pub tool_result_confidence: f64,

    /// Raw model output kept in each result (characters)
    pub max_raw_output_chars: usize,
}

impl SpecialistConfig {
    /// Get the model call timeout as a Duration
    pub fn call_timeout(&self) -> Duration {
        Duration::from_secs(self.call_timeout_secs)
    }

    /// Get the tool call timeout as a Duration
    pub fn tool_timeout(&self) -> Duration {
        Duration::from_secs(self.tool_timeout_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.call_timeout_secs == 0 {
            return Err("call_timeout_secs must be greater than 0".to_string());
        }
        if self.tool_timeout_secs == 0 {
            return Err("tool_timeout_secs must be greater than 0".to_string());
        }
        if !(0.0..=1.0).contains(&self.default_confidence) {
            return Err(format!(
                "default_confidence {} out of range [0.0, 1.0]",
                self.default_confidence
            ));
        }
        if !(0.0..=1.0).contains(&self.tool_result_confidence) {
            return Err(format!(
                "tool_result_confidence {} out of range [0.0, 1.0]",
                self.tool_result_confidence
            ));
        }
        if self.max_raw_output_chars == 0 {
            return Err("max_raw_output_chars must be greater than 0".to_string());
        }
        Ok(())
    }
}

impl Default for SpecialistConfig {
    /// Default configuration with balanced settings
    fn default() -> Self {
        Self {
            call_timeout_secs: 45,
            tool_timeout_secs: 45,
            default_confidence: swarmboard_domain::confidence::DEFAULT_CONFIDENCE,
            tool_result_confidence: 0.9,
            max_raw_output_chars: 4_000,
        }
    }
}

impl SpecialistConfig {
    /// Aggressive preset: short timeouts, little raw output kept
    pub fn aggressive() -> Self {
        Self {
            call_timeout_secs: 20,
            tool_timeout_secs: 10,
            default_confidence: 0.6,
            tool_result_confidence: 0.85,
            max_raw_output_chars: 1_000,
        }
    }

    /// Lenient preset: long timeouts for slow local models
    pub fn lenient() -> Self {
        Self {
            call_timeout_secs: 180,
            tool_timeout_secs: 120,
            default_confidence: 0.7,
            tool_result_confidence: 0.9,
            max_raw_output_chars: 16_000,
        }
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
