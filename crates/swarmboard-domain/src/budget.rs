//! Resource budget for a swarm run

use serde::{Deserialize, Serialize};

/// Smallest allowed team size
pub const MIN_SPECIALISTS: u8 = 1;

/// Largest allowed team size
pub const MAX_SPECIALISTS: u8 = 10;

/// Team size used when nothing is configured
pub const DEFAULT_MAX_SPECIALISTS: u8 = 3;

/// Clamp a requested team size into [`MIN_SPECIALISTS`, `MAX_SPECIALISTS`]
pub fn clamp_max_specialists(value: i64) -> u8 {
    value.clamp(MIN_SPECIALISTS as i64, MAX_SPECIALISTS as i64) as u8
}

/// User-level swarm configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwarmConfig {
    /// Maximum number of specialists executed per run
    pub max_specialists: u8,
}

impl SwarmConfig {
    /// Create a configuration, clamping the team size
    pub fn new(max_specialists: i64) -> Self {
        Self {
            max_specialists: clamp_max_specialists(max_specialists),
        }
    }

    /// Resolve the team size for one run: an explicit override wins
    pub fn effective_max(&self, override_value: Option<i64>) -> u8 {
        match override_value {
            Some(value) => clamp_max_specialists(value),
            None => clamp_max_specialists(self.max_specialists as i64),
        }
    }
}

impl Default for SwarmConfig {
    fn default() -> Self {
        Self {
            max_specialists: DEFAULT_MAX_SPECIALISTS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp() {
        assert_eq!(clamp_max_specialists(0), 1);
        assert_eq!(clamp_max_specialists(-5), 1);
        assert_eq!(clamp_max_specialists(4), 4);
        assert_eq!(clamp_max_specialists(99), 10);
    }

    #[test]
    fn test_override_takes_precedence() {
        let config = SwarmConfig::new(5);
        assert_eq!(config.effective_max(None), 5);
        assert_eq!(config.effective_max(Some(2)), 2);
        assert_eq!(config.effective_max(Some(50)), 10);
    }

    #[test]
    fn test_default() {
        assert_eq!(SwarmConfig::default().max_specialists, 3);
    }
}
