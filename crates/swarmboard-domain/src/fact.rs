//! Fact module - the fundamental unit of Blackboard memory

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Identifier of one fact write, a UUIDv7 so ids sort by creation time
///
/// Serialized as the hyphenated UUID string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FactId(Uuid);

impl FactId {
    /// Generate a new id
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for FactId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for FactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// A fact - one named unit of knowledge written by a specialist
///
/// Facts are immutable once written. A newer write for the same key creates a
/// new fact with a higher version; the Blackboard decides which one is current.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fact {
    /// Unique identifier of this write
    pub id: FactId,

    /// Key, namespaced by specialist or topic (e.g. `sentiment.review_12`)
    pub key: String,

    /// Specialist output payload
    pub value: Value,

    /// Normalized confidence in [0.0, 1.0]
    pub confidence: f64,

    /// Identifier of the specialist that produced the fact
    pub written_by: String,

    /// Blackboard version assigned at write time
    pub version: u64,

    /// Orchestrator round the write belongs to
    pub round: u32,

    /// Creation time (milliseconds since Unix epoch)
    pub timestamp: u64,
}

impl Fact {
    /// Create a new fact stamped with the current time
    ///
    /// The confidence is normalized into [0, 1]; non-finite values become 0.
    pub fn new(
        key: impl Into<String>,
        value: Value,
        confidence: f64,
        written_by: impl Into<String>,
        version: u64,
        round: u32,
    ) -> Self {
        Self {
            id: FactId::new(),
            key: key.into(),
            value,
            confidence: crate::normalize_confidence(confidence),
            written_by: written_by.into(),
            version,
            round,
            timestamp: now_millis(),
        }
    }

    /// Whether the value is a scalar (string, number, bool or null)
    pub fn is_scalar(&self) -> bool {
        !matches!(self.value, Value::Array(_) | Value::Object(_))
    }

    /// Render the value as display text (strings without quotes)
    pub fn value_text(&self) -> String {
        match &self.value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

/// Current time in milliseconds since the Unix epoch
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: any input confidence lands in [0, 1]
        #[test]
        fn test_fact_confidence_always_in_range(c in proptest::num::f64::ANY) {
            let fact = Fact::new("k", serde_json::Value::Null, c, "s", 1, 1);
            prop_assert!((0.0..=1.0).contains(&fact.confidence));
        }
    }
}
