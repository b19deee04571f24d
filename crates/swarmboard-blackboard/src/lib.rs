//! Swarmboard Blackboard
//!
//! Versioned, append-only shared memory that specialists read from and write to
//! during a swarm run.
//!
//! # Architecture
//!
//! - One current [`Fact`] per key, plus a history of every write ever made
//! - A global version counter bumped on every write, never reused
//! - Same-round writes by different specialists are settled by
//!   [`resolve_conflict`]; everything else simply supersedes
//! - Delta reads (`facts_since`, `to_serializable`) never mutate
//!
//! The Blackboard is owned by a single run and accessed through `&mut`, so it
//! needs no locking.
//!
//! # Examples
//!
//! ```
//! use serde_json::json;
//! use swarmboard_blackboard::Blackboard;
//!
//! let mut board = Blackboard::new();
//! board.write("analyst.sentiment", json!("positive"), 0.8, "analyst", 1);
//! board.write("stats.mean", json!(4.2), 0.9, "stats", 1);
//!
//! assert_eq!(board.global_version(), 2);
//! assert_eq!(board.facts_since(1).len(), 1);
//! ```

#![warn(missing_docs)]

mod snapshot;

pub use snapshot::BlackboardSnapshot;

use serde_json::{json, Value};
use std::collections::HashMap;
use swarmboard_domain::conflict::is_conflict;
use swarmboard_domain::{resolve_conflict, Fact, Resolution};
use tracing::debug;

/// Shared, versioned fact store for one swarm run
#[derive(Debug, Clone, Default)]
pub struct Blackboard {
    current: HashMap<String, Fact>,
    history: Vec<Fact>,
    global_version: u64,
    conflicts: usize,
}

impl Blackboard {
    /// Create an empty Blackboard at version 0
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a write and return the fact that was created for it
    ///
    /// Always succeeds. The returned fact carries the new global version even
    /// when it lost a conflict and did not become current; it is still kept
    /// in history.
    pub fn write(
        &mut self,
        key: impl Into<String>,
        value: Value,
        confidence: f64,
        written_by: impl Into<String>,
        round: u32,
    ) -> Fact {
        self.global_version += 1;
        let incoming = Fact::new(key, value, confidence, written_by, self.global_version, round);
        self.history.push(incoming.clone());

        let take_incoming = match self.current.get(&incoming.key) {
            Some(existing) if is_conflict(existing, &incoming) => {
                self.conflicts += 1;
                let resolution = resolve_conflict(existing, &incoming);
                debug!(
                    key = %incoming.key,
                    existing_by = %existing.written_by,
                    existing_confidence = existing.confidence,
                    incoming_by = %incoming.written_by,
                    incoming_confidence = incoming.confidence,
                    ?resolution,
                    "Resolved write conflict"
                );
                resolution == Resolution::TakeIncoming
            }
            _ => true,
        };

        if take_incoming {
            self.current.insert(incoming.key.clone(), incoming.clone());
        }

        debug!(
            key = %incoming.key,
            version = incoming.version,
            round,
            current = take_incoming,
            "Fact written"
        );
        incoming
    }

    /// The current fact for a key
    pub fn read(&self, key: &str) -> Option<&Fact> {
        self.current.get(key)
    }

    /// Current facts newer than `version`, ascending by version
    ///
    /// A key whose latest write lost a conflict is reported with the fact that
    /// is current, which may be older than `version` and therefore omitted.
    /// Use [`history_since`](Self::history_since) to see every write.
    pub fn facts_since(&self, version: u64) -> Vec<Fact> {
        let mut facts: Vec<Fact> = self
            .current
            .values()
            .filter(|f| f.version > version)
            .cloned()
            .collect();
        facts.sort_by_key(|f| f.version);
        facts
    }

    /// Every write newer than `version`, including superseded and losing ones
    pub fn history_since(&self, version: u64) -> Vec<Fact> {
        // history is append-only with strictly increasing versions
        let start = self.history.partition_point(|f| f.version <= version);
        self.history[start..].to_vec()
    }

    /// Every write made in `round`, in write order
    pub fn facts_in_round(&self, round: u32) -> Vec<Fact> {
        self.history.iter().filter(|f| f.round == round).cloned().collect()
    }

    /// TOON rendering of the current facts newer than `since_version`
    ///
    /// Scalar-valued deltas come out as one table with the columns `by`,
    /// `confidence`, `key`, `v` and `value`. Structured values fall back to
    /// the indented list form.
    pub fn to_serializable(&self, since_version: u64) -> String {
        swarmboard_toon::encode(&json!({ "facts": fact_rows(&self.facts_since(since_version)) }))
    }

    /// Owned, read-only copy of the current state
    pub fn snapshot(&self) -> BlackboardSnapshot {
        let mut facts: Vec<Fact> = self.current.values().cloned().collect();
        facts.sort_by(|a, b| a.key.cmp(&b.key));
        BlackboardSnapshot {
            global_version: self.global_version,
            facts,
            history_len: self.history.len(),
            conflicts: self.conflicts,
        }
    }

    /// Highest version assigned so far (0 when empty)
    pub fn global_version(&self) -> u64 {
        self.global_version
    }

    /// Number of conflicts resolved so far
    pub fn conflicts(&self) -> usize {
        self.conflicts
    }

    /// Number of keys with a current fact
    pub fn len(&self) -> usize {
        self.current.len()
    }

    /// Whether nothing has been written yet
    pub fn is_empty(&self) -> bool {
        self.current.is_empty()
    }
}

/// Flatten facts into the rows the TOON view is built from
pub(crate) fn fact_rows(facts: &[Fact]) -> Vec<Value> {
    facts
        .iter()
        .map(|f| {
            json!({
                "key": f.key,
                "value": f.value,
                "confidence": f.confidence,
                "by": f.written_by,
                "v": f.version,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_versions_strictly_increase() {
        let mut board = Blackboard::new();
        let a = board.write("a", json!(1), 0.5, "s1", 1);
        let b = board.write("b", json!(2), 0.5, "s1", 1);
        let c = board.write("a", json!(3), 0.5, "s2", 2);
        assert_eq!((a.version, b.version, c.version), (1, 2, 3));
        assert_eq!(board.global_version(), 3);
        assert_eq!(board.history_since(0).len(), 3);
    }

    #[test]
    fn test_same_specialist_supersedes() {
        let mut board = Blackboard::new();
        board.write("k", json!("old"), 0.9, "s1", 1);
        board.write("k", json!("new"), 0.1, "s1", 1);
        assert_eq!(board.read("k").unwrap().value, json!("new"));
        assert_eq!(board.conflicts(), 0);
    }

    #[test]
    fn test_later_round_supersedes() {
        let mut board = Blackboard::new();
        board.write("k", json!("old"), 0.9, "s1", 1);
        board.write("k", json!("new"), 0.2, "s2", 2);
        assert_eq!(board.read("k").unwrap().value, json!("new"));
    }

    #[test]
    fn test_same_round_conflict_keeps_higher_confidence() {
        let mut board = Blackboard::new();
        board.write("k", json!("strong"), 0.9, "s1", 1);
        let loser = board.write("k", json!("weak"), 0.6, "s2", 1);

        let current = board.read("k").unwrap();
        assert_eq!(current.value, json!("strong"));
        assert_eq!(board.conflicts(), 1);
        // loser is still versioned and in history
        assert_eq!(loser.version, 2);
        assert_eq!(board.global_version(), 2);
        assert!(board.history_since(1).iter().any(|f| f.id == loser.id));
    }

    #[test]
    fn test_tie_goes_to_incoming() {
        let mut board = Blackboard::new();
        board.write("k", json!("first"), 0.7, "s1", 1);
        board.write("k", json!("second"), 0.7, "s2", 1);
        assert_eq!(board.read("k").unwrap().value, json!("second"));
    }

    #[test]
    fn test_confidence_normalized() {
        let mut board = Blackboard::new();
        assert_eq!(board.write("a", json!(1), 1.7, "s", 1).confidence, 1.0);
        assert_eq!(board.write("b", json!(1), -0.2, "s", 1).confidence, 0.0);
        assert_eq!(board.write("c", json!(1), f64::NAN, "s", 1).confidence, 0.0);
    }

    #[test]
    fn test_facts_since_is_ascending_and_idempotent() {
        let mut board = Blackboard::new();
        board.write("z", json!(1), 0.5, "s1", 1);
        board.write("a", json!(2), 0.5, "s1", 1);
        board.write("m", json!(3), 0.5, "s1", 1);

        let first = board.facts_since(1);
        let second = board.facts_since(1);
        assert_eq!(first, second);
        let keys: Vec<_> = first.iter().map(|f| f.key.as_str()).collect();
        assert_eq!(keys, vec!["a", "m"]);
        assert!(board.facts_since(3).is_empty());
    }

    #[test]
    fn test_facts_since_skips_superseded() {
        let mut board = Blackboard::new();
        board.write("k", json!(1), 0.5, "s1", 1);
        board.write("k", json!(2), 0.5, "s1", 1);
        let delta = board.facts_since(0);
        assert_eq!(delta.len(), 1);
        assert_eq!(delta[0].value, json!(2));
    }

    #[test]
    fn test_facts_in_round() {
        let mut board = Blackboard::new();
        board.write("a", json!(1), 0.5, "s1", 1);
        board.write("b", json!(1), 0.5, "s1", 2);
        board.write("c", json!(1), 0.5, "s2", 2);
        assert_eq!(board.facts_in_round(2).len(), 2);
        assert!(board.facts_in_round(3).is_empty());
    }

    #[test]
    fn test_to_serializable_table() {
        let mut board = Blackboard::new();
        board.write("analyst.mood", json!("upbeat"), 0.8, "analyst", 1);
        board.write("stats.mean", json!(4), 0.9, "stats", 1);

        assert_eq!(
            board.to_serializable(0),
            "facts[2]{by,confidence,key,v,value}:\n  analyst,0.8,analyst.mood,1,upbeat\n  stats,0.9,stats.mean,2,4"
        );
        assert_eq!(board.to_serializable(2), "facts[0]:");
    }

    #[test]
    fn test_to_serializable_does_not_mutate() {
        let mut board = Blackboard::new();
        board.write("a", json!({"nested": [1, 2]}), 0.5, "s", 1);
        let before = board.snapshot();
        let text = board.to_serializable(0);
        assert!(text.starts_with("facts[1]:"));
        assert_eq!(board.snapshot(), before);
    }

    #[test]
    fn test_empty_board() {
        let board = Blackboard::new();
        assert!(board.is_empty());
        assert_eq!(board.len(), 0);
        assert_eq!(board.global_version(), 0);
        assert!(board.read("missing").is_none());
    }
}
