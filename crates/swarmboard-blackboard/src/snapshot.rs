//! Read-only Blackboard snapshots

use serde::{Deserialize, Serialize};
use serde_json::json;
use swarmboard_domain::Fact;

/// Owned copy of the Blackboard's current state, safe to hand out after a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlackboardSnapshot {
    /// Global version at the time of the snapshot
    pub global_version: u64,
    /// Current facts, sorted by key
    pub facts: Vec<Fact>,
    /// Number of writes recorded, including superseded ones
    pub history_len: usize,
    /// Number of conflicts resolved
    pub conflicts: usize,
}

impl BlackboardSnapshot {
    /// Current fact for a key
    pub fn get(&self, key: &str) -> Option<&Fact> {
        self.facts
            .binary_search_by(|f| f.key.as_str().cmp(key))
            .ok()
            .map(|idx| &self.facts[idx])
    }

    /// Facts ordered by descending confidence, ties broken by newest version
    pub fn ranked(&self) -> Vec<&Fact> {
        let mut ranked: Vec<&Fact> = self.facts.iter().collect();
        ranked.sort_by(|a, b| {
            b.confidence
                .total_cmp(&a.confidence)
                .then_with(|| b.version.cmp(&a.version))
        });
        ranked
    }

    /// TOON rendering of every current fact
    pub fn to_toon(&self) -> String {
        let mut facts = self.facts.clone();
        facts.sort_by_key(|f| f.version);
        swarmboard_toon::encode(&json!({
            "version": self.global_version,
            "facts": crate::fact_rows(&facts),
        }))
    }
}

#[cfg(test)]
mod tests {
    use crate::Blackboard;
    use serde_json::json;

    #[test]
    fn test_snapshot_converts_to_json_value() {
        let mut board = Blackboard::new();
        board.write("review.sentiment", json!({"label": "positive"}), 0.8, "s1", 1);
        board.write("review.sentiment", json!({"label": "mixed"}), 0.6, "s2", 1);

        let snapshot = board.snapshot();
        let value = serde_json::to_value(&snapshot).unwrap();

        let id = value["facts"][0]["id"].as_str().unwrap();
        assert_eq!(id, snapshot.facts[0].id.to_string());
        assert_eq!(value["global_version"], json!(2));
    }

    #[test]
    fn test_snapshot_lookup_and_ranking() {
        let mut board = Blackboard::new();
        board.write("b", json!("two"), 0.4, "s1", 1);
        board.write("a", json!("one"), 0.9, "s1", 1);
        board.write("c", json!("three"), 0.9, "s2", 1);

        let snapshot = board.snapshot();
        assert_eq!(snapshot.get("a").unwrap().value, json!("one"));
        assert!(snapshot.get("zz").is_none());

        let order: Vec<_> = snapshot.ranked().iter().map(|f| f.key.as_str()).collect();
        assert_eq!(order, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_snapshot_is_detached() {
        let mut board = Blackboard::new();
        board.write("a", json!(1), 0.5, "s1", 1);
        let snapshot = board.snapshot();
        board.write("a", json!(2), 0.5, "s1", 1);

        assert_eq!(snapshot.global_version, 1);
        assert_eq!(snapshot.get("a").unwrap().value, json!(1));
    }

    #[test]
    fn test_snapshot_serializes() {
        let mut board = Blackboard::new();
        board.write("a", json!("x"), 0.5, "s1", 1);
        let snapshot = board.snapshot();

        let json = serde_json::to_string(&snapshot).unwrap();
        let back: super::BlackboardSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snapshot);
        assert!(snapshot.to_toon().starts_with("facts[1]{by,confidence,key,v,value}:"));
    }
}
