//! Integration tests for swarmboard-blackboard
//!
//! These tests drive the Blackboard through write sequences the orchestrator
//! produces and check the ordering and conflict guarantees.

use proptest::prelude::*;
use serde_json::json;
use swarmboard_blackboard::Blackboard;
use swarmboard_toon::decode;

#[test]
fn test_conflict_outcome_independent_of_order() {
    // s1 first
    let mut board = Blackboard::new();
    board.write("shared", json!("from s1"), 0.9, "s1", 1);
    board.write("shared", json!("from s2"), 0.6, "s2", 1);
    let first = board.read("shared").unwrap().value.clone();

    // s2 first
    let mut board = Blackboard::new();
    board.write("shared", json!("from s2"), 0.6, "s2", 1);
    board.write("shared", json!("from s1"), 0.9, "s1", 1);
    let second = board.read("shared").unwrap().value.clone();

    assert_eq!(first, json!("from s1"));
    assert_eq!(first, second);
}

#[test]
fn test_round_scenario_delta_per_specialist() {
    let mut board = Blackboard::new();

    // round 1: three specialists in priority order
    let mut last_seen = [0u64; 3];
    for (idx, id) in ["collector", "analyst", "writer"].iter().enumerate() {
        let delta = board.facts_since(last_seen[idx]);
        assert_eq!(delta.len(), idx, "{} should see every predecessor write", id);
        board.write(format!("{}.answer", id), json!(format!("output of {}", id)), 0.8, *id, 1);
        last_seen[idx] = board.global_version();
    }

    // round 2: the collector only sees what happened after its own turn
    let delta = board.facts_since(last_seen[0]);
    let keys: Vec<_> = delta.iter().map(|f| f.key.as_str()).collect();
    assert_eq!(keys, vec!["analyst.answer", "writer.answer"]);
}

#[test]
fn test_serialized_delta_decodes() {
    let mut board = Blackboard::new();
    board.write("stats.mean", json!(3.5), 0.9, "stats", 1);
    board.write("sentiment.label", json!("mixed, leaning positive"), 0.7, "sentiment", 1);

    let decoded = decode(&board.to_serializable(0)).unwrap();
    let rows = decoded["facts"].as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["key"], json!("stats.mean"));
    assert_eq!(rows[1]["value"], json!("mixed, leaning positive"));
    assert_eq!(rows[1]["v"], json!(2));
}

proptest! {
    #[test]
    fn test_global_version_matches_history(
        writes in prop::collection::vec((0usize..4, 0usize..3, 0.0f64..=1.0, 1u32..3), 0..40)
    ) {
        let mut board = Blackboard::new();
        let mut previous = 0;
        for (key, by, confidence, round) in writes {
            let fact = board.write(format!("k{}", key), json!(confidence), confidence, format!("s{}", by), round);
            prop_assert!(fact.version > previous);
            previous = fact.version;
        }

        let history = board.history_since(0);
        let max = history.iter().map(|f| f.version).max().unwrap_or(0);
        prop_assert_eq!(board.global_version(), max);
        prop_assert_eq!(history.len() as u64, board.global_version());
    }

    #[test]
    fn test_same_round_winner_is_max_confidence(
        confidences in prop::collection::vec(0.0f64..=1.0, 1..8)
    ) {
        let mut board = Blackboard::new();
        for (idx, confidence) in confidences.iter().enumerate() {
            board.write("k", json!(idx), *confidence, format!("s{}", idx), 1);
        }

        let best = confidences.iter().cloned().fold(f64::MIN, f64::max);
        prop_assert_eq!(board.read("k").unwrap().confidence, best);
    }

    #[test]
    fn test_delta_reads_are_idempotent(
        count in 0usize..20,
        since in 0u64..25
    ) {
        let mut board = Blackboard::new();
        for i in 0..count {
            board.write(format!("k{}", i % 5), json!(i), 0.5, "s", 1);
        }
        let version = board.global_version();
        let a = board.facts_since(since);
        let b = board.facts_since(since);
        prop_assert_eq!(&a, &b);
        prop_assert_eq!(board.global_version(), version);
        prop_assert!(a.iter().all(|f| f.version > since));
        prop_assert!(a.windows(2).all(|w| w[0].version < w[1].version));
    }
}
