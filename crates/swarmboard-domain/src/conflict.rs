//! Conflict resolution between competing writes to the same key
//!
//! Implemented as pure functions over two facts so the policy can be tested
//! without the Blackboard's mutation machinery.
//!
//! A conflict exists when the current fact for a key was written by a
//! *different* specialist in the *same* round as the incoming write. Outside
//! that scope the newer write simply supersedes the older one.

use crate::Fact;

/// Outcome of comparing an existing fact with an incoming one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// The existing fact stays current; the incoming one goes to history only
    KeepExisting,
    /// The incoming fact becomes current
    TakeIncoming,
}

/// Whether two writes to the same key compete under the conflict policy
pub fn is_conflict(existing: &Fact, incoming: &Fact) -> bool {
    existing.round == incoming.round && existing.written_by != incoming.written_by
}

/// Pick the winner between two competing facts
///
/// Highest confidence wins. On an exact tie the most recent write (higher
/// version) wins. The result depends only on `(confidence, version)`, so it is
/// reproducible regardless of which fact is passed as `existing`.
///
/// # Examples
///
/// ```
/// use swarmboard_domain::{Fact, resolve_conflict, Resolution};
/// use serde_json::json;
///
/// let existing = Fact::new("k", json!("a"), 0.9, "s1", 1, 1);
/// let incoming = Fact::new("k", json!("b"), 0.6, "s2", 2, 1);
/// assert_eq!(resolve_conflict(&existing, &incoming), Resolution::KeepExisting);
/// ```
pub fn resolve_conflict(existing: &Fact, incoming: &Fact) -> Resolution {
    match incoming.confidence.total_cmp(&existing.confidence) {
        std::cmp::Ordering::Greater => Resolution::TakeIncoming,
        std::cmp::Ordering::Less => Resolution::KeepExisting,
        std::cmp::Ordering::Equal => {
            if incoming.version >= existing.version {
                Resolution::TakeIncoming
            } else {
                Resolution::KeepExisting
            }
        }
    }
}

/// Return a reference to the winning fact of two competing writes
pub fn winner<'a>(existing: &'a Fact, incoming: &'a Fact) -> &'a Fact {
    match resolve_conflict(existing, incoming) {
        Resolution::KeepExisting => existing,
        Resolution::TakeIncoming => incoming,
    }
}
