//! Id generation for terms and groups.

use std::sync::atomic::{AtomicU64, Ordering};

use uuid::Uuid;

/// Source of fresh, unique term and group ids.
pub trait IdGenerator {
    /// Returns a new term id.
    fn term_id(&self) -> String;

    /// Returns a new group id. Must never return the root id `"base"`.
    fn group_id(&self) -> String;
}

/// Random v4 UUIDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidIds;

impl IdGenerator for UuidIds {
    fn term_id(&self) -> String {
        Uuid::new_v4().to_string()
    }

    fn group_id(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// Deterministic ids: `t1`, `t2`, … for terms and `g1`, `g2`, … for groups.
#[derive(Debug, Default)]
pub struct SequentialIds {
    /// Terms issued so far.
    terms: AtomicU64,
    /// Groups issued so far.
    groups: AtomicU64,
}

impl SequentialIds {
    /// Creates a generator starting at `t1` / `g1`.
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdGenerator for SequentialIds {
    fn term_id(&self) -> String {
        format!("t{}", self.terms.fetch_add(1, Ordering::Relaxed) + 1)
    }

    fn group_id(&self) -> String {
        format!("g{}", self.groups.fetch_add(1, Ordering::Relaxed) + 1)
    }
}
