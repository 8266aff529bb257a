//! Candidate Slot Generator Module
//!
//! Derives the fixed-size set of physical storage keys ("candidate slots")
//! a logical key may resolve to. Generation is deterministic over
//! `(logical key, context, time window)`: a `get` issued moments after a
//! `put` with a matching context sees the same candidate set, while sets
//! from distant windows may legitimately differ, which bounds how long
//! cross-request placement stays discoverable.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::time::Duration;

use crate::cache::context::Context;
use crate::cache::entry::current_timestamp_ms;

// == Slot Generator ==
/// Derives candidate slots for logical keys.
#[derive(Debug, Clone)]
pub struct SlotGenerator {
    /// Number of candidate slots per key (slot 0 is the logical key itself)
    depth: usize,
    /// Width of the salting time window in milliseconds
    window_ms: u64,
}

impl SlotGenerator {
    /// Creates a generator producing `depth` slots salted by `window`.
    pub fn new(depth: usize, window: Duration) -> Self {
        Self {
            depth,
            window_ms: window.as_millis().max(1) as u64,
        }
    }

    /// Returns the ordered candidate slots for `key` under `context`.
    ///
    /// Slot 0 is always the logical key itself, so a fresh insertion with no
    /// occupied candidate lands where a direct lookup will find it. Slots
    /// 1.. are digest-derived variants, prefixed with the logical key so
    /// candidate sets of different keys never collide.
    pub fn candidate_slots(&self, key: &str, context: &Context) -> Vec<String> {
        self.candidate_slots_at(key, context, current_timestamp_ms())
    }

    /// Same as [`candidate_slots`](Self::candidate_slots) with an explicit
    /// clock, used by tests to pin the window.
    pub fn candidate_slots_at(&self, key: &str, context: &Context, now_ms: u64) -> Vec<String> {
        let window_index = now_ms / self.window_ms;
        let base = base_digest(key, context, window_index);

        let mut slots = Vec::with_capacity(self.depth);
        slots.push(key.to_string());
        for i in 1..self.depth as u64 {
            slots.push(format!("{}::q{:016x}", key, variant_digest(base, i)));
        }
        slots
    }

    /// Number of slots generated per key.
    pub fn depth(&self) -> usize {
        self.depth
    }
}

// == Digest Helpers ==
/// Base digest over the logical key, the serialized context, and the window.
///
/// `DefaultHasher::new()` uses fixed keys, so the digest chain is stable for
/// the lifetime of the process (all the determinism an in-memory cache needs).
fn base_digest(key: &str, context: &Context, window_index: u64) -> u64 {
    let mut hasher = DefaultHasher::new();
    key.hash(&mut hasher);
    for (name, value) in context {
        name.hash(&mut hasher);
        value.hash(&mut hasher);
    }
    window_index.hash(&mut hasher);
    hasher.finish()
}

/// Variant digest: hash of `base || i`.
fn variant_digest(base: u64, i: u64) -> u64 {
    let mut hasher = DefaultHasher::new();
    base.hash(&mut hasher);
    i.hash(&mut hasher);
    hasher.finish()
}
