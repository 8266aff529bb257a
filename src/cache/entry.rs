//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with coherence and
//! TTL bookkeeping.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::cache::context::Context;
use crate::cache::value::CacheValue;

/// Coherence multiplier applied on every successful read (observation penalty).
pub const OBSERVATION_DECAY: f64 = 0.99;

/// Floor below which division inputs are clamped in the uncertainty score.
const EPSILON: f64 = 1e-6;

// == Cache Entry ==
/// Represents a single cache entry with payload and placement metadata.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The stored payload
    pub value: CacheValue,
    /// Context supplied at insertion, kept for similarity comparisons
    pub context: Context,
    /// Creation timestamp (Unix milliseconds)
    pub created_at: u64,
    /// Logical time-to-live in milliseconds
    pub ttl_ms: u64,
    /// Number of successful reads since insertion
    pub access_count: u64,
    /// Confidence score in (0,1]; starts at 1.0, non-increasing until overwrite
    pub coherence: f64,
    /// Point-in-time prediction of reuse likelihood in [0,1]
    pub access_probability: f64,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new cache entry with full coherence.
    ///
    /// # Arguments
    /// * `value` - The payload to store
    /// * `context` - The caller-supplied context
    /// * `ttl` - Logical time-to-live
    /// * `access_probability` - Initial reuse prediction (0.5 for unseen keys)
    pub fn new(value: CacheValue, context: Context, ttl: Duration, access_probability: f64) -> Self {
        Self {
            value,
            context,
            created_at: current_timestamp_ms(),
            ttl_ms: ttl.as_millis() as u64,
            access_count: 0,
            coherence: 1.0,
            access_probability,
        }
    }

    // == Age ==
    /// Age of the entry in milliseconds, floored at 1 so ratios stay finite.
    pub fn age_ms(&self) -> u64 {
        current_timestamp_ms().saturating_sub(self.created_at).max(1)
    }

    // == Is Expired ==
    /// Checks if the entry has outlived its logical TTL.
    ///
    /// An entry is expired once its age reaches the TTL exactly; expired
    /// entries are treated as misses on read regardless of their coherence.
    pub fn is_expired(&self) -> bool {
        current_timestamp_ms() >= self.created_at + self.ttl_ms
    }

    // == Observe ==
    /// Applies the read-side bookkeeping: one observation costs a small
    /// multiplicative coherence penalty and bumps the access counter.
    pub fn observe(&mut self) {
        self.coherence *= OBSERVATION_DECAY;
        self.access_count += 1;
    }

    // == Decay Coherence ==
    /// Applies the natural time decay `exp(-age / coherence_time)`.
    ///
    /// Coherence is never raised by this: the minimum of the current value
    /// and the time-decayed value is kept, so reads and elapsed time compound.
    pub fn decay_coherence(&mut self, coherence_time: Duration) {
        let t = coherence_time.as_millis().max(1) as f64;
        let natural = (-(self.age_ms() as f64) / t).exp();
        self.coherence = self.coherence.min(natural);
    }

    // == Uncertainty ==
    /// Eviction-ranking score: inverse access frequency times inverse
    /// coherence. Rarely read, low-coherence entries rank highest and are
    /// evicted first.
    pub fn uncertainty(&self) -> f64 {
        let frequency = self.access_count as f64 / self.age_ms() as f64;
        (1.0 / frequency.max(EPSILON)) * (1.0 / self.coherence.max(EPSILON))
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("Time went backwards")
        .as_millis() as u64
}
