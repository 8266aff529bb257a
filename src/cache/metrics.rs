//! Cache Metrics Module
//!
//! Tracks cache performance counters and produces point-in-time metric
//! snapshots for callers.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::cache::store::HitType;

// == Cache Stats ==
/// Running performance counters, split per hit type.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CacheStats {
    /// Hits served from the exact key
    pub direct_hits: u64,
    /// Hits served from a candidate slot
    pub superposition_hits: u64,
    /// Hits served through a correlation edge
    pub entangled_hits: u64,
    /// Failed retrievals (absent or expired)
    pub misses: u64,
    /// Entries removed under capacity pressure
    pub evictions: u64,
    /// Entries removed after outliving their TTL
    pub expirations: u64,
    /// Entries removed after coherence fell below the floor
    pub decoherence_evictions: u64,
}

impl CacheStats {
    /// Creates stats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total hits across all hit types.
    pub fn hits(&self) -> u64 {
        self.direct_hits + self.superposition_hits + self.entangled_hits
    }

    // == Hit Rate ==
    /// Hits over total lookups, or 0.0 if no lookups have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits() + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits() as f64 / total as f64
        }
    }

    /// Increments the counter for one hit of the given type.
    pub fn record_hit(&mut self, hit_type: HitType) {
        match hit_type {
            HitType::Direct => self.direct_hits += 1,
            HitType::Superposition => self.superposition_hits += 1,
            HitType::Entangled => self.entangled_hits += 1,
        }
    }

    /// Increments the miss counter.
    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    /// Increments the capacity-eviction counter.
    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    /// Increments the TTL-expiration counter.
    pub fn record_expiration(&mut self) {
        self.expirations += 1;
    }

    /// Increments the decoherence-eviction counter.
    pub fn record_decoherence(&mut self) {
        self.decoherence_evictions += 1;
    }
}

// == Cache Metrics ==
/// Point-in-time snapshot returned by `QuantumCache::metrics()`.
#[derive(Debug, Clone, Serialize)]
pub struct CacheMetrics {
    /// Live entries in the store
    pub total_entries: usize,
    /// Configured capacity
    pub capacity: usize,
    /// `total_entries / capacity`
    pub utilization: f64,
    /// Undirected correlation edges
    pub correlation_edges: usize,
    /// Mean coherence across live entries (0.0 when empty)
    pub avg_coherence: f64,
    /// Keys with recorded access-pattern history
    pub tracked_keys: usize,
    /// Running counters
    pub stats: CacheStats,
    /// When the snapshot was taken
    pub captured_at: DateTime<Utc>,
}
