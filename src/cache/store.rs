//! Cache Store Module
//!
//! The entry table itself: insertion with content-aware slot selection,
//! direct/indirect lookup, coherence bookkeeping, and capacity-bounded
//! eviction driven by an uncertainty score.
//!
//! The store is a plain synchronous structure; callers in a multi-threaded
//! host wrap an instance in `Arc<RwLock<_>>` so that `put`, `get`, and the
//! maintenance tick are mutually exclusive critical sections. There is no
//! per-entry locking.

use std::collections::HashMap;
use std::time::Duration;

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, trace};

use crate::cache::context::{context_similarity, Context};
use crate::cache::correlation::CorrelationGraph;
use crate::cache::entry::CacheEntry;
use crate::cache::metrics::{CacheMetrics, CacheStats};
use crate::cache::patterns::{AccessKind, AccessPatternTracker};
use crate::cache::slots::SlotGenerator;
use crate::cache::value::{value_similarity, CacheValue};
use crate::cache::{
    COHERENCE_FLOOR, CORRELATION_DECAY, CORRELATION_THRESHOLD, MAX_KEY_LENGTH, MAX_VALUE_SIZE,
    PRUNE_THRESHOLD, STRONG_CORRELATION,
};
use crate::config::CacheConfig;
use crate::error::{CacheError, Result};

/// Placement score assigned to an unoccupied candidate slot. Combined
/// similarity scores live in [0,2]; an empty slot beats an occupant less
/// compatible than this midpoint.
const NEUTRAL_PLACEMENT_SCORE: f64 = 1.0;

// == Hit Type ==
/// How a lookup was satisfied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HitType {
    /// Found at the exact key
    Direct,
    /// Found at a derived candidate slot
    Superposition,
    /// Served through a strong correlation edge
    Entangled,
}

impl std::fmt::Display for HitType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HitType::Direct => write!(f, "direct"),
            HitType::Superposition => write!(f, "superposition"),
            HitType::Entangled => write!(f, "entangled"),
        }
    }
}

// == Cache Hit ==
/// Successful lookup result with diagnostic metadata.
#[derive(Debug, Clone, Serialize)]
pub struct CacheHit {
    /// The stored payload
    pub value: CacheValue,
    /// How the lookup was satisfied
    pub hit_type: HitType,
    /// Entry coherence after the observation penalty
    pub coherence: f64,
    /// Recomputed reuse prediction
    pub access_probability: f64,
}

// == Maintenance Report ==
/// What a single maintenance pass did.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct MaintenanceReport {
    /// Correlation edges pruned below the strength floor
    pub edges_pruned: usize,
    /// Entries removed after outliving their TTL
    pub entries_expired: usize,
    /// Entries removed after coherence fell below the floor
    pub entries_decohered: usize,
}

impl MaintenanceReport {
    /// Total entries removed by the pass.
    pub fn entries_removed(&self) -> usize {
        self.entries_expired + self.entries_decohered
    }
}

// == Quantum Cache ==
/// Adaptive, correlation-aware in-memory cache.
///
/// Each instance owns its entry table, correlation graph, and access-pattern
/// log; instances share nothing.
#[derive(Debug)]
pub struct QuantumCache {
    /// Physical-key to entry storage
    entries: HashMap<String, CacheEntry>,
    /// Inferred relationships between keys
    correlations: CorrelationGraph,
    /// Bounded per-key access history
    patterns: AccessPatternTracker,
    /// Candidate slot derivation
    slots: SlotGenerator,
    /// Performance counters
    stats: CacheStats,
    /// Construction-time configuration
    config: CacheConfig,
}

impl QuantumCache {
    // == Constructor ==
    /// Creates a new cache, failing fast on invalid configuration.
    pub fn new(config: CacheConfig) -> Result<Self> {
        config.validate()?;
        let slots = SlotGenerator::new(config.quantum_depth, config.slot_window);
        Ok(Self {
            entries: HashMap::new(),
            correlations: CorrelationGraph::new(),
            patterns: AccessPatternTracker::new(),
            slots,
            stats: CacheStats::new(),
            config,
        })
    }

    // == Put ==
    /// Stores a payload under `key`, returning the physical key used.
    ///
    /// The candidate slots for `key` are scored against the incoming payload
    /// and context, and the insertion collapses onto the highest-scoring
    /// candidate: occupied slots score by combined value and context
    /// similarity with their occupant, empty slots score the neutral prior,
    /// and ties break toward the lowest index (so an empty candidate set
    /// uses the first slot). Insertion resets coherence to 1.0, records a
    /// write event, forms correlation edges against contextually similar
    /// occupied keys, and evicts down to capacity if needed.
    ///
    /// A `None` or zero `ttl` means "use the configured default".
    pub fn put(
        &mut self,
        key: &str,
        value: CacheValue,
        context: Context,
        ttl: Option<Duration>,
    ) -> Result<String> {
        if key.len() > MAX_KEY_LENGTH {
            return Err(CacheError::InvalidRequest(format!(
                "Key exceeds maximum length of {} bytes",
                MAX_KEY_LENGTH
            )));
        }
        if value.size_hint() > MAX_VALUE_SIZE {
            return Err(CacheError::InvalidRequest(format!(
                "Value exceeds maximum size of {} bytes",
                MAX_VALUE_SIZE
            )));
        }

        let ttl = match ttl {
            Some(t) if !t.is_zero() => t,
            _ => self.config.default_ttl,
        };

        // Collapse to the most compatible candidate. Occupied slots score by
        // payload and context similarity against their current occupant;
        // empty slots carry the neutral prior, so an incompatible occupant
        // is left in place and the new payload lands on a free variant.
        // Ties break toward the lowest index, so an empty candidate set
        // collapses onto the identity slot.
        let candidates = self.slots.candidate_slots(key, &context);
        let mut best: (usize, f64) = (0, f64::NEG_INFINITY);
        for (i, slot) in candidates.iter().enumerate() {
            let score = match self.entries.get(slot) {
                Some(existing) => {
                    value_similarity(&value, &existing.value)
                        + context_similarity(&context, &existing.context)
                }
                None => NEUTRAL_PLACEMENT_SCORE,
            };
            if score > best.1 {
                best = (i, score);
            }
        }
        let physical_key = candidates[best.0].clone();

        let access_probability = self.patterns.access_probability(key, &context);
        let entry = CacheEntry::new(value, context.clone(), ttl, access_probability);
        self.entries.insert(physical_key.clone(), entry);

        self.patterns.record(key, AccessKind::Write, &context);

        // Entangle with every occupied key whose context shape is close
        // enough to the incoming one.
        let links: Vec<(String, f64)> = self
            .entries
            .iter()
            .filter(|(other_key, _)| other_key.as_str() != physical_key)
            .filter_map(|(other_key, other)| {
                let sim = context_similarity(&context, &other.context);
                (sim > CORRELATION_THRESHOLD).then(|| (other_key.clone(), sim))
            })
            .collect();
        for (other_key, sim) in links {
            self.correlations.link(&physical_key, &other_key, sim);
        }

        if self.entries.len() > self.config.max_size {
            self.evict_to_capacity(&physical_key);
        }

        trace!(key, physical_key = %physical_key, "stored entry");
        Ok(physical_key)
    }

    // == Get ==
    /// Retrieves the payload for `key`, or `None` on a total miss.
    ///
    /// Lookup order: the exact key ("direct"), then the candidate slots for
    /// the current window ("superposition"), then the strongest correlation
    /// edge at or above the strong threshold ("entangled"). Expired entries
    /// are misses and are removed with full edge cascade. Every hit applies
    /// the observation coherence penalty, records a read event, and
    /// recomputes the access probability.
    pub fn get(&mut self, key: &str, context: &Context) -> Option<CacheHit> {
        if let Some(hit) = self.try_hit(key, key, HitType::Direct, context) {
            return Some(hit);
        }

        let candidates = self.slots.candidate_slots(key, context);
        for slot in candidates.iter().skip(1) {
            if let Some(hit) = self.try_hit(key, slot, HitType::Superposition, context) {
                return Some(hit);
            }
        }

        for (neighbor, strength) in self.correlations.neighbors(key) {
            if strength < STRONG_CORRELATION {
                break;
            }
            if let Some(hit) = self.try_hit(key, &neighbor, HitType::Entangled, context) {
                return Some(hit);
            }
        }

        self.stats.record_miss();
        None
    }

    /// Attempts a hit against one physical key, applying all read-side
    /// bookkeeping on success.
    fn try_hit(
        &mut self,
        logical_key: &str,
        physical_key: &str,
        hit_type: HitType,
        context: &Context,
    ) -> Option<CacheHit> {
        let expired = self.entries.get(physical_key)?.is_expired();
        if expired {
            self.remove_entry(physical_key, true);
            self.stats.record_expiration();
            return None;
        }

        self.patterns.record(logical_key, AccessKind::Read, context);
        let access_probability = self.patterns.access_probability(logical_key, context);

        let entry = self.entries.get_mut(physical_key)?;
        entry.observe();
        entry.access_probability = access_probability;
        let hit = CacheHit {
            value: entry.value.clone(),
            hit_type,
            coherence: entry.coherence,
            access_probability,
        };

        self.stats.record_hit(hit_type);
        Some(hit)
    }

    // == Eviction ==
    /// Removes the most uncertain entries until the store is back at
    /// capacity. The entry just inserted is protected for the duration of
    /// its own `put`; a fresh entry has not had a chance to be read and
    /// would otherwise always rank as maximally uncertain.
    ///
    /// Correlation edges survive capacity eviction: a strongly correlated
    /// neighbor keeps serving the evicted key until decay prunes the edge.
    fn evict_to_capacity(&mut self, protected: &str) {
        let excess = self.entries.len().saturating_sub(self.config.max_size);
        if excess == 0 {
            return;
        }

        let mut ranked: Vec<(String, f64)> = self
            .entries
            .iter()
            .filter(|(key, _)| key.as_str() != protected)
            .map(|(key, entry)| (key.clone(), entry.uncertainty()))
            .collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));

        for (key, uncertainty) in ranked.into_iter().take(excess) {
            self.entries.remove(&key);
            self.stats.record_eviction();
            debug!(key = %key, uncertainty, "evicted under capacity pressure");
        }
    }

    /// Removes one physical entry; `cascade` also removes every correlation
    /// edge the key participates in.
    fn remove_entry(&mut self, physical_key: &str, cascade: bool) -> bool {
        let removed = self.entries.remove(physical_key).is_some();
        if removed && cascade {
            self.correlations.remove_key(physical_key);
        }
        removed
    }

    // == Maintenance ==
    /// Runs one maintenance pass: decay and prune correlation edges, drop
    /// expired entries, apply natural coherence decay, and evict entries
    /// whose coherence fell through the floor.
    ///
    /// This is the only path that removes entries purely due to elapsed time
    /// without an intervening `put`/`get`.
    pub fn maintain(&mut self) -> MaintenanceReport {
        self.correlations.decay_all(CORRELATION_DECAY);
        let edges_pruned = self.correlations.prune(PRUNE_THRESHOLD);

        let expired: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired())
            .map(|(key, _)| key.clone())
            .collect();
        let entries_expired = expired.len();
        for key in expired {
            self.remove_entry(&key, true);
            self.stats.record_expiration();
        }

        let coherence_time = self.config.coherence_time;
        for entry in self.entries.values_mut() {
            entry.decay_coherence(coherence_time);
        }
        let decohered: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.coherence < COHERENCE_FLOOR)
            .map(|(key, _)| key.clone())
            .collect();
        let entries_decohered = decohered.len();
        for key in decohered {
            self.remove_entry(&key, true);
            self.stats.record_decoherence();
            debug!(key = %key, "evicted after decoherence");
        }

        MaintenanceReport {
            edges_pruned,
            entries_expired,
            entries_decohered,
        }
    }

    // == Metrics ==
    /// Returns a point-in-time metrics snapshot.
    pub fn metrics(&self) -> CacheMetrics {
        let total_entries = self.entries.len();
        let avg_coherence = if total_entries == 0 {
            0.0
        } else {
            self.entries.values().map(|e| e.coherence).sum::<f64>() / total_entries as f64
        };

        CacheMetrics {
            total_entries,
            capacity: self.config.max_size,
            utilization: total_entries as f64 / self.config.max_size as f64,
            correlation_edges: self.correlations.edge_count(),
            avg_coherence,
            tracked_keys: self.patterns.tracked_keys(),
            stats: self.stats.clone(),
            captured_at: Utc::now(),
        }
    }

    // == Reset ==
    /// Clears all internal state: entries, correlations, access history, and
    /// counters. Intended for test harnesses.
    pub fn reset(&mut self) {
        self.entries.clear();
        self.correlations.clear();
        self.patterns.clear();
        self.stats = CacheStats::new();
    }

    // == Accessors ==
    /// Current number of entries in the store.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns true if a physical key currently holds an entry.
    pub fn contains_key(&self, physical_key: &str) -> bool {
        self.entries.contains_key(physical_key)
    }

    /// The configuration this instance was built with.
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }
}
