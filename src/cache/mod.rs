//! Cache Module
//!
//! Provides the adaptive, correlation-aware in-memory cache: content-aware
//! slot placement, a decaying correlation graph between keys, and
//! coherence-driven eviction.

mod context;
mod correlation;
mod entry;
mod metrics;
mod patterns;
mod slots;
mod store;
mod value;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use context::{context_from, context_similarity, Context};
pub use correlation::{CorrelationEdge, CorrelationGraph};
pub use entry::{CacheEntry, OBSERVATION_DECAY};
pub use metrics::{CacheMetrics, CacheStats};
pub use patterns::{AccessEvent, AccessKind, AccessPatternTracker, HISTORY_LIMIT};
pub use slots::SlotGenerator;
pub use store::{CacheHit, HitType, MaintenanceReport, QuantumCache};
pub use value::{value_similarity, CacheValue};

// == Public Constants ==
/// Maximum allowed key length in bytes
pub const MAX_KEY_LENGTH: usize = 256;

/// Maximum allowed value size in bytes
pub const MAX_VALUE_SIZE: usize = 1024 * 1024; // 1 MB

/// Minimum context similarity at which a correlation edge is formed
pub const CORRELATION_THRESHOLD: f64 = 0.7;

/// Minimum edge strength at which an entangled lookup is attempted
pub const STRONG_CORRELATION: f64 = 0.8;

/// Per-maintenance-tick multiplier applied to every edge strength
pub const CORRELATION_DECAY: f64 = 0.98;

/// Edge strength below which maintenance prunes an edge
pub const PRUNE_THRESHOLD: f64 = 0.1;

/// Coherence below which maintenance evicts an entry
pub const COHERENCE_FLOOR: f64 = 0.05;
