//! Quantum Cache - an adaptive, correlation-aware in-memory cache
//!
//! A logical key resolves to a small set of deterministically derived
//! physical slots ("superposition"), contexts that look alike entangle their
//! keys in a decaying correlation graph, and a coherence score shaped by
//! both reads and elapsed time drives eviction.

pub mod cache;
pub mod config;
pub mod error;
pub mod tasks;

pub use cache::{
    CacheHit, CacheMetrics, CacheStats, CacheValue, Context, HitType, MaintenanceReport,
    QuantumCache,
};
pub use config::CacheConfig;
pub use error::{CacheError, Result};
pub use tasks::spawn_maintenance_task;
