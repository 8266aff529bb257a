//! Maintenance Task
//!
//! Background task that periodically decays correlation edges and entry
//! coherence, and removes entries and edges that fall below their floors.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::QuantumCache;

/// Spawns a background task that periodically runs cache maintenance.
///
/// The task runs in an infinite loop, sleeping for the specified interval
/// between passes. Each pass acquires the write lock on the cache, so a tick
/// never overlaps a `put` or `get` on the same instance.
///
/// # Arguments
/// * `cache` - Arc<RwLock<QuantumCache>> shared reference to the cache
/// * `interval` - Time between maintenance passes
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the task
/// when the cache instance is dropped or the host shuts down.
///
/// # Example
/// ```ignore
/// let cache = Arc::new(RwLock::new(QuantumCache::new(CacheConfig::default())?));
/// let handle = spawn_maintenance_task(cache.clone(), Duration::from_secs(30));
/// // Later, during shutdown:
/// handle.abort();
/// ```
pub fn spawn_maintenance_task(
    cache: Arc<RwLock<QuantumCache>>,
    interval: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!("Starting maintenance task with interval of {:?}", interval);

        loop {
            tokio::time::sleep(interval).await;

            let report = {
                let mut cache_guard = cache.write().await;
                cache_guard.maintain()
            };

            if report.entries_removed() > 0 || report.edges_pruned > 0 {
                info!(
                    "Maintenance: {} expired, {} decohered, {} edges pruned",
                    report.entries_expired, report.entries_decohered, report.edges_pruned
                );
            } else {
                debug!("Maintenance: nothing to remove");
            }
        }
    })
}
