//! Background Tasks Module
//!
//! Contains background tasks that run periodically over a cache instance.
//!
//! # Tasks
//! - Maintenance: decays correlations and coherence, removes dead entries

mod maintenance;

pub use maintenance::spawn_maintenance_task;
