//! Configuration Module
//!
//! Handles loading and validating cache configuration from environment variables.

use std::env;
use std::time::Duration;

use crate::error::{CacheError, Result};

/// Cache configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Maximum number of entries the cache can hold
    pub max_size: usize,
    /// Number of candidate slots derived per logical key
    pub quantum_depth: usize,
    /// Default TTL for entries inserted without an explicit TTL
    pub default_ttl: Duration,
    /// Half-life of the natural coherence decay applied by maintenance
    pub coherence_time: Duration,
    /// Width of the time window salting candidate-slot derivation
    pub slot_window: Duration,
    /// Period of the background maintenance task
    pub maintenance_interval: Duration,
}

impl CacheConfig {
    /// Creates a new CacheConfig by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_MAX_SIZE` - Maximum cache entries (default: 1000)
    /// - `CACHE_QUANTUM_DEPTH` - Candidate slots per key (default: 5)
    /// - `CACHE_DEFAULT_TTL_SECS` - Default TTL in seconds (default: 300)
    /// - `CACHE_COHERENCE_TIME_SECS` - Coherence half-life in seconds (default: 120)
    /// - `CACHE_SLOT_WINDOW_SECS` - Slot derivation window in seconds (default: 60)
    /// - `CACHE_MAINTENANCE_INTERVAL_SECS` - Maintenance period in seconds (default: 30)
    pub fn from_env() -> Self {
        Self {
            max_size: env_or("CACHE_MAX_SIZE", 1000),
            quantum_depth: env_or("CACHE_QUANTUM_DEPTH", 5),
            default_ttl: Duration::from_secs(env_or("CACHE_DEFAULT_TTL_SECS", 300)),
            coherence_time: Duration::from_secs(env_or("CACHE_COHERENCE_TIME_SECS", 120)),
            slot_window: Duration::from_secs(env_or("CACHE_SLOT_WINDOW_SECS", 60)),
            maintenance_interval: Duration::from_secs(env_or(
                "CACHE_MAINTENANCE_INTERVAL_SECS",
                30,
            )),
        }
    }

    /// Validates the configuration, failing fast on unusable parameters.
    ///
    /// `max_size` and `quantum_depth` must both be positive; the durations
    /// must be non-zero so the decay and windowing math stays well-defined.
    pub fn validate(&self) -> Result<()> {
        if self.max_size == 0 {
            return Err(CacheError::InvalidConfig(
                "max_size must be positive".to_string(),
            ));
        }
        if self.quantum_depth == 0 {
            return Err(CacheError::InvalidConfig(
                "quantum_depth must be positive".to_string(),
            ));
        }
        if self.default_ttl.is_zero() {
            return Err(CacheError::InvalidConfig(
                "default_ttl must be non-zero".to_string(),
            ));
        }
        if self.coherence_time.is_zero() {
            return Err(CacheError::InvalidConfig(
                "coherence_time must be non-zero".to_string(),
            ));
        }
        if self.slot_window.is_zero() {
            return Err(CacheError::InvalidConfig(
                "slot_window must be non-zero".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_size: 1000,
            quantum_depth: 5,
            default_ttl: Duration::from_secs(300),
            coherence_time: Duration::from_secs(120),
            slot_window: Duration::from_secs(60),
            maintenance_interval: Duration::from_secs(30),
        }
    }
}

// == Utility Functions ==
/// Reads a parseable environment variable or falls back to a default.
fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = CacheConfig::default();
        assert_eq!(config.max_size, 1000);
        assert_eq!(config.quantum_depth, 5);
        assert_eq!(config.default_ttl, Duration::from_secs(300));
        assert_eq!(config.coherence_time, Duration::from_secs(120));
        assert_eq!(config.slot_window, Duration::from_secs(60));
        assert_eq!(config.maintenance_interval, Duration::from_secs(30));
    }

    #[test]
    fn test_config_default_is_valid() {
        assert!(CacheConfig::default().validate().is_ok());
    }

    #[test]
    fn test_config_rejects_zero_max_size() {
        let config = CacheConfig {
            max_size: 0,
            ..CacheConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(CacheError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_config_rejects_zero_quantum_depth() {
        let config = CacheConfig {
            quantum_depth: 0,
            ..CacheConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(CacheError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_config_rejects_zero_coherence_time() {
        let config = CacheConfig {
            coherence_time: Duration::ZERO,
            ..CacheConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(CacheError::InvalidConfig(_))
        ));
    }
}
