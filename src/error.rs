//! Error types for the quantum cache
//!
//! Provides unified error handling using thiserror.
//!
//! The cache is designed to never fail on valid input: a `get` on a missing
//! key is a miss value, not an error, and a non-positive TTL on `put` is
//! silently replaced by the default. The only failures worth surfacing are
//! invalid construction parameters and malformed requests.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the quantum cache.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Invalid configuration supplied at construction time
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Invalid request data (oversized key or value)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

// == Result Type Alias ==
/// Convenience Result type for the quantum cache.
pub type Result<T> = std::result::Result<T, CacheError>;
