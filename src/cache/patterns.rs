//! Access Pattern Tracker Module
//!
//! Bounded per-key history of access events. The history feeds two derived
//! signals: a recency-weighted access frequency and an access-probability
//! estimate used as each entry's reuse prediction.

use std::collections::{HashMap, VecDeque};
use std::time::Duration;

use crate::cache::context::{context_similarity, Context};
use crate::cache::entry::current_timestamp_ms;

/// Maximum events retained per key; oldest entries are dropped first.
pub const HISTORY_LIMIT: usize = 100;

/// Reuse prediction for keys with no recorded history (maximal uncertainty).
pub const COLD_START_PROBABILITY: f64 = 0.5;

/// Recency half-life for frequency weighting.
const RECENCY_TAU: Duration = Duration::from_secs(60);

/// Recency-weighted event count at which the frequency component saturates.
const FREQUENCY_NORM: f64 = 20.0;

/// Number of recent events inspected for the context-affinity component.
const AFFINITY_SAMPLE: usize = 20;

// == Access Event ==
/// Kind of access recorded against a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessKind {
    Read,
    Write,
}

/// A single recorded access.
#[derive(Debug, Clone)]
pub struct AccessEvent {
    /// When the access happened (Unix milliseconds)
    pub timestamp_ms: u64,
    /// Context supplied with the access
    pub context: Context,
    /// Read or write
    pub kind: AccessKind,
}

// == Access Pattern Tracker ==
/// Tracks bounded access histories per logical key.
#[derive(Debug, Default)]
pub struct AccessPatternTracker {
    histories: HashMap<String, VecDeque<AccessEvent>>,
}

impl AccessPatternTracker {
    // == Constructor ==
    /// Creates an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    // == Record ==
    /// Records an access event for `key`, dropping the oldest event once the
    /// per-key ring is full.
    pub fn record(&mut self, key: &str, kind: AccessKind, context: &Context) {
        let history = self.histories.entry(key.to_string()).or_default();
        if history.len() >= HISTORY_LIMIT {
            history.pop_front();
        }
        history.push_back(AccessEvent {
            timestamp_ms: current_timestamp_ms(),
            context: context.clone(),
            kind,
        });
    }

    // == Frequency ==
    /// Recency-weighted access frequency for `key`.
    ///
    /// Each event contributes `exp(-age / tau)`, so a burst of recent
    /// accesses outweighs the same number of accesses spread over the past.
    pub fn frequency(&self, key: &str) -> f64 {
        let Some(history) = self.histories.get(key) else {
            return 0.0;
        };
        let now = current_timestamp_ms();
        let tau = RECENCY_TAU.as_millis() as f64;
        history
            .iter()
            .map(|event| {
                let age = now.saturating_sub(event.timestamp_ms) as f64;
                (-age / tau).exp()
            })
            .sum()
    }

    // == Access Probability ==
    /// Estimates the probability in [0,1] that `key` will be accessed again
    /// soon, given the current `context`.
    ///
    /// Blend of three signals over the recorded history: how recently the key
    /// was touched, how often it has been touched (recency-weighted), and how
    /// similar the current context is to the contexts seen before. A key with
    /// no history scores [`COLD_START_PROBABILITY`].
    pub fn access_probability(&self, key: &str, context: &Context) -> f64 {
        let Some(history) = self.histories.get(key) else {
            return COLD_START_PROBABILITY;
        };
        if history.is_empty() {
            return COLD_START_PROBABILITY;
        }

        let now = current_timestamp_ms();
        let tau = RECENCY_TAU.as_millis() as f64;

        let last = history.back().map(|e| e.timestamp_ms).unwrap_or(now);
        let recency = (-(now.saturating_sub(last) as f64) / tau).exp();

        let frequency = (self.frequency(key) / FREQUENCY_NORM).min(1.0);

        let recent = history.iter().rev().take(AFFINITY_SAMPLE);
        let (sum, count) = recent.fold((0.0f64, 0usize), |(sum, count), event| {
            (sum + context_similarity(context, &event.context), count + 1)
        });
        let affinity = sum / count as f64;

        (0.4 * recency + 0.3 * frequency + 0.3 * affinity).clamp(0.0, 1.0)
    }

    // == Tracked Keys ==
    /// Number of keys with at least one recorded event.
    pub fn tracked_keys(&self) -> usize {
        self.histories.len()
    }

    /// Returns the recorded history for a key, if any. Mostly for tests.
    pub fn history(&self, key: &str) -> Option<&VecDeque<AccessEvent>> {
        self.histories.get(key)
    }

    // == Clear ==
    /// Drops all recorded history.
    pub fn clear(&mut self) {
        self.histories.clear();
    }
}
