//! Cache Value Module
//!
//! Payload type stored in the cache, and the value-similarity measure used
//! during slot collapse. The similarity dispatches on a small closed set of
//! payload shapes rather than inspecting types at runtime.

use serde::{Deserialize, Serialize};
use serde_json::Value;

// == Cache Value ==
/// Opaque payload stored in a cache entry.
///
/// The cache never interprets payloads; the shape only matters when two
/// values are compared during content-aware placement:
/// - `Text` vs `Text` compares by normalized edit distance
/// - `Structured` vs `Structured` compares by top-level field overlap
/// - any other pairing (scalars, mixed shapes) compares by equality only
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CacheValue {
    /// Text-like payload
    Text(String),
    /// Structured payload (a JSON object)
    Structured(serde_json::Map<String, Value>),
    /// Anything else (numbers, booleans, arrays, null)
    Scalar(Value),
}

impl CacheValue {
    /// Approximate size of the payload in bytes, used for request validation.
    pub fn size_hint(&self) -> usize {
        match self {
            CacheValue::Text(s) => s.len(),
            CacheValue::Structured(map) => serde_json::to_string(map).map_or(0, |s| s.len()),
            CacheValue::Scalar(v) => serde_json::to_string(v).map_or(0, |s| s.len()),
        }
    }
}

impl From<&str> for CacheValue {
    fn from(s: &str) -> Self {
        CacheValue::Text(s.to_string())
    }
}

impl From<String> for CacheValue {
    fn from(s: String) -> Self {
        CacheValue::Text(s)
    }
}

impl From<Value> for CacheValue {
    fn from(v: Value) -> Self {
        match v {
            Value::String(s) => CacheValue::Text(s),
            Value::Object(map) => CacheValue::Structured(map),
            other => CacheValue::Scalar(other),
        }
    }
}

// == Value Similarity ==
/// Computes a similarity score in [0,1] between two payloads.
pub fn value_similarity(a: &CacheValue, b: &CacheValue) -> f64 {
    match (a, b) {
        (CacheValue::Text(x), CacheValue::Text(y)) => text_similarity(x, y),
        (CacheValue::Structured(x), CacheValue::Structured(y)) => field_overlap(x, y),
        // Equality-only fallback for scalars and mixed shapes.
        _ => {
            if a == b {
                1.0
            } else {
                0.0
            }
        }
    }
}

/// Normalized edit-distance similarity: `1 - levenshtein / max_len`.
fn text_similarity(a: &str, b: &str) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    let max_len = a_chars.len().max(b_chars.len());
    let dist = levenshtein(&a_chars, &b_chars);
    1.0 - dist as f64 / max_len as f64
}

/// Jaccard overlap of two objects' top-level field names.
fn field_overlap(a: &serde_json::Map<String, Value>, b: &serde_json::Map<String, Value>) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    let intersection = a.keys().filter(|k| b.contains_key(*k)).count();
    let union = a.len() + b.len() - intersection;
    if union == 0 {
        return 0.0;
    }
    intersection as f64 / union as f64
}

/// Levenshtein distance over chars, two-row dynamic programming.
fn levenshtein(a: &[char], b: &[char]) -> usize {
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0usize; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = if ca == cb { 0 } else { 1 };
            curr[j + 1] = (prev[j] + cost).min(prev[j + 1] + 1).min(curr[j] + 1);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}
