//! Context Module
//!
//! Caller-supplied attribute maps describing the nature of a cached request,
//! and the similarity measure defined over them. Contexts are used only for
//! similarity comparisons; their values are never interpreted.

use std::collections::BTreeMap;

/// Attribute map attached to every `put`/`get`.
///
/// A `BTreeMap` keeps attribute order deterministic, which matters when a
/// context is serialized into the candidate-slot digest.
pub type Context = BTreeMap<String, String>;

// == Context Similarity ==
/// Computes a similarity score in [0,1] between two contexts.
///
/// The score is the Jaccard index of the two attribute-name sets: it looks at
/// which attributes are present, not at their values. Two requests carrying
/// the same shape of context ("platform" + "type", say) are considered the
/// same kind of request even when the attribute values differ.
///
/// Edge cases: two empty contexts are maximally similar (1.0, there is no
/// information to distinguish them); exactly one empty context scores the low
/// constant 0.1.
pub fn context_similarity(a: &Context, b: &Context) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    if a.is_empty() || b.is_empty() {
        return 0.1;
    }

    let intersection = a.keys().filter(|k| b.contains_key(*k)).count();
    let union = a.len() + b.len() - intersection;

    intersection as f64 / union as f64
}

/// Builds a `Context` from string pairs. Convenience for callers and tests.
pub fn context_from<I, K, V>(pairs: I) -> Context
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}
