//! Property-Based Tests for Cache Module
//!
//! Uses proptest to verify the cache's correctness properties.

use proptest::prelude::*;
use std::collections::BTreeMap;

use crate::cache::context::{context_similarity, Context};
use crate::cache::correlation::CorrelationGraph;
use crate::cache::store::{HitType, QuantumCache};
use crate::cache::value::{value_similarity, CacheValue};
use crate::config::CacheConfig;

// == Strategies ==
/// Generates valid cache keys (non-empty, within length limit)
fn valid_key_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_]{1,64}"
}

/// Generates text payloads within the size limit
fn valid_value_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ]{1,256}"
}

/// Generates small contexts drawn from a fixed attribute pool
fn context_strategy() -> impl Strategy<Value = Context> {
    prop::collection::btree_map(
        prop::sample::select(vec![
            "platform".to_string(),
            "type".to_string(),
            "user".to_string(),
            "lang".to_string(),
        ]),
        "[a-z]{1,8}",
        0..4,
    )
}

/// Generates a sequence of cache operations for testing
#[derive(Debug, Clone)]
enum CacheOp {
    Put {
        key: String,
        value: String,
        context: Context,
    },
    Get {
        key: String,
        context: Context,
    },
    Maintain,
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        (valid_key_strategy(), valid_value_strategy(), context_strategy()).prop_map(
            |(key, value, context)| CacheOp::Put {
                key,
                value,
                context
            }
        ),
        (valid_key_strategy(), context_strategy())
            .prop_map(|(key, context)| CacheOp::Get { key, context }),
        Just(CacheOp::Maintain),
    ]
}

fn test_cache(max_size: usize) -> QuantumCache {
    QuantumCache::new(CacheConfig {
        max_size,
        ..CacheConfig::default()
    })
    .expect("default-derived config is valid")
}

fn apply(cache: &mut QuantumCache, op: CacheOp) {
    match op {
        CacheOp::Put {
            key,
            value,
            context,
        } => {
            let _ = cache.put(&key, CacheValue::from(value), context, None);
        }
        CacheOp::Get { key, context } => {
            let _ = cache.get(&key, &context);
        }
        CacheOp::Maintain => {
            let _ = cache.maintain();
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // For any sequence of operations, the store never exceeds its capacity.
    #[test]
    fn prop_capacity_bound(ops in prop::collection::vec(cache_op_strategy(), 1..100)) {
        let max_size = 20;
        let mut cache = test_cache(max_size);

        for op in ops {
            apply(&mut cache, op);
            prop_assert!(
                cache.len() <= max_size,
                "Cache size {} exceeds max {}",
                cache.len(),
                max_size
            );
        }
    }

    // For any key/value/context, an immediate round trip returns the stored
    // value as a direct hit.
    #[test]
    fn prop_immediate_roundtrip_is_direct(
        key in valid_key_strategy(),
        value in valid_value_strategy(),
        context in context_strategy()
    ) {
        let mut cache = test_cache(100);

        cache.put(&key, CacheValue::from(value.clone()), context.clone(), None).unwrap();

        let hit = cache.get(&key, &context);
        prop_assert!(hit.is_some(), "Immediate lookup must hit");
        let hit = hit.unwrap();
        prop_assert_eq!(hit.hit_type, HitType::Direct);
        prop_assert_eq!(hit.value, CacheValue::from(value));
    }

    // For a fixed entry with no intervening put, repeated reads produce a
    // non-increasing coherence sequence.
    #[test]
    fn prop_coherence_monotonic(
        key in valid_key_strategy(),
        value in valid_value_strategy(),
        context in context_strategy(),
        reads in 1usize..30
    ) {
        let mut cache = test_cache(100);
        cache.put(&key, CacheValue::from(value), context.clone(), None).unwrap();

        let mut last = 1.0f64;
        for _ in 0..reads {
            let hit = cache.get(&key, &context).expect("entry stays live");
            prop_assert!(
                hit.coherence <= last,
                "Coherence rose from {} to {}",
                last,
                hit.coherence
            );
            last = hit.coherence;
        }
    }

    // Statistics mirror observed lookup outcomes exactly.
    #[test]
    fn prop_statistics_accuracy(ops in prop::collection::vec(cache_op_strategy(), 1..60)) {
        let mut cache = test_cache(50);
        let mut expected_hits: u64 = 0;
        let mut expected_misses: u64 = 0;

        for op in ops {
            match op {
                CacheOp::Get { key, context } => match cache.get(&key, &context) {
                    Some(_) => expected_hits += 1,
                    None => expected_misses += 1,
                },
                other => apply(&mut cache, other),
            }
        }

        let stats = cache.metrics().stats;
        prop_assert_eq!(stats.hits(), expected_hits, "Hits mismatch");
        prop_assert_eq!(stats.misses, expected_misses, "Misses mismatch");
    }

    // After reset, metrics always report an empty cache regardless of prior
    // state.
    #[test]
    fn prop_reset_idempotence(ops in prop::collection::vec(cache_op_strategy(), 0..60)) {
        let mut cache = test_cache(50);
        for op in ops {
            apply(&mut cache, op);
        }

        cache.reset();

        let metrics = cache.metrics();
        prop_assert_eq!(metrics.total_entries, 0);
        prop_assert_eq!(metrics.correlation_edges, 0);
        prop_assert_eq!(metrics.tracked_keys, 0);
        prop_assert_eq!(metrics.stats.hits() + metrics.stats.misses, 0);
    }

    // Context similarity is symmetric and bounded for arbitrary maps.
    #[test]
    fn prop_context_similarity_bounds(a in context_strategy(), b in context_strategy()) {
        let ab = context_similarity(&a, &b);
        let ba = context_similarity(&b, &a);

        prop_assert!((0.0..=1.0).contains(&ab));
        prop_assert_eq!(ab, ba, "Similarity must be symmetric");
        prop_assert_eq!(context_similarity(&a, &a), 1.0);
    }

    // Value similarity is symmetric and bounded for text payloads.
    #[test]
    fn prop_value_similarity_bounds(a in valid_value_strategy(), b in valid_value_strategy()) {
        let va = CacheValue::from(a);
        let vb = CacheValue::from(b);

        let ab = value_similarity(&va, &vb);
        prop_assert!((0.0..=1.0).contains(&ab));
        prop_assert!((ab - value_similarity(&vb, &va)).abs() < 1e-12);
        prop_assert_eq!(value_similarity(&va, &va), 1.0);
    }

    // The correlation graph stays symmetric under any sequence of links,
    // decays, and prunes.
    #[test]
    fn prop_graph_symmetry(
        links in prop::collection::vec(
            (valid_key_strategy(), valid_key_strategy(), 0.0f64..=1.0),
            1..40
        ),
        decays in 0usize..20
    ) {
        let mut graph = CorrelationGraph::new();
        let mut touched: BTreeMap<String, ()> = BTreeMap::new();
        for (a, b, strength) in links {
            graph.link(&a, &b, strength);
            touched.insert(a, ());
            touched.insert(b, ());
        }
        for _ in 0..decays {
            graph.decay_all(0.98);
        }
        graph.prune(0.1);

        // Every surviving directed edge must exist in the other direction
        // with the same strength.
        for key in touched.keys() {
            for (neighbor, strength) in graph.neighbors(key) {
                let reverse = graph
                    .neighbors(&neighbor)
                    .into_iter()
                    .find(|(k, _)| k == key)
                    .map(|(_, s)| s);
                prop_assert_eq!(reverse, Some(strength));
            }
        }
    }
}
