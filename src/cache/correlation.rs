//! Correlation Graph Module
//!
//! Weighted, symmetric, decaying graph over cache keys ("entanglement").
//! Edges form when two keys' contexts are judged sufficiently similar, decay
//! over time, and are pruned once their strength falls below a floor.
//!
//! The graph is an adjacency map keyed by string identifiers, never by
//! references: removal and pruning are plain map deletions, which keeps the
//! inherently cyclic structure safe to mutate.

use std::collections::HashMap;

use crate::cache::entry::current_timestamp_ms;

// == Correlation Edge ==
/// One direction of a symmetric correlation between two keys.
#[derive(Debug, Clone)]
pub struct CorrelationEdge {
    /// Strength in [0,1]
    pub strength: f64,
    /// When the edge was first formed (Unix milliseconds)
    pub created_at: u64,
}

// == Correlation Graph ==
/// Symmetric adjacency map over keys.
///
/// Invariant: if an edge a→b exists with strength s, the edge b→a exists
/// with the same strength. Every mutation updates both directions together.
#[derive(Debug, Default)]
pub struct CorrelationGraph {
    adjacency: HashMap<String, HashMap<String, CorrelationEdge>>,
}

impl CorrelationGraph {
    // == Constructor ==
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    // == Link ==
    /// Creates or refreshes the symmetric edge between `a` and `b`.
    ///
    /// Most-recent-wins: an existing edge's strength is replaced, not
    /// averaged, reflecting the latest observed contextual similarity.
    /// Self-links are ignored.
    pub fn link(&mut self, a: &str, b: &str, strength: f64) {
        if a == b {
            return;
        }
        let strength = strength.clamp(0.0, 1.0);
        self.link_directed(a, b, strength);
        self.link_directed(b, a, strength);
    }

    fn link_directed(&mut self, from: &str, to: &str, strength: f64) {
        let edges = self.adjacency.entry(from.to_string()).or_default();
        match edges.get_mut(to) {
            Some(edge) => edge.strength = strength,
            None => {
                edges.insert(
                    to.to_string(),
                    CorrelationEdge {
                        strength,
                        created_at: current_timestamp_ms(),
                    },
                );
            }
        }
    }

    // == Neighbors ==
    /// Returns the keys correlated with `key` and their strengths, strongest
    /// first.
    pub fn neighbors(&self, key: &str) -> Vec<(String, f64)> {
        let mut neighbors: Vec<(String, f64)> = self
            .adjacency
            .get(key)
            .map(|edges| {
                edges
                    .iter()
                    .map(|(k, edge)| (k.clone(), edge.strength))
                    .collect()
            })
            .unwrap_or_default();
        neighbors.sort_by(|a, b| b.1.total_cmp(&a.1));
        neighbors
    }

    // == Decay All ==
    /// Multiplies every edge's strength by `factor`, in place. Symmetric by
    /// construction since both directions are visited.
    pub fn decay_all(&mut self, factor: f64) {
        for edges in self.adjacency.values_mut() {
            for edge in edges.values_mut() {
                edge.strength *= factor;
            }
        }
    }

    // == Prune ==
    /// Removes every edge whose strength has fallen below `threshold`,
    /// dropping keys left with no edges. Returns the number of undirected
    /// edges removed.
    pub fn prune(&mut self, threshold: f64) -> usize {
        let mut removed_directed = 0;
        for edges in self.adjacency.values_mut() {
            let before = edges.len();
            edges.retain(|_, edge| edge.strength >= threshold);
            removed_directed += before - edges.len();
        }
        self.adjacency.retain(|_, edges| !edges.is_empty());
        removed_directed / 2
    }

    // == Remove Key ==
    /// Removes `key` and every edge it participates in (both directions).
    pub fn remove_key(&mut self, key: &str) {
        if let Some(edges) = self.adjacency.remove(key) {
            for neighbor in edges.keys() {
                if let Some(reverse) = self.adjacency.get_mut(neighbor) {
                    reverse.remove(key);
                }
            }
        }
        self.adjacency.retain(|_, edges| !edges.is_empty());
    }

    // == Edge Count ==
    /// Number of undirected edges in the graph.
    pub fn edge_count(&self) -> usize {
        self.adjacency.values().map(|edges| edges.len()).sum::<usize>() / 2
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }

    // == Clear ==
    /// Drops every edge.
    pub fn clear(&mut self) {
        self.adjacency.clear();
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    fn strength(graph: &CorrelationGraph, a: &str, b: &str) -> Option<f64> {
        graph
            .neighbors(a)
            .into_iter()
            .find(|(k, _)| k == b)
            .map(|(_, s)| s)
    }

    #[test]
    fn test_link_is_symmetric() {
        let mut graph = CorrelationGraph::new();
        graph.link("a", "b", 0.9);

        assert_eq!(strength(&graph, "a", "b"), Some(0.9));
        assert_eq!(strength(&graph, "b", "a"), Some(0.9));
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn test_link_most_recent_wins() {
        let mut graph = CorrelationGraph::new();
        graph.link("a", "b", 0.9);
        graph.link("a", "b", 0.75);

        assert_eq!(strength(&graph, "a", "b"), Some(0.75));
        assert_eq!(strength(&graph, "b", "a"), Some(0.75));
    }

    #[test]
    fn test_self_link_ignored() {
        let mut graph = CorrelationGraph::new();
        graph.link("a", "a", 1.0);
        assert!(graph.is_empty());
    }

    #[test]
    fn test_strength_clamped() {
        let mut graph = CorrelationGraph::new();
        graph.link("a", "b", 1.5);
        assert_eq!(strength(&graph, "a", "b"), Some(1.0));
    }

    #[test]
    fn test_neighbors_sorted_strongest_first() {
        let mut graph = CorrelationGraph::new();
        graph.link("a", "b", 0.5);
        graph.link("a", "c", 0.9);
        graph.link("a", "d", 0.7);

        let neighbors = graph.neighbors("a");
        let keys: Vec<&str> = neighbors.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["c", "d", "b"]);
    }

    #[test]
    fn test_neighbors_of_unknown_key_empty() {
        let graph = CorrelationGraph::new();
        assert!(graph.neighbors("missing").is_empty());
    }

    #[test]
    fn test_decay_all_stays_symmetric() {
        let mut graph = CorrelationGraph::new();
        graph.link("a", "b", 1.0);
        graph.decay_all(0.98);

        let ab = strength(&graph, "a", "b").unwrap();
        let ba = strength(&graph, "b", "a").unwrap();
        assert!((ab - 0.98).abs() < 1e-12);
        assert_eq!(ab, ba);
    }

    #[test]
    fn test_prune_removes_weak_edges() {
        let mut graph = CorrelationGraph::new();
        graph.link("a", "b", 0.05);
        graph.link("a", "c", 0.9);

        let removed = graph.prune(0.1);
        assert_eq!(removed, 1);
        assert_eq!(strength(&graph, "a", "b"), None);
        assert_eq!(strength(&graph, "a", "c"), Some(0.9));
        // "b" lost its only edge and no longer appears at all.
        assert!(graph.neighbors("b").is_empty());
    }

    #[test]
    fn test_decay_below_threshold_then_prune() {
        let mut graph = CorrelationGraph::new();
        graph.link("a", "b", 1.0);

        // 0.98^12 < 0.8: twelve ticks take a perfect edge under the strong
        // threshold, and further ticks toward the prune floor.
        for _ in 0..12 {
            graph.decay_all(0.98);
        }
        assert!(strength(&graph, "a", "b").unwrap() < 0.8);

        for _ in 0..100 {
            graph.decay_all(0.98);
        }
        graph.prune(0.1);
        assert!(graph.is_empty());
    }

    #[test]
    fn test_remove_key_cascades_both_directions() {
        let mut graph = CorrelationGraph::new();
        graph.link("a", "b", 0.9);
        graph.link("a", "c", 0.8);
        graph.link("b", "c", 0.7);

        graph.remove_key("a");

        assert!(graph.neighbors("a").is_empty());
        assert_eq!(strength(&graph, "b", "a"), None);
        assert_eq!(strength(&graph, "c", "a"), None);
        // Unrelated edge survives.
        assert_eq!(strength(&graph, "b", "c"), Some(0.7));
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn test_clear() {
        let mut graph = CorrelationGraph::new();
        graph.link("a", "b", 0.9);
        graph.clear();
        assert!(graph.is_empty());
        assert_eq!(graph.edge_count(), 0);
    }
}
