//! Ranking utilities.

use ordered_float::OrderedFloat;
use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::graph::{LinkGraph, NodeId};

/// Heap key: higher score first, then lower index (earlier discovery) first.
type Key = (OrderedFloat<f64>, Reverse<usize>);

/// The `k` highest scores as `(index, score)`, non-increasing, ties by ascending index.
pub fn top_k_scores(scores: &[f64], k: usize) -> Vec<(usize, f64)> {
    if k == 0 || scores.is_empty() { return Vec::new(); }
    let mut heap: BinaryHeap<Reverse<Key>> = BinaryHeap::with_capacity(k.min(scores.len()) + 1);
    for (i, &score) in scores.iter().enumerate() {
        let key = (OrderedFloat(score), Reverse(i));
        if heap.len() < k {
            heap.push(Reverse(key));
        } else if let Some(&Reverse(worst)) = heap.peek() {
            if key > worst {
                heap.pop();
                heap.push(Reverse(key));
            }
        }
    }
    let mut keys: Vec<Key> = heap.into_iter().map(|Reverse(key)| key).collect();
    keys.sort_unstable_by(|a, b| b.cmp(a));
    keys.into_iter().map(|(s, Reverse(i))| (i, s.into_inner())).collect()
}

/// The `k` heaviest nodes of `graph`. Returns every node when `k >= node_count`.
pub fn top_k<N: NodeId>(graph: &LinkGraph<N>, k: usize) -> Vec<(&N, f64)> {
    let weights = graph.weights();
    top_k_scores(&weights, k)
        .into_iter()
        .map(|(i, w)| (&graph.ids()[i], w))
        .collect()
}

/// Every node, heaviest first.
pub fn ranking<N: NodeId>(graph: &LinkGraph<N>) -> Vec<(&N, f64)> {
    top_k(graph, graph.node_count())
}

pub fn normalize(scores: &mut [f64]) {
    let sum: f64 = scores.iter().sum();
    if sum > 0.0 {
        for s in scores { *s /= sum; }
    }
}
