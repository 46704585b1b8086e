//! Random-surfer simulation.
//!
//! A single walk of `surfer_multiplier * n` steps. Each step teleports to a uniform node
//! with probability `damping`, otherwise follows a uniform out-link; a dangling node always
//! teleports. The node occupied after each step gets one visit.

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use tracing::{info, instrument};

use crate::config::RankConfig;
use crate::graph::{LinkGraph, NodeId};
use crate::topk::normalize;
use crate::{Error, Result};

/// Outcome of a random-surfer run.
#[derive(Debug, Clone)]
pub struct SurferRun<N> {
    graph: LinkGraph<N>,
    steps: u64,
    counts: Vec<u64>,
}

impl<N: NodeId> SurferRun<N> {
    /// The ranked graph; weights are visit counts.
    pub fn graph(&self) -> &LinkGraph<N> {
        &self.graph
    }

    pub fn into_graph(self) -> LinkGraph<N> {
        self.graph
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Visit counts in discovery order. Sums to [`SurferRun::steps`].
    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    /// Visit frequencies, comparable with PageRank scores.
    pub fn normalized(&self) -> Vec<f64> {
        let mut freq: Vec<f64> = self.counts.iter().map(|&c| c as f64).collect();
        normalize(&mut freq);
        freq
    }
}

/// Simulate the walk with a generator seeded from `config.seed`, or from the thread RNG
/// when unset.
pub fn random_surfer<N: NodeId>(graph: LinkGraph<N>, config: &RankConfig) -> Result<SurferRun<N>> {
    let mut rng = match config.seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_rng(&mut rand::rng()),
    };
    random_surfer_with_rng(graph, config, &mut rng)
}

/// Simulate the walk with a caller-supplied generator. `config.seed` is ignored.
#[instrument(level = "debug", skip_all, fields(nodes = graph.node_count()))]
pub fn random_surfer_with_rng<N: NodeId, R: Rng + ?Sized>(
    mut graph: LinkGraph<N>,
    config: &RankConfig,
    rng: &mut R,
) -> Result<SurferRun<N>> {
    config.validate()?;
    let n = graph.node_count();
    if n == 0 {
        return Err(Error::EmptyGraph);
    }
    let steps = (config.surfer_multiplier as u64)
        .checked_mul(n as u64)
        .ok_or_else(|| {
            Error::InvalidParameter(format!(
                "surfer_multiplier {} overflows the step count for {n} nodes",
                config.surfer_multiplier
            ))
        })?;

    let mut counts = vec![0u64; n];
    let mut current = rng.random_range(0..n);
    for _ in 0..steps {
        let r: f64 = rng.random();
        let followed = if r > config.damping {
            graph.out_neighbors(current).choose(rng).copied()
        } else {
            None
        };
        // Teleport, or a dangling node with nowhere to go.
        current = match followed {
            Some(next) => next,
            None => rng.random_range(0..n),
        };
        counts[current] += 1;
    }

    let weights: Vec<f64> = counts.iter().map(|&c| c as f64).collect();
    graph.publish_weights(&weights);
    info!(steps, "random surfer finished");

    Ok(SurferRun { graph, steps, counts })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded(seed: u64) -> RankConfig {
        RankConfig::default().with_seed(seed).with_surfer_multiplier(200)
    }

    #[test]
    fn counts_sum_to_step_budget() {
        let g = LinkGraph::from_edges([(0, 1), (1, 2), (2, 0), (2, 3)]);
        let run = random_surfer(g, &seeded(1)).unwrap();
        assert_eq!(run.steps(), 200 * 4);
        assert_eq!(run.counts().iter().sum::<u64>(), run.steps());
        let weight_total: f64 = run.graph().weights().iter().sum();
        assert_eq!(weight_total, run.steps() as f64);
    }

    #[test]
    fn same_seed_same_counts() {
        let g = LinkGraph::from_edges([("a", "b"), ("b", "c"), ("c", "a"), ("a", "c")]);
        let a = random_surfer(g.clone(), &seeded(99)).unwrap();
        let b = random_surfer(g, &seeded(99)).unwrap();
        assert_eq!(a.counts(), b.counts());
    }

    #[test]
    fn caller_rng_is_used() {
        let g = LinkGraph::from_edges([(0, 1), (1, 0)]);
        let config = RankConfig::default().with_surfer_multiplier(50);
        let mut r1 = ChaCha8Rng::seed_from_u64(5);
        let mut r2 = ChaCha8Rng::seed_from_u64(5);
        let a = random_surfer_with_rng(g.clone(), &config, &mut r1).unwrap();
        let b = random_surfer_with_rng(g, &config, &mut r2).unwrap();
        assert_eq!(a.counts(), b.counts());
    }

    #[test]
    fn dangling_sink_does_not_trap_the_walk() {
        // Without the dangling jump, every visit after the first would land on `sink`.
        let g = LinkGraph::from_edges([("a", "sink"), ("b", "sink")]);
        let run = random_surfer(g, &seeded(3)).unwrap();
        assert!(run.counts().iter().all(|&c| c > 0), "counts={:?}", run.counts());
    }

    #[test]
    fn normalized_sums_to_one() {
        let g = LinkGraph::from_edges([(0, 1), (1, 2)]);
        let run = random_surfer(g, &seeded(11)).unwrap();
        let total: f64 = run.normalized().iter().sum();
        assert!((total - 1.0).abs() < 1e-12);
    }

    #[test]
    fn empty_graph_is_rejected() {
        let g: LinkGraph<u32> = crate::GraphBuilder::new().build();
        assert!(matches!(random_surfer(g, &seeded(0)), Err(Error::EmptyGraph)));
    }

    #[test]
    fn step_count_overflow_is_invalid() {
        let g = LinkGraph::from_edges([(0, 1), (1, 0), (1, 2)]);
        let config = RankConfig::default().with_surfer_multiplier(usize::MAX);
        // usize::MAX * 3 overflows u64 on 64-bit targets.
        if (usize::MAX as u64).checked_mul(3).is_none() {
            assert!(matches!(random_surfer(g, &config), Err(Error::InvalidParameter(_))));
        }
    }
}
