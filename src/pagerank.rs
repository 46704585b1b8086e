//! PageRank by synchronous power iteration.
//!
//! Every iteration reads a frozen `previous` buffer and writes a separate `next` buffer;
//! the buffers swap only after every node has been computed.
//!
//! With `m = damping` and `n` nodes:
//! \[
//!   w'(v) = (1 - m) \sum_{p \to v} \frac{w(p)}{\deg^+(p)} + \frac{1 - m}{n} \sum_{d \text{ dangling}} w(d) + \frac{m}{n}
//! \]

use tracing::{debug, info, instrument, warn};

use crate::config::RankConfig;
use crate::graph::{LinkGraph, NodeId, ReverseView};
use crate::{Error, Result};

/// Outcome of a PageRank run.
#[derive(Debug, Clone)]
pub struct PageRankRun<N> {
    graph: LinkGraph<N>,
    iterations: usize,
    converged: bool,
    deltas: Vec<f64>,
}

impl<N: NodeId> PageRankRun<N> {
    /// The ranked graph; weights are the PageRank scores.
    pub fn graph(&self) -> &LinkGraph<N> {
        &self.graph
    }

    pub fn into_graph(self) -> LinkGraph<N> {
        self.graph
    }

    /// Iteration at which the tolerance was met, or `max_depth` if it never was.
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    pub fn converged(&self) -> bool {
        self.converged
    }

    /// Mean absolute change of each completed iteration, in order.
    pub fn deltas(&self) -> &[f64] {
        &self.deltas
    }

    pub fn final_delta(&self) -> f64 {
        self.deltas.last().copied().unwrap_or(0.0)
    }

    pub fn scores(&self) -> Vec<f64> {
        self.graph.weights()
    }
}

/// Rank `graph` by power iteration.
///
/// Fails with [`Error::InvalidParameter`] before touching the graph if `config` is invalid,
/// and with [`Error::EmptyGraph`] if there are no nodes. Hitting `max_depth` is not an error.
#[instrument(level = "debug", skip_all, fields(nodes = graph.node_count(), edges = graph.edge_count()))]
pub fn pagerank<N: NodeId>(mut graph: LinkGraph<N>, config: &RankConfig) -> Result<PageRankRun<N>> {
    config.validate()?;
    let n = graph.node_count();
    if n == 0 {
        return Err(Error::EmptyGraph);
    }

    let n_f64 = n as f64;
    let uniform = 1.0 / n_f64;
    let follow = 1.0 - config.damping;
    let teleport = config.damping * uniform;

    graph.fill_weights(uniform);
    let inv_out_degree: Vec<f64> = graph
        .records()
        .iter()
        .map(|r| if r.is_dangling() { 0.0 } else { 1.0 / r.out_degree() as f64 })
        .collect();

    let mut previous = graph.weights();
    let mut next = vec![0.0; n];
    let mut deltas = Vec::new();
    let mut iterations = config.max_depth;
    let mut converged = false;

    {
        let reverse = graph.reverse_view();
        let dangling = graph.dangling_indices();

        for step in 1..=config.max_depth {
            let dangling_mass: f64 = dangling.iter().map(|&d| previous[d]).sum();
            let base = follow * uniform * dangling_mass + teleport;

            propagate(reverse, &previous, &inv_out_degree, follow, base, &mut next);

            let delta = previous
                .iter()
                .zip(next.iter())
                .map(|(old, new)| (old - new).abs())
                .sum::<f64>()
                / n_f64;
            deltas.push(delta);
            std::mem::swap(&mut previous, &mut next);
            debug!(step, delta, "pagerank iteration");

            if delta < config.tolerance {
                iterations = step;
                converged = true;
                break;
            }
        }
    }

    graph.publish_weights(&previous);

    if converged {
        info!(iterations, delta = deltas.last().copied().unwrap_or(0.0), "pagerank converged");
    } else {
        warn!(
            max_depth = config.max_depth,
            delta = deltas.last().copied().unwrap_or(0.0),
            "pagerank stopped at max_depth without converging"
        );
    }

    Ok(PageRankRun { graph, iterations, converged, deltas })
}

/// `next[v] = follow * sum(previous[p] / deg(p)) + base` for every `v`, reading only `previous`.
#[cfg(not(feature = "parallel"))]
fn propagate(
    reverse: &ReverseView,
    previous: &[f64],
    inv_out_degree: &[f64],
    follow: f64,
    base: f64,
    next: &mut [f64],
) {
    for (v, slot) in next.iter_mut().enumerate() {
        *slot = follow * incoming(reverse, previous, inv_out_degree, v) + base;
    }
}

#[cfg(feature = "parallel")]
fn propagate(
    reverse: &ReverseView,
    previous: &[f64],
    inv_out_degree: &[f64],
    follow: f64,
    base: f64,
    next: &mut [f64],
) {
    use rayon::prelude::*;

    next.par_iter_mut().enumerate().for_each(|(v, slot)| {
        *slot = follow * incoming(reverse, previous, inv_out_degree, v) + base;
    });
}

#[inline]
fn incoming(reverse: &ReverseView, previous: &[f64], inv_out_degree: &[f64], v: usize) -> f64 {
    reverse
        .predecessors(v)
        .iter()
        .map(|&p| previous[p] * inv_out_degree[p])
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> RankConfig {
        RankConfig::default().with_tolerance(1e-12).with_max_depth(500)
    }

    #[test]
    fn three_cycle_is_uniform_immediately() {
        let g = LinkGraph::from_edges([("A", "B"), ("B", "C"), ("C", "A")]);
        let run = pagerank(g, &RankConfig::default()).unwrap();
        assert!(run.converged());
        assert!(run.iterations() <= 3, "iterations={}", run.iterations());
        for id in ["A", "B", "C"] {
            let w = run.graph().weight(&id).unwrap();
            assert!((w - 1.0 / 3.0).abs() < 1e-9, "{id}={w}");
        }
    }

    #[test]
    fn two_node_sink_matches_closed_form() {
        // a -> b, b dangling. Fixed point: w(a) = 1 / (3 - m), w(b) = (2 - m) / (3 - m).
        let config = cfg();
        let m = config.damping;
        let g = LinkGraph::from_edges([("a", "b")]);
        let run = pagerank(g, &config).unwrap();
        assert!(run.converged());
        let a = run.graph().weight(&"a").unwrap();
        let b = run.graph().weight(&"b").unwrap();
        assert!((a - 1.0 / (3.0 - m)).abs() < 1e-9, "a={a}");
        assert!((b - (2.0 - m) / (3.0 - m)).abs() < 1e-9, "b={b}");
        assert!((a + b - 1.0).abs() < 1e-12);
    }

    #[test]
    fn fully_dangling_graph_converges_in_one_iteration() {
        let mut b = crate::GraphBuilder::new();
        for id in 0..5u32 {
            b.add_node(id);
        }
        let run = pagerank(b.build(), &RankConfig::default()).unwrap();
        assert!(run.converged());
        assert_eq!(run.iterations(), 1);
        assert!(run.scores().iter().all(|&w| (w - 0.2).abs() < 1e-15));
    }

    #[test]
    fn empty_graph_is_rejected() {
        let g: LinkGraph<String> = crate::GraphBuilder::new().build();
        assert!(matches!(pagerank(g, &RankConfig::default()), Err(Error::EmptyGraph)));
    }

    #[test]
    fn invalid_config_fails_before_any_work() {
        let g: LinkGraph<String> = crate::GraphBuilder::new().build();
        // Validation runs first, so even an empty graph reports the parameter problem.
        let config = RankConfig::default().with_damping(1.2);
        assert!(matches!(pagerank(g, &config), Err(Error::InvalidParameter(_))));
    }

    #[test]
    fn hitting_max_depth_reports_cap() {
        let g = LinkGraph::from_edges([(0, 1), (1, 2), (2, 0), (0, 2)]);
        let config = RankConfig::default().with_max_depth(2).with_tolerance(1e-15);
        let run = pagerank(g, &config).unwrap();
        assert!(!run.converged());
        assert_eq!(run.iterations(), 2);
        assert_eq!(run.deltas().len(), 2);
        let total: f64 = run.scores().iter().sum();
        assert!((total - 1.0).abs() < 1e-12);
    }

    #[test]
    fn sink_hub_outranks_sources() {
        // Everyone links to `hub`, which links nowhere.
        let g = LinkGraph::from_edges([("x", "hub"), ("y", "hub"), ("z", "hub"), ("x", "y")]);
        let run = pagerank(g, &cfg()).unwrap();
        let hub = run.graph().weight(&"hub").unwrap();
        for id in ["x", "y", "z"] {
            assert!(hub > run.graph().weight(&id).unwrap());
        }
        let total: f64 = run.scores().iter().sum();
        assert!((total - 1.0).abs() < 1e-9);
    }
}
