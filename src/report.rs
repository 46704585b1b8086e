//! Console summary comparing both engines on one graph.

use std::fmt;

use crate::graph::NodeId;
use crate::pagerank::PageRankRun;
use crate::surfer::SurferRun;
use crate::topk::{top_k, top_k_scores};

/// Largest per-node gap between normalized surfer visits and PageRank scores.
///
/// Both runs must come from clones of the same graph, so indices line up.
pub fn max_abs_deviation<N: NodeId>(pagerank: &PageRankRun<N>, surfer: &SurferRun<N>) -> f64 {
    pagerank
        .scores()
        .iter()
        .zip(surfer.normalized())
        .map(|(p, s)| (p - s).abs())
        .fold(0.0, f64::max)
}

#[derive(Debug, Clone)]
pub struct SurferEntry<N> {
    pub node: N,
    pub visits: u64,
    pub frequency: f64,
}

/// Snapshot of one graph's ranking, ready for display.
#[derive(Debug, Clone)]
pub struct RankReport<N> {
    pub source: String,
    pub node_count: usize,
    pub edge_count: usize,
    pub dangling_count: usize,
    pub iterations: usize,
    pub converged: bool,
    pub final_delta: f64,
    pub steps: u64,
    pub max_deviation: f64,
    pub pagerank_top: Vec<(N, f64)>,
    pub surfer_top: Vec<SurferEntry<N>>,
}

impl<N: NodeId> RankReport<N> {
    pub fn new(
        source: impl Into<String>,
        pagerank: &PageRankRun<N>,
        surfer: &SurferRun<N>,
        k: usize,
    ) -> Self {
        let graph = pagerank.graph();
        let pagerank_top = top_k(graph, k)
            .into_iter()
            .map(|(id, w)| (id.clone(), w))
            .collect();

        let frequencies = surfer.normalized();
        let surfer_graph = surfer.graph();
        let surfer_top = top_k_scores(&frequencies, k)
            .into_iter()
            .map(|(i, frequency)| SurferEntry {
                node: surfer_graph.ids()[i].clone(),
                visits: surfer.counts()[i],
                frequency,
            })
            .collect();

        Self {
            source: source.into(),
            node_count: graph.node_count(),
            edge_count: graph.edge_count(),
            dangling_count: graph.dangling_indices().len(),
            iterations: pagerank.iterations(),
            converged: pagerank.converged(),
            final_delta: pagerank.final_delta(),
            steps: surfer.steps(),
            max_deviation: max_abs_deviation(pagerank, surfer),
            pagerank_top,
            surfer_top,
        }
    }
}

impl<N: NodeId + fmt::Display> fmt::Display for RankReport<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "== {} ==", self.source)?;
        writeln!(
            f,
            "nodes: {}  edges: {}  dangling: {}",
            self.node_count, self.edge_count, self.dangling_count
        )?;
        let status = if self.converged { "converged" } else { "hit max depth" };
        writeln!(
            f,
            "pagerank: {} iterations ({status}, delta {:.3e})",
            self.iterations, self.final_delta
        )?;
        writeln!(f, "random surfer: {} steps", self.steps)?;
        writeln!(f, "max |pagerank - surfer|: {:.6}", self.max_deviation)?;
        writeln!(f)?;
        writeln!(
            f,
            "{:>4}  {:<24} {:>12}   {:<24} {:>10} {:>12}",
            "rank", "pagerank", "score", "random surfer", "visits", "frequency"
        )?;
        let rows = self.pagerank_top.len().max(self.surfer_top.len());
        for i in 0..rows {
            let (pr_node, pr_score) = match self.pagerank_top.get(i) {
                Some((node, score)) => (node.to_string(), format!("{score:.8}")),
                None => (String::new(), String::new()),
            };
            let (sf_node, visits, freq) = match self.surfer_top.get(i) {
                Some(e) => (e.node.to_string(), e.visits.to_string(), format!("{:.8}", e.frequency)),
                None => (String::new(), String::new(), String::new()),
            };
            writeln!(
                f,
                "{:>4}  {:<24} {:>12}   {:<24} {:>10} {:>12}",
                i + 1,
                pr_node,
                pr_score,
                sf_node,
                visits,
                freq
            )?;
        }
        Ok(())
    }
}
