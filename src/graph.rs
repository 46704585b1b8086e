//! Directed link graph with per-node rank attributes.
//!
//! Construction goes through [`GraphBuilder`]; [`GraphBuilder::build`] freezes the edge set
//! into a [`LinkGraph`]. From then on only node weights can change, so the cached
//! out-degrees, the dangling list and the [`ReverseView`] stay consistent with the edges.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::hash::Hash;
use std::sync::OnceLock;

use crate::{Error, Result};

/// Identifier bound for graph nodes.
pub trait NodeId: Clone + Eq + Hash + fmt::Debug {}

impl<T: Clone + Eq + Hash + fmt::Debug> NodeId for T {}

/// Fixed per-node attributes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeRecord {
    weight: f64,
    out_degree: usize,
}

impl NodeRecord {
    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn out_degree(&self) -> usize {
        self.out_degree
    }

    pub fn is_dangling(&self) -> bool {
        self.out_degree == 0
    }
}

/// Mutable graph under construction.
///
/// Nodes are numbered in discovery order. Edges are a set: adding `u -> v` twice is a no-op.
#[derive(Debug, Clone)]
pub struct GraphBuilder<N> {
    ids: Vec<N>,
    index: HashMap<N, usize>,
    succ: Vec<Vec<usize>>,
    edges: HashSet<(usize, usize)>,
}

impl<N: NodeId> Default for GraphBuilder<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N: NodeId> GraphBuilder<N> {
    pub fn new() -> Self {
        Self {
            ids: Vec::new(),
            index: HashMap::new(),
            succ: Vec::new(),
            edges: HashSet::new(),
        }
    }

    /// Insert `id` if absent; returns its index either way.
    pub fn add_node(&mut self, id: N) -> usize {
        if let Some(&idx) = self.index.get(&id) {
            return idx;
        }
        let idx = self.ids.len();
        self.index.insert(id.clone(), idx);
        self.ids.push(id);
        self.succ.push(Vec::new());
        idx
    }

    /// Insert the edge `from -> to`, creating either endpoint if needed.
    ///
    /// Returns `false` when the edge was already present.
    pub fn add_edge(&mut self, from: N, to: N) -> bool {
        let u = self.add_node(from);
        let v = self.add_node(to);
        if !self.edges.insert((u, v)) {
            return false;
        }
        self.succ[u].push(v);
        true
    }

    pub fn node_count(&self) -> usize {
        self.ids.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Freeze the edge set. All weights start at 0.
    pub fn build(self) -> LinkGraph<N> {
        let nodes: Vec<NodeRecord> = self
            .succ
            .iter()
            .map(|s| NodeRecord { weight: 0.0, out_degree: s.len() })
            .collect();
        let dangling = nodes
            .iter()
            .enumerate()
            .filter(|(_, r)| r.is_dangling())
            .map(|(i, _)| i)
            .collect();
        LinkGraph {
            ids: self.ids,
            index: self.index,
            succ: self.succ,
            nodes,
            dangling,
            edge_count: self.edges.len(),
            reverse: OnceLock::new(),
        }
    }
}

/// Predecessor index in CSR layout: node `v`'s predecessors are
/// `preds[offsets[v]..offsets[v + 1]]`.
#[derive(Debug, Clone)]
pub struct ReverseView {
    offsets: Vec<usize>,
    preds: Vec<usize>,
}

impl ReverseView {
    fn build(succ: &[Vec<usize>]) -> Self {
        let n = succ.len();
        let mut in_degree = vec![0usize; n];
        for targets in succ {
            for &v in targets {
                in_degree[v] += 1;
            }
        }
        let mut offsets = Vec::with_capacity(n + 1);
        let mut running = 0usize;
        offsets.push(running);
        for d in &in_degree {
            running += d;
            offsets.push(running);
        }
        let mut cursor = offsets[..n].to_vec();
        let mut preds = vec![0usize; offsets[n]];
        // Sources are visited in index order, so each slice comes out sorted.
        for (u, targets) in succ.iter().enumerate() {
            for &v in targets {
                preds[cursor[v]] = u;
                cursor[v] += 1;
            }
        }
        Self { offsets, preds }
    }

    pub fn node_count(&self) -> usize {
        self.offsets.len() - 1
    }

    /// Predecessors of node index `v`, ascending.
    pub fn predecessors(&self, v: usize) -> &[usize] {
        &self.preds[self.offsets[v]..self.offsets[v + 1]]
    }

    pub fn in_degree(&self, v: usize) -> usize {
        self.offsets[v + 1] - self.offsets[v]
    }
}

/// Frozen directed graph. Edges are immutable; node weights are not.
#[derive(Debug, Clone)]
pub struct LinkGraph<N> {
    ids: Vec<N>,
    index: HashMap<N, usize>,
    succ: Vec<Vec<usize>>,
    nodes: Vec<NodeRecord>,
    dangling: Vec<usize>,
    edge_count: usize,
    reverse: OnceLock<ReverseView>,
}

impl<N: NodeId> LinkGraph<N> {
    /// Build from an edge list. Nodes are discovered in edge order.
    pub fn from_edges<I>(edges: I) -> Self
    where
        I: IntoIterator<Item = (N, N)>,
    {
        let mut builder = GraphBuilder::new();
        for (u, v) in edges {
            builder.add_edge(u, v);
        }
        builder.build()
    }

    pub fn node_count(&self) -> usize {
        self.ids.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn contains(&self, id: &N) -> bool {
        self.index.contains_key(id)
    }

    /// Node identifiers in discovery order.
    pub fn ids(&self) -> &[N] {
        &self.ids
    }

    pub fn index_of(&self, id: &N) -> Result<usize> {
        self.index
            .get(id)
            .copied()
            .ok_or_else(|| Error::UnknownNode(format!("{id:?}")))
    }

    pub fn node_id(&self, idx: usize) -> Option<&N> {
        self.ids.get(idx)
    }

    pub fn record(&self, id: &N) -> Result<&NodeRecord> {
        let idx = self.index_of(id)?;
        Ok(&self.nodes[idx])
    }

    /// Records in discovery order, aligned with [`LinkGraph::ids`].
    pub fn records(&self) -> &[NodeRecord] {
        &self.nodes
    }

    /// Successor identifiers of `id`. Empty iff `id` is dangling.
    pub fn successors(&self, id: &N) -> Result<impl ExactSizeIterator<Item = &N> + '_> {
        let idx = self.index_of(id)?;
        Ok(self.succ[idx].iter().map(move |&v| &self.ids[v]))
    }

    /// Successor indices of node index `idx`.
    pub fn out_neighbors(&self, idx: usize) -> &[usize] {
        &self.succ[idx]
    }

    pub fn out_degree(&self, id: &N) -> Result<usize> {
        Ok(self.record(id)?.out_degree)
    }

    pub fn is_dangling(&self, id: &N) -> Result<bool> {
        Ok(self.record(id)?.is_dangling())
    }

    /// Dangling nodes in discovery order.
    pub fn dangling_nodes(&self) -> impl ExactSizeIterator<Item = &N> + '_ {
        self.dangling.iter().map(move |&i| &self.ids[i])
    }

    pub fn dangling_indices(&self) -> &[usize] {
        &self.dangling
    }

    /// Predecessor index, built on first use and cached for the graph's lifetime.
    pub fn reverse_view(&self) -> &ReverseView {
        self.reverse.get_or_init(|| ReverseView::build(&self.succ))
    }

    pub fn weight(&self, id: &N) -> Result<f64> {
        Ok(self.record(id)?.weight)
    }

    pub fn set_weight(&mut self, id: &N, value: f64) -> Result<()> {
        let idx = self.index_of(id)?;
        self.nodes[idx].weight = value;
        Ok(())
    }

    /// Weights in discovery order.
    pub fn weights(&self) -> Vec<f64> {
        self.nodes.iter().map(|r| r.weight).collect()
    }

    pub fn fill_weights(&mut self, value: f64) {
        for r in &mut self.nodes {
            r.weight = value;
        }
    }

    /// Overwrite every weight from a per-index slice.
    pub(crate) fn publish_weights(&mut self, weights: &[f64]) {
        debug_assert_eq!(weights.len(), self.nodes.len());
        for (r, &w) in self.nodes.iter_mut().zip(weights) {
            r.weight = w;
        }
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&N, &NodeRecord)> + '_ {
        self.ids.iter().zip(self.nodes.iter())
    }
}

/// Node weights of a petgraph graph are used as identifiers; nodes with equal weights merge.
#[cfg(feature = "petgraph")]
impl<N, E, Ix> From<&petgraph::Graph<N, E, petgraph::Directed, Ix>> for LinkGraph<N>
where
    N: NodeId,
    Ix: petgraph::graph::IndexType,
{
    fn from(graph: &petgraph::Graph<N, E, petgraph::Directed, Ix>) -> Self {
        let mut builder = GraphBuilder::new();
        for idx in graph.node_indices() {
            builder.add_node(graph[idx].clone());
        }
        for edge in graph.raw_edges() {
            builder.add_edge(graph[edge.source()].clone(), graph[edge.target()].clone());
        }
        builder.build()
    }
}
