//! `linkrank`: global importance ranking for directed link graphs.
//!
//! Two independent estimators of the same quantity, the stationary distribution of a
//! random walk with restart:
//! - [`pagerank()`]: deterministic power iteration with dangling-mass redistribution.
//! - [`random_surfer()`]: Monte-Carlo simulation of the walk itself.
//!
//! Public invariants (must not drift):
//! - **Node order**: nodes keep their discovery order; ties in [`top_k`] resolve by it.
//! - **Ownership**: each engine consumes its own [`LinkGraph`]; clone before handing the same
//!   graph to both.
//! - **Determinism**: PageRank is deterministic; the surfer is deterministic given a seed.
//! - **Mass**: PageRank weights sum to 1; surfer counts sum to the step count.

pub mod adjlist;
pub mod config;
pub mod export;
pub mod graph;
pub mod pagerank;
pub mod report;
pub mod surfer;
pub mod topk;

pub use adjlist::{load_adjlist, parse_adjlist, read_adjlist};
pub use config::RankConfig;
pub use export::{save_csv, write_csv};
pub use graph::{GraphBuilder, LinkGraph, NodeId, NodeRecord, ReverseView};
pub use pagerank::{pagerank, PageRankRun};
pub use report::{max_abs_deviation, RankReport, SurferEntry};
pub use surfer::{random_surfer, random_surfer_with_rng, SurferRun};
pub use topk::{normalize, ranking, top_k, top_k_scores};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("graph has no nodes")]
    EmptyGraph,
    #[error("unknown node: {0}")]
    UnknownNode(String),
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("config error: {0}")]
    Config(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
