//! Adjacency-list text format.
//!
//! ```text
//! # comment
//! a b c      # a -> b, a -> c
//! b c
//! d          # d has no out-links
//! ```
//!
//! The first whitespace-separated token of a line is the source node, the rest are its
//! successors. `#` starts a comment that runs to end of line.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::debug;

use crate::graph::{GraphBuilder, LinkGraph};
use crate::Result;

fn parse_line(builder: &mut GraphBuilder<String>, line: &str) {
    let content = line.split('#').next().unwrap_or("");
    let mut tokens = content.split_whitespace();
    let Some(source) = tokens.next() else {
        return;
    };
    builder.add_node(source.to_owned());
    for target in tokens {
        builder.add_edge(source.to_owned(), target.to_owned());
    }
}

pub fn parse_adjlist(text: &str) -> LinkGraph<String> {
    let mut builder = GraphBuilder::new();
    for line in text.lines() {
        parse_line(&mut builder, line);
    }
    builder.build()
}

pub fn read_adjlist<R: BufRead>(reader: R) -> Result<LinkGraph<String>> {
    let mut builder = GraphBuilder::new();
    for line in reader.lines() {
        parse_line(&mut builder, &line?);
    }
    Ok(builder.build())
}

pub fn load_adjlist(path: impl AsRef<Path>) -> Result<LinkGraph<String>> {
    let path = path.as_ref();
    let graph = read_adjlist(BufReader::new(File::open(path)?))?;
    debug!(
        path = %path.display(),
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "loaded adjacency list"
    );
    Ok(graph)
}
