use std::fs;
use std::path::Path;

use regex::Regex;
use thiserror::Error;

use crate::graph::{Graph, GraphError};

// ---------------------------------------------------------------------------
// LoadError
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read graph file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("num_vertices not found in {0}")]
    MissingNumVertices(String),

    #[error("bad edge in {path}: {source}")]
    Graph {
        path: String,
        source: GraphError,
    },
}

// ---------------------------------------------------------------------------
// load_graph
// ---------------------------------------------------------------------------

/// Load a graph from a `{"num_vertices": N, "edges": [[u, v], ...]}` file.
///
/// The parser is regex-tolerant rather than a strict JSON reader: it takes
/// the first `"num_vertices": N` match and every `[int, int]` occurrence as
/// an edge. Duplicate pairs are kept as multi-edges.
pub fn load_graph(path: impl AsRef<Path>) -> Result<Graph, LoadError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.display().to_string(),
        source,
    })?;

    let re_n = Regex::new(r#""num_vertices"\s*:\s*(\d+)"#).expect("static regex");
    let n: usize = re_n
        .captures(&text)
        .and_then(|c| c[1].parse().ok())
        .ok_or_else(|| LoadError::MissingNumVertices(path.display().to_string()))?;

    let mut graph = Graph::new(n);
    let re_edge = Regex::new(r"\[\s*(\d+)\s*,\s*(\d+)\s*\]").expect("static regex");
    for cap in re_edge.captures_iter(&text) {
        let (u, v): (usize, usize) = match (cap[1].parse(), cap[2].parse()) {
            (Ok(u), Ok(v)) => (u, v),
            // Overflowing digit runs are not vertex indices; skip like any
            // other non-matching text.
            _ => continue,
        };
        graph.add_edge(u, v).map_err(|source| LoadError::Graph {
            path: path.display().to_string(),
            source,
        })?;
    }
    Ok(graph)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
