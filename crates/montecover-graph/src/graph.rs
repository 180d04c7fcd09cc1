use std::fmt;

use thiserror::Error;

// ---------------------------------------------------------------------------
// GraphError — input-boundary failures
// ---------------------------------------------------------------------------

/// Construction errors. Indices come from untrusted input files, so edge
/// insertion is fallible; all post-construction access panics on misuse
/// instead.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GraphError {
    #[error("vertex index {index} out of range for graph with {num_vertices} vertices")]
    InvalidIndex { index: usize, num_vertices: usize },

    #[error("self-loop on vertex {0}")]
    SelfLoop(usize),
}

// ---------------------------------------------------------------------------
// Graph
// ---------------------------------------------------------------------------

/// Immutable undirected graph: adjacency lists plus per-vertex weights.
///
/// Every edge appears in both endpoints' lists. Duplicate insertions are
/// kept as multi-edges — the loader preserves whatever the input file says,
/// and residual-degree computations count occurrences consistently.
/// Weights default to 1 and are only consulted by the oracle.
#[derive(Clone, Debug)]
pub struct Graph {
    num_vertices: usize,
    adjacency: Vec<Vec<usize>>,
    weights: Vec<u64>,
}

impl Graph {
    pub fn new(num_vertices: usize) -> Self {
        Self {
            num_vertices,
            adjacency: vec![Vec::new(); num_vertices],
            weights: vec![1; num_vertices],
        }
    }

    /// Append `v` to `adj[u]` and `u` to `adj[v]`. No dedup: at most one
    /// insertion per edge is the caller's contract.
    pub fn add_edge(&mut self, u: usize, v: usize) -> Result<(), GraphError> {
        let n = self.num_vertices;
        for index in [u, v] {
            if index >= n {
                return Err(GraphError::InvalidIndex {
                    index,
                    num_vertices: n,
                });
            }
        }
        if u == v {
            return Err(GraphError::SelfLoop(u));
        }
        self.adjacency[u].push(v);
        self.adjacency[v].push(u);
        Ok(())
    }

    pub fn num_vertices(&self) -> usize {
        self.num_vertices
    }

    pub fn adj(&self, v: usize) -> &[usize] {
        &self.adjacency[v]
    }

    pub fn degree(&self, v: usize) -> usize {
        self.adjacency[v].len()
    }

    pub fn weight(&self, v: usize) -> u64 {
        self.weights[v]
    }

    pub fn set_weight(&mut self, v: usize, w: u64) {
        self.weights[v] = w;
    }

    pub fn total_weight(&self) -> u64 {
        self.weights.iter().sum()
    }

    /// Edge count; each adjacency entry is half an edge, so multi-edges
    /// count per occurrence.
    pub fn num_edges(&self) -> usize {
        self.adjacency.iter().map(Vec::len).sum::<usize>() / 2
    }

    /// Undirected edge list with `u < v`, multi-edges preserved.
    pub fn edges(&self) -> Vec<(usize, usize)> {
        let mut edges = Vec::with_capacity(self.num_edges());
        for u in 0..self.num_vertices {
            for &v in &self.adjacency[u] {
                if u < v {
                    edges.push((u, v));
                }
            }
        }
        edges
    }
}

impl fmt::Display for Graph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "graph with {} vertices:", self.num_vertices)?;
        for v in 0..self.num_vertices {
            write!(f, "  {} (weight {}):", v, self.weights[v])?;
            for &u in &self.adjacency[v] {
                write!(f, " {u}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
