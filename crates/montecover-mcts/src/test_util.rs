use montecover_graph::Graph;
use proptest::prelude::*;

pub fn triangle() -> Graph {
    let mut g = Graph::new(3);
    g.add_edge(0, 1).unwrap();
    g.add_edge(1, 2).unwrap();
    g.add_edge(0, 2).unwrap();
    g
}

/// Path 0-1-…-(n−1).
pub fn path(n: usize) -> Graph {
    let mut g = Graph::new(n);
    for v in 0..n.saturating_sub(1) {
        g.add_edge(v, v + 1).unwrap();
    }
    g
}

/// Star centred at 0 with the given number of leaves.
pub fn star(leaves: usize) -> Graph {
    let mut g = Graph::new(leaves + 1);
    for v in 1..=leaves {
        g.add_edge(0, v).unwrap();
    }
    g
}

pub fn cycle(n: usize) -> Graph {
    let mut g = Graph::new(n);
    for v in 0..n {
        g.add_edge(v, (v + 1) % n).unwrap();
    }
    g
}

/// k independent edges: (0,1), (2,3), …
pub fn disjoint_edges(k: usize) -> Graph {
    let mut g = Graph::new(2 * k);
    for i in 0..k {
        g.add_edge(2 * i, 2 * i + 1).unwrap();
    }
    g
}

pub fn complete(n: usize) -> Graph {
    let mut g = Graph::new(n);
    for u in 0..n {
        for v in (u + 1)..n {
            g.add_edge(u, v).unwrap();
        }
    }
    g
}

pub fn empty(n: usize) -> Graph {
    Graph::new(n)
}

/// Random simple-ish graph for property tests (multi-edges allowed, no
/// self-loops).
pub fn arbitrary_graph(max_n: usize) -> impl Strategy<Value = Graph> {
    (
        2usize..max_n,
        proptest::collection::vec((0usize..32, 0usize..32), 0..40),
    )
        .prop_map(|(n, pairs)| {
            let mut g = Graph::new(n);
            for (u, v) in pairs {
                let (u, v) = (u % n, v % n);
                if u != v {
                    g.add_edge(u, v).unwrap();
                }
            }
            g
        })
}
