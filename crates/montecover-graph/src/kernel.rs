use crate::graph::Graph;
use crate::matching::{hopcroft_karp, koenig_cover, Bipartite};
use crate::state::State;

// ---------------------------------------------------------------------------
// reduce_once — one rule application
// ---------------------------------------------------------------------------

/// Apply at most one reduction rule to `state` and report whether anything
/// changed. Rules are tried in a fixed order on the live subgraph:
///
/// 1. isolated — a live vertex with no live neighbour covers nothing.
/// 2. pendant — a pendant edge is always coverable by the pendant's
///    neighbour; the scan runs ascending over the vertex being included.
/// 3. high-degree — a live vertex with more than `best` live neighbours
///    must be in any cover smaller than `best`.
/// 4. crown — Nemhauser–Trotter decomposition over the bipartite double
///    cover; commits the provably-in vertices and drops the provably-out
///    ones in a single application.
///
/// Every successful application strictly shrinks `possible`, so looping to
/// a fixed point takes at most N applications.
pub fn reduce_once(graph: &Graph, state: &mut State, best: usize) -> bool {
    if state.possible_count() == 0 {
        return false;
    }

    let n = graph.num_vertices();
    let mut live_deg = vec![0usize; n];
    for v in 0..n {
        if state.is_live(v) {
            live_deg[v] = state.live_degree(graph, v);
        }
    }

    // Rule 1: isolated.
    for v in 0..n {
        if state.is_live(v) && live_deg[v] == 0 {
            state.exclude(v);
            return true;
        }
    }

    // Rule 2: pendant. `u` is the neighbour that gets committed.
    for u in 0..n {
        if !state.is_live(u) {
            continue;
        }
        let has_pendant_neighbour = graph
            .adj(u)
            .iter()
            .any(|&v| state.is_live(v) && live_deg[v] == 1);
        if has_pendant_neighbour {
            state.include(u);
            return true;
        }
    }

    // Rule 3: high-degree against the best known cover size.
    for v in 0..n {
        if state.is_live(v) && live_deg[v] > best {
            state.include(v);
            return true;
        }
    }

    // Rule 4: crown / Nemhauser–Trotter.
    crown_reduction(graph, state)
}

/// Loop `reduce_once` to a fixed point; returns the number of applications.
pub fn reduce(graph: &Graph, state: &mut State, best: usize) -> usize {
    let mut applied = 0;
    while reduce_once(graph, state, best) {
        applied += 1;
    }
    applied
}

// ---------------------------------------------------------------------------
// crown_reduction — rule 4
// ---------------------------------------------------------------------------

/// Nemhauser–Trotter via the bipartite double cover of the live subgraph.
///
/// Each live edge {u, v} contributes (u_L, v_R) and (v_L, u_R). With a
/// maximum matching and König reachability Z from the unmatched left
/// vertices, a live vertex is committed when both of its copies sit in the
/// König cover and dropped when neither does. Vertices with exactly one
/// copy in the cover stay undecided.
fn crown_reduction(graph: &Graph, state: &mut State) -> bool {
    let n = graph.num_vertices();
    let live: Vec<usize> = (0..n).filter(|&v| state.is_live(v)).collect();
    if live.is_empty() {
        return false;
    }

    let mut pos = vec![usize::MAX; n];
    for (i, &v) in live.iter().enumerate() {
        pos[v] = i;
    }

    let mut double = Bipartite::new(live.len(), live.len());
    for (i, &u) in live.iter().enumerate() {
        for &v in graph.adj(u) {
            if state.is_live(v) {
                // Left copy of u against the right copy of each live
                // neighbour; iterating every live vertex produces both
                // orientations of each edge.
                double.add_edge(i, pos[v]);
            }
        }
    }

    let matching = hopcroft_karp(&double);
    let (cover_left, cover_right) = koenig_cover(&double, &matching);

    let mut changed = false;
    for (i, &v) in live.iter().enumerate() {
        let in_left = cover_left[i];
        let in_right = cover_right[i];
        if in_left && in_right {
            state.include(v);
            changed = true;
        } else if !in_left && !in_right {
            state.exclude(v);
            changed = true;
        }
    }
    changed
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn path4() -> Graph {
        let mut g = Graph::new(4);
        g.add_edge(0, 1).unwrap();
        g.add_edge(1, 2).unwrap();
        g.add_edge(2, 3).unwrap();
        g
    }

    fn star(leaves: usize) -> Graph {
        let mut g = Graph::new(leaves + 1);
        for v in 1..=leaves {
            g.add_edge(0, v).unwrap();
        }
        g
    }

    // ---- rule 1 ----

    #[test]
    fn isolated_vertices_are_excluded() {
        let g = Graph::new(3);
        let mut s = State::new(3);

        assert_eq!(reduce(&g, &mut s, 3), 3);
        assert_eq!(s.possible_count(), 0);
        assert_eq!(s.cover_size(), 0);
    }

    #[test]
    fn rule_order_prefers_isolated() {
        // Vertex 2 is isolated; the pendant edge (0, 1) must wait one
        // application.
        let mut g = Graph::new(3);
        g.add_edge(0, 1).unwrap();
        let mut s = State::new(3);

        assert!(reduce_once(&g, &mut s, 3));
        assert!(!s.is_live(2));
        assert_eq!(s.cover_size(), 0);
    }

    // ---- rule 2 ----

    #[test]
    fn pendant_commits_the_neighbour() {
        let g = star(1); // single edge 0-1
        let mut s = State::new(2);

        assert!(reduce_once(&g, &mut s, 2));
        assert!(s.is_selected(0));
        assert!(s.is_live(1));
    }

    #[test]
    fn path4_kernelizes_to_inner_vertices() {
        // 0-1-2-3: include 1 (pendant 0), drop 0, include 2 (pendant 3),
        // drop 3. Four applications, cover {1, 2}.
        let g = path4();
        let mut s = State::new(4);

        assert_eq!(reduce(&g, &mut s, 4), 4);
        assert_eq!(s.cover_size(), 2);
        assert!(s.is_selected(1));
        assert!(s.is_selected(2));
        assert_eq!(s.possible_count(), 0);
        assert!(s.is_valid(&g));
    }

    #[test]
    fn star_kernelizes_to_centre() {
        let g = star(5);
        let mut s = State::new(6);

        reduce(&g, &mut s, 6);
        assert_eq!(s.cover_size(), 1);
        assert!(s.is_selected(0));
        assert_eq!(s.possible_count(), 0);
    }

    // ---- rule 3 ----

    #[test]
    fn high_degree_beats_the_best_cover() {
        // Centre of a 4-star with best = 3: degree 4 > 3 forces it in.
        // Leaves are kept live by joining them pairwise so no pendant
        // exists: wheel-ish graph 0 centre, rim 1-2, 2-3, 3-4, 4-1.
        let mut g = Graph::new(5);
        for v in 1..5 {
            g.add_edge(0, v).unwrap();
        }
        g.add_edge(1, 2).unwrap();
        g.add_edge(2, 3).unwrap();
        g.add_edge(3, 4).unwrap();
        g.add_edge(4, 1).unwrap();

        let mut s = State::new(5);
        assert!(reduce_once(&g, &mut s, 3));
        assert!(s.is_selected(0));
    }

    // ---- rule 4 ----

    #[test]
    fn crown_commits_heads_and_drops_crown() {
        // Crown {0,1,2,3} independent, heads {4,5} joined to all of it.
        // Degrees are 2 and 4, so rules 1-3 stay silent with best = 6;
        // the NT decomposition resolves everything at once.
        let mut g = Graph::new(6);
        for crown in 0..4 {
            g.add_edge(crown, 4).unwrap();
            g.add_edge(crown, 5).unwrap();
        }
        let mut s = State::new(6);

        assert!(reduce_once(&g, &mut s, 6));
        assert!(s.is_selected(4));
        assert!(s.is_selected(5));
        for crown in 0..4 {
            assert!(!s.is_live(crown));
            assert!(!s.is_selected(crown));
        }
        assert!(s.is_valid(&g));
    }

    #[test]
    fn crown_leaves_tight_graphs_alone() {
        // C4 has a perfect matching in its double cover: nothing provable.
        let mut g = Graph::new(4);
        g.add_edge(0, 1).unwrap();
        g.add_edge(1, 2).unwrap();
        g.add_edge(2, 3).unwrap();
        g.add_edge(3, 0).unwrap();
        let mut s = State::new(4);

        assert!(!reduce_once(&g, &mut s, 4));
        assert_eq!(s.possible_count(), 4);
    }

    #[test]
    fn triangle_is_a_fixed_point() {
        let mut g = Graph::new(3);
        g.add_edge(0, 1).unwrap();
        g.add_edge(1, 2).unwrap();
        g.add_edge(0, 2).unwrap();
        let mut s = State::new(3);

        assert_eq!(reduce(&g, &mut s, 3), 0);
        assert_eq!(s.possible_count(), 3);
    }

    // ---- fixed-point invariants ----

    fn arbitrary_graph() -> impl Strategy<Value = Graph> {
        (2usize..14, proptest::collection::vec((0usize..14, 0usize..14), 0..40)).prop_map(
            |(n, pairs)| {
                let mut g = Graph::new(n);
                for (u, v) in pairs {
                    let (u, v) = (u % n, v % n);
                    if u != v {
                        g.add_edge(u, v).unwrap();
                    }
                }
                g
            },
        )
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(128))]

        #[test]
        fn fixed_point_has_no_easy_reductions(g in arbitrary_graph()) {
            let n = g.num_vertices();
            let mut s = State::new(n);
            reduce(&g, &mut s, n);

            for v in 0..n {
                if s.is_live(v) {
                    let d = s.live_degree(&g, v);
                    prop_assert!(d != 0, "isolated live vertex {v}");
                    prop_assert!(d != 1, "pendant live vertex {v}");
                    prop_assert!(d <= n, "over-degree live vertex {v}");
                }
            }
        }

        #[test]
        fn reduction_preserves_partition_and_coverage(g in arbitrary_graph()) {
            let n = g.num_vertices();
            let mut s = State::new(n);
            reduce(&g, &mut s, n);

            let excluded = (0..n)
                .filter(|&v| !s.is_selected(v) && !s.is_live(v))
                .count();
            prop_assert_eq!(s.cover_size() + s.possible_count() + excluded, n);

            // Excluded vertices can never be needed: each of their
            // neighbours is already selected or excluded itself.
            for v in 0..n {
                if !s.is_selected(v) && !s.is_live(v) {
                    for &u in g.adj(v) {
                        prop_assert!(
                            !s.is_live(u),
                            "excluded vertex {v} has live neighbour {u}"
                        );
                    }
                }
            }
        }
    }
}
