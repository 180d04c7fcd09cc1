use rustc_hash::FxHashSet;

use crate::graph::Graph;

// ---------------------------------------------------------------------------
// State — partial assignment at a search-tree node
// ---------------------------------------------------------------------------

/// Partial vertex-cover assignment.
///
/// Every vertex is in exactly one of three classes: `selected` (committed
/// to the cover), `possible` (live, still undecided), or excluded (in
/// neither set — proven unnecessary). `selected` and `possible` are always
/// disjoint.
///
/// `action_edge` is the branching edge chosen for expansion; `None` means
/// the live subgraph has no edge left and the node is terminal.
#[derive(Clone, Debug, PartialEq)]
pub struct State {
    is_selected: Vec<bool>,
    selected: FxHashSet<usize>,
    possible: FxHashSet<usize>,
    action_edge: Option<(usize, usize)>,
}

impl State {
    /// Fresh assignment: all vertices live, none selected.
    pub fn new(num_vertices: usize) -> Self {
        Self {
            is_selected: vec![false; num_vertices],
            selected: FxHashSet::default(),
            possible: (0..num_vertices).collect(),
            action_edge: None,
        }
    }

    /// Build from a selection bitmap; unselected vertices stay live.
    /// Rollouts hand their result back through this.
    pub fn from_selected(is_selected: Vec<bool>) -> Self {
        let mut selected = FxHashSet::default();
        let mut possible = FxHashSet::default();
        for (v, &sel) in is_selected.iter().enumerate() {
            if sel {
                selected.insert(v);
            } else {
                possible.insert(v);
            }
        }
        Self {
            is_selected,
            selected,
            possible,
            action_edge: None,
        }
    }

    pub fn num_vertices(&self) -> usize {
        self.is_selected.len()
    }

    pub fn is_selected(&self, v: usize) -> bool {
        self.is_selected[v]
    }

    pub fn is_live(&self, v: usize) -> bool {
        self.possible.contains(&v)
    }

    pub fn selected(&self) -> &FxHashSet<usize> {
        &self.selected
    }

    pub fn possible(&self) -> &FxHashSet<usize> {
        &self.possible
    }

    pub fn cover_size(&self) -> usize {
        self.selected.len()
    }

    pub fn possible_count(&self) -> usize {
        self.possible.len()
    }

    pub fn action_edge(&self) -> Option<(usize, usize)> {
        self.action_edge
    }

    /// Exchange the branching-edge endpoints so the next expansion commits
    /// the other side.
    pub fn swap_action_edge(&mut self) {
        if let Some((a, b)) = self.action_edge {
            self.action_edge = Some((b, a));
        }
    }

    /// Commit `v` to the cover. `v` must be live.
    pub fn include(&mut self, v: usize) {
        assert!(self.possible.remove(&v), "include: vertex {v} is not live");
        self.is_selected[v] = true;
        self.selected.insert(v);
    }

    /// Drop `v` from the residual problem without selecting it. `v` must be
    /// live (in particular, not selected).
    pub fn exclude(&mut self, v: usize) {
        assert!(
            !self.is_selected[v],
            "exclude: vertex {v} is already selected"
        );
        assert!(self.possible.remove(&v), "exclude: vertex {v} is not live");
    }

    /// Number of live neighbours of `v`; multi-edges count per occurrence.
    pub fn live_degree(&self, graph: &Graph, v: usize) -> usize {
        graph.adj(v).iter().filter(|&&u| self.is_live(u)).count()
    }

    /// Pick the branching edge: among edges `(u, v)` with `u < v` and both
    /// endpoints live, the first one maximizing the live-degree difference
    /// `|deg(u) − deg(v)|`. Returns whether such an edge exists.
    pub fn select_action_edge(&mut self, graph: &Graph) -> bool {
        let n = self.num_vertices();
        let mut live_deg = vec![0usize; n];
        for &v in &self.possible {
            live_deg[v] = self.live_degree(graph, v);
        }

        let mut best: Option<((usize, usize), usize)> = None;
        for u in 0..n {
            if !self.is_live(u) {
                continue;
            }
            // Adjacency keeps insertion order; sort so ties resolve to the
            // first edge in ascending (u, v) order.
            let mut neighbours: Vec<usize> = graph
                .adj(u)
                .iter()
                .copied()
                .filter(|&v| u < v && self.is_live(v))
                .collect();
            neighbours.sort_unstable();
            neighbours.dedup();
            for v in neighbours {
                let spread = live_deg[u].abs_diff(live_deg[v]);
                if best.is_none_or(|(_, s)| spread > s) {
                    best = Some(((u, v), spread));
                }
            }
        }

        self.action_edge = best.map(|(edge, _)| edge);
        self.action_edge.is_some()
    }

    /// Reward of a completed cover: smaller covers score higher.
    pub fn evaluate(&self) -> f64 {
        assert!(
            !self.selected.is_empty(),
            "evaluate: no vertices selected"
        );
        1.0 / self.selected.len() as f64
    }

    /// True iff every edge of `graph` has a selected endpoint.
    pub fn is_valid(&self, graph: &Graph) -> bool {
        (0..graph.num_vertices()).all(|u| {
            self.is_selected[u] || graph.adj(u).iter().all(|&v| self.is_selected[v])
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn path4() -> Graph {
        let mut g = Graph::new(4);
        g.add_edge(0, 1).unwrap();
        g.add_edge(1, 2).unwrap();
        g.add_edge(2, 3).unwrap();
        g
    }

    // ---- include / exclude ----

    #[test]
    fn include_moves_vertex_to_selected() {
        let mut s = State::new(3);
        s.include(1);

        assert!(s.is_selected(1));
        assert!(!s.is_live(1));
        assert_eq!(s.cover_size(), 1);
        assert_eq!(s.possible_count(), 2);
    }

    #[test]
    fn exclude_removes_vertex_from_play() {
        let mut s = State::new(3);
        s.exclude(2);

        assert!(!s.is_selected(2));
        assert!(!s.is_live(2));
        assert_eq!(s.cover_size(), 0);
        assert_eq!(s.possible_count(), 2);
    }

    #[test]
    #[should_panic(expected = "include: vertex 0 is not live")]
    fn include_twice_panics() {
        let mut s = State::new(2);
        s.include(0);
        s.include(0);
    }

    #[test]
    #[should_panic(expected = "exclude: vertex 0 is already selected")]
    fn exclude_selected_panics() {
        let mut s = State::new(2);
        s.include(0);
        s.exclude(0);
    }

    #[test]
    fn selected_and_possible_stay_disjoint() {
        let mut s = State::new(5);
        s.include(0);
        s.exclude(3);
        s.include(4);

        for v in 0..5 {
            assert!(!(s.is_selected(v) && s.is_live(v)), "vertex {v} in both sets");
        }
        assert_eq!(s.cover_size() + s.possible_count(), 4);
    }

    // ---- from_selected ----

    #[test]
    fn from_selected_splits_classes() {
        let s = State::from_selected(vec![true, false, true, false]);
        assert_eq!(s.cover_size(), 2);
        assert_eq!(s.possible_count(), 2);
        assert!(s.is_selected(0) && s.is_selected(2));
        assert!(s.is_live(1) && s.is_live(3));
    }

    // ---- select_action_edge ----

    #[test]
    fn action_edge_maximizes_degree_spread() {
        // Star with an extra pendant chain: 0-1, 0-2, 0-3, 3-4.
        // deg(0)=3, deg(3)=2, others 1. Edge (0,1) has spread 2 and comes
        // first among the spread-2 edges.
        let mut g = Graph::new(5);
        g.add_edge(0, 1).unwrap();
        g.add_edge(0, 2).unwrap();
        g.add_edge(0, 3).unwrap();
        g.add_edge(3, 4).unwrap();

        let mut s = State::new(5);
        assert!(s.select_action_edge(&g));
        assert_eq!(s.action_edge(), Some((0, 1)));
    }

    #[test]
    fn action_edge_ties_follow_ascending_order() {
        // Edges inserted with descending second endpoint: (0,2) before
        // (0,1). Both have spread 1; the winner must still be (0, 1).
        let mut g = Graph::new(3);
        g.add_edge(0, 2).unwrap();
        g.add_edge(0, 1).unwrap();

        let mut s = State::new(3);
        assert!(s.select_action_edge(&g));
        assert_eq!(s.action_edge(), Some((0, 1)));
    }

    #[test]
    fn action_edge_ignores_dead_endpoints() {
        let g = path4();
        let mut s = State::new(4);
        s.include(1);

        // Only live edge left is (2, 3).
        assert!(s.select_action_edge(&g));
        assert_eq!(s.action_edge(), Some((2, 3)));
    }

    #[test]
    fn no_live_edge_clears_action_edge() {
        let g = path4();
        let mut s = State::new(4);
        s.include(1);
        s.include(2);

        assert!(!s.select_action_edge(&g));
        assert_eq!(s.action_edge(), None);
    }

    #[test]
    fn swap_action_edge_flips_endpoints() {
        let g = path4();
        let mut s = State::new(4);
        s.select_action_edge(&g);
        let (a, b) = s.action_edge().unwrap();
        s.swap_action_edge();
        assert_eq!(s.action_edge(), Some((b, a)));
    }

    // ---- evaluate / is_valid ----

    #[test]
    fn evaluate_is_reciprocal_cover_size() {
        let mut s = State::new(4);
        s.include(1);
        s.include(2);
        assert!((s.evaluate() - 0.5).abs() < 1e-12);
    }

    #[test]
    #[should_panic(expected = "evaluate: no vertices selected")]
    fn evaluate_empty_selection_panics() {
        let s = State::new(3);
        s.evaluate();
    }

    #[test]
    fn is_valid_accepts_real_cover() {
        let g = path4();
        let mut s = State::new(4);
        s.include(1);
        s.include(2);
        assert!(s.is_valid(&g));
    }

    #[test]
    fn is_valid_rejects_uncovered_edge() {
        let g = path4();
        let mut s = State::new(4);
        s.include(1);
        // Edge (2, 3) uncovered.
        assert!(!s.is_valid(&g));
    }

    #[test]
    fn empty_selection_covers_edgeless_graph() {
        let g = Graph::new(3);
        let s = State::new(3);
        assert!(s.is_valid(&g));
    }
}
