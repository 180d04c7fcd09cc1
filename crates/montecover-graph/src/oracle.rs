use std::cmp::Reverse;
use std::collections::BinaryHeap;

use rustc_hash::{FxHashMap, FxHashSet};
use thiserror::Error;

use crate::graph::Graph;
use crate::state::State;

/// Largest instance the subset-enumeration solver accepts.
pub const EXACT_SOLVE_LIMIT: usize = 16;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum OracleError {
    #[error("exact solver limited to {EXACT_SOLVE_LIMIT} vertices, got {0}")]
    InstanceTooLarge(usize),
}

// ---------------------------------------------------------------------------
// Greedy completion — rollout strategy (a)
// ---------------------------------------------------------------------------

/// Complete `seed`'s selection into a full cover: repeatedly commit the
/// unselected vertex with the highest residual degree (ties to the smallest
/// index) until no edge is uncovered. Always returns a valid cover.
pub fn greedy_cover(graph: &Graph, seed: &State) -> State {
    let n = graph.num_vertices();
    let edges = graph.edges();
    let mut sel: Vec<bool> = (0..n).map(|v| seed.is_selected(v)).collect();

    loop {
        let mut deg = vec![0usize; n];
        let mut uncovered = false;
        for &(u, v) in &edges {
            if !sel[u] && !sel[v] {
                uncovered = true;
                deg[u] += 1;
                deg[v] += 1;
            }
        }
        if !uncovered {
            break;
        }

        let mut pick = None;
        let mut best = 0;
        for v in 0..n {
            if !sel[v] && deg[v] > best {
                best = deg[v];
                pick = Some(v);
            }
        }
        match pick {
            Some(v) => sel[v] = true,
            // Unreachable while an uncovered edge has unselected endpoints;
            // bail rather than spin.
            None => break,
        }
    }

    State::from_selected(sel)
}

/// Greedy cover from the empty selection.
pub fn greedy_solve(graph: &Graph) -> State {
    greedy_cover(graph, &State::new(graph.num_vertices()))
}

// ---------------------------------------------------------------------------
// Exact solver — ≤ 16 vertices
// ---------------------------------------------------------------------------

/// Minimum-weight cover by subset enumeration.
pub fn exact_solve(graph: &Graph) -> Result<State, OracleError> {
    let n = graph.num_vertices();
    if n > EXACT_SOLVE_LIMIT {
        return Err(OracleError::InstanceTooLarge(n));
    }
    Ok(brute_force(graph))
}

/// Shared by `exact_solve` and the coarse-solve base case, which has
/// already checked the size.
fn brute_force(graph: &Graph) -> State {
    let n = graph.num_vertices();
    let edges = graph.edges();

    let mut best_mask: u32 = if n == 0 { 0 } else { (1u32 << n) - 1 };
    let mut best_weight = graph.total_weight();

    for mask in 0..(1u32 << n) {
        let covers = edges
            .iter()
            .all(|&(u, v)| mask & (1 << u) != 0 || mask & (1 << v) != 0);
        if !covers {
            continue;
        }
        let weight: u64 = (0..n)
            .filter(|&v| mask & (1 << v) != 0)
            .map(|v| graph.weight(v))
            .sum();
        if weight < best_weight {
            best_weight = weight;
            best_mask = mask;
        }
    }

    State::from_selected((0..n).map(|v| best_mask & (1 << v) != 0).collect())
}

// ---------------------------------------------------------------------------
// Coarsening
// ---------------------------------------------------------------------------

/// Contract matched vertex pairs into super-nodes.
///
/// Vertices are bucketed by `(core number, ⌊log₂(deg+1)⌋)`; inside each
/// bucket a three-phase matching runs: adjacent pairs first, then pairs
/// sharing a neighbour, then sequential pairing of whatever remains (an odd
/// survivor stays a singleton). Super-nodes carry the summed weight of
/// their group; contracted self-loops are dropped and parallel edges
/// deduplicated.
///
/// Returns the coarse graph and, per super-node, the original vertices it
/// absorbed.
pub fn coarsen_graph(graph: &Graph) -> (Graph, Vec<Vec<usize>>) {
    let n = graph.num_vertices();
    let core = core_numbers(graph);

    // Bucket membership, insertion in vertex order keeps bucket lists
    // ascending.
    let mut buckets: FxHashMap<(usize, u32), Vec<usize>> = FxHashMap::default();
    for v in 0..n {
        let key = (core[v], (graph.degree(v) as u32 + 1).ilog2());
        buckets.entry(key).or_default().push(v);
    }

    let mut matched = vec![false; n];
    let mut pairs: Vec<(usize, usize)> = Vec::with_capacity(n / 2);
    let mut singles: Vec<usize> = Vec::new();

    for bucket in buckets.values() {
        let bucket_set: FxHashSet<usize> = bucket.iter().copied().collect();

        // Phase 1: adjacent pairs inside the bucket.
        for &v in bucket {
            if matched[v] {
                continue;
            }
            for &u in graph.adj(v) {
                if !matched[u] && u != v && bucket_set.contains(&u) {
                    matched[v] = true;
                    matched[u] = true;
                    pairs.push((v, u));
                    break;
                }
            }
        }

        // Phase 2: pairs sharing a common neighbour.
        let remain: Vec<usize> = bucket.iter().copied().filter(|&v| !matched[v]).collect();
        let remain_pos: FxHashMap<usize, usize> =
            remain.iter().enumerate().map(|(i, &v)| (v, i)).collect();
        let mut used = vec![false; remain.len()];

        for (i, &v) in remain.iter().enumerate() {
            if used[i] {
                continue;
            }
            'hop: for &mid in graph.adj(v) {
                for &w in graph.adj(mid) {
                    if w == v {
                        continue;
                    }
                    if let Some(&j) = remain_pos.get(&w) {
                        if !used[j] {
                            used[i] = true;
                            used[j] = true;
                            matched[v] = true;
                            matched[w] = true;
                            pairs.push((v, w));
                            break 'hop;
                        }
                    }
                }
            }
        }

        // Phase 3: sequential pairing of the leftovers.
        let mut leftovers: Vec<usize> = remain
            .iter()
            .enumerate()
            .filter(|&(i, &v)| !used[i] && !matched[v])
            .map(|(_, &v)| v)
            .collect();
        if leftovers.len() % 2 == 1 {
            singles.push(leftovers.pop().expect("non-empty on odd length"));
        }
        for chunk in leftovers.chunks_exact(2) {
            matched[chunk[0]] = true;
            matched[chunk[1]] = true;
            pairs.push((chunk[0], chunk[1]));
        }
    }

    let mut groups: Vec<Vec<usize>> = Vec::with_capacity(pairs.len() + singles.len());
    groups.extend(pairs.iter().map(|&(a, b)| vec![a, b]));
    groups.extend(singles.iter().map(|&v| vec![v]));

    let mut vertex_to_group = vec![usize::MAX; n];
    for (g_idx, group) in groups.iter().enumerate() {
        for &v in group {
            vertex_to_group[v] = g_idx;
        }
    }

    let n2 = groups.len();
    let mut coarse = Graph::new(n2);
    for (g_idx, group) in groups.iter().enumerate() {
        coarse.set_weight(g_idx, group.iter().map(|&v| graph.weight(v)).sum());
    }

    // Contract edges: self-loops vanish, parallel edges collapse to one.
    let mut neighbour_sets: Vec<FxHashSet<usize>> = vec![FxHashSet::default(); n2];
    for u in 0..n {
        let su = vertex_to_group[u];
        for &v in graph.adj(u) {
            let sv = vertex_to_group[v];
            if su != sv {
                neighbour_sets[su].insert(sv);
            }
        }
    }
    for su in 0..n2 {
        let mut neighbours: Vec<usize> = neighbour_sets[su].iter().copied().collect();
        neighbours.sort_unstable();
        for sv in neighbours {
            if su < sv {
                coarse
                    .add_edge(su, sv)
                    .expect("contracted indices are in range");
            }
        }
    }

    (coarse, groups)
}

/// Degeneracy core numbers via lazy min-heap peeling: repeatedly remove a
/// minimum-degree vertex; its degree at removal time is its core number.
fn core_numbers(graph: &Graph) -> Vec<usize> {
    let n = graph.num_vertices();
    let mut deg: Vec<usize> = (0..n).map(|v| graph.degree(v)).collect();
    let mut core = vec![0usize; n];
    let mut removed = vec![false; n];

    let mut heap: BinaryHeap<Reverse<(usize, usize)>> =
        (0..n).map(|v| Reverse((deg[v], v))).collect();

    while let Some(Reverse((d, v))) = heap.pop() {
        if removed[v] || d != deg[v] {
            continue; // stale entry
        }
        removed[v] = true;
        core[v] = d;
        for &u in graph.adj(v) {
            if !removed[u] {
                if deg[u] > 0 {
                    deg[u] -= 1;
                }
                heap.push(Reverse((deg[u], u)));
            }
        }
    }
    core
}

// ---------------------------------------------------------------------------
// Multi-level solve — rollout strategy (b)
// ---------------------------------------------------------------------------

/// Coarsen → solve → lift → local fix. Exact below the enumeration limit;
/// falls back to greedy when coarsening stops making progress. The result
/// is always a valid cover, with no optimality claim above the limit.
pub fn coarse_solve(graph: &Graph) -> State {
    if graph.num_vertices() <= EXACT_SOLVE_LIMIT {
        return brute_force(graph);
    }

    let (coarse, groups) = coarsen_graph(graph);
    if coarse.num_vertices() == graph.num_vertices() {
        return greedy_solve(graph);
    }

    let coarse_solution = coarse_solve(&coarse);

    // Lift: a selected super-node pulls in its whole group.
    let mut lifted = State::new(graph.num_vertices());
    for &g_idx in coarse_solution.selected() {
        for &v in &groups[g_idx] {
            lifted.include(v);
        }
    }

    // Edges that ended up inside unselected groups may be uncovered; the
    // greedy pass patches them.
    greedy_cover(graph, &lifted)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
