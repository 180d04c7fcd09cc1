use std::collections::VecDeque;

// ---------------------------------------------------------------------------
// Bipartite
// ---------------------------------------------------------------------------

/// Bipartite graph with edges stored on the left side only.
#[derive(Clone, Debug)]
pub struct Bipartite {
    n_left: usize,
    n_right: usize,
    adj: Vec<Vec<usize>>,
}

impl Bipartite {
    pub fn new(n_left: usize, n_right: usize) -> Self {
        Self {
            n_left,
            n_right,
            adj: vec![Vec::new(); n_left],
        }
    }

    pub fn add_edge(&mut self, l: usize, r: usize) {
        debug_assert!(l < self.n_left && r < self.n_right);
        self.adj[l].push(r);
    }

    pub fn n_left(&self) -> usize {
        self.n_left
    }

    pub fn n_right(&self) -> usize {
        self.n_right
    }

    pub fn adj(&self, l: usize) -> &[usize] {
        &self.adj[l]
    }
}

// ---------------------------------------------------------------------------
// Matching
// ---------------------------------------------------------------------------

#[derive(Clone, Debug)]
pub struct Matching {
    pub pair_left: Vec<Option<usize>>,
    pub pair_right: Vec<Option<usize>>,
    pub size: usize,
}

const UNREACHED: u32 = u32::MAX;

// ---------------------------------------------------------------------------
// hopcroft_karp
// ---------------------------------------------------------------------------

/// Maximum bipartite matching in O(E·√V): BFS builds a layering from the
/// free left vertices, DFS augments along shortest alternating paths, and
/// the two phases repeat until no augmenting path remains.
pub fn hopcroft_karp(b: &Bipartite) -> Matching {
    let mut pair_left = vec![None; b.n_left];
    let mut pair_right = vec![None; b.n_right];
    let mut dist = vec![UNREACHED; b.n_left];
    let mut size = 0;

    while bfs_layer(b, &pair_left, &pair_right, &mut dist) {
        for l in 0..b.n_left {
            if pair_left[l].is_none()
                && try_augment(b, l, &mut pair_left, &mut pair_right, &mut dist)
            {
                size += 1;
            }
        }
    }

    Matching {
        pair_left,
        pair_right,
        size,
    }
}

/// Layer left vertices by alternating-path distance from the free ones.
/// Returns whether some free right vertex is reachable (an augmenting path
/// exists).
fn bfs_layer(
    b: &Bipartite,
    pair_left: &[Option<usize>],
    pair_right: &[Option<usize>],
    dist: &mut [u32],
) -> bool {
    let mut queue = VecDeque::new();
    for l in 0..b.n_left {
        if pair_left[l].is_none() {
            dist[l] = 0;
            queue.push_back(l);
        } else {
            dist[l] = UNREACHED;
        }
    }

    let mut found = false;
    while let Some(l) = queue.pop_front() {
        for &r in b.adj(l) {
            match pair_right[r] {
                None => found = true,
                Some(l2) => {
                    if dist[l2] == UNREACHED {
                        dist[l2] = dist[l] + 1;
                        queue.push_back(l2);
                    }
                }
            }
        }
    }
    found
}

/// Augment along a shortest alternating path starting at free `l`.
fn try_augment(
    b: &Bipartite,
    l: usize,
    pair_left: &mut [Option<usize>],
    pair_right: &mut [Option<usize>],
    dist: &mut [u32],
) -> bool {
    for i in 0..b.adj(l).len() {
        let r = b.adj(l)[i];
        let reachable = match pair_right[r] {
            None => true,
            Some(l2) => {
                dist[l2] == dist[l] + 1 && try_augment(b, l2, pair_left, pair_right, dist)
            }
        };
        if reachable {
            pair_left[l] = Some(r);
            pair_right[r] = Some(l);
            return true;
        }
    }
    // Dead end: prune this vertex for the rest of the phase.
    dist[l] = UNREACHED;
    false
}

// ---------------------------------------------------------------------------
// König decomposition
// ---------------------------------------------------------------------------

/// Alternating-path reachability from the unmatched left vertices:
/// non-matching edges L→R, matching edges R→L. Returns `(z_left, z_right)`.
pub fn alternating_reachability(b: &Bipartite, m: &Matching) -> (Vec<bool>, Vec<bool>) {
    let mut z_left = vec![false; b.n_left];
    let mut z_right = vec![false; b.n_right];

    let mut queue = VecDeque::new();
    for l in 0..b.n_left {
        if m.pair_left[l].is_none() {
            z_left[l] = true;
            queue.push_back(l);
        }
    }

    while let Some(l) = queue.pop_front() {
        for &r in b.adj(l) {
            if m.pair_left[l] == Some(r) || z_right[r] {
                continue;
            }
            z_right[r] = true;
            if let Some(l2) = m.pair_right[r] {
                if !z_left[l2] {
                    z_left[l2] = true;
                    queue.push_back(l2);
                }
            }
        }
    }

    (z_left, z_right)
}

/// König minimum vertex cover `(V_L \ Z_L) ∪ (V_R ∩ Z_R)` as membership
/// bitmaps `(left_in_cover, right_in_cover)`. Its size equals the maximum
/// matching size.
pub fn koenig_cover(b: &Bipartite, m: &Matching) -> (Vec<bool>, Vec<bool>) {
    let (z_left, z_right) = alternating_reachability(b, m);
    let left_in_cover = z_left.iter().map(|&z| !z).collect();
    (left_in_cover, z_right)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
