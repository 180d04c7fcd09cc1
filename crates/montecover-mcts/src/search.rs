use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use montecover_graph::{kernel, oracle, Graph, State};

use crate::node::{Node, NodeArena, NodeIndex};
use crate::policy::{epsilon_greedy, uct_sample, TreePolicy};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Rollout used by `simulate`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RolloutPolicy {
    /// Greedy max-degree completion of the node's selection.
    #[default]
    Greedy,
    /// Multi-level coarsen/solve/lift on the live residual subgraph,
    /// patched by the greedy pass.
    Coarsen,
}

/// Search configuration — fixed for the lifetime of a driver.
#[derive(Clone, Copy, Debug)]
pub struct SearchConfig {
    /// Exploration parameter β of the UCT-like score.
    pub exploration: f64,
    pub policy: TreePolicy,
    pub rollout: RolloutPolicy,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            exploration: 0.0,
            policy: TreePolicy::EpsilonGreedy,
            rollout: RolloutPolicy::Greedy,
        }
    }
}

impl SearchConfig {
    pub fn with_exploration(exploration: f64) -> Self {
        Self {
            exploration,
            ..Self::default()
        }
    }
}

// ---------------------------------------------------------------------------
// Mcts — the search driver
// ---------------------------------------------------------------------------

/// Edge-branching MCTS over vertex-cover assignments.
///
/// Owns the graph, the node arena, and the best cover size found so far
/// (`answer`), which doubles as the bound consulted by the high-degree
/// kernelization rule. Single-threaded; the caller bounds compute by the
/// number of `run` calls.
pub struct Mcts<R: Rng = SmallRng> {
    graph: Graph,
    config: SearchConfig,
    arena: NodeArena,
    root: NodeIndex,
    answer: usize,
    rng: R,
}

impl Mcts<SmallRng> {
    /// Driver with an entropy-seeded RNG.
    pub fn new(graph: Graph, config: SearchConfig) -> Self {
        Self::with_rng(graph, config, SmallRng::from_entropy())
    }
}

impl<R: Rng> Mcts<R> {
    /// Driver with an injected RNG; the deterministic entry point.
    ///
    /// The root is kernelized to a fixed point immediately. A root without
    /// a branching edge is terminal: its selection is already a complete
    /// kernel-proven cover and `answer` snaps to it.
    pub fn with_rng(graph: Graph, config: SearchConfig, rng: R) -> Self {
        let n = graph.num_vertices();
        let mut state = State::new(n);
        kernel::reduce(&graph, &mut state, n);
        let has_edge = state.select_action_edge(&graph);

        let mut arena = NodeArena::new();
        let root = arena.alloc(Node::new(state, None));

        let mut mcts = Self {
            graph,
            config,
            arena,
            root,
            answer: n,
            rng,
        };
        if !has_edge {
            mcts.answer = mcts.arena[root].state().cover_size();
            mcts.arena[root].set_exhausted();
            mcts.expandable_update(root);
        }
        mcts
    }

    // --- Accessors ---

    pub fn answer(&self) -> usize {
        self.answer
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn root(&self) -> NodeIndex {
        self.root
    }

    pub fn arena(&self) -> &NodeArena {
        &self.arena
    }

    pub fn root_children(&self) -> usize {
        self.arena[self.root].children().len()
    }

    pub fn total_nodes(&self) -> usize {
        self.arena.len()
    }

    // --- One iteration ---

    /// Select → expand → simulate → backpropagate, once. Returns `false`
    /// without doing anything when the tree is exhausted (every branch
    /// below the root has been proven terminal).
    pub fn run(&mut self) -> bool {
        if self.arena[self.root].expandable() == 0 {
            return false;
        }
        let leaf = self.select();
        let child = self.expand(leaf);
        let cover = self.simulate(child);
        let reward = cover.evaluate();
        self.backpropagate(child, reward);
        true
    }

    /// Descend to a node that can still produce a child. A full node with
    /// `expandable == 1` has one exhausted branch; the walk steps into the
    /// live one without consulting the tree policy.
    fn select(&mut self) -> NodeIndex {
        let mut node = self.root;
        loop {
            if !self.arena[node].full() {
                return node;
            }
            debug_assert!(
                self.arena[node].expandable() > 0,
                "selection entered an exhausted node"
            );
            node = if self.arena[node].expandable() == 1 {
                let children = self.arena[node].children();
                if self.arena[children[0]].expandable() > 0 {
                    children[0]
                } else {
                    children[1]
                }
            } else {
                match self.config.policy {
                    TreePolicy::EpsilonGreedy => {
                        epsilon_greedy(&self.arena, node, self.config.exploration, &mut self.rng)
                    }
                    TreePolicy::UctSampling => {
                        uct_sample(&self.arena, node, self.config.exploration, &mut self.rng)
                    }
                }
            };
        }
    }

    /// Create the next child of `parent` along its branching edge `(a, b)`.
    ///
    /// The first child commits `a`; the second commits `b` and drops `a`,
    /// so together they cover the full case split (every cover of the edge
    /// contains one of its endpoints). The child is kernelized to a fixed
    /// point; if no branching edge survives it is terminal and the
    /// exhaustion propagates upward. The parent's edge endpoints are then
    /// swapped so the next expansion takes the other branch.
    fn expand(&mut self, parent: NodeIndex) -> NodeIndex {
        assert!(
            self.arena[parent].expandable() > 0,
            "expand: node is exhausted"
        );
        let (a, b) = self.arena[parent]
            .state()
            .action_edge()
            .expect("expand: no branching edge");

        let mut state = self.arena[parent].state().clone();
        state.include(a);
        if self.arena[parent].children().len() == 1 {
            state.exclude(b);
        }
        kernel::reduce(&self.graph, &mut state, self.answer);
        let has_edge = state.select_action_edge(&self.graph);

        let child = self.arena.alloc(Node::new(state, Some(parent)));
        if !has_edge {
            self.arena[child].set_exhausted();
            self.expandable_update(child);
        }
        self.arena[parent].push_child(child);
        self.arena[parent].state_mut().swap_action_edge();
        child
    }

    /// Complete the node's selection into a full cover and fold its size
    /// into the global best.
    fn simulate(&mut self, node: NodeIndex) -> State {
        let cover = match self.config.rollout {
            RolloutPolicy::Greedy => oracle::greedy_cover(&self.graph, self.arena[node].state()),
            RolloutPolicy::Coarsen => self.coarsen_rollout(node),
        };
        self.answer = self.answer.min(cover.cover_size());
        cover
    }

    /// Multi-level rollout: extract the live residual subgraph, solve it
    /// with the coarsening oracle, lift the answer back into this node's
    /// vertex space, and let the greedy pass patch anything left over.
    fn coarsen_rollout(&self, node: NodeIndex) -> State {
        let state = self.arena[node].state();
        let n = self.graph.num_vertices();

        let live: Vec<usize> = (0..n).filter(|&v| state.is_live(v)).collect();
        let mut pos = vec![usize::MAX; n];
        for (i, &v) in live.iter().enumerate() {
            pos[v] = i;
        }

        let mut residual = Graph::new(live.len());
        for &u in &live {
            for &v in self.graph.adj(u) {
                if u < v && state.is_live(v) {
                    residual
                        .add_edge(pos[u], pos[v])
                        .expect("live indices are in range");
                }
            }
        }

        let residual_solution = oracle::coarse_solve(&residual);
        let mut lifted = state.clone();
        for &i in residual_solution.selected() {
            lifted.include(live[i]);
        }
        oracle::greedy_cover(&self.graph, &lifted)
    }

    fn backpropagate(&mut self, node: NodeIndex, reward: f64) {
        let mut current = Some(node);
        while let Some(idx) = current {
            self.arena[idx].add_experience(reward);
            current = self.arena[idx].parent();
        }
    }

    /// Lazy terminality propagation: while the counter at the current node
    /// is zero, the parent loses one live branch.
    fn expandable_update(&mut self, node: NodeIndex) {
        let mut current = node;
        while self.arena[current].expandable() == 0 {
            match self.arena[current].parent() {
                Some(parent) => {
                    self.arena[parent].decrement_expandable();
                    current = parent;
                }
                None => return,
            }
        }
    }

    /// Extract the reported cover: descend along the best child (highest
    /// `max_value`, then visits, then first) and complete the leaf's
    /// selection with one rollout.
    pub fn solution(&self) -> State {
        let mut node = self.root;
        loop {
            let children = self.arena[node].children();
            if children.is_empty() {
                break;
            }
            let mut best = children[0];
            for &candidate in &children[1..] {
                let c = &self.arena[candidate];
                let b = &self.arena[best];
                if c.max_value() > b.max_value()
                    || (c.max_value() == b.max_value() && c.visits() > b.visits())
                {
                    best = candidate;
                }
            }
            node = best;
        }

        match self.config.rollout {
            RolloutPolicy::Greedy => oracle::greedy_cover(&self.graph, self.arena[node].state()),
            RolloutPolicy::Coarsen => self.coarsen_rollout(node),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
