use std::ops::{Index, IndexMut};

use montecover_graph::State;

/// Children per node under edge branching: one per endpoint of the
/// branching edge.
pub const BRANCH_FACTOR: usize = 2;

// ---------------------------------------------------------------------------
// NodeIndex — typed arena index
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct NodeIndex(u32);

impl NodeIndex {
    fn as_usize(self) -> usize {
        self.0 as usize
    }
}

// ---------------------------------------------------------------------------
// Node
// ---------------------------------------------------------------------------

/// Search-tree node: the partial assignment plus bandit statistics.
///
/// `expandable` counts the branches still worth visiting beneath this node.
/// It starts at `BRANCH_FACTOR` and reaches 0 when the node has no
/// branching edge or when every child subtree has been exhausted; the
/// driver propagates exhaustion upward lazily.
pub struct Node {
    state: State,
    parent: Option<NodeIndex>,
    children: Vec<NodeIndex>,
    visits: u64,
    value: f64,
    max_value: f64,
    expandable: i32,
}

impl Node {
    /// The parent backref is fixed at construction so exhaustion can walk
    /// up before the child is attached to the parent's list.
    pub fn new(state: State, parent: Option<NodeIndex>) -> Self {
        Self {
            state,
            parent,
            children: Vec::new(),
            visits: 0,
            value: 0.0,
            max_value: 0.0,
            expandable: BRANCH_FACTOR as i32,
        }
    }

    // --- Getters ---

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut State {
        &mut self.state
    }

    pub fn parent(&self) -> Option<NodeIndex> {
        self.parent
    }

    pub fn children(&self) -> &[NodeIndex] {
        &self.children
    }

    pub fn visits(&self) -> u64 {
        self.visits
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn max_value(&self) -> f64 {
        self.max_value
    }

    pub fn expandable(&self) -> i32 {
        self.expandable
    }

    /// Fully expanded: both endpoints of the branching edge have a child.
    pub fn full(&self) -> bool {
        self.children.len() == BRANCH_FACTOR
    }

    // --- Mutators ---

    pub fn push_child(&mut self, child: NodeIndex) {
        debug_assert!(!self.full(), "push_child: node already has both branches");
        self.children.push(child);
    }

    /// Welford running-average update plus best-reward tracking:
    /// `value ← value + (reward − value) / visits`.
    pub fn add_experience(&mut self, reward: f64) {
        self.visits += 1;
        self.value += (reward - self.value) / self.visits as f64;
        self.max_value = self.max_value.max(reward);
    }

    pub fn set_exhausted(&mut self) {
        self.expandable = 0;
    }

    pub fn decrement_expandable(&mut self) {
        debug_assert!(self.expandable > 0, "decrement_expandable: already 0");
        self.expandable -= 1;
    }
}

// ---------------------------------------------------------------------------
// NodeArena — arena allocator
// ---------------------------------------------------------------------------

/// Vec-backed arena. Nodes are never freed individually: the whole tree
/// drops with the arena, so `len()` is the node count of the tree.
pub struct NodeArena {
    nodes: Vec<Node>,
}

impl NodeArena {
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    pub fn alloc(&mut self, node: Node) -> NodeIndex {
        let idx = NodeIndex(self.nodes.len() as u32);
        self.nodes.push(node);
        idx
    }

    pub fn get(&self, idx: NodeIndex) -> &Node {
        &self.nodes[idx.as_usize()]
    }

    pub fn get_mut(&mut self, idx: NodeIndex) -> &mut Node {
        &mut self.nodes[idx.as_usize()]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl Default for NodeArena {
    fn default() -> Self {
        Self::new()
    }
}

impl Index<NodeIndex> for NodeArena {
    type Output = Node;
    fn index(&self, idx: NodeIndex) -> &Self::Output {
        self.get(idx)
    }
}

impl IndexMut<NodeIndex> for NodeArena {
    fn index_mut(&mut self, idx: NodeIndex) -> &mut Self::Output {
        self.get_mut(idx)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
