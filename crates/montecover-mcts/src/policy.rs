use rand::distributions::WeightedIndex;
use rand::prelude::Distribution;
use rand::Rng;

use crate::node::{Node, NodeArena, NodeIndex};

/// Exploration probability of the ε-greedy policy.
pub const EPSILON: f64 = 0.1;

/// Child-selection rule applied at fully-expanded nodes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TreePolicy {
    /// ε-greedy over UCT scores: random child with probability ε,
    /// otherwise the argmax (ties to the lowest index).
    #[default]
    EpsilonGreedy,
    /// Roulette sampling with `max(0, score)` as the weights.
    UctSampling,
}

/// UCT-like score of a child:
/// `value + 2·β·√(2·ln(parent_visits) / (1e-6 + child_visits))`.
///
/// The 1e-6 keeps unvisited children finite while still dominating the
/// visited ones.
pub fn uct_score(parent_visits: u64, child: &Node, beta: f64) -> f64 {
    child.value()
        + 2.0 * beta * (2.0 * (parent_visits as f64).ln() / (1e-6 + child.visits() as f64)).sqrt()
}

/// ε-greedy selection among the children of `node`.
pub fn epsilon_greedy(
    arena: &NodeArena,
    node: NodeIndex,
    beta: f64,
    rng: &mut impl Rng,
) -> NodeIndex {
    let children = arena[node].children();
    assert!(!children.is_empty(), "epsilon_greedy: no children");

    if rng.gen::<f64>() < EPSILON {
        return children[rng.gen_range(0..children.len())];
    }

    let parent_visits = arena[node].visits();
    let mut best = children[0];
    let mut best_score = uct_score(parent_visits, &arena[best], beta);
    for &child in &children[1..] {
        let score = uct_score(parent_visits, &arena[child], beta);
        if score > best_score {
            best = child;
            best_score = score;
        }
    }
    best
}

/// Roulette selection: normalise `max(0, score)` over the children and
/// sample categorically. Zero total mass degenerates to a uniform pick.
pub fn uct_sample(
    arena: &NodeArena,
    node: NodeIndex,
    beta: f64,
    rng: &mut impl Rng,
) -> NodeIndex {
    let children = arena[node].children();
    assert!(!children.is_empty(), "uct_sample: no children");

    let parent_visits = arena[node].visits();
    let weights: Vec<f64> = children
        .iter()
        .map(|&c| uct_score(parent_visits, &arena[c], beta).max(0.0))
        .collect();

    match WeightedIndex::new(&weights) {
        Ok(dist) => children[dist.sample(rng)],
        Err(_) => children[rng.gen_range(0..children.len())],
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Node;
    use montecover_graph::State;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    /// Parent with two children carrying fixed statistics.
    fn rigged_pair(
        parent_visits: u64,
        first: (u64, f64),
        second: (u64, f64),
    ) -> (NodeArena, NodeIndex) {
        let mut arena = NodeArena::new();
        let parent = arena.alloc(Node::new(State::new(2), None));
        for (visits, value) in [first, second] {
            let child = arena.alloc(Node::new(State::new(2), Some(parent)));
            for _ in 0..visits {
                arena[child].add_experience(value);
            }
            arena[parent].push_child(child);
        }
        for _ in 0..parent_visits {
            arena[parent].add_experience(0.0);
        }
        (arena, parent)
    }

    #[test]
    fn greedy_part_picks_the_higher_value() {
        // β = 0 removes exploration; the 0.9-value child must win every
        // non-ε draw.
        let (arena, parent) = rigged_pair(20, (10, 0.3), (10, 0.9));
        let better = arena[parent].children()[1];

        let mut rng = SmallRng::seed_from_u64(7);
        let picks = (0..200)
            .filter(|_| epsilon_greedy(&arena, parent, 0.0, &mut rng) == better)
            .count();
        // ~90% greedy picks plus half the ε draws.
        assert!(picks > 150, "picked the better child only {picks}/200 times");
    }

    #[test]
    fn ties_break_toward_the_first_child() {
        let (arena, parent) = rigged_pair(20, (10, 0.5), (10, 0.5));
        let first = arena[parent].children()[0];

        // Drive ε to a miss by sampling many times: the greedy branch must
        // always return the first child.
        let mut rng = SmallRng::seed_from_u64(11);
        let picks = (0..200)
            .filter(|_| epsilon_greedy(&arena, parent, 0.0, &mut rng) == first)
            .count();
        assert!(picks > 150);
    }

    #[test]
    fn exploration_term_favours_the_unvisited() {
        // With a strong β the barely-visited child outscores a well-visited
        // better-valued one.
        let (arena, parent) = rigged_pair(1000, (900, 0.6), (1, 0.1));
        let fresh = arena[parent].children()[1];

        let score_seasoned = uct_score(1000, &arena[arena[parent].children()[0]], 5.0);
        let score_fresh = uct_score(1000, &arena[fresh], 5.0);
        assert!(score_fresh > score_seasoned);
    }

    #[test]
    fn sampling_returns_a_child() {
        let (arena, parent) = rigged_pair(10, (5, 0.4), (5, 0.6));
        let mut rng = SmallRng::seed_from_u64(3);
        for _ in 0..50 {
            let pick = uct_sample(&arena, parent, 0.5, &mut rng);
            assert!(arena[parent].children().contains(&pick));
        }
    }

    #[test]
    fn sampling_survives_zero_mass() {
        // Negative values and β = 0 zero out every weight; the uniform
        // fallback must still answer.
        let (arena, parent) = rigged_pair(10, (5, -1.0), (5, -0.5));
        let mut rng = SmallRng::seed_from_u64(5);
        let pick = uct_sample(&arena, parent, 0.0, &mut rng);
        assert!(arena[parent].children().contains(&pick));
    }
}
