pub mod graph;
pub mod kernel;
pub mod load;
pub mod matching;
pub mod oracle;
pub mod state;

pub use graph::{Graph, GraphError};
pub use kernel::{reduce, reduce_once};
pub use load::{load_graph, LoadError};
pub use matching::{alternating_reachability, hopcroft_karp, koenig_cover, Bipartite, Matching};
pub use oracle::{
    coarse_solve, coarsen_graph, exact_solve, greedy_cover, greedy_solve, OracleError,
    EXACT_SOLVE_LIMIT,
};
pub use state::State;
