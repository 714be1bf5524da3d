//! Shortest-path search from the goal over a roadmap.
//!
//! # Module Structure
//!
//! - [`node`]: `SearchNode`, `ClosedSet` - per-solve node arena
//! - [`queue`]: `PriorityQueue` - min-heap with decrease-key
//! - [`solver`]: `solve()`, `SolveOutput`, `CancelToken` - Dijkstra
//! - [`async_solve`]: `AsyncSolver`, `SolveHandle` - background execution

pub mod async_solve;
pub mod node;
pub mod queue;
pub mod solver;

pub use async_solve::{AsyncSolver, SolveHandle, SolvePoll, SolveState};
pub use node::{ClosedSet, SearchNode};
pub use queue::PriorityQueue;
pub use solver::{solve, CancelToken, SolveOutcome, SolveOutput};
