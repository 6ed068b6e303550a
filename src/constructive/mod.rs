//! Constructive heuristics for building initial solutions.
//!
//! - [`bad_heuristic`] — One dedicated largest-capacity vehicle per order, O(n)
//! - [`greedy_heuristic`] — Cheapest feasible insertion with family upgrades, O(n² × F)

mod dedicated;
mod greedy;
pub(crate) mod insertion;

pub use dedicated::bad_heuristic;
pub use greedy::greedy_heuristic;
