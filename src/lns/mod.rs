//! Adaptive large neighborhood search.
//!
//! - [`LargeNeighborhoodSearch`] — Destroy/repair loop with adaptive operator weights
//! - [`LnsConfig`] — Iteration and time budget, destroy size, acceptance, scoring
//! - [`destroy`] — Destroy operators (random, worst, related, route removal)
//! - [`repair`] — Repair operators (greedy insertion, regret insertion)
//!
//! # Reference
//!
//! Ropke, S. & Pisinger, D. (2006). "An Adaptive Large Neighborhood Search
//! Heuristic for the Pickup and Delivery Problem with Time Windows",
//! *Transportation Science* 40(4), 455-472.

mod config;
pub mod destroy;
pub mod repair;
mod runner;
mod weights;

pub use config::{Acceptance, LnsConfig};
pub use runner::{large_neighborhood_search, LargeNeighborhoodSearch, LnsOutcome, StopReason};
