//! Cost evaluation and feasibility checking.
//!
//! - [`CostModel`] — rental, fuel and radius cost of routes and solutions
//! - [`Feasibility`] — capacity, radius, time window and coverage rules
//! - [`Schedule`] — arrival and service times along a route

mod cost;
mod feasibility;
mod schedule;

pub use cost::{CostBreakdown, CostModel};
pub use feasibility::{Feasibility, Violation};
pub use schedule::{Schedule, Visit};

pub(crate) use cost::{
    cost_from_parts, load, radius_from_spread, sequence_cost, spread, tour_distance,
};
pub(crate) use feasibility::sequence_is_feasible;
pub(crate) use schedule::is_punctual;
