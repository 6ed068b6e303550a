//! # u-fleet
//!
//! Delivery routing with a heterogeneous rented fleet: a cost model
//! (rental, fuel and radius costs), feasibility rules (capacity, radius,
//! time windows under time-dependent speeds), constructive heuristics, local
//! search and adaptive large neighborhood search.
//!
//! ## Modules
//!
//! - [`models`] — Domain model types (Order, VehicleFamily, Instance, Route, Solution)
//! - [`distance`] — Dense distance matrices (Manhattan, squared Euclidean)
//! - [`evaluation`] — Cost breakdown, feasibility checking and schedules
//! - [`constructive`] — Constructive heuristics (dedicated vehicles, greedy insertion)
//! - [`local_search`] — Steepest-descent local search (relocate, swap, reorder, refit)
//! - [`lns`] — Adaptive large neighborhood search with destroy/repair operators
//! - [`solver`] — Greedy → local search → LNS pipeline, sequential or parallel
//! - [`random`] — Seeded random number generation
//!
//! ## Example
//!
//! ```
//! use u_fleet::constructive::{bad_heuristic, greedy_heuristic};
//! use u_fleet::evaluation::{CostModel, Feasibility};
//! use u_fleet::local_search::local_search;
//! use u_fleet::models::{FamilyId, Instance, Location, Order, OrderId, VehicleFamily};
//!
//! let instance = Instance::new(
//!     Location::new(0.0, 0.0),
//!     vec![
//!         Order::new(OrderId(1), 2.0, Location::new(1.0, 0.0)),
//!         Order::new(OrderId(2), 3.0, Location::new(0.0, 1.0)),
//!         Order::new(OrderId(3), 5.0, Location::new(1.0, 1.0)),
//!     ],
//!     vec![
//!         VehicleFamily::new(FamilyId(1), 10.0).with_rental_cost(100.0).with_fuel_cost(1.0),
//!         VehicleFamily::new(FamilyId(2), 4.0).with_rental_cost(40.0).with_fuel_cost(2.0),
//!     ],
//! )
//! .unwrap();
//!
//! let bad = bad_heuristic(&instance).unwrap();
//! assert_eq!(bad.rental_cost(&instance), 300.0);
//!
//! let greedy = greedy_heuristic(&instance).unwrap();
//! let improved = local_search(&instance, greedy.clone()).unwrap();
//! assert!(improved.is_feasible(&instance));
//! assert!(improved.cost(&instance) <= greedy.cost(&instance));
//! assert!(greedy.cost(&instance) < bad.cost(&instance));
//! ```

pub mod constructive;
pub mod distance;
pub mod error;
pub mod evaluation;
pub mod lns;
pub mod local_search;
pub mod models;
pub mod random;
pub mod solver;

#[cfg(test)]
mod test_utils;

pub use error::{Error, Result, StructuralError};
pub use solver::{solve, solve_parallel, SolverConfig};
