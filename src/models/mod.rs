//! Domain model types for heterogeneous fleet routing.
//!
//! Orders with demands, locations and time windows; vehicle families with
//! capacity and cost rates; the immutable instance tying them together;
//! routes and solutions produced by the heuristics.

mod family;
mod instance;
mod order;
mod route;
mod solution;

pub use family::{FamilyId, SpeedProfile, VehicleFamily, DAY};
pub use instance::{Instance, InstanceData};
pub use order::{Location, Order, OrderId, TimeWindow, EARTH_RADIUS};
pub use route::Route;
pub use solution::Solution;

pub(crate) use instance::DEPOT;
