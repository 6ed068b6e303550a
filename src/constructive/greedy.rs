//! Greedy cheapest-insertion construction.
//!
//! Orders are taken by urgency (earliest window end first, orders without
//! window last, then by id). Each order joins the open route where it adds
//! the least cost, possibly upgrading the route to another family. A new
//! route is opened only when no open route can take the order.
//!
//! # Complexity
//!
//! O(n² × F) insertion probes, each O(route length) for the time windows,
//! where F is the number of families.

use tracing::{debug, instrument};

use super::insertion::{InsertionPlanner, NewRoutePolicy};
use crate::error::{Error, Result};
use crate::models::{Instance, OrderId, Solution};

/// Builds a solution by cheapest feasible insertion.
///
/// Deterministic: ties go to the earliest route, then the lowest position,
/// then the lowest family id. Returns [`Error::InfeasibleInput`] for the
/// first order no family can serve alone.
///
/// # Examples
///
/// ```
/// use u_fleet::constructive::{bad_heuristic, greedy_heuristic};
/// use u_fleet::evaluation::{CostModel, Feasibility};
/// use u_fleet::models::{FamilyId, Instance, Location, Order, OrderId, VehicleFamily};
///
/// let instance = Instance::new(
///     Location::new(0.0, 0.0),
///     vec![
///         Order::new(OrderId(1), 2.0, Location::new(1.0, 0.0)),
///         Order::new(OrderId(2), 3.0, Location::new(0.0, 1.0)),
///         Order::new(OrderId(3), 5.0, Location::new(1.0, 1.0)),
///     ],
///     vec![
///         VehicleFamily::new(FamilyId(1), 10.0).with_rental_cost(100.0).with_fuel_cost(1.0),
///         VehicleFamily::new(FamilyId(2), 4.0).with_rental_cost(40.0).with_fuel_cost(2.0),
///     ],
/// )
/// .unwrap();
///
/// let greedy = greedy_heuristic(&instance).unwrap();
/// let bad = bad_heuristic(&instance).unwrap();
/// assert!(greedy.is_feasible(&instance));
/// assert!(greedy.cost(&instance) < bad.cost(&instance));
/// ```
#[instrument(skip_all, fields(orders = instance.num_orders()))]
pub fn greedy_heuristic(instance: &Instance) -> Result<Solution> {
    let mut solution = Solution::new();
    let mut planner = InsertionPlanner::new(instance, solution.routes());

    for order in processing_order(instance) {
        let insertion = planner
            .best(solution.routes(), order, None, NewRoutePolicy::Fallback)
            .ok_or(Error::InfeasibleInput { order })?;
        planner.apply(solution.routes_mut(), order, &insertion);
    }

    debug!(routes = solution.num_routes(), "greedy construction done");
    Ok(solution)
}

/// Earliest window end first, then lowest id.
fn processing_order(instance: &Instance) -> Vec<OrderId> {
    let mut orders: Vec<(f64, OrderId)> = instance
        .orders()
        .iter()
        .map(|o| (o.deadline(), o.id()))
        .collect();
    orders.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
    orders.into_iter().map(|(_, id)| id).collect()
}
