//! One dedicated vehicle per order.
//!
//! The baseline every other heuristic should beat: each order gets its own
//! route, all of the family with the largest capacity. Capacity is the only
//! rule checked; radius and time windows may leave the baseline infeasible.

use tracing::{debug, instrument};

use crate::error::{Error, Result};
use crate::models::{Instance, Route, Solution, VehicleFamily};

/// Builds one singleton route per order with the largest-capacity family.
///
/// Ties on capacity go to the family defined first. Returns
/// [`Error::InfeasibleInput`] if an order is heavier than that capacity,
/// in which case no family can carry it.
///
/// # Examples
///
/// ```
/// use u_fleet::constructive::bad_heuristic;
/// use u_fleet::models::{FamilyId, Instance, Location, Order, OrderId, VehicleFamily};
///
/// let instance = Instance::new(
///     Location::new(0.0, 0.0),
///     vec![
///         Order::new(OrderId(1), 2.0, Location::new(1.0, 0.0)),
///         Order::new(OrderId(2), 3.0, Location::new(0.0, 1.0)),
///     ],
///     vec![
///         VehicleFamily::new(FamilyId(1), 10.0),
///         VehicleFamily::new(FamilyId(2), 4.0),
///     ],
/// )
/// .unwrap();
///
/// let solution = bad_heuristic(&instance).unwrap();
/// assert_eq!(solution.num_routes(), 2);
/// assert!(solution.routes().iter().all(|r| r.family() == FamilyId(1)));
/// ```
#[instrument(skip_all, fields(orders = instance.num_orders()))]
pub fn bad_heuristic(instance: &Instance) -> Result<Solution> {
    let Some(family) = largest_family(instance) else {
        return match instance.orders().first() {
            Some(order) => Err(Error::InfeasibleInput { order: order.id() }),
            None => Ok(Solution::new()),
        };
    };

    let mut solution = Solution::new();
    for order in instance.orders() {
        if order.demand() > family.capacity() {
            return Err(Error::InfeasibleInput { order: order.id() });
        }
        solution.add_route(Route::with_orders(family.id(), vec![order.id()]));
    }

    debug!(family = %family.id(), routes = solution.num_routes(), "dedicated routes built");
    Ok(solution)
}

/// Family with the largest capacity, first defined on ties.
fn largest_family(instance: &Instance) -> Option<&VehicleFamily> {
    instance.families().iter().fold(None, |best, f| match best {
        Some(b) if b.capacity() >= f.capacity() => Some(b),
        _ => Some(f),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation::{CostModel, Feasibility};
    use crate::models::{FamilyId, Location, Order, OrderId};
    use crate::test_utils::{line_instance, scenario_instance};

    #[test]
    fn test_bad_one_route_per_order() {
        let inst = line_instance();
        let sol = bad_heuristic(&inst).expect("feasible");
        assert_eq!(sol.num_routes(), 4);
        for (route, order) in sol.routes().iter().zip(inst.orders()) {
            assert_eq!(route.orders(), &[order.id()]);
            assert_eq!(route.family(), FamilyId(1));
        }
        assert!(sol.is_feasible(&inst));
    }

    #[test]
    fn test_bad_scenario_rental() {
        let inst = scenario_instance();
        let sol = bad_heuristic(&inst).expect("feasible");
        assert_eq!(sol.rental_cost(&inst), 300.0);
    }

    #[test]
    fn test_bad_capacity_tie_takes_first() {
        let orders = vec![Order::new(OrderId(1), 1.0, Location::new(1.0, 1.0))];
        let families = vec![
            VehicleFamily::new(FamilyId(7), 10.0),
            VehicleFamily::new(FamilyId(3), 10.0),
        ];
        let inst = Instance::new(Location::default(), orders, families).expect("valid");
        let sol = bad_heuristic(&inst).expect("feasible");
        assert_eq!(sol.routes()[0].family(), FamilyId(7));
    }

    #[test]
    fn test_bad_rejects_oversized_order() {
        let orders = vec![Order::new(OrderId(1), 50.0, Location::new(1.0, 1.0))];
        let families = vec![VehicleFamily::new(FamilyId(0), 10.0)];
        let inst = Instance::new(Location::default(), orders, families).expect("valid");
        assert_eq!(
            bad_heuristic(&inst),
            Err(Error::InfeasibleInput { order: OrderId(1) })
        );
    }

    #[test]
    fn test_bad_empty_instance() {
        let inst = Instance::new(Location::default(), vec![], vec![]).expect("valid");
        let sol = bad_heuristic(&inst).expect("empty");
        assert_eq!(sol.num_routes(), 0);
    }
}
