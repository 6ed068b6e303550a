//! Capacity, radius, time window and coverage checks.

use fxhash::FxHashSet;

use super::cost::{load, radius_from_spread, spread};
use super::schedule::{is_punctual, Schedule};
use crate::models::{FamilyId, Instance, OrderId, Route, Solution, VehicleFamily};

/// A constraint violation in a route or solution.
#[derive(Debug, Clone, PartialEq)]
pub enum Violation {
    /// Total demand above the family capacity.
    CapacityExceeded {
        route_index: usize,
        load: f64,
        capacity: f64,
    },
    /// Route radius above the family limit.
    RadiusExceeded {
        route_index: usize,
        radius: f64,
        max_radius: f64,
    },
    /// Service starts after the order's window closes.
    TimeWindowViolated {
        route_index: usize,
        order: OrderId,
        service_start: f64,
        end: f64,
    },
    UnknownFamily {
        route_index: usize,
        family: FamilyId,
    },
    UnknownOrder {
        route_index: usize,
        order: OrderId,
    },
    /// Order served by no route.
    Unassigned { order: OrderId },
    /// Order served more than once.
    Duplicated { order: OrderId },
    /// Order still waiting for reinsertion.
    Pending { order: OrderId },
}

/// Feasibility of a [`Route`] or a [`Solution`].
///
/// A route is feasible when it respects the capacity, radius and time window
/// rules of its family. A solution is feasible when every route is and every
/// order of the instance is served exactly once. Unknown references are
/// reported as violations, never as panics.
///
/// # Examples
///
/// ```
/// use u_fleet::evaluation::Feasibility;
/// use u_fleet::models::{FamilyId, Instance, Location, Order, OrderId, Route, Solution, VehicleFamily};
///
/// let instance = Instance::new(
///     Location::new(0.0, 0.0),
///     vec![
///         Order::new(OrderId(1), 6.0, Location::new(1.0, 0.0)),
///         Order::new(OrderId(2), 6.0, Location::new(2.0, 0.0)),
///     ],
///     vec![VehicleFamily::new(FamilyId(0), 10.0)],
/// )
/// .unwrap();
///
/// let overloaded = Route::with_orders(FamilyId(0), vec![OrderId(1), OrderId(2)]);
/// assert!(!overloaded.is_feasible(&instance));
///
/// let split = Solution::from_routes(vec![
///     Route::with_orders(FamilyId(0), vec![OrderId(1)]),
///     Route::with_orders(FamilyId(0), vec![OrderId(2)]),
/// ]);
/// assert!(split.is_feasible(&instance));
/// ```
pub trait Feasibility {
    fn violations(&self, instance: &Instance) -> Vec<Violation>;

    fn is_feasible(&self, instance: &Instance) -> bool {
        self.violations(instance).is_empty()
    }
}

impl Feasibility for Route {
    fn violations(&self, instance: &Instance) -> Vec<Violation> {
        let mut violations = Vec::new();
        route_violations(instance, self, 0, &mut violations);
        violations
    }

    fn is_feasible(&self, instance: &Instance) -> bool {
        let Some(family) = instance.family(self.family()) else {
            return false;
        };
        self.orders().iter().all(|&o| instance.contains_order(o))
            && sequence_is_feasible(instance, family, self.orders())
    }
}

impl Feasibility for Solution {
    fn violations(&self, instance: &Instance) -> Vec<Violation> {
        let mut violations = Vec::new();
        for (idx, route) in self.routes().iter().enumerate() {
            route_violations(instance, route, idx, &mut violations);
        }
        coverage_violations(instance, self, &mut violations);
        violations
    }
}

impl Solution {
    /// Checks the route rules only, ignoring coverage, so a solution with
    /// pending orders can still pass.
    pub fn routes_feasible(&self, instance: &Instance) -> bool {
        self.routes().iter().all(|r| r.is_feasible(instance))
    }
}

/// Capacity, radius and time window check of a known sequence.
pub(crate) fn sequence_is_feasible(
    instance: &Instance,
    family: &VehicleFamily,
    orders: &[OrderId],
) -> bool {
    if load(instance, orders) > family.capacity() {
        return false;
    }
    if let Some(max_radius) = family.max_radius() {
        if radius_from_spread(spread(instance, orders)) > max_radius {
            return false;
        }
    }
    is_punctual(instance, family, orders)
}

fn route_violations(
    instance: &Instance,
    route: &Route,
    route_index: usize,
    violations: &mut Vec<Violation>,
) {
    let Some(family) = instance.family(route.family()) else {
        violations.push(Violation::UnknownFamily {
            route_index,
            family: route.family(),
        });
        return;
    };

    let unknown: Vec<OrderId> = route
        .orders()
        .iter()
        .copied()
        .filter(|&o| !instance.contains_order(o))
        .collect();
    if !unknown.is_empty() {
        violations.extend(
            unknown
                .into_iter()
                .map(|order| Violation::UnknownOrder { route_index, order }),
        );
        return;
    }

    let orders = route.orders();
    let total = load(instance, orders);
    if total > family.capacity() {
        violations.push(Violation::CapacityExceeded {
            route_index,
            load: total,
            capacity: family.capacity(),
        });
    }

    if let Some(max_radius) = family.max_radius() {
        let radius = radius_from_spread(spread(instance, orders));
        if radius > max_radius {
            violations.push(Violation::RadiusExceeded {
                route_index,
                radius,
                max_radius,
            });
        }
    }

    let schedule = Schedule::build(instance, family, orders);
    for visit in schedule.late_visits(instance) {
        let end = instance[visit.order]
            .time_window()
            .map_or(f64::INFINITY, |tw| tw.end());
        violations.push(Violation::TimeWindowViolated {
            route_index,
            order: visit.order,
            service_start: visit.service_start,
            end,
        });
    }
}

fn coverage_violations(instance: &Instance, solution: &Solution, violations: &mut Vec<Violation>) {
    let mut seen = FxHashSet::default();
    for route in solution.routes() {
        for &order in route.orders() {
            if instance.contains_order(order) && !seen.insert(order) {
                violations.push(Violation::Duplicated { order });
            }
        }
    }
    for &order in solution.pending() {
        violations.push(Violation::Pending { order });
    }
    for order in instance.orders() {
        if !seen.contains(&order.id()) && !solution.pending().contains(&order.id()) {
            violations.push(Violation::Unassigned { order: order.id() });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Location, Order, TimeWindow};
    use crate::test_utils::line_instance;

    #[test]
    fn test_empty_route_feasible() {
        let inst = line_instance();
        assert!(Route::new(FamilyId(2)).is_feasible(&inst));
        assert!(Route::new(FamilyId(2)).violations(&inst).is_empty());
    }

    #[test]
    fn test_capacity_violation() {
        let inst = line_instance();
        let route = Route::with_orders(FamilyId(2), vec![OrderId(1), OrderId(2)]);
        assert!(!route.is_feasible(&inst));
        assert_eq!(
            route.violations(&inst),
            vec![Violation::CapacityExceeded {
                route_index: 0,
                load: 20.0,
                capacity: 15.0,
            }]
        );
    }

    #[test]
    fn test_radius_violation() {
        let orders = vec![
            Order::new(OrderId(1), 1.0, Location::new(0.0, 0.0)),
            Order::new(OrderId(2), 1.0, Location::new(0.0, 30.0)),
        ];
        let families = vec![VehicleFamily::new(FamilyId(0), 10.0).with_max_radius(10.0)];
        let inst = Instance::new(Location::default(), orders, families).expect("valid");
        let route = Route::with_orders(FamilyId(0), vec![OrderId(1), OrderId(2)]);
        assert!(matches!(
            route.violations(&inst)[..],
            [Violation::RadiusExceeded { radius, .. }] if (radius - 15.0).abs() < 1e-9
        ));
        // a single order has radius 0
        assert!(Route::with_orders(FamilyId(0), vec![OrderId(2)]).is_feasible(&inst));
    }

    #[test]
    fn test_time_window_violation() {
        let orders = vec![Order::new(OrderId(1), 1.0, Location::new(50.0, 0.0))
            .with_time_window(TimeWindow::new(0.0, 10.0).expect("valid"))];
        let families = vec![VehicleFamily::new(FamilyId(0), 10.0).with_speed(1.0, 0.0)];
        let inst = Instance::new(Location::default(), orders, families).expect("valid");
        let route = Route::with_orders(FamilyId(0), vec![OrderId(1)]);
        assert!(!route.is_feasible(&inst));
        assert!(matches!(
            route.violations(&inst)[..],
            [Violation::TimeWindowViolated { order: OrderId(1), .. }]
        ));
    }

    #[test]
    fn test_coverage() {
        let inst = line_instance();
        let mut sol = Solution::from_routes(vec![
            Route::with_orders(FamilyId(1), vec![OrderId(1), OrderId(2)]),
            Route::with_orders(FamilyId(2), vec![OrderId(3)]),
        ]);
        assert_eq!(
            sol.violations(&inst),
            vec![Violation::Unassigned { order: OrderId(4) }]
        );
        sol.pending_mut().push(OrderId(4));
        assert_eq!(
            sol.violations(&inst),
            vec![Violation::Pending { order: OrderId(4) }]
        );
        assert!(sol.routes_feasible(&inst));
        let order = sol.pending_mut().remove(0);
        sol.routes_mut()[0].push(order);
        assert!(sol.is_feasible(&inst));
        sol.routes_mut()[0].push(OrderId(3));
        assert!(sol
            .violations(&inst)
            .contains(&Violation::Duplicated { order: OrderId(3) }));
    }

    #[test]
    fn test_unknown_references_reported() {
        let inst = line_instance();
        let sol = Solution::from_routes(vec![
            Route::with_orders(FamilyId(8), vec![OrderId(1)]),
            Route::with_orders(FamilyId(1), vec![OrderId(50)]),
        ]);
        let v = sol.violations(&inst);
        assert!(v.contains(&Violation::UnknownFamily {
            route_index: 0,
            family: FamilyId(8)
        }));
        assert!(v.contains(&Violation::UnknownOrder {
            route_index: 1,
            order: OrderId(50)
        }));
        assert!(!sol.is_feasible(&inst));
    }

    #[test]
    fn test_feasibility_is_deterministic() {
        let inst = line_instance();
        let sol = Solution::from_routes(vec![Route::with_orders(
            FamilyId(1),
            vec![OrderId(1), OrderId(2), OrderId(3), OrderId(4)],
        )]);
        assert_eq!(sol.is_feasible(&inst), sol.is_feasible(&inst));
        assert!(!sol.is_feasible(&inst));
    }
}
