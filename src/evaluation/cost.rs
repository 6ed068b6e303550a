//! Rental, fuel and radius cost components.

use serde::{Deserialize, Serialize};

use crate::models::{Instance, OrderId, Route, Solution, VehicleFamily, DEPOT};

/// Cost components of a route or a solution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub rental: f64,
    pub fuel: f64,
    pub radius: f64,
}

impl CostBreakdown {
    /// `rental + fuel + radius`.
    pub fn total(&self) -> f64 {
        self.rental + self.fuel + self.radius
    }
}

impl std::ops::AddAssign for CostBreakdown {
    fn add_assign(&mut self, rhs: Self) {
        self.rental += rhs.rental;
        self.fuel += rhs.fuel;
        self.radius += rhs.radius;
    }
}

/// Operating cost of a [`Route`] or a [`Solution`].
///
/// All methods are pure and deterministic. Empty routes cost zero.
///
/// # Panics
///
/// Panics if a route references a family or an order that `instance` does
/// not contain. Use [`Solution::validate`] to check untrusted solutions.
///
/// # Examples
///
/// ```
/// use u_fleet::evaluation::CostModel;
/// use u_fleet::models::{FamilyId, Instance, Location, Order, OrderId, Route, VehicleFamily};
///
/// let instance = Instance::new(
///     Location::new(0.0, 0.0),
///     vec![Order::new(OrderId(1), 1.0, Location::new(3.0, 4.0))],
///     vec![VehicleFamily::new(FamilyId(0), 10.0).with_rental_cost(10.0).with_fuel_cost(2.0)],
/// )
/// .unwrap();
/// let route = Route::with_orders(FamilyId(0), vec![OrderId(1)]);
/// // rental 10 + fuel 2 × (7 + 7)
/// assert_eq!(route.cost(&instance), 38.0);
/// assert_eq!(Route::new(FamilyId(0)).cost(&instance), 0.0);
/// ```
pub trait CostModel {
    fn breakdown(&self, instance: &Instance) -> CostBreakdown;

    /// Flat cost of the vehicles used.
    fn rental_cost(&self, instance: &Instance) -> f64 {
        self.breakdown(instance).rental
    }

    /// Cost of the distance traveled.
    fn fuel_cost(&self, instance: &Instance) -> f64 {
        self.breakdown(instance).fuel
    }

    /// Cost of the spatial spread of the orders.
    fn radius_cost(&self, instance: &Instance) -> f64 {
        self.breakdown(instance).radius
    }

    fn cost(&self, instance: &Instance) -> f64 {
        self.breakdown(instance).total()
    }
}

impl CostModel for Route {
    fn breakdown(&self, instance: &Instance) -> CostBreakdown {
        sequence_breakdown(instance, &instance[self.family()], self.orders())
    }
}

impl CostModel for Solution {
    fn breakdown(&self, instance: &Instance) -> CostBreakdown {
        let mut total = CostBreakdown::default();
        for route in self.routes() {
            total += route.breakdown(instance);
        }
        total
    }

    /// Sum of route costs, in route order.
    fn cost(&self, instance: &Instance) -> f64 {
        self.routes().iter().map(|r| r.cost(instance)).sum()
    }
}

/// Cost components of `orders` served in sequence by `family`.
pub(crate) fn sequence_breakdown(
    instance: &Instance,
    family: &VehicleFamily,
    orders: &[OrderId],
) -> CostBreakdown {
    if orders.is_empty() {
        return CostBreakdown::default();
    }
    CostBreakdown {
        rental: family.rental_cost(),
        fuel: family.fuel_cost() * tour_distance(instance, orders),
        radius: family.radius_cost() * spread(instance, orders),
    }
}

pub(crate) fn sequence_cost(instance: &Instance, family: &VehicleFamily, orders: &[OrderId]) -> f64 {
    sequence_breakdown(instance, family, orders).total()
}

/// Cost of a sequence from its precomputed aggregates.
pub(crate) fn cost_from_parts(family: &VehicleFamily, distance: f64, spread: f64) -> f64 {
    family.rental_cost() + family.fuel_cost() * distance + family.radius_cost() * spread
}

/// Manhattan length of the closed tour depot → orders → depot.
pub(crate) fn tour_distance(instance: &Instance, orders: &[OrderId]) -> f64 {
    if orders.is_empty() {
        return 0.0;
    }
    let mut total = 0.0;
    let mut prev = DEPOT;
    for &order in orders {
        let point = instance.point(order);
        total += instance.travel(prev, point);
        prev = point;
    }
    total + instance.travel(prev, DEPOT)
}

/// Largest squared Euclidean distance between two orders of the sequence.
pub(crate) fn spread(instance: &Instance, orders: &[OrderId]) -> f64 {
    let points: Vec<usize> = orders.iter().map(|&o| instance.point(o)).collect();
    let mut max = 0.0f64;
    for (i, &a) in points.iter().enumerate() {
        for &b in &points[i + 1..] {
            max = max.max(instance.spread(a, b));
        }
    }
    max
}

/// Route radius: half the largest pairwise distance.
pub(crate) fn radius_from_spread(spread: f64) -> f64 {
    spread.sqrt() / 2.0
}

/// Total demand of the sequence.
pub(crate) fn load(instance: &Instance, orders: &[OrderId]) -> f64 {
    orders.iter().map(|&o| instance[o].demand()).sum()
}
