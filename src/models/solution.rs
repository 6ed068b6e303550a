//! Solution type.

use fxhash::FxHashSet;
use serde::{Deserialize, Serialize};

use super::{Instance, OrderId, Route};
use crate::error::StructuralError;

/// Routes covering the orders of an instance.
///
/// During large neighborhood search a solution may be *partial*: orders
/// removed from their routes wait in [`pending`](Solution::pending) until
/// they are reinserted.
///
/// # Examples
///
/// ```
/// use u_fleet::models::{FamilyId, OrderId, Route, Solution};
///
/// let mut sol = Solution::new();
/// sol.add_route(Route::with_orders(FamilyId(0), vec![OrderId(1), OrderId(2)]));
/// assert_eq!(sol.num_routes(), 1);
/// assert_eq!(sol.num_assigned(), 2);
/// assert!(sol.pending().is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Solution {
    routes: Vec<Route>,
    #[serde(default)]
    pending: Vec<OrderId>,
}

impl Solution {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_routes(routes: Vec<Route>) -> Self {
        Self {
            routes,
            pending: Vec::new(),
        }
    }

    pub fn add_route(&mut self, route: Route) {
        self.routes.push(route);
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn routes_mut(&mut self) -> &mut Vec<Route> {
        &mut self.routes
    }

    pub fn num_routes(&self) -> usize {
        self.routes.len()
    }

    /// Orders awaiting reinsertion.
    pub fn pending(&self) -> &[OrderId] {
        &self.pending
    }

    pub fn pending_mut(&mut self) -> &mut Vec<OrderId> {
        &mut self.pending
    }

    /// Number of orders placed in routes.
    pub fn num_assigned(&self) -> usize {
        self.routes.iter().map(|r| r.len()).sum()
    }

    /// Removes the order at `position` of route `route` and marks it pending.
    pub fn unassign(&mut self, route: usize, position: usize) -> OrderId {
        let order = self.routes[route].remove(position);
        self.pending.push(order);
        order
    }

    /// Index of the route serving `order`, if any.
    pub fn route_of(&self, order: OrderId) -> Option<usize> {
        self.routes.iter().position(|r| r.contains(order))
    }

    pub fn remove_empty_routes(&mut self) {
        self.routes.retain(|r| !r.is_empty());
    }

    /// Checks that every reference resolves in `instance` and no order
    /// appears twice (in routes or pending).
    ///
    /// Coverage is not required: a partial solution passes.
    pub fn validate(&self, instance: &Instance) -> Result<(), StructuralError> {
        let mut seen = FxHashSet::default();
        for route in &self.routes {
            if instance.family(route.family()).is_none() {
                return Err(StructuralError::UnknownFamily(route.family()));
            }
            for &order in route.orders() {
                check_order(instance, &mut seen, order)?;
            }
        }
        for &order in &self.pending {
            check_order(instance, &mut seen, order)?;
        }
        Ok(())
    }
}

fn check_order(
    instance: &Instance,
    seen: &mut FxHashSet<OrderId>,
    order: OrderId,
) -> Result<(), StructuralError> {
    if !instance.contains_order(order) {
        return Err(StructuralError::UnknownOrder(order));
    }
    if !seen.insert(order) {
        return Err(StructuralError::DuplicateAssignment(order));
    }
    Ok(())
}
