//! Route type.

use serde::{Deserialize, Serialize};

use super::{FamilyId, OrderId};

/// An ordered sequence of orders served by one vehicle of one family.
///
/// The route starts and ends at the depot (not stored). The family is kept
/// as an id; its parameters are looked up in the [`Instance`](super::Instance).
///
/// # Examples
///
/// ```
/// use u_fleet::models::{FamilyId, OrderId, Route};
///
/// let mut route = Route::new(FamilyId(1));
/// route.push(OrderId(4));
/// route.insert(0, OrderId(2));
/// assert_eq!(route.orders(), &[OrderId(2), OrderId(4)]);
/// assert_eq!(route.family(), FamilyId(1));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    family: FamilyId,
    orders: Vec<OrderId>,
}

impl Route {
    /// Creates an empty route for the given family.
    pub fn new(family: FamilyId) -> Self {
        Self {
            family,
            orders: Vec::new(),
        }
    }

    pub fn with_orders(family: FamilyId, orders: Vec<OrderId>) -> Self {
        Self { family, orders }
    }

    pub fn family(&self) -> FamilyId {
        self.family
    }

    pub fn set_family(&mut self, family: FamilyId) {
        self.family = family;
    }

    /// Orders in visit order.
    pub fn orders(&self) -> &[OrderId] {
        &self.orders
    }

    pub fn orders_mut(&mut self) -> &mut Vec<OrderId> {
        &mut self.orders
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    pub fn push(&mut self, order: OrderId) {
        self.orders.push(order);
    }

    pub fn insert(&mut self, position: usize, order: OrderId) {
        self.orders.insert(position, order);
    }

    pub fn remove(&mut self, position: usize) -> OrderId {
        self.orders.remove(position)
    }

    pub fn position(&self, order: OrderId) -> Option<usize> {
        self.orders.iter().position(|&o| o == order)
    }

    pub fn contains(&self, order: OrderId) -> bool {
        self.orders.contains(&order)
    }
}
