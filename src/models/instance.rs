//! Immutable problem instance.

use std::ops::Index;

use fxhash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::{FamilyId, Location, Order, OrderId, TimeWindow, VehicleFamily};
use crate::distance::{DistanceMatrix, Metric};
use crate::error::StructuralError;

/// Index of the depot in the distance matrices.
pub(crate) const DEPOT: usize = 0;

/// Orders and vehicle families of one delivery problem.
///
/// Built once through [`Instance::new`], which validates ids and numeric
/// fields, then shared read-only by every heuristic. Families and orders are
/// looked up by id; indexing with an unknown id panics.
///
/// # Examples
///
/// ```
/// use u_fleet::models::{FamilyId, Instance, Location, Order, OrderId, VehicleFamily};
///
/// let instance = Instance::new(
///     Location::new(0.0, 0.0),
///     vec![Order::new(OrderId(1), 5.0, Location::new(10.0, 0.0))],
///     vec![VehicleFamily::new(FamilyId(1), 20.0).with_rental_cost(50.0)],
/// )
/// .unwrap();
/// assert_eq!(instance.num_orders(), 1);
/// assert_eq!(instance[FamilyId(1)].rental_cost(), 50.0);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "InstanceData", into = "InstanceData")]
pub struct Instance {
    depot: Location,
    orders: Vec<Order>,
    families: Vec<VehicleFamily>,
    order_index: FxHashMap<OrderId, usize>,
    family_index: FxHashMap<FamilyId, usize>,
    travel: DistanceMatrix,
    spread: DistanceMatrix,
    diameter: f64,
}

/// Serialized form of an [`Instance`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstanceData {
    pub depot: Location,
    pub orders: Vec<Order>,
    pub families: Vec<VehicleFamily>,
}

impl Instance {
    /// Validates and builds an instance.
    pub fn new(
        depot: Location,
        orders: Vec<Order>,
        families: Vec<VehicleFamily>,
    ) -> Result<Self, StructuralError> {
        if !depot.is_finite() {
            return Err(StructuralError::InvalidDepot);
        }
        let mut order_index = FxHashMap::default();
        for (i, order) in orders.iter().enumerate() {
            validate_order(order)?;
            if order_index.insert(order.id(), i).is_some() {
                return Err(StructuralError::DuplicateOrder(order.id()));
            }
        }

        let mut family_index = FxHashMap::default();
        for (i, family) in families.iter().enumerate() {
            validate_family(family)?;
            if family_index.insert(family.id(), i).is_some() {
                return Err(StructuralError::DuplicateFamily(family.id()));
            }
        }

        let points: Vec<Location> = std::iter::once(depot)
            .chain(orders.iter().map(|o| o.location()))
            .collect();
        let travel = DistanceMatrix::from_locations(&points, Metric::Manhattan);
        let spread = DistanceMatrix::from_locations(&points, Metric::EuclideanSquared);
        let mut widest: f64 = 0.0;
        for i in 1..points.len() {
            for j in (i + 1)..points.len() {
                widest = widest.max(spread.get(i, j));
            }
        }

        Ok(Self {
            depot,
            orders,
            families,
            order_index,
            family_index,
            travel,
            spread,
            diameter: widest.sqrt(),
        })
    }

    pub fn depot(&self) -> Location {
        self.depot
    }

    /// Orders in definition order.
    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    /// Families in definition order.
    pub fn families(&self) -> &[VehicleFamily] {
        &self.families
    }

    pub fn num_orders(&self) -> usize {
        self.orders.len()
    }

    pub fn order(&self, id: OrderId) -> Option<&Order> {
        self.order_index.get(&id).map(|&i| &self.orders[i])
    }

    pub fn family(&self, id: FamilyId) -> Option<&VehicleFamily> {
        self.family_index.get(&id).map(|&i| &self.families[i])
    }

    /// Largest Euclidean distance between two orders.
    pub fn diameter(&self) -> f64 {
        self.diameter
    }

    pub fn contains_order(&self, id: OrderId) -> bool {
        self.order_index.contains_key(&id)
    }

    /// Family ids sorted ascending, the tie-break order of the heuristics.
    pub fn family_ids(&self) -> Vec<FamilyId> {
        let mut ids: Vec<FamilyId> = self.families.iter().map(|f| f.id()).collect();
        ids.sort_unstable();
        ids
    }

    /// Matrix index of an order.
    ///
    /// # Panics
    ///
    /// Panics if the order is not part of the instance.
    pub(crate) fn point(&self, id: OrderId) -> usize {
        self.order_index[&id] + 1
    }

    /// Manhattan distance between two matrix points.
    pub(crate) fn travel(&self, from: usize, to: usize) -> f64 {
        self.travel.get(from, to)
    }

    /// Squared Euclidean distance between two matrix points.
    pub(crate) fn spread(&self, a: usize, b: usize) -> f64 {
        self.spread.get(a, b)
    }
}

impl Index<OrderId> for Instance {
    type Output = Order;

    fn index(&self, id: OrderId) -> &Order {
        &self.orders[self.order_index[&id]]
    }
}

impl Index<FamilyId> for Instance {
    type Output = VehicleFamily;

    fn index(&self, id: FamilyId) -> &VehicleFamily {
        &self.families[self.family_index[&id]]
    }
}

impl TryFrom<InstanceData> for Instance {
    type Error = StructuralError;

    fn try_from(data: InstanceData) -> Result<Self, Self::Error> {
        Instance::new(data.depot, data.orders, data.families)
    }
}

impl From<Instance> for InstanceData {
    fn from(instance: Instance) -> Self {
        InstanceData {
            depot: instance.depot,
            orders: instance.orders,
            families: instance.families,
        }
    }
}

fn validate_order(order: &Order) -> Result<(), StructuralError> {
    if !order.demand().is_finite() || order.demand() < 0.0 {
        return Err(StructuralError::InvalidDemand {
            order: order.id(),
            demand: order.demand(),
        });
    }
    let duration = order.service_duration();
    if !duration.is_finite() || duration < 0.0 {
        return Err(StructuralError::InvalidServiceDuration {
            order: order.id(),
            duration,
        });
    }
    if !order.location().is_finite() {
        return Err(StructuralError::InvalidLocation(order.id()));
    }
    // Deserialized windows bypass `TimeWindow::new`.
    if let Some(tw) = order.time_window() {
        if TimeWindow::new(tw.start(), tw.end()).is_none() {
            return Err(StructuralError::InvalidTimeWindow {
                order: order.id(),
                start: tw.start(),
                end: tw.end(),
            });
        }
    }
    Ok(())
}

fn validate_family(family: &VehicleFamily) -> Result<(), StructuralError> {
    let invalid = |field: &'static str, value: f64| StructuralError::InvalidFamily {
        family: family.id(),
        field,
        value,
    };

    let non_negative = [
        ("capacity", family.capacity()),
        ("rental_cost", family.rental_cost()),
        ("fuel_cost", family.fuel_cost()),
        ("radius_cost", family.radius_cost()),
        ("parking_time", family.parking_time()),
    ];
    for (field, value) in non_negative {
        if !value.is_finite() || value < 0.0 {
            return Err(invalid(field, value));
        }
    }
    if let Some(radius) = family.max_radius() {
        if !radius.is_finite() || radius < 0.0 {
            return Err(invalid("max_radius", radius));
        }
    }
    if !family.speed().is_finite() || family.speed() <= 0.0 {
        return Err(invalid("speed", family.speed()));
    }
    if let Some(bad) = family.speed_profile().coefficients().find(|c| !c.is_finite()) {
        return Err(invalid("speed_profile", bad));
    }
    Ok(())
}
