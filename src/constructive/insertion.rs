//! Cheapest feasible insertion of one order into a set of routes.
//!
//! For an existing route every position and every family is tried: the
//! route may switch to any family able to carry the extended sequence. The
//! marginal cost is evaluated from cached route aggregates (load, tour
//! length, spread), so only the time window simulation walks the sequence.

use crate::evaluation::{
    cost_from_parts, is_punctual, load, radius_from_spread, spread, tour_distance, CostModel,
};
use crate::models::{FamilyId, Instance, OrderId, Route, VehicleFamily, DEPOT};

/// Aggregates of a route used to price insertions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct RouteSnapshot {
    pub load: f64,
    pub distance: f64,
    pub spread: f64,
    pub cost: f64,
}

impl RouteSnapshot {
    pub fn of(instance: &Instance, route: &Route) -> Self {
        Self {
            load: load(instance, route.orders()),
            distance: tour_distance(instance, route.orders()),
            spread: spread(instance, route.orders()),
            cost: route.cost(instance),
        }
    }
}

/// Where an order goes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Target {
    Existing { route: usize, position: usize },
    NewRoute,
}

/// A priced insertion: target, family the route ends up with, cost change.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Insertion {
    pub target: Target,
    pub family: FamilyId,
    pub delta: f64,
}

/// When opening a new route is considered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NewRoutePolicy {
    /// Only if no existing route can take the order.
    Fallback,
    /// Alongside existing routes; existing routes win ties.
    Compete,
}

pub(crate) struct InsertionPlanner<'a> {
    instance: &'a Instance,
    families: Vec<FamilyId>,
    snapshots: Vec<RouteSnapshot>,
}

impl<'a> InsertionPlanner<'a> {
    pub fn new(instance: &'a Instance, routes: &[Route]) -> Self {
        Self {
            instance,
            families: instance.family_ids(),
            snapshots: routes
                .iter()
                .map(|r| RouteSnapshot::of(instance, r))
                .collect(),
        }
    }

    pub fn snapshot(&self, route: usize) -> &RouteSnapshot {
        &self.snapshots[route]
    }

    /// Recomputes the cached aggregates of one route after an edit.
    pub fn refresh(&mut self, routes: &[Route], route: usize) {
        self.snapshots[route] = RouteSnapshot::of(self.instance, &routes[route]);
    }

    /// Cheapest feasible position and family for `order` in one route.
    ///
    /// Ties keep the lowest position, then the lowest family id.
    pub fn route_option(&self, routes: &[Route], route: usize, order: OrderId) -> Option<Insertion> {
        let instance = self.instance;
        let current = &routes[route];
        let snap = &self.snapshots[route];
        let point = instance.point(order);
        let total_load = snap.load + instance[order].demand();

        let points: Vec<usize> = current.orders().iter().map(|&o| instance.point(o)).collect();
        let new_spread = points
            .iter()
            .fold(snap.spread, |m, &q| m.max(instance.spread(point, q)));

        let usable: Vec<&VehicleFamily> = self
            .families
            .iter()
            .map(|&f| &instance[f])
            .filter(|f| total_load <= f.capacity() && fits_radius(f, new_spread))
            .collect();
        if usable.is_empty() {
            return None;
        }

        let mut best: Option<Insertion> = None;
        let mut candidate = Vec::with_capacity(points.len() + 1);
        for position in 0..=points.len() {
            let prev = if position == 0 { DEPOT } else { points[position - 1] };
            let next = if position == points.len() {
                DEPOT
            } else {
                points[position]
            };
            let distance = snap.distance + instance.travel(prev, point) + instance.travel(point, next)
                - instance.travel(prev, next);

            for family in &usable {
                let delta = cost_from_parts(family, distance, new_spread) - snap.cost;
                if !best.as_ref().is_none_or(|b| delta < b.delta) {
                    continue;
                }
                candidate.clear();
                candidate.extend_from_slice(&current.orders()[..position]);
                candidate.push(order);
                candidate.extend_from_slice(&current.orders()[position..]);
                if !is_punctual(instance, family, &candidate) {
                    continue;
                }
                best = Some(Insertion {
                    target: Target::Existing { route, position },
                    family: family.id(),
                    delta,
                });
            }
        }
        best
    }

    /// Best option per route, in route order, skipping `skip`.
    pub fn options(&self, routes: &[Route], order: OrderId, skip: Option<usize>) -> Vec<Insertion> {
        (0..routes.len())
            .filter(|&r| Some(r) != skip)
            .filter_map(|r| self.route_option(routes, r, order))
            .collect()
    }

    /// Cheapest family serving `order` alone (ties: lowest family id).
    pub fn new_route_option(&self, order: OrderId) -> Option<Insertion> {
        let instance = self.instance;
        let demand = instance[order].demand();
        let distance = 2.0 * instance.travel(DEPOT, instance.point(order));
        let mut best: Option<Insertion> = None;
        for &id in &self.families {
            let family = &instance[id];
            if demand > family.capacity() {
                continue;
            }
            let delta = cost_from_parts(family, distance, 0.0);
            if !best.as_ref().is_none_or(|b| delta < b.delta) {
                continue;
            }
            if !is_punctual(instance, family, &[order]) {
                continue;
            }
            best = Some(Insertion {
                target: Target::NewRoute,
                family: id,
                delta,
            });
        }
        best
    }

    /// Cheapest insertion of `order` under the given policy.
    ///
    /// Ties between existing routes go to the earliest route.
    pub fn best(
        &self,
        routes: &[Route],
        order: OrderId,
        skip: Option<usize>,
        policy: NewRoutePolicy,
    ) -> Option<Insertion> {
        let existing = cheapest(self.options(routes, order, skip));
        match policy {
            NewRoutePolicy::Fallback => existing.or_else(|| self.new_route_option(order)),
            NewRoutePolicy::Compete => match (existing, self.new_route_option(order)) {
                (Some(e), Some(n)) if n.delta < e.delta => Some(n),
                (e, n) => e.or(n),
            },
        }
    }

    /// Performs an insertion and refreshes the caches.
    pub fn apply(&mut self, routes: &mut Vec<Route>, order: OrderId, insertion: &Insertion) {
        match insertion.target {
            Target::Existing { route, position } => {
                routes[route].insert(position, order);
                routes[route].set_family(insertion.family);
                self.refresh(routes, route);
            }
            Target::NewRoute => {
                let route = Route::with_orders(insertion.family, vec![order]);
                self.snapshots.push(RouteSnapshot::of(self.instance, &route));
                routes.push(route);
            }
        }
    }
}

/// First insertion with the lowest delta.
pub(crate) fn cheapest(options: impl IntoIterator<Item = Insertion>) -> Option<Insertion> {
    options.into_iter().fold(None, |best, o| match best {
        Some(b) if b.delta <= o.delta => Some(b),
        _ => Some(o),
    })
}

fn fits_radius(family: &VehicleFamily, spread: f64) -> bool {
    family
        .max_radius()
        .is_none_or(|max| radius_from_spread(spread) <= max)
}
