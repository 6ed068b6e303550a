//! Destroy operators.
//!
//! # Operators
//!
//! - [`RandomRemoval`] — Removes random orders
//! - [`WorstRemoval`] — Removes orders whose removal saves the most cost
//! - [`RelatedRemoval`] — Removes orders related by place, size and deadline
//! - [`RouteRemoval`] — Empties whole routes, smallest first
//!
//! Removed orders go to the solution's pending list. Emptied routes are
//! dropped.
//!
//! # Reference
//!
//! Ropke, S. & Pisinger, D. (2006). "An Adaptive Large Neighborhood Search
//! Heuristic for the Pickup and Delivery Problem with Time Windows",
//! *Transportation Science* 40(4), 455-472.

use rand::seq::SliceRandom;
use rand::{Rng, RngCore};

use crate::evaluation::sequence_cost;
use crate::models::{Instance, OrderId, Solution};

/// Removes orders from a solution.
pub trait DestroyOperator: Send + Sync {
    fn name(&self) -> &str;

    /// Moves up to `count` assigned orders of `solution` to its pending list.
    fn destroy(
        &self,
        instance: &Instance,
        solution: &mut Solution,
        count: usize,
        rng: &mut dyn RngCore,
    );
}

/// Removes orders chosen uniformly at random.
///
/// # Examples
///
/// ```
/// use u_fleet::constructive::bad_heuristic;
/// use u_fleet::lns::destroy::{DestroyOperator, RandomRemoval};
/// use u_fleet::models::{FamilyId, Instance, Location, Order, OrderId, VehicleFamily};
/// use u_fleet::random::create_rng;
///
/// let instance = Instance::new(
///     Location::new(0.0, 0.0),
///     (1..=4)
///         .map(|i| Order::new(OrderId(i), 1.0, Location::new(i as f64, 0.0)))
///         .collect(),
///     vec![VehicleFamily::new(FamilyId(0), 10.0)],
/// )
/// .unwrap();
///
/// let mut solution = bad_heuristic(&instance).unwrap();
/// let mut rng = create_rng(42);
/// RandomRemoval.destroy(&instance, &mut solution, 2, &mut rng);
/// assert_eq!(solution.pending().len(), 2);
/// assert_eq!(solution.num_assigned(), 2);
/// ```
pub struct RandomRemoval;

impl DestroyOperator for RandomRemoval {
    fn name(&self) -> &str {
        "random_removal"
    }

    fn destroy(
        &self,
        _instance: &Instance,
        solution: &mut Solution,
        count: usize,
        rng: &mut dyn RngCore,
    ) {
        remove_random(solution, count, rng);
        solution.remove_empty_routes();
    }
}

/// Removes the orders with the largest removal saving.
///
/// The saving of an order is the cost of its route minus the cost of the
/// route without it. Candidates are ranked by saving and the one at rank
/// `⌊y^p × len⌋` is taken, `y` uniform in `[0, 1)` and `p` the
/// randomization exponent: larger `p` is greedier.
pub struct WorstRemoval {
    randomization: f64,
}

impl WorstRemoval {
    pub fn new(randomization: f64) -> Self {
        Self {
            randomization: randomization.max(1.0),
        }
    }

    fn savings(instance: &Instance, solution: &Solution) -> Vec<(OrderId, f64)> {
        let mut savings = Vec::with_capacity(solution.num_assigned());
        let mut remaining = Vec::new();
        for route in solution.routes() {
            let family = &instance[route.family()];
            let cost = sequence_cost(instance, family, route.orders());
            for (pos, &order) in route.orders().iter().enumerate() {
                remaining.clear();
                remaining.extend_from_slice(&route.orders()[..pos]);
                remaining.extend_from_slice(&route.orders()[pos + 1..]);
                savings.push((order, cost - sequence_cost(instance, family, &remaining)));
            }
        }
        savings
    }
}

impl Default for WorstRemoval {
    fn default() -> Self {
        Self::new(3.0)
    }
}

impl DestroyOperator for WorstRemoval {
    fn name(&self) -> &str {
        "worst_removal"
    }

    fn destroy(
        &self,
        instance: &Instance,
        solution: &mut Solution,
        count: usize,
        rng: &mut dyn RngCore,
    ) {
        for _ in 0..count {
            let mut savings = Self::savings(instance, solution);
            if savings.is_empty() {
                break;
            }
            savings.sort_by(|a, b| b.1.total_cmp(&a.1));
            let idx = biased_index(savings.len(), self.randomization, rng);
            unassign_order(solution, savings[idx].0);
        }
        solution.remove_empty_routes();
    }
}

/// Removes orders related to a random seed order (Shaw removal).
///
/// Relatedness of two orders is the weighted sum of their normalized
/// Euclidean distance, demand gap and deadline gap; lower is more related.
/// Each step picks a removed order at random and removes the assigned order
/// at rank `⌊y^p × len⌋` of the relatedness ranking.
///
/// # Reference
///
/// Shaw, P. (1998). "Using Constraint Programming and Local Search Methods
/// to Solve Vehicle Routing Problems", *CP-98*, LNCS 1520, 417-431.
pub struct RelatedRemoval {
    distance_weight: f64,
    time_weight: f64,
    demand_weight: f64,
    randomization: f64,
}

impl RelatedRemoval {
    pub fn new(distance_weight: f64, time_weight: f64, demand_weight: f64, randomization: f64) -> Self {
        Self {
            distance_weight,
            time_weight,
            demand_weight,
            randomization: randomization.max(1.0),
        }
    }
}

impl Default for RelatedRemoval {
    fn default() -> Self {
        Self::new(9.0, 3.0, 2.0, 6.0)
    }
}

/// Scales of the relatedness terms.
struct Scales {
    distance: f64,
    time: f64,
    demand: f64,
}

impl Scales {
    fn of(instance: &Instance) -> Self {
        let orders = instance.orders();
        let deadlines = orders
            .iter()
            .map(|o| o.deadline())
            .filter(|d| d.is_finite());
        let (lo, hi) = deadlines.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), d| {
            (lo.min(d), hi.max(d))
        });
        let demand = orders.iter().map(|o| o.demand()).fold(0.0, f64::max);
        Self {
            distance: nonzero(instance.diameter()),
            time: if hi > lo { hi - lo } else { 1.0 },
            demand: nonzero(demand),
        }
    }
}

fn nonzero(x: f64) -> f64 {
    if x > 0.0 {
        x
    } else {
        1.0
    }
}

impl RelatedRemoval {
    fn relatedness(&self, instance: &Instance, scales: &Scales, a: OrderId, b: OrderId) -> f64 {
        let (a, b) = (&instance[a], &instance[b]);
        let distance = a.location().euclidean(&b.location()) / scales.distance;
        let demand = (a.demand() - b.demand()).abs() / scales.demand;
        let time = match (a.time_window(), b.time_window()) {
            (Some(x), Some(y)) => (x.end() - y.end()).abs() / scales.time,
            (None, None) => 0.0,
            _ => 1.0,
        };
        self.distance_weight * distance + self.time_weight * time + self.demand_weight * demand
    }
}

impl DestroyOperator for RelatedRemoval {
    fn name(&self) -> &str {
        "related_removal"
    }

    fn destroy(
        &self,
        instance: &Instance,
        solution: &mut Solution,
        count: usize,
        rng: &mut dyn RngCore,
    ) {
        let mut assigned = assigned_orders(solution);
        if assigned.is_empty() || count == 0 {
            return;
        }
        let scales = Scales::of(instance);

        let seed = assigned.swap_remove(rng.random_range(0..assigned.len()));
        let mut removed = vec![seed];
        unassign_order(solution, seed);

        while removed.len() < count && !assigned.is_empty() {
            let pivot = removed[rng.random_range(0..removed.len())];
            assigned.sort_by(|&a, &b| {
                self.relatedness(instance, &scales, pivot, a)
                    .total_cmp(&self.relatedness(instance, &scales, pivot, b))
                    .then(a.cmp(&b))
            });
            let idx = biased_index(assigned.len(), self.randomization, rng);
            let order = assigned.remove(idx);
            unassign_order(solution, order);
            removed.push(order);
        }
        solution.remove_empty_routes();
    }
}

/// Empties whole routes, smallest first, then tops up with random orders.
///
/// Routes of equal size are taken in random order. A route is emptied only
/// if it fits in what is left of `count`.
pub struct RouteRemoval;

impl DestroyOperator for RouteRemoval {
    fn name(&self) -> &str {
        "route_removal"
    }

    fn destroy(
        &self,
        _instance: &Instance,
        solution: &mut Solution,
        count: usize,
        rng: &mut dyn RngCore,
    ) {
        let mut order: Vec<usize> = (0..solution.num_routes()).collect();
        order.shuffle(rng);
        order.sort_by_key(|&r| solution.routes()[r].len());

        let mut left = count;
        for r in order {
            let len = solution.routes()[r].len();
            if len == 0 || len > left {
                continue;
            }
            for pos in (0..len).rev() {
                solution.unassign(r, pos);
            }
            left -= len;
        }

        remove_random(solution, left, rng);
        solution.remove_empty_routes();
    }
}

/// The default operator set: random, worst, related and route removal.
pub fn default_operators() -> Vec<Box<dyn DestroyOperator>> {
    vec![
        Box::new(RandomRemoval),
        Box::new(WorstRemoval::default()),
        Box::new(RelatedRemoval::default()),
        Box::new(RouteRemoval),
    ]
}

fn remove_random(solution: &mut Solution, count: usize, rng: &mut dyn RngCore) {
    for _ in 0..count {
        let assigned = solution.num_assigned();
        if assigned == 0 {
            break;
        }
        let mut target = rng.random_range(0..assigned);
        let Some(route) = solution.routes().iter().position(|r| {
            if target < r.len() {
                true
            } else {
                target -= r.len();
                false
            }
        }) else {
            break;
        };
        solution.unassign(route, target);
    }
}

fn assigned_orders(solution: &Solution) -> Vec<OrderId> {
    solution
        .routes()
        .iter()
        .flat_map(|r| r.orders().iter().copied())
        .collect()
}

fn unassign_order(solution: &mut Solution, order: OrderId) {
    if let Some(route) = solution.route_of(order) {
        if let Some(pos) = solution.routes()[route].position(order) {
            solution.unassign(route, pos);
        }
    }
}

/// Rank `⌊y^p × len⌋` with `y` uniform in `[0, 1)`.
fn biased_index(len: usize, p: f64, rng: &mut dyn RngCore) -> usize {
    let y: f64 = rng.random_range(0.0..1.0);
    ((y.powf(p) * len as f64) as usize).min(len - 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constructive::{bad_heuristic, greedy_heuristic};
    use crate::models::{FamilyId, Location, Order, Route, VehicleFamily};
    use crate::random::create_rng;
    use crate::test_utils::{line_instance, random_instance};

    fn check_partition(instance: &Instance, solution: &Solution, removed: usize) {
        assert_eq!(solution.pending().len(), removed);
        assert_eq!(solution.num_assigned() + removed, instance.num_orders());
        assert!(solution.validate(instance).is_ok());
        assert!(solution.routes().iter().all(|r| !r.is_empty()));
    }

    #[test]
    fn test_scales_ignore_depot() {
        let inst = line_instance();
        let scales = Scales::of(&inst);
        // orders span x = 10..40; the depot at 0 does not count
        assert_eq!(scales.distance, 30.0);
        assert_eq!(scales.demand, 10.0);
        assert_eq!(scales.time, 1.0);
    }

    #[test]
    fn test_every_operator_removes_count() {
        let inst = random_instance(2, 30);
        let base = greedy_heuristic(&inst).expect("feasible");
        for op in default_operators() {
            let mut sol = base.clone();
            let mut rng = create_rng(7);
            op.destroy(&inst, &mut sol, 8, &mut rng);
            check_partition(&inst, &sol, 8);
        }
    }

    #[test]
    fn test_count_larger_than_assigned() {
        let inst = line_instance();
        for op in default_operators() {
            let mut sol = bad_heuristic(&inst).expect("feasible");
            let mut rng = create_rng(1);
            op.destroy(&inst, &mut sol, 10, &mut rng);
            assert_eq!(sol.num_routes(), 0, "{}", op.name());
            check_partition(&inst, &sol, 4);
        }
    }

    #[test]
    fn test_worst_removal_greedy_takes_detour() {
        // Order 3 sits far off the line the other orders share.
        let orders = vec![
            Order::new(OrderId(1), 1.0, Location::new(10.0, 0.0)),
            Order::new(OrderId(2), 1.0, Location::new(20.0, 0.0)),
            Order::new(OrderId(3), 1.0, Location::new(15.0, 500.0)),
        ];
        let families = vec![VehicleFamily::new(FamilyId(0), 10.0).with_fuel_cost(1.0)];
        let inst = Instance::new(Location::default(), orders, families).expect("valid");
        let mut sol = Solution::from_routes(vec![Route::with_orders(
            FamilyId(0),
            vec![OrderId(1), OrderId(3), OrderId(2)],
        )]);
        let mut rng = create_rng(3);
        WorstRemoval::new(1_000.0).destroy(&inst, &mut sol, 1, &mut rng);
        assert_eq!(sol.pending(), &[OrderId(3)]);
    }

    #[test]
    fn test_route_removal_prefers_small_routes() {
        let inst = line_instance();
        let mut sol = Solution::from_routes(vec![
            Route::with_orders(FamilyId(1), vec![OrderId(1), OrderId(2), OrderId(3)]),
            Route::with_orders(FamilyId(2), vec![OrderId(4)]),
        ]);
        let mut rng = create_rng(9);
        RouteRemoval.destroy(&inst, &mut sol, 1, &mut rng);
        assert_eq!(sol.pending(), &[OrderId(4)]);
        assert_eq!(sol.num_routes(), 1);
    }

    #[test]
    fn test_related_removal_is_seeded() {
        let inst = random_instance(4, 25);
        let base = greedy_heuristic(&inst).expect("feasible");
        let op = RelatedRemoval::default();
        let mut a = base.clone();
        let mut b = base;
        op.destroy(&inst, &mut a, 5, &mut create_rng(11));
        op.destroy(&inst, &mut b, 5, &mut create_rng(11));
        assert_eq!(a, b);
    }

    #[test]
    fn test_biased_index_in_range() {
        let mut rng = create_rng(0);
        for len in 1..20 {
            assert!(biased_index(len, 3.0, &mut rng) < len);
        }
    }
}
