//! Repair operators.
//!
//! # Operators
//!
//! - [`GreedyInsertion`] — Pending orders in random order, each at its cheapest point
//! - [`RegretInsertion`] — Order with the largest regret first
//!
//! Both consider every route, every family upgrade and a new route. An order
//! with no feasible point fails the repair with [`Error::InfeasibleInput`].
//!
//! # Reference
//!
//! Potvin, J.-Y. & Rousseau, J.-M. (1993). "A Parallel Route Building
//! Algorithm for the Vehicle Routing and Scheduling Problem with Time
//! Windows", *European Journal of Operational Research* 66(3), 331-340.

use rand::seq::SliceRandom;
use rand::RngCore;

use crate::constructive::insertion::{cheapest, Insertion, InsertionPlanner, NewRoutePolicy};
use crate::error::{Error, Result};
use crate::models::{Instance, OrderId, Solution};

/// Reinserts the pending orders of a solution.
pub trait RepairOperator: Send + Sync {
    fn name(&self) -> &str;

    /// Empties the pending list of `solution` into its routes.
    ///
    /// On error the solution is left partially repaired.
    fn repair(&self, instance: &Instance, solution: &mut Solution, rng: &mut dyn RngCore)
        -> Result<()>;
}

/// Cheapest feasible insertion of the pending orders, shuffled.
///
/// # Examples
///
/// ```
/// use u_fleet::evaluation::Feasibility;
/// use u_fleet::lns::repair::{GreedyInsertion, RepairOperator};
/// use u_fleet::models::{FamilyId, Instance, Location, Order, OrderId, Solution, VehicleFamily};
/// use u_fleet::random::create_rng;
///
/// let instance = Instance::new(
///     Location::new(0.0, 0.0),
///     (1..=3)
///         .map(|i| Order::new(OrderId(i), 1.0, Location::new(i as f64, 0.0)))
///         .collect(),
///     vec![VehicleFamily::new(FamilyId(0), 10.0).with_rental_cost(5.0)],
/// )
/// .unwrap();
///
/// let mut solution = Solution::new();
/// solution.pending_mut().extend([OrderId(1), OrderId(2), OrderId(3)]);
/// GreedyInsertion.repair(&instance, &mut solution, &mut create_rng(1)).unwrap();
/// assert!(solution.is_feasible(&instance));
/// assert_eq!(solution.num_routes(), 1);
/// ```
pub struct GreedyInsertion;

impl RepairOperator for GreedyInsertion {
    fn name(&self) -> &str {
        "greedy_insertion"
    }

    fn repair(
        &self,
        instance: &Instance,
        solution: &mut Solution,
        rng: &mut dyn RngCore,
    ) -> Result<()> {
        let mut pending = std::mem::take(solution.pending_mut());
        pending.shuffle(rng);

        let mut planner = InsertionPlanner::new(instance, solution.routes());
        while let Some(order) = pending.pop() {
            let Some(insertion) =
                planner.best(solution.routes(), order, None, NewRoutePolicy::Compete)
            else {
                pending.push(order);
                solution.pending_mut().extend(pending);
                return Err(Error::InfeasibleInput { order });
            };
            planner.apply(solution.routes_mut(), order, &insertion);
        }
        Ok(())
    }
}

/// Regret-2 insertion.
///
/// Each step inserts the pending order whose best and second-best options
/// (over distinct routes, a new route counting as one) differ the most. An
/// order with a single option has infinite regret. Ties go to the cheaper
/// best option, then to the earlier pending order. Deterministic.
pub struct RegretInsertion;

impl RegretInsertion {
    /// Best option and regret of one order, `None` if nothing fits.
    fn evaluate(
        planner: &InsertionPlanner<'_>,
        solution: &Solution,
        order: OrderId,
    ) -> Option<(Insertion, f64)> {
        let mut options = planner.options(solution.routes(), order, None);
        let existing = cheapest(options.iter().copied());
        let fresh = planner.new_route_option(order);
        let best = match (existing, fresh) {
            (Some(e), Some(n)) if n.delta < e.delta => n,
            (e, n) => e.or(n)?,
        };
        options.extend(fresh);

        let mut deltas: Vec<f64> = options.iter().map(|o| o.delta).collect();
        deltas.sort_by(f64::total_cmp);
        let regret = match deltas.get(1) {
            Some(second) => second - deltas[0],
            None => f64::INFINITY,
        };
        Some((best, regret))
    }
}

impl RepairOperator for RegretInsertion {
    fn name(&self) -> &str {
        "regret_insertion"
    }

    fn repair(
        &self,
        instance: &Instance,
        solution: &mut Solution,
        _rng: &mut dyn RngCore,
    ) -> Result<()> {
        let mut planner = InsertionPlanner::new(instance, solution.routes());

        while !solution.pending().is_empty() {
            let mut chosen: Option<(usize, Insertion, f64)> = None;
            for (idx, &order) in solution.pending().iter().enumerate() {
                let Some((insertion, regret)) = Self::evaluate(&planner, solution, order) else {
                    return Err(Error::InfeasibleInput { order });
                };
                let better = match &chosen {
                    None => true,
                    Some((_, best, best_regret)) => {
                        regret > *best_regret
                            || (regret == *best_regret && insertion.delta < best.delta)
                    }
                };
                if better {
                    chosen = Some((idx, insertion, regret));
                }
            }

            let Some((idx, insertion, _)) = chosen else {
                break;
            };
            let order = solution.pending_mut().remove(idx);
            planner.apply(solution.routes_mut(), order, &insertion);
        }
        Ok(())
    }
}

/// The default operator set: greedy and regret insertion.
pub fn default_operators() -> Vec<Box<dyn RepairOperator>> {
    vec![Box::new(GreedyInsertion), Box::new(RegretInsertion)]
}
