//! Large neighborhood search loop.

use std::time::Instant;

use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use super::config::{Acceptance, LnsConfig};
use super::destroy::{self, DestroyOperator};
use super::repair::{self, RepairOperator};
use super::weights::OperatorWheel;
use crate::error::{Error, Result};
use crate::evaluation::{CostModel, Feasibility};
use crate::local_search::{LocalSearch, LocalSearchConfig};
use crate::models::{Instance, Solution};

/// Why the search stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StopReason {
    IterationLimit,
    TimeLimit,
    /// The solution has no order to remove.
    NothingToDestroy,
}

/// Result of a large neighborhood search run.
#[derive(Debug, Clone)]
pub struct LnsOutcome {
    /// The best solution found.
    pub best: Solution,

    /// Cost of the best solution.
    pub best_cost: f64,

    /// Iterations performed, discarded ones included.
    pub iterations: usize,

    /// Number of times the best solution was replaced.
    pub improvements: usize,

    pub stop_reason: StopReason,

    /// Final destroy operator weights, in operator order.
    pub destroy_weights: Vec<f64>,

    /// Final repair operator weights, in operator order.
    pub repair_weights: Vec<f64>,
}

/// Number of orders to remove out of `assigned`.
fn destroy_count<R: Rng + ?Sized>(assigned: usize, config: &LnsConfig, rng: &mut R) -> usize {
    if assigned <= 1 {
        return assigned;
    }
    let fraction = if config.min_destroy_fraction < config.max_destroy_fraction {
        rng.random_range(config.min_destroy_fraction..=config.max_destroy_fraction)
    } else {
        config.min_destroy_fraction
    };
    let k = (assigned as f64 * fraction).round() as usize;
    k.clamp(1, assigned - 1).min(config.max_destroyed)
}

/// Adaptive large neighborhood search over a fleet solution.
///
/// Each iteration removes orders from the current solution with a destroy
/// operator, reinserts them with a repair operator, optionally polishes the
/// result with [`LocalSearch`], then decides acceptance. Operators are
/// picked by roulette wheel over weights adapted from their scores.
///
/// # Examples
///
/// ```
/// use u_fleet::constructive::greedy_heuristic;
/// use u_fleet::evaluation::{CostModel, Feasibility};
/// use u_fleet::lns::{LargeNeighborhoodSearch, LnsConfig};
/// use u_fleet::models::{FamilyId, Instance, Location, Order, OrderId, VehicleFamily};
/// use u_fleet::random::create_rng;
///
/// let instance = Instance::new(
///     Location::new(0.0, 0.0),
///     (1..=8)
///         .map(|i| Order::new(OrderId(i), 3.0, Location::new((i % 4) as f64, (i / 4) as f64)))
///         .collect(),
///     vec![
///         VehicleFamily::new(FamilyId(1), 12.0).with_rental_cost(50.0).with_fuel_cost(1.0),
///         VehicleFamily::new(FamilyId(2), 6.0).with_rental_cost(20.0).with_fuel_cost(2.0),
///     ],
/// )
/// .unwrap();
///
/// let initial = greedy_heuristic(&instance).unwrap();
/// let config = LnsConfig::default().with_max_iterations(50);
/// let outcome = LargeNeighborhoodSearch::new(&instance, config)
///     .run(initial.clone(), &mut create_rng(7))
///     .unwrap();
/// assert!(outcome.best.is_feasible(&instance));
/// assert!(outcome.best_cost <= initial.cost(&instance));
/// ```
pub struct LargeNeighborhoodSearch<'a> {
    instance: &'a Instance,
    config: LnsConfig,
    destroy_ops: Vec<Box<dyn DestroyOperator>>,
    repair_ops: Vec<Box<dyn RepairOperator>>,
}

impl<'a> LargeNeighborhoodSearch<'a> {
    /// Creates a search with the default operator sets.
    pub fn new(instance: &'a Instance, config: LnsConfig) -> Self {
        Self::with_operators(
            instance,
            config,
            destroy::default_operators(),
            repair::default_operators(),
        )
    }

    pub fn with_operators(
        instance: &'a Instance,
        config: LnsConfig,
        destroy_ops: Vec<Box<dyn DestroyOperator>>,
        repair_ops: Vec<Box<dyn RepairOperator>>,
    ) -> Self {
        Self {
            instance,
            config,
            destroy_ops,
            repair_ops,
        }
    }

    /// Runs the search from `initial`.
    ///
    /// Pending orders of `initial` are inserted first; if one cannot be,
    /// [`Error::InfeasibleInput`] is returned. The outcome's best solution
    /// is never more expensive than the (completed) initial one.
    #[instrument(skip_all, fields(orders = self.instance.num_orders()))]
    pub fn run<R: Rng>(&self, initial: Solution, rng: &mut R) -> Result<LnsOutcome> {
        self.config.validate()?;
        if self.destroy_ops.is_empty() || self.repair_ops.is_empty() {
            return Err(Error::InvalidConfig(
                "at least one destroy and one repair operator required".into(),
            ));
        }
        initial.validate(self.instance)?;

        let instance = self.instance;
        let config = &self.config;
        let rng: &mut dyn RngCore = rng;
        let deadline = config.time_limit.map(|limit| Instant::now() + limit);
        let polisher = LocalSearch::new(instance, LocalSearchConfig::default());

        let mut current = initial;
        if !current.pending().is_empty() {
            self.repair_ops[0].repair(instance, &mut current, rng)?;
        }
        current.remove_empty_routes();
        let mut current_cost = current.cost(instance);
        let mut current_feasible = current.is_feasible(instance);
        let mut best = current.clone();
        let mut best_cost = current_cost;
        let mut best_feasible = current_feasible;

        let mut destroy_wheel = OperatorWheel::new(self.destroy_ops.len());
        let mut repair_wheel = OperatorWheel::new(self.repair_ops.len());

        let mut temperature = match config.acceptance {
            Acceptance::SimulatedAnnealing {
                initial_temperature,
                ..
            } => initial_temperature,
            _ => 0.0,
        };
        let mut improvements = 0usize;
        let mut iterations = 0usize;
        let mut stop_reason = StopReason::IterationLimit;

        while iterations < config.max_iterations {
            if deadline.is_some_and(|d| Instant::now() >= d) {
                stop_reason = StopReason::TimeLimit;
                break;
            }
            let assigned = current.num_assigned();
            if assigned == 0 {
                stop_reason = StopReason::NothingToDestroy;
                break;
            }
            iterations += 1;

            let d_idx = destroy_wheel.pick(rng);
            let r_idx = repair_wheel.pick(rng);
            let count = destroy_count(assigned, config, rng);

            let mut candidate = current.clone();
            self.destroy_ops[d_idx].destroy(instance, &mut candidate, count, rng);
            if let Err(err) = self.repair_ops[r_idx].repair(instance, &mut candidate, rng) {
                warn!(
                    iteration = iterations,
                    destroy = self.destroy_ops[d_idx].name(),
                    repair = self.repair_ops[r_idx].name(),
                    %err,
                    "repair failed, iteration discarded"
                );
                destroy_wheel.reward(d_idx, 0.0);
                repair_wheel.reward(r_idx, 0.0);
                self.end_of_iteration(iterations, &mut destroy_wheel, &mut repair_wheel);
                continue;
            }
            if config.polish {
                candidate = polisher.run_until(candidate, deadline)?;
            }
            candidate.remove_empty_routes();

            let candidate_cost = candidate.cost(instance);
            let candidate_feasible = candidate.is_feasible(instance);

            let new_best = candidate_feasible && (!best_feasible || candidate_cost < best_cost);
            let accepted = (candidate_feasible || !current_feasible)
                && match config.acceptance {
                    Acceptance::Improving => candidate_cost < current_cost,
                    Acceptance::NonWorsening => candidate_cost <= current_cost,
                    Acceptance::Always => true,
                    Acceptance::SimulatedAnnealing { .. } => {
                        candidate_cost <= current_cost
                            || rng.random_range(0.0..1.0)
                                < (-(candidate_cost - current_cost) / temperature).exp()
                    }
                };

            let score = if new_best {
                config.score_new_best
            } else if accepted && candidate_cost < current_cost {
                config.score_improved
            } else if accepted {
                config.score_accepted
            } else {
                0.0
            };
            destroy_wheel.reward(d_idx, score);
            repair_wheel.reward(r_idx, score);

            if new_best {
                best = candidate.clone();
                best_cost = candidate_cost;
                best_feasible = true;
                improvements += 1;
                debug!(
                    iteration = iterations,
                    cost = best_cost,
                    routes = best.num_routes(),
                    destroy = self.destroy_ops[d_idx].name(),
                    repair = self.repair_ops[r_idx].name(),
                    "new best solution"
                );
            }
            if accepted || new_best {
                current = candidate;
                current_cost = candidate_cost;
                current_feasible = candidate_feasible;
            }

            if let Acceptance::SimulatedAnnealing {
                cooling_rate,
                min_temperature,
                ..
            } = config.acceptance
            {
                temperature = (temperature * cooling_rate).max(min_temperature);
            }
            self.end_of_iteration(iterations, &mut destroy_wheel, &mut repair_wheel);
        }

        info!(
            iterations,
            improvements,
            best_cost,
            routes = best.num_routes(),
            ?stop_reason,
            "large neighborhood search finished"
        );

        Ok(LnsOutcome {
            best,
            best_cost,
            iterations,
            improvements,
            stop_reason,
            destroy_weights: destroy_wheel.weights().to_vec(),
            repair_weights: repair_wheel.weights().to_vec(),
        })
    }

    fn end_of_iteration(
        &self,
        iteration: usize,
        destroy_wheel: &mut OperatorWheel,
        repair_wheel: &mut OperatorWheel,
    ) {
        if iteration % self.config.segment_length == 0 {
            destroy_wheel.adapt(&self.config);
            repair_wheel.adapt(&self.config);
        }
    }
}

/// Runs a large neighborhood search with the default operators and returns
/// the best solution found.
pub fn large_neighborhood_search<R: Rng>(
    instance: &Instance,
    initial: Solution,
    config: &LnsConfig,
    rng: &mut R,
) -> Result<Solution> {
    LargeNeighborhoodSearch::new(instance, config.clone())
        .run(initial, rng)
        .map(|outcome| outcome.best)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constructive::{bad_heuristic, greedy_heuristic};
    use crate::models::{FamilyId, OrderId, Route};
    use crate::random::create_rng;
    use crate::test_utils::{line_instance, random_instance, scenario_instance};

    #[test]
    fn test_lns_never_worse_than_greedy() {
        for seed in 0..3 {
            let inst = random_instance(seed, 25);
            let greedy = greedy_heuristic(&inst).expect("feasible");
            let config = LnsConfig::default().with_max_iterations(60);
            let outcome = LargeNeighborhoodSearch::new(&inst, config)
                .run(greedy.clone(), &mut create_rng(seed))
                .expect("valid");
            assert!(outcome.best.is_feasible(&inst));
            assert!(outcome.best_cost <= greedy.cost(&inst) + 1e-9);
            assert!((outcome.best_cost - outcome.best.cost(&inst)).abs() < 1e-9);
            assert_eq!(outcome.stop_reason, StopReason::IterationLimit);
            assert_eq!(outcome.iterations, 60);
        }
    }

    #[test]
    fn test_lns_improves_bad_scenario() {
        let inst = scenario_instance();
        let initial = bad_heuristic(&inst).expect("feasible");
        let config = LnsConfig::default().with_max_iterations(30);
        let best = large_neighborhood_search(&inst, initial, &config, &mut create_rng(1))
            .expect("valid");
        assert!(best.is_feasible(&inst));
        assert!((best.cost(&inst) - 104.0).abs() < 1e-9);
    }

    #[test]
    fn test_lns_without_polish() {
        let inst = random_instance(8, 20);
        let greedy = greedy_heuristic(&inst).expect("feasible");
        let config = LnsConfig::default()
            .with_max_iterations(40)
            .with_polish(false);
        let best = large_neighborhood_search(&inst, greedy.clone(), &config, &mut create_rng(2))
            .expect("valid");
        assert!(best.is_feasible(&inst));
        assert!(best.cost(&inst) <= greedy.cost(&inst) + 1e-9);
    }

    #[test]
    fn test_lns_acceptance_variants() {
        let inst = random_instance(9, 15);
        let greedy = greedy_heuristic(&inst).expect("feasible");
        let variants = [
            Acceptance::Improving,
            Acceptance::Always,
            Acceptance::SimulatedAnnealing {
                initial_temperature: 50.0,
                cooling_rate: 0.95,
                min_temperature: 0.01,
            },
        ];
        for acceptance in variants {
            let config = LnsConfig::default()
                .with_max_iterations(30)
                .with_acceptance(acceptance);
            let best = large_neighborhood_search(&inst, greedy.clone(), &config, &mut create_rng(4))
                .expect("valid");
            assert!(best.is_feasible(&inst), "{acceptance:?}");
            assert!(best.cost(&inst) <= greedy.cost(&inst) + 1e-9, "{acceptance:?}");
        }
    }

    #[test]
    fn test_lns_is_reproducible() {
        let inst = random_instance(10, 20);
        let greedy = greedy_heuristic(&inst).expect("feasible");
        let config = LnsConfig::default().with_max_iterations(25);
        let a = large_neighborhood_search(&inst, greedy.clone(), &config, &mut create_rng(5))
            .expect("valid");
        let b = large_neighborhood_search(&inst, greedy, &config, &mut create_rng(5))
            .expect("valid");
        assert_eq!(a, b);
    }

    #[test]
    fn test_lns_completes_pending_input() {
        let inst = line_instance();
        let mut initial = Solution::from_routes(vec![Route::with_orders(
            FamilyId(1),
            vec![OrderId(1), OrderId(2)],
        )]);
        initial.pending_mut().extend([OrderId(3), OrderId(4)]);
        let config = LnsConfig::default().with_max_iterations(5);
        let best = large_neighborhood_search(&inst, initial, &config, &mut create_rng(0))
            .expect("valid");
        assert!(best.is_feasible(&inst));
    }

    #[test]
    fn test_lns_empty_instance() {
        let inst = Instance::new(crate::models::Location::default(), vec![], vec![])
            .expect("valid");
        let outcome = LargeNeighborhoodSearch::new(&inst, LnsConfig::default())
            .run(Solution::new(), &mut create_rng(0))
            .expect("valid");
        assert_eq!(outcome.stop_reason, StopReason::NothingToDestroy);
        assert_eq!(outcome.iterations, 0);
    }

    #[test]
    fn test_lns_time_limit() {
        let inst = random_instance(12, 30);
        let greedy = greedy_heuristic(&inst).expect("feasible");
        let config = LnsConfig::default()
            .with_max_iterations(usize::MAX)
            .with_time_limit(std::time::Duration::from_millis(50));
        let outcome = LargeNeighborhoodSearch::new(&inst, config)
            .run(greedy, &mut create_rng(3))
            .expect("valid");
        assert_eq!(outcome.stop_reason, StopReason::TimeLimit);
        assert!(outcome.best.is_feasible(&inst));
    }

    #[test]
    fn test_destroy_count_bounds() {
        let config = LnsConfig::default();
        let mut rng = create_rng(0);
        assert_eq!(destroy_count(1, &config, &mut rng), 1);
        assert_eq!(destroy_count(0, &config, &mut rng), 0);
        for n in 2..200 {
            let k = destroy_count(n, &config, &mut rng);
            assert!(k >= 1 && k < n && k <= config.max_destroyed);
        }
    }

    #[test]
    fn test_lns_adapts_operator_weights() {
        let inst = random_instance(6, 15);
        let greedy = greedy_heuristic(&inst).expect("feasible");
        let config = LnsConfig::default()
            .with_max_iterations(20)
            .with_segment_length(1)
            .with_reaction_factor(1.0);
        let outcome = LargeNeighborhoodSearch::new(&inst, config)
            .run(greedy, &mut create_rng(11))
            .expect("valid");
        assert_eq!(outcome.destroy_weights.len(), 4);
        assert_eq!(outcome.repair_weights.len(), 2);
        // ρ = 1: a used operator's weight becomes its last score, never 1
        assert!(outcome.destroy_weights.iter().any(|&w| w != 1.0));
        assert!(outcome.repair_weights.iter().any(|&w| w != 1.0));
    }
}
