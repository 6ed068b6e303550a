//! End-to-end solving: greedy construction, local search, then LNS.

use rayon::iter::{IntoParallelIterator, ParallelIterator};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::constructive::greedy_heuristic;
use crate::error::{Error, Result};
use crate::evaluation::CostModel;
use crate::lns::{LargeNeighborhoodSearch, LnsConfig};
use crate::local_search::{LocalSearch, LocalSearchConfig};
use crate::models::{Instance, Solution};
use crate::random::create_rng;

/// Configuration of a full solve.
///
/// # Examples
///
/// ```
/// use u_fleet::lns::LnsConfig;
/// use u_fleet::solver::SolverConfig;
///
/// let config = SolverConfig::default()
///     .with_seed(42)
///     .with_restarts(8)
///     .with_lns(LnsConfig::default().with_max_iterations(200));
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Seed of the first run; run `i` of [`solve_parallel`] uses `seed + i`.
    pub seed: u64,
    /// Number of independent runs of [`solve_parallel`].
    pub restarts: usize,
    pub local_search: LocalSearchConfig,
    pub lns: LnsConfig,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            restarts: 4,
            local_search: LocalSearchConfig::default(),
            lns: LnsConfig::default(),
        }
    }
}

impl SolverConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_restarts(mut self, n: usize) -> Self {
        self.restarts = n;
        self
    }

    pub fn with_local_search(mut self, config: LocalSearchConfig) -> Self {
        self.local_search = config;
        self
    }

    pub fn with_lns(mut self, config: LnsConfig) -> Self {
        self.lns = config;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.restarts == 0 {
            return Err(Error::InvalidConfig("restarts must be positive".into()));
        }
        self.local_search.validate()?;
        self.lns.validate()
    }
}

/// Solves `instance` with one seeded run: greedy, local search, then LNS.
///
/// The result is feasible and complete, and never more expensive than the
/// greedy solution. Returns [`Error::InfeasibleInput`] if some order cannot
/// be served by any family alone.
///
/// # Examples
///
/// ```
/// use u_fleet::evaluation::Feasibility;
/// use u_fleet::lns::LnsConfig;
/// use u_fleet::models::{FamilyId, Instance, Location, Order, OrderId, VehicleFamily};
/// use u_fleet::solver::{solve, SolverConfig};
///
/// let instance = Instance::new(
///     Location::new(0.0, 0.0),
///     vec![
///         Order::new(OrderId(1), 2.0, Location::new(1.0, 0.0)),
///         Order::new(OrderId(2), 3.0, Location::new(0.0, 1.0)),
///         Order::new(OrderId(3), 5.0, Location::new(1.0, 1.0)),
///     ],
///     vec![
///         VehicleFamily::new(FamilyId(1), 10.0).with_rental_cost(100.0).with_fuel_cost(1.0),
///         VehicleFamily::new(FamilyId(2), 4.0).with_rental_cost(40.0).with_fuel_cost(2.0),
///     ],
/// )
/// .unwrap();
///
/// let config = SolverConfig::default().with_lns(LnsConfig::default().with_max_iterations(20));
/// let solution = solve(&instance, &config).unwrap();
/// assert!(solution.is_feasible(&instance));
/// ```
#[instrument(skip_all, fields(orders = instance.num_orders(), seed = config.seed))]
pub fn solve(instance: &Instance, config: &SolverConfig) -> Result<Solution> {
    config.validate()?;
    run(instance, config, config.seed)
}

/// Runs `restarts` independent seeded solves in parallel and keeps the
/// cheapest result. Ties go to the lowest run index.
#[instrument(skip_all, fields(orders = instance.num_orders(), restarts = config.restarts))]
pub fn solve_parallel(instance: &Instance, config: &SolverConfig) -> Result<Solution> {
    config.validate()?;
    let results: Vec<Result<Solution>> = (0..config.restarts)
        .into_par_iter()
        .map(|i| run(instance, config, config.seed.wrapping_add(i as u64)))
        .collect();

    let mut best: Option<(usize, Solution, f64)> = None;
    for (i, result) in results.into_iter().enumerate() {
        let solution = result?;
        let cost = solution.cost(instance);
        if best.as_ref().is_none_or(|(_, _, c)| cost < *c) {
            best = Some((i, solution, cost));
        }
    }

    let (run_index, solution, cost) =
        best.ok_or_else(|| Error::InvalidConfig("restarts must be positive".into()))?;
    info!(run_index, cost, "parallel solve finished");
    Ok(solution)
}

fn run(instance: &Instance, config: &SolverConfig, seed: u64) -> Result<Solution> {
    let greedy = greedy_heuristic(instance)?;
    let improved = LocalSearch::new(instance, config.local_search.clone()).run(greedy)?;
    let mut rng = create_rng(seed);
    let outcome = LargeNeighborhoodSearch::new(instance, config.lns.clone()).run(improved, &mut rng)?;
    info!(seed, cost = outcome.best_cost, "solve finished");
    Ok(outcome.best)
}
