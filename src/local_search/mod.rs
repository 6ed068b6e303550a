//! Local search for improving complete solutions.
//!
//! - [`relocate`] — Move one order to another route or to a new route
//! - [`swap`] — Exchange two orders of different routes
//! - [`reorder`] — 2-opt reversal and single-order shift within a route
//! - [`refit`] — Change the family of a route
//!
//! # Policy
//!
//! Steepest descent: every pass scans all four neighborhoods in the order
//! above, applies the single move with the most negative cost change
//! (below `-IMPROVEMENT_EPSILON`, earliest neighborhood on ties) and drops
//! emptied routes. Every route touched by a move must be feasible after it.
//! The search stops at a local optimum or when the pass/time budget runs out.

mod refit;
mod relocate;
mod reorder;
mod swap;

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::constructive::insertion::{Insertion, InsertionPlanner, Target};
use crate::error::{Error, Result};
use crate::evaluation::CostModel;
use crate::models::{FamilyId, Instance, Route, Solution};

/// Minimum cost decrease for a move to count as improving.
pub const IMPROVEMENT_EPSILON: f64 = 1e-9;

/// Budget of a local search run. Unbounded by default.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use u_fleet::local_search::LocalSearchConfig;
///
/// let config = LocalSearchConfig::default()
///     .with_max_passes(500)
///     .with_time_limit(Duration::from_secs(2));
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocalSearchConfig {
    /// Maximum number of applied moves.
    pub max_passes: Option<usize>,
    /// Wall-clock limit, checked between passes.
    pub time_limit: Option<Duration>,
}

impl LocalSearchConfig {
    pub fn with_max_passes(mut self, n: usize) -> Self {
        self.max_passes = Some(n);
        self
    }

    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_passes == Some(0) {
            return Err(Error::InvalidConfig("max_passes must be positive".into()));
        }
        Ok(())
    }
}

/// A neighborhood move on the routes of a solution.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Move {
    Relocate {
        from_route: usize,
        from_pos: usize,
        insertion: Insertion,
    },
    Swap {
        route_a: usize,
        pos_a: usize,
        route_b: usize,
        pos_b: usize,
    },
    Reverse {
        route: usize,
        start: usize,
        end: usize,
    },
    Shift {
        route: usize,
        from: usize,
        to: usize,
    },
    Refit {
        route: usize,
        family: FamilyId,
    },
}

/// A move with its cost change.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Candidate {
    pub mv: Move,
    pub delta: f64,
}

impl Candidate {
    pub fn improves_on(&self, best: Option<&Candidate>) -> bool {
        self.delta < -IMPROVEMENT_EPSILON && best.is_none_or(|b| self.delta < b.delta)
    }
}

/// Read-only view of the solution shared by the neighborhood scans.
pub(crate) struct Neighborhood<'a> {
    pub instance: &'a Instance,
    pub routes: &'a [Route],
    pub planner: InsertionPlanner<'a>,
}

impl<'a> Neighborhood<'a> {
    fn new(instance: &'a Instance, routes: &'a [Route]) -> Self {
        Self {
            instance,
            routes,
            planner: InsertionPlanner::new(instance, routes),
        }
    }

    /// Current cost of a route.
    pub fn route_cost(&self, route: usize) -> f64 {
        self.planner.snapshot(route).cost
    }

    /// Most improving move of all neighborhoods.
    fn best_move(&self) -> Option<Candidate> {
        let scans = [
            relocate::best_move(self),
            swap::best_move(self),
            reorder::best_move(self),
            refit::best_move(self),
        ];
        scans.into_iter().flatten().fold(None, |best, c| {
            if c.improves_on(best.as_ref()) {
                Some(c)
            } else {
                best
            }
        })
    }
}

/// Steepest-descent local search driver.
///
/// # Examples
///
/// ```
/// use u_fleet::constructive::bad_heuristic;
/// use u_fleet::evaluation::{CostModel, Feasibility};
/// use u_fleet::local_search::{LocalSearch, LocalSearchConfig};
/// use u_fleet::models::{FamilyId, Instance, Location, Order, OrderId, VehicleFamily};
///
/// let instance = Instance::new(
///     Location::new(0.0, 0.0),
///     (1..=4)
///         .map(|i| Order::new(OrderId(i), 5.0, Location::new(i as f64, 0.0)))
///         .collect(),
///     vec![VehicleFamily::new(FamilyId(0), 20.0).with_rental_cost(10.0).with_fuel_cost(1.0)],
/// )
/// .unwrap();
///
/// let initial = bad_heuristic(&instance).unwrap();
/// let improved = LocalSearch::new(&instance, LocalSearchConfig::default())
///     .run(initial.clone())
///     .unwrap();
/// assert!(improved.is_feasible(&instance));
/// assert!(improved.cost(&instance) < initial.cost(&instance));
/// ```
pub struct LocalSearch<'a> {
    instance: &'a Instance,
    config: LocalSearchConfig,
}

impl<'a> LocalSearch<'a> {
    pub fn new(instance: &'a Instance, config: LocalSearchConfig) -> Self {
        Self { instance, config }
    }

    /// Improves `solution` until no improving move is left or the budget
    /// is spent.
    pub fn run(&self, solution: Solution) -> Result<Solution> {
        self.run_until(solution, None)
    }

    /// Like [`run`](Self::run), with an outer deadline that overrides the
    /// configured time limit when it is earlier.
    #[instrument(skip_all, fields(routes = solution.num_routes()))]
    pub fn run_until(&self, mut solution: Solution, deadline: Option<Instant>) -> Result<Solution> {
        self.config.validate()?;
        solution.validate(self.instance)?;
        let own = self.config.time_limit.map(|limit| Instant::now() + limit);
        let deadline = match (deadline, own) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };

        solution.remove_empty_routes();
        let mut passes = 0usize;
        loop {
            if self.config.max_passes.is_some_and(|max| passes >= max) {
                debug!(passes, "pass budget exhausted");
                break;
            }
            if deadline.is_some_and(|d| Instant::now() >= d) {
                debug!(passes, "time budget exhausted");
                break;
            }

            let Some(candidate) = self.improving_move(&solution) else {
                break;
            };
            apply(&mut solution, candidate.mv);
            solution.remove_empty_routes();
            passes += 1;
        }

        debug!(
            passes,
            routes = solution.num_routes(),
            cost = solution.cost(self.instance),
            "local search finished"
        );
        Ok(solution)
    }

    /// Most improving feasible move of `solution`, if any.
    pub(crate) fn improving_move(&self, solution: &Solution) -> Option<Candidate> {
        Neighborhood::new(self.instance, solution.routes()).best_move()
    }
}

/// Runs an unbounded steepest-descent local search.
///
/// The result is a local optimum: no relocate, swap, reorder or refit move
/// lowers its cost while keeping every route feasible.
pub fn local_search(instance: &Instance, solution: Solution) -> Result<Solution> {
    LocalSearch::new(instance, LocalSearchConfig::default()).run(solution)
}

fn apply(solution: &mut Solution, mv: Move) {
    let routes = solution.routes_mut();
    match mv {
        Move::Relocate {
            from_route,
            from_pos,
            insertion,
        } => {
            let order = routes[from_route].remove(from_pos);
            match insertion.target {
                Target::Existing { route, position } => {
                    routes[route].insert(position, order);
                    routes[route].set_family(insertion.family);
                }
                Target::NewRoute => routes.push(Route::with_orders(insertion.family, vec![order])),
            }
        }
        Move::Swap {
            route_a,
            pos_a,
            route_b,
            pos_b,
        } => {
            let a = routes[route_a].orders()[pos_a];
            let b = routes[route_b].orders()[pos_b];
            routes[route_a].orders_mut()[pos_a] = b;
            routes[route_b].orders_mut()[pos_b] = a;
        }
        Move::Reverse { route, start, end } => {
            routes[route].orders_mut()[start..=end].reverse();
        }
        Move::Shift { route, from, to } => {
            let order = routes[route].remove(from);
            routes[route].insert(to, order);
        }
        Move::Refit { route, family } => routes[route].set_family(family),
    }
}
