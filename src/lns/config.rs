//! Large neighborhood search configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Which candidates the search moves to.
///
/// The best solution is tracked separately and only ever replaced by a
/// strictly cheaper feasible one, whatever the acceptance rule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub enum Acceptance {
    /// Strictly cheaper than the current solution.
    Improving,
    /// No more expensive than the current solution.
    #[default]
    NonWorsening,
    /// Every feasible candidate.
    Always,
    /// Worse candidates accepted with probability `exp(-delta / T)`; the
    /// temperature decays geometrically each iteration down to a floor.
    SimulatedAnnealing {
        initial_temperature: f64,
        cooling_rate: f64,
        min_temperature: f64,
    },
}

/// Configuration for [`LargeNeighborhoodSearch`](super::LargeNeighborhoodSearch).
///
/// # Scoring
///
/// After each iteration the selected destroy and repair operators receive:
/// - `score_new_best`: the candidate became the new best solution
/// - `score_improved`: the candidate is cheaper than the current solution
/// - `score_accepted`: the candidate was accepted otherwise
///
/// Scores accumulate over `segment_length` iterations, then operator weights
/// are smoothed with `reaction_factor` and floored at `min_weight`.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use u_fleet::lns::{Acceptance, LnsConfig};
///
/// let config = LnsConfig::default()
///     .with_max_iterations(2_000)
///     .with_time_limit(Duration::from_secs(5))
///     .with_destroy_fraction(0.1, 0.3)
///     .with_acceptance(Acceptance::Improving);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LnsConfig {
    pub max_iterations: usize,

    /// Wall-clock limit, checked between iterations and local search passes.
    pub time_limit: Option<Duration>,

    /// Lower bound of the fraction of assigned orders removed per iteration.
    pub min_destroy_fraction: f64,

    /// Upper bound of the fraction of assigned orders removed per iteration.
    pub max_destroy_fraction: f64,

    /// Hard cap on the number of orders removed per iteration.
    pub max_destroyed: usize,

    pub acceptance: Acceptance,

    /// Run local search on every repaired candidate.
    pub polish: bool,

    pub segment_length: usize,
    pub score_new_best: f64,
    pub score_improved: f64,
    pub score_accepted: f64,

    /// Weight smoothing factor, in (0, 1].
    pub reaction_factor: f64,

    pub min_weight: f64,
}

impl Default for LnsConfig {
    fn default() -> Self {
        Self {
            max_iterations: 1_000,
            time_limit: None,
            min_destroy_fraction: 0.1,
            max_destroy_fraction: 0.4,
            max_destroyed: 50,
            acceptance: Acceptance::default(),
            polish: true,
            segment_length: 100,
            score_new_best: 33.0,
            score_improved: 9.0,
            score_accepted: 3.0,
            reaction_factor: 0.1,
            min_weight: 0.01,
        }
    }
}

impl LnsConfig {
    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    pub fn with_destroy_fraction(mut self, min: f64, max: f64) -> Self {
        self.min_destroy_fraction = min.clamp(0.0, 1.0);
        self.max_destroy_fraction = max.clamp(self.min_destroy_fraction, 1.0);
        self
    }

    pub fn with_max_destroyed(mut self, n: usize) -> Self {
        self.max_destroyed = n;
        self
    }

    pub fn with_acceptance(mut self, acceptance: Acceptance) -> Self {
        self.acceptance = acceptance;
        self
    }

    pub fn with_polish(mut self, polish: bool) -> Self {
        self.polish = polish;
        self
    }

    pub fn with_segment_length(mut self, n: usize) -> Self {
        self.segment_length = n.max(1);
        self
    }

    pub fn with_scores(mut self, new_best: f64, improved: f64, accepted: f64) -> Self {
        self.score_new_best = new_best;
        self.score_improved = improved;
        self.score_accepted = accepted;
        self
    }

    pub fn with_reaction_factor(mut self, rho: f64) -> Self {
        self.reaction_factor = rho;
        self
    }

    pub fn with_min_weight(mut self, min_weight: f64) -> Self {
        self.min_weight = min_weight;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_iterations == 0 {
            return Err(invalid("max_iterations must be positive"));
        }
        if !(0.0..=1.0).contains(&self.min_destroy_fraction)
            || !(0.0..=1.0).contains(&self.max_destroy_fraction)
        {
            return Err(invalid("destroy fractions must be in [0, 1]"));
        }
        if self.min_destroy_fraction > self.max_destroy_fraction {
            return Err(invalid("min_destroy_fraction must be <= max_destroy_fraction"));
        }
        if self.max_destroyed == 0 {
            return Err(invalid("max_destroyed must be positive"));
        }
        if self.segment_length == 0 {
            return Err(invalid("segment_length must be positive"));
        }
        if self.reaction_factor <= 0.0 || self.reaction_factor > 1.0 {
            return Err(Error::InvalidConfig(format!(
                "reaction_factor must be in (0, 1], got {}",
                self.reaction_factor
            )));
        }
        if self.min_weight < 0.0 {
            return Err(invalid("min_weight must be non-negative"));
        }
        if let Acceptance::SimulatedAnnealing {
            initial_temperature,
            cooling_rate,
            min_temperature,
        } = self.acceptance
        {
            if initial_temperature <= 0.0 {
                return Err(invalid("initial_temperature must be positive"));
            }
            if cooling_rate <= 0.0 || cooling_rate >= 1.0 {
                return Err(Error::InvalidConfig(format!(
                    "cooling_rate must be in (0, 1), got {cooling_rate}"
                )));
            }
            if min_temperature <= 0.0 {
                return Err(invalid("min_temperature must be positive"));
            }
        }
        Ok(())
    }
}

fn invalid(msg: &str) -> Error {
    Error::InvalidConfig(msg.into())
}
