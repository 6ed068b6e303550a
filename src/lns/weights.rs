//! Adaptive operator weights.
//!
//! Each operator collects the scores of the iterations it took part in.
//! Every `segment_length` iterations its weight moves toward its mean score
//! of the segment:
//!
//! `w ← max(min_weight, (1 - ρ) w + ρ mean)`
//!
//! Operators left unused in a segment keep their weight. Selection draws
//! from the weights with a cached [`WeightedIndex`], rebuilt when weights
//! change.

use rand::distr::weighted::WeightedIndex;
use rand::distr::Distribution;
use rand::{Rng, RngCore};

use super::config::LnsConfig;

#[derive(Debug, Clone)]
pub(super) struct OperatorWheel {
    weights: Vec<f64>,
    segment: Vec<(f64, usize)>,
    dist: Option<WeightedIndex<f64>>,
}

impl OperatorWheel {
    pub(super) fn new(operators: usize) -> Self {
        let weights = vec![1.0; operators];
        Self {
            dist: WeightedIndex::new(&weights).ok(),
            segment: vec![(0.0, 0); operators],
            weights,
        }
    }

    /// Draws an operator index. Falls back to a uniform draw if no weight
    /// is positive.
    pub(super) fn pick(&self, rng: &mut dyn RngCore) -> usize {
        match &self.dist {
            Some(dist) => dist.sample(rng),
            None if self.weights.len() > 1 => rng.random_range(0..self.weights.len()),
            None => 0,
        }
    }

    pub(super) fn reward(&mut self, operator: usize, score: f64) {
        let (total, uses) = &mut self.segment[operator];
        *total += score;
        *uses += 1;
    }

    /// Closes the current segment.
    pub(super) fn adapt(&mut self, config: &LnsConfig) {
        let rho = config.reaction_factor;
        for (weight, (total, uses)) in self.weights.iter_mut().zip(self.segment.iter_mut()) {
            if *uses > 0 {
                let mean = *total / *uses as f64;
                *weight = ((1.0 - rho) * *weight + rho * mean).max(config.min_weight);
            }
            *total = 0.0;
            *uses = 0;
        }
        self.dist = WeightedIndex::new(&self.weights).ok();
    }

    pub(super) fn weights(&self) -> &[f64] {
        &self.weights
    }

    #[cfg(test)]
    fn set_weight(&mut self, operator: usize, weight: f64) {
        self.weights[operator] = weight;
        self.dist = WeightedIndex::new(&self.weights).ok();
    }
}
