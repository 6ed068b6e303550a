//! Intra-route reordering: 2-opt reversal and single-order shift.
//!
//! # Algorithm
//!
//! For every route, tries reversing each segment `[start..=end]` and
//! moving each order to each other position. The family is unchanged, so
//! only the tour length and the time windows are affected. Routes already
//! over capacity or radius are left alone.
//!
//! # Complexity
//!
//! O(n²) candidate sequences per route, each priced in O(n).
//!
//! # Reference
//!
//! Croes, G.A. (1958). "A Method for Solving Traveling-Salesman Problems",
//! *Operations Research* 6(6), 791-812.

use super::{Candidate, Move, Neighborhood};
use crate::evaluation::{is_punctual, radius_from_spread, tour_distance};
use crate::models::OrderId;

pub(super) fn best_move(hood: &Neighborhood<'_>) -> Option<Candidate> {
    let instance = hood.instance;
    let mut best: Option<Candidate> = None;
    let mut seq = Vec::new();

    for (r, route) in hood.routes.iter().enumerate() {
        let n = route.len();
        if n < 2 {
            continue;
        }
        let family = &instance[route.family()];
        let snap = hood.planner.snapshot(r);
        if snap.load > family.capacity()
            || family
                .max_radius()
                .is_some_and(|max| radius_from_spread(snap.spread) > max)
        {
            continue;
        }
        let before = snap.distance;
        let orders = route.orders();

        let consider = |seq: &[OrderId], mv: Move, best: &mut Option<Candidate>| {
            let delta = family.fuel_cost() * (tour_distance(instance, seq) - before);
            let candidate = Candidate { mv, delta };
            if candidate.improves_on(best.as_ref()) && is_punctual(instance, family, seq) {
                *best = Some(candidate);
            }
        };

        for start in 0..n - 1 {
            for end in start + 1..n {
                seq.clear();
                seq.extend_from_slice(orders);
                seq[start..=end].reverse();
                consider(&seq, Move::Reverse { route: r, start, end }, &mut best);
            }
        }

        for from in 0..n {
            for to in 0..n {
                // Adjacent shifts are reversals of length two.
                if to == from || to + 1 == from || from + 1 == to {
                    continue;
                }
                seq.clear();
                seq.extend_from_slice(orders);
                let order = seq.remove(from);
                seq.insert(to, order);
                consider(&seq, Move::Shift { route: r, from, to }, &mut best);
            }
        }
    }
    best
}
