//! Route family change.
//!
//! Serves the same sequence with another family: a smaller vehicle when the
//! load allows it, or one with a cheaper distance rate for long tours.

use super::{Candidate, Move, Neighborhood};
use crate::evaluation::{cost_from_parts, is_punctual, radius_from_spread};

pub(super) fn best_move(hood: &Neighborhood<'_>) -> Option<Candidate> {
    let instance = hood.instance;
    let mut best: Option<Candidate> = None;

    for (r, route) in hood.routes.iter().enumerate() {
        if route.is_empty() {
            continue;
        }
        let snap = hood.planner.snapshot(r);
        let radius = radius_from_spread(snap.spread);

        for family in instance.families() {
            if family.id() == route.family()
                || snap.load > family.capacity()
                || family.max_radius().is_some_and(|max| radius > max)
            {
                continue;
            }
            let candidate = Candidate {
                mv: Move::Refit {
                    route: r,
                    family: family.id(),
                },
                delta: cost_from_parts(family, snap.distance, snap.spread) - snap.cost,
            };
            if candidate.improves_on(best.as_ref()) && is_punctual(instance, family, route.orders())
            {
                best = Some(candidate);
            }
        }
    }
    best
}
