//! Inter-route order relocation.
//!
//! # Algorithm
//!
//! Takes each order out of its route and prices its cheapest feasible
//! insertion into every other route (the target may switch family) or into
//! a new route of the cheapest family. The source keeps its family. A route
//! emptied by the move costs nothing afterwards.
//!
//! # Complexity
//!
//! O(n² × F) insertion probes per scan, F = number of families.
//!
//! # Reference
//!
//! Or, I. (1976). "Traveling Salesman-Type Combinatorial Problems and Their
//! Relation to the Logistics of Blood Banking". PhD thesis.

use super::{Candidate, Move, Neighborhood};
use crate::constructive::insertion::NewRoutePolicy;
use crate::evaluation::{sequence_cost, sequence_is_feasible};

pub(super) fn best_move(hood: &Neighborhood<'_>) -> Option<Candidate> {
    let instance = hood.instance;
    let mut best: Option<Candidate> = None;
    let mut remaining = Vec::new();

    for (r, route) in hood.routes.iter().enumerate() {
        let family = &instance[route.family()];
        let old_cost = hood.route_cost(r);

        for (pos, &order) in route.orders().iter().enumerate() {
            remaining.clear();
            remaining.extend_from_slice(&route.orders()[..pos]);
            remaining.extend_from_slice(&route.orders()[pos + 1..]);
            if !remaining.is_empty() && !sequence_is_feasible(instance, family, &remaining) {
                continue;
            }
            let removal = sequence_cost(instance, family, &remaining) - old_cost;

            let Some(insertion) =
                hood.planner
                    .best(hood.routes, order, Some(r), NewRoutePolicy::Compete)
            else {
                continue;
            };
            let candidate = Candidate {
                mv: Move::Relocate {
                    from_route: r,
                    from_pos: pos,
                    insertion,
                },
                delta: removal + insertion.delta,
            };
            if candidate.improves_on(best.as_ref()) {
                best = Some(candidate);
            }
        }
    }
    best
}
