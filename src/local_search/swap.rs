//! Inter-route order exchange.
//!
//! # Algorithm
//!
//! For every pair of orders on different routes, exchanges them in place.
//! Both routes keep their families; the move is kept only if both routes
//! stay feasible.
//!
//! # Complexity
//!
//! O(n²) pairs per scan, each priced in O(route length).

use super::{Candidate, Move, Neighborhood};
use crate::evaluation::{sequence_cost, sequence_is_feasible};

pub(super) fn best_move(hood: &Neighborhood<'_>) -> Option<Candidate> {
    let instance = hood.instance;
    let routes = hood.routes;
    let mut best: Option<Candidate> = None;
    let mut seq_a = Vec::new();
    let mut seq_b = Vec::new();

    for ra in 0..routes.len() {
        let fam_a = &instance[routes[ra].family()];
        let load_a = hood.planner.snapshot(ra).load;
        for rb in ra + 1..routes.len() {
            let fam_b = &instance[routes[rb].family()];
            let load_b = hood.planner.snapshot(rb).load;
            let before = hood.route_cost(ra) + hood.route_cost(rb);

            for (pa, &a) in routes[ra].orders().iter().enumerate() {
                let da = instance[a].demand();
                for (pb, &b) in routes[rb].orders().iter().enumerate() {
                    let db = instance[b].demand();
                    if load_a - da + db > fam_a.capacity() || load_b - db + da > fam_b.capacity() {
                        continue;
                    }

                    seq_a.clear();
                    seq_a.extend_from_slice(routes[ra].orders());
                    seq_a[pa] = b;
                    seq_b.clear();
                    seq_b.extend_from_slice(routes[rb].orders());
                    seq_b[pb] = a;

                    let delta = sequence_cost(instance, fam_a, &seq_a)
                        + sequence_cost(instance, fam_b, &seq_b)
                        - before;
                    let candidate = Candidate {
                        mv: Move::Swap {
                            route_a: ra,
                            pos_a: pa,
                            route_b: rb,
                            pos_b: pb,
                        },
                        delta,
                    };
                    if !candidate.improves_on(best.as_ref()) {
                        continue;
                    }
                    if sequence_is_feasible(instance, fam_a, &seq_a)
                        && sequence_is_feasible(instance, fam_b, &seq_b)
                    {
                        best = Some(candidate);
                    }
                }
            }
        }
    }
    best
}
