use proptest::prelude::*;

use u_fleet::constructive::{bad_heuristic, greedy_heuristic};
use u_fleet::evaluation::{CostModel, Feasibility};
use u_fleet::lns::{large_neighborhood_search, LnsConfig};
use u_fleet::local_search::local_search;
use u_fleet::models::{
    FamilyId, Instance, Location, Order, OrderId, Route, SpeedProfile, TimeWindow, VehicleFamily,
};
use u_fleet::random::create_rng;

fn order_strategy() -> impl Strategy<Value = (f64, f64, f64)> {
    (-100.0..100.0f64, -100.0..100.0f64, 1.0..10.0f64)
}

fn family_strategy() -> impl Strategy<Value = (f64, f64, f64, f64)> {
    (10.0..30.0f64, 0.0..100.0f64, 0.0..3.0f64, 0.0..0.01f64)
}

/// Instances where every order fits every family alone.
fn instance_strategy() -> impl Strategy<Value = Instance> {
    (
        prop::collection::vec(order_strategy(), 1..12),
        prop::collection::vec(family_strategy(), 1..4),
    )
        .prop_map(|(orders, families)| {
            let orders = orders
                .into_iter()
                .enumerate()
                .map(|(i, (x, y, demand))| Order::new(OrderId(i + 1), demand, Location::new(x, y)))
                .collect();
            let families = families
                .into_iter()
                .enumerate()
                .map(|(i, (capacity, rental, fuel, radius))| {
                    VehicleFamily::new(FamilyId(i), capacity)
                        .with_rental_cost(rental)
                        .with_fuel_cost(fuel)
                        .with_radius_cost(radius)
                })
                .collect();
            Instance::new(Location::new(0.0, 0.0), orders, families).expect("valid instance")
        })
}

/// Window start, window width and service duration.
type Timing = (Option<(f64, f64)>, f64);

fn timed_order_strategy() -> impl Strategy<Value = ((f64, f64, f64), Timing)> {
    (
        order_strategy(),
        (
            prop::option::of((0.0..2_000.0f64, 200.0..4_000.0f64)),
            0.0..120.0f64,
        ),
    )
}

/// Radius limit, Fourier coefficients (constant, first cosine, first sine)
/// and parking time.
type Driving = (Option<f64>, (f64, f64, f64), f64);

fn driving_strategy() -> impl Strategy<Value = Driving> {
    (
        prop::option::of(40.0..250.0f64),
        (0.8..2.0f64, -0.5..0.5f64, -0.5..0.5f64),
        0.0..30.0f64,
    )
}

/// Instances with time windows, service durations, time-dependent speeds
/// and radius limits. Orders no family can serve alone are dropped.
fn constrained_instance_strategy() -> impl Strategy<Value = Instance> {
    (
        prop::collection::vec(timed_order_strategy(), 1..12),
        prop::collection::vec((family_strategy(), driving_strategy()), 1..4),
    )
        .prop_map(|(orders, families)| {
            let orders: Vec<Order> = orders
                .into_iter()
                .enumerate()
                .map(|(i, ((x, y, demand), (window, service)))| {
                    let order = Order::new(OrderId(i + 1), demand, Location::new(x, y))
                        .with_service_duration(service);
                    match window.and_then(|(start, width)| TimeWindow::new(start, start + width)) {
                        Some(tw) => order.with_time_window(tw),
                        None => order,
                    }
                })
                .collect();
            let families: Vec<VehicleFamily> = families
                .into_iter()
                .enumerate()
                .map(|(i, ((capacity, rental, fuel, radius), (max_radius, (c0, c1, s1), parking)))| {
                    let family = VehicleFamily::new(FamilyId(i), capacity)
                        .with_rental_cost(rental)
                        .with_fuel_cost(fuel)
                        .with_radius_cost(radius)
                        .with_speed(1.0, parking)
                        .with_speed_profile(SpeedProfile::new(
                            [c0, c1, 0.0, 0.0],
                            [0.0, s1, 0.0, 0.0],
                        ));
                    match max_radius {
                        Some(limit) => family.with_max_radius(limit),
                        None => family,
                    }
                })
                .collect();

            let depot = Location::new(0.0, 0.0);
            let all = Instance::new(depot, orders.clone(), families.clone()).expect("valid instance");
            let servable = orders
                .into_iter()
                .filter(|o| {
                    families
                        .iter()
                        .any(|f| Route::with_orders(f.id(), vec![o.id()]).is_feasible(&all))
                })
                .collect();
            Instance::new(depot, servable, families).expect("valid instance")
        })
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-6 * (1.0 + a.abs().max(b.abs()))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn bad_covers_each_order_once(instance in instance_strategy()) {
        let solution = bad_heuristic(&instance).unwrap();
        let max_capacity = instance
            .families()
            .iter()
            .map(|f| f.capacity())
            .fold(0.0, f64::max);
        prop_assert_eq!(solution.num_routes(), instance.num_orders());
        for (route, order) in solution.routes().iter().zip(instance.orders()) {
            prop_assert_eq!(route.orders(), &[order.id()]);
            prop_assert_eq!(instance[route.family()].capacity(), max_capacity);
        }
        prop_assert!(solution.violations(&instance).is_empty());
    }

    #[test]
    fn greedy_is_complete_and_feasible(instance in instance_strategy()) {
        let solution = greedy_heuristic(&instance).unwrap();
        prop_assert!(solution.is_feasible(&instance));
        prop_assert_eq!(solution.num_assigned(), instance.num_orders());
    }

    #[test]
    fn cost_decomposes(instance in instance_strategy()) {
        let solution = greedy_heuristic(&instance).unwrap();
        let by_route: f64 = solution.routes().iter().map(|r| r.cost(&instance)).sum();
        prop_assert!(close(solution.cost(&instance), by_route));
        for route in solution.routes() {
            let parts = route.rental_cost(&instance)
                + route.fuel_cost(&instance)
                + route.radius_cost(&instance);
            prop_assert!(close(route.cost(&instance), parts));
        }
        let first = solution.cost(&instance);
        prop_assert_eq!(first, solution.cost(&instance));
    }

    #[test]
    fn local_search_is_monotone_and_idempotent(instance in instance_strategy()) {
        let greedy = greedy_heuristic(&instance).unwrap();
        let improved = local_search(&instance, greedy.clone()).unwrap();
        prop_assert!(improved.is_feasible(&instance));
        prop_assert!(improved.cost(&instance) <= greedy.cost(&instance) + 1e-9);
        let again = local_search(&instance, improved.clone()).unwrap();
        prop_assert_eq!(again, improved);
    }

    #[test]
    fn local_search_improves_bad(instance in instance_strategy()) {
        let bad = bad_heuristic(&instance).unwrap();
        let improved = local_search(&instance, bad.clone()).unwrap();
        prop_assert!(improved.is_feasible(&instance));
        prop_assert!(improved.cost(&instance) <= bad.cost(&instance) + 1e-9);
    }

    #[test]
    fn lns_never_worse_than_greedy(instance in instance_strategy(), seed in 0u64..1_000) {
        let greedy = greedy_heuristic(&instance).unwrap();
        let config = LnsConfig::default().with_max_iterations(15);
        let best = large_neighborhood_search(&instance, greedy.clone(), &config, &mut create_rng(seed))
            .unwrap();
        prop_assert!(best.is_feasible(&instance));
        prop_assert!(best.cost(&instance) <= greedy.cost(&instance) + 1e-9);
    }

    #[test]
    fn empty_route_costs_nothing(instance in instance_strategy()) {
        for family in instance.families() {
            let route = Route::new(family.id());
            prop_assert_eq!(route.cost(&instance), 0.0);
            prop_assert_eq!(route.rental_cost(&instance), 0.0);
            prop_assert!(route.is_feasible(&instance));
        }
    }

    #[test]
    fn greedy_respects_windows_and_radius(instance in constrained_instance_strategy()) {
        let solution = greedy_heuristic(&instance).unwrap();
        prop_assert!(solution.is_feasible(&instance));
        prop_assert_eq!(solution.num_assigned(), instance.num_orders());
    }

    #[test]
    fn constrained_local_search_is_monotone_and_idempotent(
        instance in constrained_instance_strategy(),
    ) {
        let greedy = greedy_heuristic(&instance).unwrap();
        let improved = local_search(&instance, greedy.clone()).unwrap();
        prop_assert!(improved.is_feasible(&instance));
        prop_assert!(improved.cost(&instance) <= greedy.cost(&instance) + 1e-9);
        let again = local_search(&instance, improved.clone()).unwrap();
        prop_assert_eq!(again, improved);
    }

    #[test]
    fn constrained_lns_never_worse_than_greedy(
        instance in constrained_instance_strategy(),
        seed in 0u64..1_000,
    ) {
        let greedy = greedy_heuristic(&instance).unwrap();
        let config = LnsConfig::default().with_max_iterations(15);
        let best = large_neighborhood_search(&instance, greedy.clone(), &config, &mut create_rng(seed))
            .unwrap();
        prop_assert!(best.is_feasible(&instance));
        prop_assert!(best.cost(&instance) <= greedy.cost(&instance) + 1e-9);
    }
}
