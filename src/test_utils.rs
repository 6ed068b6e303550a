//! Shared test fixtures.

use rand::Rng;

use crate::models::{FamilyId, Instance, Location, Order, OrderId, TimeWindow, VehicleFamily};
use crate::random::create_rng;

/// Four orders of demand 10 on the x axis at 10, 20, 30, 40.
///
/// Family 1: capacity 30, rental 100, fuel 1.
/// Family 2: capacity 15, rental 40, fuel 2.
pub fn line_instance() -> Instance {
    let orders = (1..=4)
        .map(|i| Order::new(OrderId(i), 10.0, Location::new(10.0 * i as f64, 0.0)))
        .collect();
    Instance::new(Location::new(0.0, 0.0), orders, line_families()).expect("valid instance")
}

pub fn line_families() -> Vec<VehicleFamily> {
    vec![
        VehicleFamily::new(FamilyId(1), 30.0)
            .with_rental_cost(100.0)
            .with_fuel_cost(1.0),
        VehicleFamily::new(FamilyId(2), 15.0)
            .with_rental_cost(40.0)
            .with_fuel_cost(2.0),
    ]
}

/// Demands {2, 3, 5}; family A (id 1): capacity 10, rental 100, fuel 1;
/// family B (id 2): capacity 4, rental 40, fuel 2.
pub fn scenario_instance() -> Instance {
    let orders = vec![
        Order::new(OrderId(1), 2.0, Location::new(1.0, 0.0)),
        Order::new(OrderId(2), 3.0, Location::new(0.0, 1.0)),
        Order::new(OrderId(3), 5.0, Location::new(1.0, 1.0)),
    ];
    let families = vec![
        VehicleFamily::new(FamilyId(1), 10.0)
            .with_rental_cost(100.0)
            .with_fuel_cost(1.0),
        VehicleFamily::new(FamilyId(2), 4.0)
            .with_rental_cost(40.0)
            .with_fuel_cost(2.0),
    ];
    Instance::new(Location::new(0.0, 0.0), orders, families).expect("valid instance")
}

/// Random instance with clustered orders, time windows and three families.
pub fn random_instance(seed: u64, num_orders: usize) -> Instance {
    let mut rng = create_rng(seed);
    let orders = (0..num_orders)
        .map(|i| {
            let x = rng.random_range(-1_000.0..1_000.0);
            let y = rng.random_range(-1_000.0..1_000.0);
            let start = rng.random_range(0.0..20_000.0);
            let tw = TimeWindow::new(start, start + 30_000.0).expect("valid window");
            Order::new(OrderId(i + 1), rng.random_range(1.0..20.0), Location::new(x, y))
                .with_time_window(tw)
                .with_service_duration(60.0)
        })
        .collect();
    let families = vec![
        VehicleFamily::new(FamilyId(1), 100.0)
            .with_rental_cost(200.0)
            .with_fuel_cost(0.05)
            .with_radius_cost(1e-5)
            .with_speed(8.0, 120.0),
        VehicleFamily::new(FamilyId(2), 40.0)
            .with_rental_cost(90.0)
            .with_fuel_cost(0.03)
            .with_radius_cost(2e-5)
            .with_speed(10.0, 60.0),
        VehicleFamily::new(FamilyId(3), 20.0)
            .with_rental_cost(50.0)
            .with_fuel_cost(0.02)
            .with_radius_cost(1e-5)
            .with_max_radius(900.0)
            .with_speed(5.0, 30.0),
    ];
    Instance::new(Location::new(0.0, 0.0), orders, families).expect("valid instance")
}
