//! Route timing under the time-dependent travel model.

use crate::models::{Instance, OrderId, VehicleFamily, DEPOT};

/// Timing of one stop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Visit {
    pub order: OrderId,
    /// Arrival time at the order location.
    pub arrival: f64,
    /// Arrival, or the window start if the vehicle had to wait.
    pub service_start: f64,
    /// Service start plus service duration.
    pub departure: f64,
}

/// Timing of a whole route, leaving the depot at time 0.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schedule {
    pub visits: Vec<Visit>,
    /// Arrival back at the depot.
    pub return_time: f64,
}

impl Schedule {
    /// Simulates `orders` driven by a vehicle of `family`.
    ///
    /// # Panics
    ///
    /// Panics if an order is not part of `instance`.
    pub fn build(instance: &Instance, family: &VehicleFamily, orders: &[OrderId]) -> Self {
        let mut visits = Vec::with_capacity(orders.len());
        let mut time = 0.0;
        let mut prev = DEPOT;

        for &id in orders {
            let point = instance.point(id);
            let order = &instance[id];
            let arrival = time + family.travel_time(instance.travel(prev, point), time);
            let service_start = order
                .time_window()
                .map_or(arrival, |tw| tw.service_start(arrival));
            let departure = service_start + order.service_duration();
            visits.push(Visit {
                order: id,
                arrival,
                service_start,
                departure,
            });
            time = departure;
            prev = point;
        }

        let return_time = if orders.is_empty() {
            0.0
        } else {
            time + family.travel_time(instance.travel(prev, DEPOT), time)
        };

        Self {
            visits,
            return_time,
        }
    }

    /// Visits whose service starts after the window closes.
    pub fn late_visits<'a>(&'a self, instance: &'a Instance) -> impl Iterator<Item = &'a Visit> + 'a {
        self.visits.iter().filter(move |v| {
            instance[v.order]
                .time_window()
                .is_some_and(|tw| tw.is_violated(v.service_start))
        })
    }
}

/// Returns `true` if every service in the sequence starts within its window.
///
/// Stops at the first late visit.
pub(crate) fn is_punctual(instance: &Instance, family: &VehicleFamily, orders: &[OrderId]) -> bool {
    let mut time = 0.0;
    let mut prev = DEPOT;
    for &id in orders {
        let point = instance.point(id);
        let order = &instance[id];
        let arrival = time + family.travel_time(instance.travel(prev, point), time);
        let start = match order.time_window() {
            Some(tw) => {
                let start = tw.service_start(arrival);
                if tw.is_violated(start) {
                    return false;
                }
                start
            }
            None => arrival,
        };
        time = start + order.service_duration();
        prev = point;
    }
    true
}
