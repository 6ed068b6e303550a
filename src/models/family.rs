//! Vehicle families with capacity, cost rates and travel-time profile.

use std::f64::consts::PI;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Length of the periodic speed profile, in seconds.
pub const DAY: f64 = 86_400.0;

/// Lower bound on the travel-time multiplier.
const MIN_SLOWDOWN: f64 = 0.1;

/// Identifier of a vehicle family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FamilyId(pub usize);

impl fmt::Display for FamilyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Time-of-day travel-time multiplier as a four-term Fourier series.
///
/// `γ(t) = max(Σ αₙ cos(nωt) + βₙ sin(nωt), 0.1)` with `ω = 2π / DAY`.
///
/// # Examples
///
/// ```
/// use u_fleet::models::SpeedProfile;
///
/// let flat = SpeedProfile::constant();
/// assert_eq!(flat.factor(0.0), 1.0);
/// assert_eq!(flat.factor(43_200.0), 1.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpeedProfile {
    cos: [f64; 4],
    sin: [f64; 4],
}

impl SpeedProfile {
    pub fn new(cos: [f64; 4], sin: [f64; 4]) -> Self {
        Self { cos, sin }
    }

    /// A profile with multiplier 1 at all times.
    pub fn constant() -> Self {
        Self::new([1.0, 0.0, 0.0, 0.0], [0.0; 4])
    }

    /// Travel-time multiplier for a departure at time `t` (seconds).
    pub fn factor(&self, t: f64) -> f64 {
        let omega = 2.0 * PI / DAY;
        let mut g = 0.0;
        for n in 0..4 {
            let angle = n as f64 * omega * t;
            g += self.cos[n] * angle.cos() + self.sin[n] * angle.sin();
        }
        g.max(MIN_SLOWDOWN)
    }

    pub(crate) fn coefficients(&self) -> impl Iterator<Item = f64> + '_ {
        self.cos.iter().chain(self.sin.iter()).copied()
    }
}

impl Default for SpeedProfile {
    fn default() -> Self {
        Self::constant()
    }
}

/// A class of vehicle: capacity, cost rates and driving characteristics.
///
/// # Examples
///
/// ```
/// use u_fleet::models::{FamilyId, VehicleFamily};
///
/// let van = VehicleFamily::new(FamilyId(1), 800.0)
///     .with_rental_cost(120.0)
///     .with_fuel_cost(0.002)
///     .with_radius_cost(1e-7);
/// assert_eq!(van.capacity(), 800.0);
/// assert!(van.max_radius().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleFamily {
    id: FamilyId,
    capacity: f64,
    #[serde(default)]
    rental_cost: f64,
    #[serde(default)]
    fuel_cost: f64,
    #[serde(default)]
    radius_cost: f64,
    #[serde(default)]
    max_radius: Option<f64>,
    #[serde(default = "default_speed")]
    speed: f64,
    #[serde(default)]
    parking_time: f64,
    #[serde(default)]
    speed_profile: SpeedProfile,
}

fn default_speed() -> f64 {
    1.0
}

impl VehicleFamily {
    /// Creates a family with the given capacity.
    ///
    /// Default: no costs, no radius limit, speed 1 m/s, no parking time,
    /// constant speed profile.
    pub fn new(id: FamilyId, capacity: f64) -> Self {
        Self {
            id,
            capacity,
            rental_cost: 0.0,
            fuel_cost: 0.0,
            radius_cost: 0.0,
            max_radius: None,
            speed: default_speed(),
            parking_time: 0.0,
            speed_profile: SpeedProfile::constant(),
        }
    }

    /// Flat cost of using one vehicle of this family.
    pub fn with_rental_cost(mut self, cost: f64) -> Self {
        self.rental_cost = cost;
        self
    }

    /// Cost per meter traveled.
    pub fn with_fuel_cost(mut self, cost: f64) -> Self {
        self.fuel_cost = cost;
        self
    }

    /// Cost per squared meter of route spread.
    pub fn with_radius_cost(mut self, cost: f64) -> Self {
        self.radius_cost = cost;
        self
    }

    pub fn with_max_radius(mut self, radius: f64) -> Self {
        self.max_radius = Some(radius);
        self
    }

    /// Sets the cruising speed (m/s) and per-stop parking time (s).
    pub fn with_speed(mut self, speed: f64, parking_time: f64) -> Self {
        self.speed = speed;
        self.parking_time = parking_time;
        self
    }

    pub fn with_speed_profile(mut self, profile: SpeedProfile) -> Self {
        self.speed_profile = profile;
        self
    }

    pub fn id(&self) -> FamilyId {
        self.id
    }

    pub fn capacity(&self) -> f64 {
        self.capacity
    }

    pub fn rental_cost(&self) -> f64 {
        self.rental_cost
    }

    pub fn fuel_cost(&self) -> f64 {
        self.fuel_cost
    }

    pub fn radius_cost(&self) -> f64 {
        self.radius_cost
    }

    pub fn max_radius(&self) -> Option<f64> {
        self.max_radius
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn parking_time(&self) -> f64 {
        self.parking_time
    }

    pub fn speed_profile(&self) -> &SpeedProfile {
        &self.speed_profile
    }

    /// Time to cover `distance` meters when leaving at time `departure`.
    ///
    /// Half of the parking time is charged on every leg.
    pub fn travel_time(&self, distance: f64, departure: f64) -> f64 {
        let reference = distance / self.speed + self.parking_time / 2.0;
        reference * self.speed_profile.factor(departure)
    }
}
