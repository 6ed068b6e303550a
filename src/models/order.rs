//! Orders, locations and delivery time windows.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Mean Earth radius in meters.
pub const EARTH_RADIUS: f64 = 6.371e6;

/// Stable external identifier of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(pub usize);

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A point in the plane, in meters.
///
/// # Examples
///
/// ```
/// use u_fleet::models::Location;
///
/// let a = Location::new(0.0, 0.0);
/// let b = Location::new(3.0, 4.0);
/// assert_eq!(a.manhattan(&b), 7.0);
/// assert_eq!(a.euclidean(&b), 5.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Location {
    pub x: f64,
    pub y: f64,
}

impl Location {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Projects geographic coordinates (degrees) onto a local plane.
    ///
    /// Equirectangular projection around `reference_latitude`, usually the
    /// depot latitude.
    pub fn from_degrees(latitude: f64, longitude: f64, reference_latitude: f64) -> Self {
        let x = EARTH_RADIUS * reference_latitude.to_radians().cos() * longitude.to_radians();
        let y = EARTH_RADIUS * latitude.to_radians();
        Self { x, y }
    }

    /// Manhattan distance, the travel metric.
    pub fn manhattan(&self, other: &Location) -> f64 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }

    /// Squared Euclidean distance, the spread metric.
    pub fn euclidean_squared(&self, other: &Location) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    pub fn euclidean(&self, other: &Location) -> f64 {
        self.euclidean_squared(other).sqrt()
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// A delivery time window.
///
/// Service may not start after `end`; a vehicle arriving before `start`
/// waits.
///
/// # Examples
///
/// ```
/// use u_fleet::models::TimeWindow;
///
/// let tw = TimeWindow::new(100.0, 200.0).unwrap();
/// assert!(tw.contains(150.0));
/// assert!(!tw.contains(250.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeWindow {
    start: f64,
    end: f64,
}

impl TimeWindow {
    /// Creates a new time window.
    ///
    /// Returns `None` if `start > end` or either value is non-finite.
    pub fn new(start: f64, end: f64) -> Option<Self> {
        if !start.is_finite() || !end.is_finite() || start > end {
            return None;
        }
        Some(Self { start, end })
    }

    pub fn start(&self) -> f64 {
        self.start
    }

    pub fn end(&self) -> f64 {
        self.end
    }

    pub fn contains(&self, time: f64) -> bool {
        time >= self.start && time <= self.end
    }

    /// Time at which service can begin for a vehicle arriving at `arrival`.
    pub fn service_start(&self, arrival: f64) -> f64 {
        arrival.max(self.start)
    }

    /// Returns `true` if service starting at `time` is too late.
    pub fn is_violated(&self, time: f64) -> bool {
        time > self.end
    }
}

/// A delivery order.
///
/// # Examples
///
/// ```
/// use u_fleet::models::{Location, Order, OrderId, TimeWindow};
///
/// let order = Order::new(OrderId(1), 12.5, Location::new(10.0, 20.0))
///     .with_time_window(TimeWindow::new(0.0, 3600.0).unwrap())
///     .with_service_duration(300.0);
/// assert_eq!(order.id(), OrderId(1));
/// assert_eq!(order.demand(), 12.5);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    id: OrderId,
    demand: f64,
    location: Location,
    #[serde(default)]
    time_window: Option<TimeWindow>,
    #[serde(default)]
    service_duration: f64,
}

impl Order {
    /// Creates an order without time window and with no service duration.
    pub fn new(id: OrderId, demand: f64, location: Location) -> Self {
        Self {
            id,
            demand,
            location,
            time_window: None,
            service_duration: 0.0,
        }
    }

    pub fn with_time_window(mut self, tw: TimeWindow) -> Self {
        self.time_window = Some(tw);
        self
    }

    pub fn with_service_duration(mut self, duration: f64) -> Self {
        self.service_duration = duration;
        self
    }

    pub fn id(&self) -> OrderId {
        self.id
    }

    /// Weight or volume to deliver.
    pub fn demand(&self) -> f64 {
        self.demand
    }

    pub fn location(&self) -> Location {
        self.location
    }

    pub fn time_window(&self) -> Option<&TimeWindow> {
        self.time_window.as_ref()
    }

    pub fn service_duration(&self) -> f64 {
        self.service_duration
    }

    /// Latest allowed service start, `+inf` without a window.
    pub fn deadline(&self) -> f64 {
        self.time_window.map_or(f64::INFINITY, |tw| tw.end())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_window_invalid() {
        assert!(TimeWindow::new(20.0, 10.0).is_none());
        assert!(TimeWindow::new(f64::NAN, 10.0).is_none());
        assert!(TimeWindow::new(10.0, f64::INFINITY).is_none());
    }

    #[test]
    fn test_time_window_service_start() {
        let tw = TimeWindow::new(10.0, 20.0).expect("valid");
        assert_eq!(tw.service_start(5.0), 10.0);
        assert_eq!(tw.service_start(15.0), 15.0);
        assert!(!tw.is_violated(20.0));
        assert!(tw.is_violated(20.1));
    }

    #[test]
    fn test_location_metrics() {
        let a = Location::new(1.0, 2.0);
        let b = Location::new(4.0, 6.0);
        assert_eq!(a.manhattan(&b), 7.0);
        assert_eq!(a.euclidean_squared(&b), 25.0);
        assert_eq!(a.manhattan(&b), b.manhattan(&a));
    }

    #[test]
    fn test_from_degrees_origin() {
        let origin = Location::from_degrees(0.0, 0.0, 48.0);
        assert_eq!(origin, Location::new(0.0, 0.0));
    }

    #[test]
    fn test_from_degrees_latitude_scale() {
        // One degree of latitude is about 111.2 km.
        let a = Location::from_degrees(48.0, 2.0, 48.0);
        let b = Location::from_degrees(49.0, 2.0, 48.0);
        assert!(((b.y - a.y) - 111_194.9).abs() < 1.0);
        assert!((b.x - a.x).abs() < 1e-9);
    }

    #[test]
    fn test_order_deadline() {
        let loc = Location::default();
        let open = Order::new(OrderId(1), 1.0, loc);
        assert_eq!(open.deadline(), f64::INFINITY);
        let tw = TimeWindow::new(0.0, 50.0).expect("valid");
        let tight = Order::new(OrderId(2), 1.0, loc).with_time_window(tw);
        assert_eq!(tight.deadline(), 50.0);
    }
}
