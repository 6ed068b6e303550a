//! Dense distance matrix.

use crate::models::Location;

/// Distance function used to fill a [`DistanceMatrix`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    /// `|dx| + |dy|`, used for travel.
    Manhattan,
    /// `dx² + dy²`, used for route spread.
    EuclideanSquared,
}

impl Metric {
    pub fn eval(self, a: &Location, b: &Location) -> f64 {
        match self {
            Metric::Manhattan => a.manhattan(b),
            Metric::EuclideanSquared => a.euclidean_squared(b),
        }
    }
}

/// A dense n×n distance matrix stored in row-major order.
///
/// # Examples
///
/// ```
/// use u_fleet::models::Location;
/// use u_fleet::distance::{DistanceMatrix, Metric};
///
/// let points = [Location::new(0.0, 0.0), Location::new(3.0, 4.0)];
/// let dm = DistanceMatrix::from_locations(&points, Metric::Manhattan);
/// assert_eq!(dm.get(0, 1), 7.0);
/// assert_eq!(dm.size(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct DistanceMatrix {
    data: Vec<f64>,
    size: usize,
}

impl DistanceMatrix {
    fn zeroed(size: usize) -> Self {
        Self {
            data: vec![0.0; size * size],
            size,
        }
    }

    /// Computes a symmetric matrix over `points` with the given metric.
    pub fn from_locations(points: &[Location], metric: Metric) -> Self {
        let n = points.len();
        let mut dm = Self::zeroed(n);
        for i in 0..n {
            for j in (i + 1)..n {
                let d = metric.eval(&points[i], &points[j]);
                dm.set(i, j, d);
                dm.set(j, i, d);
            }
        }
        dm
    }

    /// Returns the distance from point `from` to point `to`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    pub fn get(&self, from: usize, to: usize) -> f64 {
        self.data[from * self.size + to]
    }

    fn set(&mut self, from: usize, to: usize, distance: f64) {
        self.data[from * self.size + to] = distance;
    }

    /// Number of points in this matrix.
    pub fn size(&self) -> usize {
        self.size
    }

}
