//! Distance matrices.
//!
//! Every instance keeps two dense matrices over the depot (index 0) and its
//! orders (index `i + 1` for the i-th order): Manhattan distances for
//! travel and squared Euclidean distances for route spread.

mod matrix;

pub use matrix::{DistanceMatrix, Metric};
