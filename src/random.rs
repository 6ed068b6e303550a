//! Seeded random number generation.

use rand::rngs::StdRng;
use rand::SeedableRng;

/// Creates a reproducible generator from a seed.
///
/// # Examples
///
/// ```
/// use rand::Rng;
/// use u_fleet::random::create_rng;
///
/// let a: u64 = create_rng(7).random();
/// let b: u64 = create_rng(7).random();
/// assert_eq!(a, b);
/// ```
pub fn create_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}
