//! Simulated time values and arithmetic

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Nanoseconds per second
pub const NANOS_PER_SEC: u64 = 1_000_000_000;

/// A point in (or span of) simulated time
///
/// Always normalized: `nanos < NANOS_PER_SEC`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub struct SimTime {
    seconds: u64,
    nanos: u32,
}

impl SimTime {
    /// Time zero
    #[must_use]
    pub const fn zero() -> Self {
        Self {
            seconds: 0,
            nanos: 0,
        }
    }

    /// Create a normalized time from seconds and nanoseconds
    #[must_use]
    pub fn new(seconds: u64, nanos: u64) -> Self {
        Self {
            seconds: seconds + nanos / NANOS_PER_SEC,
            nanos: u32::try_from(nanos % NANOS_PER_SEC).unwrap_or(0),
        }
    }

    /// Create a time from a nanosecond count
    #[must_use]
    pub fn from_nanos(nanos: u64) -> Self {
        Self::new(0, nanos)
    }

    #[must_use]
    pub fn seconds(&self) -> u64 {
        self.seconds
    }

    #[must_use]
    pub fn subsec_nanos(&self) -> u32 {
        self.nanos
    }

    /// Total nanoseconds since time zero
    #[must_use]
    pub fn as_nanos(&self) -> u128 {
        u128::from(self.seconds) * u128::from(NANOS_PER_SEC) + u128::from(self.nanos)
    }

    /// Sum of two times, normalized
    #[must_use]
    pub fn add(&self, other: SimTime) -> Self {
        let nanos = u64::from(self.nanos) + u64::from(other.nanos);
        Self::new(self.seconds + other.seconds, nanos)
    }

    /// A uniformly random time in `[min, max]`
    ///
    /// Returns `min` when the range is empty or inverted.
    #[must_use]
    pub fn random_between<R: Rng + ?Sized>(min: SimTime, max: SimTime, rng: &mut R) -> Self {
        if max <= min {
            return min;
        }
        let picked = rng.random_range(min.as_nanos()..=max.as_nanos());
        let seconds = u64::try_from(picked / u128::from(NANOS_PER_SEC)).unwrap_or(u64::MAX);
        let nanos = u64::try_from(picked % u128::from(NANOS_PER_SEC)).unwrap_or(0);
        Self::new(seconds, nanos)
    }
}

impl fmt::Display for SimTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:03}:{:09}", self.seconds, self.nanos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn add_normalizes_nanos() {
        let a = SimTime::new(1, 600_000_000);
        let b = SimTime::new(0, 700_000_000);
        let sum = a.add(b);
        assert_eq!(sum.seconds(), 2);
        assert_eq!(sum.subsec_nanos(), 300_000_000);
    }

    #[test]
    fn ordering_follows_normal_form() {
        assert!(SimTime::new(1, 0) > SimTime::new(0, 999_999_999));
        assert_eq!(SimTime::new(0, NANOS_PER_SEC), SimTime::new(1, 0));
    }

    #[test]
    fn random_between_stays_in_range() {
        let mut rng = StdRng::seed_from_u64(42);
        let min = SimTime::from_nanos(1_000_000);
        let max = SimTime::from_nanos(500_000_000);
        for _ in 0..100 {
            let t = SimTime::random_between(min, max, &mut rng);
            assert!(t >= min && t <= max);
        }
    }

    #[test]
    fn random_between_degenerate_range() {
        let mut rng = StdRng::seed_from_u64(0);
        let t = SimTime::new(3, 5);
        assert_eq!(SimTime::random_between(t, t, &mut rng), t);
        assert_eq!(
            SimTime::random_between(t, SimTime::zero(), &mut rng),
            t
        );
    }

    #[test]
    fn display_pads_fields() {
        assert_eq!(SimTime::new(7, 42).to_string(), "007:000000042");
    }
}
