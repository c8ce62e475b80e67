//! Mutex-guarded clock shared between the coordinator and workers

use crate::SimTime;
use std::sync::{Arc, Mutex, MutexGuard};

/// The one piece of cross-task mutable state in the simulator
///
/// The coordinator holds the guard for the full duration of a tick; workers
/// take it only long enough to read the current time. A poisoned mutex is
/// recovered by taking the inner value, since `SimTime` has no invalid
/// intermediate states.
#[derive(Debug, Clone, Default)]
pub struct SharedClock {
    inner: Arc<Mutex<SimTime>>,
}

impl SharedClock {
    /// Create a clock starting at time zero
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a clock starting at the given time
    #[must_use]
    pub fn starting_at(time: SimTime) -> Self {
        Self {
            inner: Arc::new(Mutex::new(time)),
        }
    }

    /// Read the current simulated time
    #[must_use]
    pub fn now(&self) -> SimTime {
        *self.guard()
    }

    /// Advance the clock by `increment`, returning the new time
    pub fn advance(&self, increment: SimTime) -> SimTime {
        let mut guard = self.guard();
        *guard = guard.add(increment);
        *guard
    }

    /// Take the clock lock for an exclusive coordinator tick
    ///
    /// The guard dereferences to the current time and may be advanced in
    /// place; workers reading the clock block until it is dropped.
    #[must_use]
    pub fn guard(&self) -> MutexGuard<'_, SimTime> {
        self.inner
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_accumulates() {
        let clock = SharedClock::new();
        clock.advance(SimTime::new(0, 600_000_000));
        let now = clock.advance(SimTime::new(0, 600_000_000));
        assert_eq!(now, SimTime::new(1, 200_000_000));
        assert_eq!(clock.now(), now);
    }

    #[test]
    fn guard_allows_in_place_advance() {
        let clock = SharedClock::starting_at(SimTime::new(5, 0));
        {
            let mut guard = clock.guard();
            *guard = guard.add(SimTime::from_nanos(1));
        }
        assert_eq!(clock.now(), SimTime::new(5, 1));
    }

    #[test]
    fn clones_share_state() {
        let a = SharedClock::new();
        let b = a.clone();
        a.advance(SimTime::new(1, 0));
        assert_eq!(b.now(), SimTime::new(1, 0));
    }
}
