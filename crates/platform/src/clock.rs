//! Monotonic time source.
//!
//! Every stateful component owns a [`Clock`] instead of reading a global
//! timer, so host tests can step time by hand with
//! [`MockClock`](crate::mocks::MockClock).

use embassy_time::{Duration, Instant};

/// Source of monotonic timestamps.
pub trait Clock {
    /// Current monotonic time.
    fn now(&self) -> Instant;

    /// Time elapsed since `earlier`, saturating at zero.
    fn elapsed_since(&self, earlier: Instant) -> Duration {
        self.now().saturating_duration_since(earlier)
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> Instant {
        (**self).now()
    }
}

/// Clock backed by the embassy-time driver of the running target.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}
