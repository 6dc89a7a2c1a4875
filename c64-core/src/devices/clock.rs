//! Host time.
//!
//! The CIAs are paced against host time rather than emulated time. All host
//! time comes through the [`Clock`] trait so tests can drive it by hand.

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// A monotonic time source.
pub trait Clock {
    /// Time elapsed since the clock was created.
    fn elapsed(&self) -> Duration;
}

/// Wall-clock time from [`Instant`].
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    start: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

/// A clock that only moves when told to. Clones share the same time.
///
/// ```
/// use c64_core::devices::clock::{Clock, ManualClock};
/// use std::time::Duration;
///
/// let clock = ManualClock::new();
/// let handle = clock.clone();
/// handle.advance(Duration::from_millis(20));
/// assert_eq!(clock.elapsed(), Duration::from_millis(20));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<Duration>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }

    pub fn set(&self, now: Duration) {
        self.now.set(now);
    }
}

impl Clock for ManualClock {
    fn elapsed(&self) -> Duration {
        self.now.get()
    }
}

/// Opens once per period of host time.
#[derive(Debug, Clone)]
pub struct Throttle {
    period: Duration,
    last_fire: Option<Duration>,
}

impl Throttle {
    /// A throttle firing at most `hz` times per second.
    pub fn with_frequency(hz: u32) -> Self {
        Self {
            period: Duration::from_secs(1) / hz.max(1),
            last_fire: None,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Returns true on the first call and whenever a full period has passed
    /// since the last time it returned true.
    pub fn ready(&mut self, clock: &dyn Clock) -> bool {
        let now = clock.elapsed();
        if let Some(last) = self.last_fire {
            if now.saturating_sub(last) < self.period {
                return false;
            }
        }
        self.last_fire = Some(now);
        true
    }
}
