//! Clock implementations for session time

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::SessionTime;

/// Source of session time for the workout engine
pub trait Clock: Send {
    /// Current session time
    fn now(&self) -> SessionTime;
}

/// Monotonic wall clock anchored at construction
/// INVARIANT: never goes backwards
#[derive(Debug, Clone)]
pub struct MonotonicClock {
    reference: Instant,
}

impl MonotonicClock {
    /// Create a clock whose zero is now
    pub fn new() -> Self {
        MonotonicClock {
            reference: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> SessionTime {
        SessionTime::from_duration(self.reference.elapsed())
    }
}

/// Manually driven clock for replays and tests
///
/// Clones share the same time value, so a caller can keep a handle and advance
/// the clock an engine reads from.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    micros: Arc<AtomicI64>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Jump to a time (only moves forward)
    pub fn set(&self, time: SessionTime) {
        self.micros.fetch_max(time.as_micros(), Ordering::SeqCst);
    }

    /// Advance by a duration, returning the new time
    pub fn advance(&self, dt: Duration) -> SessionTime {
        let delta = dt.as_micros().min(i64::MAX as u128) as i64;
        let previous = self.micros.fetch_add(delta, Ordering::SeqCst);
        SessionTime::from_micros(previous + delta)
    }
}

impl Clock for ManualClock {
    fn now(&self) -> SessionTime {
        SessionTime::from_micros(self.micros.load(Ordering::SeqCst))
    }
}
