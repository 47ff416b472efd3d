//! Time primitives for LIFTFORM
//!
//! Session time is monotonic and measured from the start of the session.
//! Repetition debounce is computed on it, so skipped frames never shorten or
//! stretch the measured gap between two repetitions.

use std::ops::{Add, Sub};
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Session time, represented as microseconds since session start
#[derive(
    Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct SessionTime(pub i64);

impl SessionTime {
    pub const ZERO: SessionTime = SessionTime(0);

    #[inline]
    pub fn from_micros(micros: i64) -> Self {
        SessionTime(micros)
    }

    #[inline]
    pub fn from_millis(millis: i64) -> Self {
        SessionTime(millis.saturating_mul(1000))
    }

    #[inline]
    pub fn from_duration(elapsed: Duration) -> Self {
        SessionTime(elapsed.as_micros().min(i64::MAX as u128) as i64)
    }

    #[inline]
    pub fn as_micros(self) -> i64 {
        self.0
    }

    #[inline]
    pub fn as_millis(self) -> i64 {
        self.0 / 1000
    }

    /// Time elapsed since `earlier`, zero if `earlier` is in the future
    #[inline]
    pub fn since(self, earlier: SessionTime) -> Duration {
        self - earlier
    }
}

impl Add<Duration> for SessionTime {
    type Output = SessionTime;

    #[inline]
    fn add(self, rhs: Duration) -> Self::Output {
        SessionTime(self.0 + rhs.as_micros() as i64)
    }
}

impl Sub<SessionTime> for SessionTime {
    type Output = Duration;

    #[inline]
    fn sub(self, rhs: SessionTime) -> Self::Output {
        let diff = self.0 - rhs.0;
        if diff >= 0 {
            Duration::from_micros(diff as u64)
        } else {
            Duration::ZERO
        }
    }
}

impl std::fmt::Debug for SessionTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "t({}ms)", self.as_millis())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_time_conversions() {
        let t = SessionTime::from_millis(1500);
        assert_eq!(t.as_micros(), 1_500_000);
        assert_eq!(t.as_millis(), 1500);
        assert_eq!(SessionTime::from_duration(Duration::from_millis(20)).as_millis(), 20);
    }

    #[test]
    fn test_session_time_difference_saturates() {
        let early = SessionTime::from_millis(100);
        let late = SessionTime::from_millis(700);

        assert_eq!(late - early, Duration::from_millis(600));
        assert_eq!(early - late, Duration::ZERO);
        assert_eq!(late.since(early), Duration::from_millis(600));
    }

    #[test]
    fn test_session_time_add() {
        let t = SessionTime::ZERO + Duration::from_millis(33);
        assert_eq!(t.as_millis(), 33);
        assert!(t > SessionTime::ZERO);
    }
}
