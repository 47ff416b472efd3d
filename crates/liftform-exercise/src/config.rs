//! Exercise state machine configuration

use std::time::Duration;

use liftform_core::{LiftformError, LiftformResult, DEFAULT_SMOOTHING_WINDOW};
use serde::{Deserialize, Serialize};

/// Consecutive frames below the entry threshold before "bottom" is latched
pub const MIN_FRAMES_FOR_STABILITY: u32 = 2;

/// Minimum time between two counted repetitions
pub const MIN_REP_DURATION_MS: u64 = 600;

/// Tuning shared by all exercise state machines
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExerciseConfig {
    /// Frames averaged by each angle smoother
    pub smoothing_window: usize,
    /// Stable frames required to latch the bottom position
    pub min_frames_for_stability: u32,
    /// Debounce between counted repetitions, in milliseconds
    pub min_rep_duration_ms: u64,
}

impl Default for ExerciseConfig {
    fn default() -> Self {
        ExerciseConfig {
            smoothing_window: DEFAULT_SMOOTHING_WINDOW,
            min_frames_for_stability: MIN_FRAMES_FOR_STABILITY,
            min_rep_duration_ms: MIN_REP_DURATION_MS,
        }
    }
}

impl ExerciseConfig {
    /// Lighter smoothing for fast, explosive sets
    pub fn responsive() -> Self {
        ExerciseConfig {
            smoothing_window: 2,
            ..Self::default()
        }
    }

    pub fn min_rep_duration(&self) -> Duration {
        Duration::from_millis(self.min_rep_duration_ms)
    }

    pub fn validate(&self) -> LiftformResult<()> {
        if self.smoothing_window == 0 {
            return Err(LiftformError::EmptySmoothingWindow);
        }
        if self.min_frames_for_stability == 0 {
            return Err(LiftformError::InvalidConfig(
                "min_frames_for_stability must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ExerciseConfig::default();
        assert_eq!(config.smoothing_window, 3);
        assert_eq!(config.min_frames_for_stability, 2);
        assert_eq!(config.min_rep_duration(), Duration::from_millis(600));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate() {
        let mut config = ExerciseConfig::responsive();
        assert!(config.validate().is_ok());

        config.min_frames_for_stability = 0;
        assert!(matches!(config.validate(), Err(LiftformError::InvalidConfig(_))));

        config = ExerciseConfig {
            smoothing_window: 0,
            ..ExerciseConfig::default()
        };
        assert_eq!(config.validate(), Err(LiftformError::EmptySmoothingWindow));
    }
}
