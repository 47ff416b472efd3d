//! Engine configuration

use liftform_core::{LiftformError, LiftformResult, GOOD_FORM_SCORE};
use liftform_exercise::ExerciseConfig;
use serde::{Deserialize, Serialize};

/// Pose-quality confidence below which a repetition's score is discounted
pub const MIN_POSE_QUALITY: f32 = 0.5;

/// Smallest multiplier applied to a low-confidence repetition's score
pub const MIN_CONFIDENCE_DISCOUNT: f32 = 0.5;

/// Workout engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Tuning for the exercise state machines
    pub exercise: ExerciseConfig,
    /// Confidence below which scores are discounted
    pub min_pose_quality: f32,
    /// Blended score a repetition needs to count as good form
    ///
    /// Sets `RepetitionRecord::is_good_form` only. The state machine's own
    /// `had_good_form` stays on the raw score and [`GOOD_FORM_SCORE`].
    pub good_form_threshold: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            exercise: ExerciseConfig::default(),
            min_pose_quality: MIN_POSE_QUALITY,
            good_form_threshold: GOOD_FORM_SCORE,
        }
    }
}

impl EngineConfig {
    /// Configuration for fast sets, see [`ExerciseConfig::responsive`]
    pub fn responsive() -> Self {
        EngineConfig {
            exercise: ExerciseConfig::responsive(),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> LiftformResult<()> {
        self.exercise.validate()?;

        if !(self.min_pose_quality > 0.0 && self.min_pose_quality <= 1.0) {
            return Err(LiftformError::InvalidConfig(format!(
                "min_pose_quality must be in (0, 1], got {}",
                self.min_pose_quality
            )));
        }
        if !(0.0..=100.0).contains(&self.good_form_threshold) {
            return Err(LiftformError::InvalidConfig(format!(
                "good_form_threshold must be in [0, 100], got {}",
                self.good_form_threshold
            )));
        }
        Ok(())
    }

    /// Discount a raw form score by pose confidence
    ///
    /// Scores of confident frames pass through; below `min_pose_quality` they
    /// are scaled by `confidence / min_pose_quality`, never below half.
    pub fn blend_score(&self, raw_score: f32, confidence: f32) -> f32 {
        if confidence >= self.min_pose_quality {
            return raw_score;
        }
        let factor = (confidence / self.min_pose_quality).clamp(MIN_CONFIDENCE_DISCOUNT, 1.0);
        // NaN confidence clamps to NaN
        if factor.is_nan() {
            return raw_score * MIN_CONFIDENCE_DISCOUNT;
        }
        raw_score * factor
    }
}
