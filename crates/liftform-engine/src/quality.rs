//! Pose quality analysis

use liftform_core::{ExerciseType, Landmarks};
use serde::{Deserialize, Serialize};

/// Confidence that a frame is usable for the current exercise, always in
/// [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "f32", into = "f32")]
pub struct PoseQuality {
    confidence: f32,
}

impl PoseQuality {
    pub fn new(confidence: f32) -> Self {
        let confidence = if confidence.is_nan() {
            0.0
        } else {
            confidence.clamp(0.0, 1.0)
        };
        PoseQuality { confidence }
    }

    /// No usable pose
    pub fn none() -> Self {
        PoseQuality { confidence: 0.0 }
    }

    pub fn confidence(&self) -> f32 {
        self.confidence
    }
}

impl From<f32> for PoseQuality {
    fn from(confidence: f32) -> Self {
        PoseQuality::new(confidence)
    }
}

impl From<PoseQuality> for f32 {
    fn from(quality: PoseQuality) -> Self {
        quality.confidence
    }
}

/// Scores how well a frame captures the joints an exercise depends on
pub trait PoseQualityAnalyzer: Send {
    fn analyze(&self, landmarks: &Landmarks, exercise: ExerciseType) -> PoseQuality;
}

/// Mean visibility of the exercise's key joints; absent joints count as zero
#[derive(Debug, Clone, Copy, Default)]
pub struct VisibilityQualityAnalyzer;

impl PoseQualityAnalyzer for VisibilityQualityAnalyzer {
    fn analyze(&self, landmarks: &Landmarks, exercise: ExerciseType) -> PoseQuality {
        let joints = exercise.key_joints();
        if joints.is_empty() {
            return PoseQuality::none();
        }
        let total: f32 = joints
            .iter()
            .map(|&joint| landmarks.raw(joint).map_or(0.0, |l| l.visibility))
            .sum();
        PoseQuality::new(total / joints.len() as f32)
    }
}
