//! Error types for LIFTFORM
//!
//! Frame-level anomalies (missing joints, no pose, detector errors) are never
//! errors; they degrade to feedback. These variants cover misuse only.

use thiserror::Error;

/// Core LIFTFORM errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LiftformError {
    #[error("Unknown exercise type: {0}")]
    UnknownExerciseType(String),

    #[error("Invalid landmark count: expected {expected}, got {actual}")]
    InvalidLandmarkCount { expected: usize, actual: usize },

    #[error("Smoothing window must hold at least one sample")]
    EmptySmoothingWindow,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for LIFTFORM operations
pub type LiftformResult<T> = Result<T, LiftformError>;
