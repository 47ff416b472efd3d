//! LIFTFORM Engine - Workout session orchestration
//!
//! The engine owns one exercise state machine and turns each incoming
//! [`PoseFrame`](liftform_core::PoseFrame) into a [`WorkoutState`] snapshot:
//! feedback for the current frame, the pose-quality confidence, and the
//! repetitions counted so far.
//!
//! Pose quality and session recording are seams: the engine calls a
//! [`PoseQualityAnalyzer`] and an optional [`SessionRecorder`] and never
//! performs I/O itself.

pub mod config;
pub mod engine;
pub mod quality;
pub mod recorder;

pub use config::*;
pub use engine::*;
pub use quality::*;
pub use recorder::*;
