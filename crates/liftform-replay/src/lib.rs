//! LIFTFORM Replay - offline replay of recorded pose streams
//!
//! Reads JSON-lines recordings, drives a [`WorkoutEngine`](liftform_engine::WorkoutEngine)
//! frame by frame and optionally writes the session back out through a
//! JSON-lines [`SessionRecorder`](liftform_engine::SessionRecorder).

pub mod args;
pub mod error;
pub mod recording;
pub mod replay;

pub use args::*;
pub use error::*;
pub use recording::*;
pub use replay::*;
