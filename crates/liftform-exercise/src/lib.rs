//! LIFTFORM Exercise - Rep counting state machines
//!
//! One hysteresis state machine per lift. Each machine:
//! - smooths its driving joint signal
//! - enters "bottom" after a stable run below the entry threshold
//! - counts a repetition when the signal clears the exit threshold, debounced
//! - scores the repetition from per-rep extrema with weighted penalties
//! - produces a one-line feedback message for the current frame

pub mod bench_press;
pub mod config;
pub mod cycle;
pub mod deadlift;
pub mod scoring;
pub mod squat;
pub mod state;

#[cfg(test)]
mod test_support;

pub use bench_press::*;
pub use config::*;
pub use cycle::*;
pub use deadlift::*;
pub use scoring::*;
pub use squat::*;
pub use state::*;
