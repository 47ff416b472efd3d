//! LIFTFORM Test Harness - Synthetic sets and end-to-end validation
//!
//! This crate provides:
//! - Synthetic pose generation with seeded jitter
//! - Scripted sets replayed through a workout engine on a manual clock
//! - Canonical set scenarios
//! - End-to-end and property tests of the counting invariants

pub mod runner;
pub mod scenarios;
pub mod synth;

pub use runner::*;
pub use synth::*;
