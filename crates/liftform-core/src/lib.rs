//! LIFTFORM Core - Fundamental types and primitives
//!
//! This crate defines the core types used throughout the rep-counting stack:
//! - Body joint numbering, landmarks and pose frames
//! - Session time and clocks
//! - Joint angle calculation and angle smoothing
//! - Exercise types and repetition records

pub mod angles;
pub mod clock;
pub mod error;
pub mod exercise;
pub mod pose;
pub mod repetition;
pub mod smoother;
pub mod time;

pub use angles::*;
pub use clock::*;
pub use error::*;
pub use exercise::*;
pub use pose::*;
pub use repetition::*;
pub use smoother::*;
pub use time::*;
