//! Moving-average angle smoother
//!
//! Removes per-frame detector jitter from joint angles. Output is always the
//! mean of the most recent `window` inputs, so it carries no bias from earlier
//! repetitions once the window has turned over.

use crate::{LiftformError, LiftformResult};

/// Default number of frames averaged
pub const DEFAULT_SMOOTHING_WINDOW: usize = 3;

/// Fixed-window moving average over a circular buffer
#[derive(Debug, Clone)]
pub struct AngleSmoother {
    /// Ring of the last `window` samples
    buffer: Vec<f32>,
    /// Next slot to overwrite
    write_index: usize,
    /// Filled slots, saturating at the window size
    filled: usize,
}

impl AngleSmoother {
    /// Create a smoother averaging `window` samples
    pub fn new(window: usize) -> LiftformResult<Self> {
        if window == 0 {
            return Err(LiftformError::EmptySmoothingWindow);
        }
        Ok(Self {
            buffer: vec![0.0; window],
            write_index: 0,
            filled: 0,
        })
    }

    /// Push a sample and return the smoothed value
    pub fn add(&mut self, value: f32) -> f32 {
        let window = self.buffer.len();
        self.buffer[self.write_index] = value;
        self.write_index = (self.write_index + 1) % window;
        self.filled = (self.filled + 1).min(window);
        self.mean()
    }

    /// Value `add` would return for `value`, without consuming it
    pub fn preview(&self, value: f32) -> f32 {
        let window = self.buffer.len();
        if self.filled < window {
            let sum: f32 = self.buffer[..self.filled].iter().sum();
            return (sum + value) / (self.filled + 1) as f32;
        }
        // Full ring: `value` would replace the slot at write_index
        let sum: f32 = self.buffer.iter().sum::<f32>() - self.buffer[self.write_index];
        (sum + value) / window as f32
    }

    /// Current smoothed value, `None` before the first sample
    pub fn current(&self) -> Option<f32> {
        (self.filled > 0).then(|| self.mean())
    }

    /// Forget all samples
    pub fn reset(&mut self) {
        self.buffer.fill(0.0);
        self.write_index = 0;
        self.filled = 0;
    }

    /// Number of samples currently averaged
    pub fn len(&self) -> usize {
        self.filled
    }

    pub fn is_empty(&self) -> bool {
        self.filled == 0
    }

    /// Window size
    pub fn window(&self) -> usize {
        self.buffer.len()
    }

    fn mean(&self) -> f32 {
        // Until the ring wraps, filled slots are exactly 0..filled
        let sum: f32 = self.buffer[..self.filled].iter().sum();
        sum / self.filled as f32
    }
}

impl Default for AngleSmoother {
    fn default() -> Self {
        Self {
            buffer: vec![0.0; DEFAULT_SMOOTHING_WINDOW],
            write_index: 0,
            filled: 0,
        }
    }
}
