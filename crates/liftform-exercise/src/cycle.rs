//! Hysteresis repetition cycle shared by every lift
//!
//! A repetition is: a stable run below the entry threshold ("bottom"), then a
//! frame above the exit threshold. Entry sits below exit, so a signal hovering
//! around either boundary cannot count twice.

use std::time::Duration;

use liftform_core::SessionTime;

use crate::ExerciseConfig;

/// Outcome of one cycle step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleEvent {
    /// Nothing changed
    Idle,
    /// Bottom position latched; a new repetition has begun
    BottomEntered,
    /// Exit crossed too soon after the previous repetition; the bounce is
    /// dropped and the next repetition needs a new bottom
    Debounced,
    /// A repetition completed
    Completed,
}

/// Bottom latch, stability counter and debounce timer
#[derive(Debug, Clone)]
pub struct RepCycle {
    at_bottom: bool,
    stability_frames: u32,
    last_rep_at: Option<SessionTime>,
    min_frames_for_stability: u32,
    min_rep_duration: Duration,
}

impl RepCycle {
    pub fn new(config: &ExerciseConfig) -> Self {
        RepCycle {
            at_bottom: false,
            stability_frames: 0,
            last_rep_at: None,
            min_frames_for_stability: config.min_frames_for_stability,
            min_rep_duration: config.min_rep_duration(),
        }
    }

    /// The driving signal is unavailable this frame
    ///
    /// The stability run is broken; the bottom latch is kept so an occluded
    /// frame mid-rep does not discard the repetition.
    pub fn signal_lost(&mut self) {
        self.stability_frames = 0;
    }

    /// Advance with this frame's (smoothed) threshold comparisons
    pub fn step(&mut self, below_entry: bool, above_exit: bool, now: SessionTime) -> CycleEvent {
        if below_entry {
            self.stability_frames = self.stability_frames.saturating_add(1);
            if self.stability_frames >= self.min_frames_for_stability && !self.at_bottom {
                self.at_bottom = true;
                return CycleEvent::BottomEntered;
            }
            return CycleEvent::Idle;
        }

        // At or above entry: any dip run is over
        self.stability_frames = 0;

        if above_exit && self.at_bottom {
            if let Some(last) = self.last_rep_at {
                if now.since(last) < self.min_rep_duration {
                    self.at_bottom = false;
                    return CycleEvent::Debounced;
                }
            }
            self.at_bottom = false;
            self.last_rep_at = Some(now);
            return CycleEvent::Completed;
        }

        CycleEvent::Idle
    }

    pub fn is_at_bottom(&self) -> bool {
        self.at_bottom
    }

    pub fn stability_frames(&self) -> u32 {
        self.stability_frames
    }

    /// Time of the last counted repetition
    pub fn last_rep_at(&self) -> Option<SessionTime> {
        self.last_rep_at
    }

    pub fn reset(&mut self) {
        self.at_bottom = false;
        self.stability_frames = 0;
        self.last_rep_at = None;
    }
}
