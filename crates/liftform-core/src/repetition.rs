//! Repetition records

use serde::{Deserialize, Serialize};

use crate::SessionTime;

/// Minimum form score for a repetition to count as good form
pub const GOOD_FORM_SCORE: f32 = 60.0;

/// One completed repetition. Never edited after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepetitionRecord {
    /// 1-based, monotonic within a session
    pub rep_number: u32,
    /// When the repetition completed
    pub timestamp: SessionTime,
    /// Pose-quality confidence at completion (0-1)
    pub pose_confidence: f32,
    /// Whether the blended score reached [`GOOD_FORM_SCORE`]
    pub is_good_form: bool,
    /// Blended form score (0-100)
    pub form_score: f32,
}

/// Good/bad split of a set
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepetitionStats {
    pub total: u32,
    pub good: u32,
    pub bad: u32,
}

impl RepetitionStats {
    /// Tally a sequence of records
    pub fn from_records(records: &[RepetitionRecord]) -> Self {
        let good = records.iter().filter(|r| r.is_good_form).count() as u32;
        let total = records.len() as u32;
        RepetitionStats {
            total,
            good,
            bad: total - good,
        }
    }
}
