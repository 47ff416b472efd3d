//! Form score arithmetic
//!
//! A repetition starts at 100. Each fault deducts
//! `clamp(deviation / scale, 0, 1) * weight`, and the total is clamped to
//! [0, 100].

/// Score of a flawless repetition
pub const MAX_FORM_SCORE: f32 = 100.0;

/// Deduction for one fault
#[inline]
pub fn penalty(deviation: f32, scale: f32, weight: f32) -> f32 {
    let ratio = deviation / scale;
    if ratio.is_nan() {
        return 0.0;
    }
    ratio.clamp(0.0, 1.0) * weight
}

/// Clamp a score into [0, 100]
#[inline]
pub fn clamp_score(score: f32) -> f32 {
    if score.is_nan() {
        return 0.0;
    }
    score.clamp(0.0, MAX_FORM_SCORE)
}

/// Running total of deductions for one repetition
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreCard {
    score: f32,
}

impl ScoreCard {
    pub fn new() -> Self {
        ScoreCard {
            score: MAX_FORM_SCORE,
        }
    }

    /// Deduct a scaled penalty
    pub fn deduct(&mut self, deviation: f32, scale: f32, weight: f32) -> f32 {
        let amount = penalty(deviation, scale, weight);
        self.score -= amount;
        amount
    }

    /// Deduct a fixed amount
    pub fn deduct_flat(&mut self, weight: f32) {
        self.score -= weight;
    }

    pub fn finish(self) -> f32 {
        clamp_score(self.score)
    }
}

impl Default for ScoreCard {
    fn default() -> Self {
        Self::new()
    }
}
