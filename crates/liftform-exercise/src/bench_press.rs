//! Bench press - elbow angle state machine

use liftform_core::{
    AngleSmoother, BodyJoint, ExerciseType, Landmarks, LiftformResult, SessionTime,
    LEFT_ELBOW_CHAIN, RIGHT_ELBOW_CHAIN,
};

use crate::{CycleEvent, Exercise, ExerciseConfig, RepCycle, ScoreCard};

/// Elbow angle below which the bar is at the chest
pub const BENCH_ENTRY_ANGLE: f32 = 110.0;
/// Elbow angle above which the press counts as completed
pub const BENCH_EXIT_ANGLE: f32 = 130.0;
/// Elbow angle of a full lockout
pub const BENCH_LOCKOUT_ANGLE: f32 = 155.0;

pub const BENCH_DEPTH_WEIGHT: f32 = 30.0;
pub const BENCH_DEPTH_SCALE: f32 = 40.0;

/// Ideal elbow-width to shoulder-width ratio at the bottom
pub const BENCH_IDEAL_FLARE_RATIO: f32 = 1.3;
pub const BENCH_FLARE_DEAD_ZONE: f32 = 0.3;
pub const BENCH_FLARE_SCALE: f32 = 0.8;
pub const BENCH_FLARE_WEIGHT: f32 = 25.0;

pub const BENCH_LOCKOUT_WEIGHT: f32 = 25.0;
pub const BENCH_LOCKOUT_SCALE: f32 = 25.0;

/// Left/right elbow difference that triggers the uneven-press warning
pub const BENCH_ASYMMETRY_TOLERANCE: f32 = 20.0;

const MIN_SHOULDER_WIDTH: f32 = 1e-3;

/// Extrema of the repetition in progress
#[derive(Debug, Clone, Copy, PartialEq)]
struct PressExtrema {
    min_elbow: f32,
    max_elbow: f32,
    max_flare: Option<f32>,
}

impl PressExtrema {
    fn fresh() -> Self {
        PressExtrema {
            min_elbow: f32::INFINITY,
            max_elbow: f32::NEG_INFINITY,
            max_flare: None,
        }
    }

    fn observe(&mut self, elbow: f32, flare: Option<f32>) {
        self.min_elbow = self.min_elbow.min(elbow);
        self.max_elbow = self.max_elbow.max(elbow);
        if let Some(ratio) = flare {
            self.max_flare = Some(self.max_flare.map_or(ratio, |m| m.max(ratio)));
        }
    }

    fn score(&self) -> f32 {
        let mut card = ScoreCard::new();

        if self.min_elbow > BENCH_ENTRY_ANGLE {
            card.deduct(
                self.min_elbow - BENCH_ENTRY_ANGLE,
                BENCH_DEPTH_SCALE,
                BENCH_DEPTH_WEIGHT,
            );
        }

        if let Some(flare) = self.max_flare {
            let deviation = (flare - BENCH_IDEAL_FLARE_RATIO).abs() - BENCH_FLARE_DEAD_ZONE;
            card.deduct(deviation, BENCH_FLARE_SCALE, BENCH_FLARE_WEIGHT);
        }

        if self.max_elbow < BENCH_LOCKOUT_ANGLE {
            card.deduct(
                BENCH_LOCKOUT_ANGLE - self.max_elbow,
                BENCH_LOCKOUT_SCALE,
                BENCH_LOCKOUT_WEIGHT,
            );
        }

        card.finish()
    }
}

/// Elbow-width over shoulder-width, `None` unless all four joints are visible
pub fn elbow_flare_ratio(landmarks: &Landmarks) -> Option<f32> {
    let ls = landmarks.get(BodyJoint::LeftShoulder)?;
    let rs = landmarks.get(BodyJoint::RightShoulder)?;
    let le = landmarks.get(BodyJoint::LeftElbow)?;
    let re = landmarks.get(BodyJoint::RightElbow)?;

    let shoulder_width = (ls.x - rs.x).abs();
    if shoulder_width < MIN_SHOULDER_WIDTH {
        return None;
    }
    Some((le.x - re.x).abs() / shoulder_width)
}

/// Bench press state machine
#[derive(Debug, Clone)]
pub struct BenchPressState {
    cycle: RepCycle,
    elbow_smoother: AngleSmoother,
    rep: PressExtrema,
    last_score: f32,
}

impl BenchPressState {
    pub fn new(config: &ExerciseConfig) -> LiftformResult<Self> {
        Ok(BenchPressState {
            cycle: RepCycle::new(config),
            elbow_smoother: AngleSmoother::new(config.smoothing_window)?,
            rep: PressExtrema::fresh(),
            last_score: 0.0,
        })
    }

    fn elbow_angle(landmarks: &Landmarks) -> Option<f32> {
        landmarks.bilateral_angle(LEFT_ELBOW_CHAIN, RIGHT_ELBOW_CHAIN)
    }
}

impl Exercise for BenchPressState {
    fn exercise_type(&self) -> ExerciseType {
        ExerciseType::BenchPress
    }

    fn analyze_feedback(&self, landmarks: &Landmarks) -> &'static str {
        let Some(raw) = Self::elbow_angle(landmarks) else {
            return "Move into frame - arms not visible";
        };
        let elbow = self.elbow_smoother.preview(raw);

        if let (Some(left), Some(right)) = (
            landmarks.angle(LEFT_ELBOW_CHAIN),
            landmarks.angle(RIGHT_ELBOW_CHAIN),
        ) {
            if (left - right).abs() > BENCH_ASYMMETRY_TOLERANCE {
                return "Press evenly with both arms";
            }
        }

        if let Some(flare) = elbow_flare_ratio(landmarks) {
            if flare > BENCH_IDEAL_FLARE_RATIO + BENCH_FLARE_DEAD_ZONE {
                return "Tuck your elbows in";
            }
        }

        if elbow < BENCH_ENTRY_ANGLE {
            "Good depth! Press up"
        } else if elbow < BENCH_LOCKOUT_ANGLE {
            "Full range - touch the chest, lock out on top"
        } else {
            "Good lockout!"
        }
    }

    fn update_rep_count(&mut self, landmarks: &Landmarks, now: SessionTime) -> bool {
        let Some(raw) = Self::elbow_angle(landmarks) else {
            self.cycle.signal_lost();
            return false;
        };

        let elbow = self.elbow_smoother.add(raw);
        let flare = elbow_flare_ratio(landmarks);
        self.rep.observe(elbow, flare);

        match self.cycle.step(
            elbow < BENCH_ENTRY_ANGLE,
            elbow > BENCH_EXIT_ANGLE,
            now,
        ) {
            CycleEvent::BottomEntered => {
                tracing::debug!(elbow, "bench press: bottom reached");
                self.rep = PressExtrema::fresh();
                self.rep.observe(elbow, flare);
                false
            }
            CycleEvent::Completed => {
                self.last_score = self.rep.score();
                tracing::debug!(
                    min_elbow = self.rep.min_elbow,
                    max_elbow = self.rep.max_elbow,
                    score = self.last_score,
                    "bench press: repetition scored"
                );
                self.rep = PressExtrema::fresh();
                true
            }
            CycleEvent::Debounced => {
                tracing::debug!(elbow, "bench press: lockout ignored, too soon after last rep");
                false
            }
            CycleEvent::Idle => false,
        }
    }

    fn form_score(&self) -> f32 {
        self.last_score
    }

    fn is_at_bottom(&self) -> bool {
        self.cycle.is_at_bottom()
    }

    fn stability_frames(&self) -> u32 {
        self.cycle.stability_frames()
    }

    fn reset(&mut self) {
        self.cycle.reset();
        self.elbow_smoother.reset();
        self.rep = PressExtrema::fresh();
        self.last_score = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{bench_pose, ms};

    fn run(state: &mut BenchPressState, angles: &[f32], start_ms: i64, step_ms: i64) -> u32 {
        let mut reps = 0;
        for (i, angle) in angles.iter().enumerate() {
            let now = ms(start_ms + i as i64 * step_ms);
            if state.update_rep_count(&bench_pose(*angle, 1.3), now) {
                reps += 1;
            }
        }
        reps
    }

    #[test]
    fn test_clean_rep_scores_high() {
        let mut state = BenchPressState::new(&ExerciseConfig::default()).unwrap();
        let angles = [170.0, 170.0, 100.0, 95.0, 95.0, 98.0, 100.0, 160.0, 165.0, 170.0, 170.0];

        assert_eq!(run(&mut state, &angles, 0, 100), 1);
        assert!(state.form_score() >= 80.0, "score {}", state.form_score());
        assert!(state.had_good_form());
        assert!(!state.is_at_bottom());
    }

    #[test]
    fn test_hovering_between_thresholds_never_counts() {
        let mut state = BenchPressState::new(&ExerciseConfig::default()).unwrap();
        let angles: Vec<f32> = (0..60)
            .map(|i| if i % 2 == 0 { 112.0 } else { 128.0 })
            .collect();

        assert_eq!(run(&mut state, &angles, 0, 33), 0);
        assert!(!state.is_at_bottom());
    }

    #[test]
    fn test_half_rep_loses_lockout_points() {
        let mut state = BenchPressState::new(&ExerciseConfig::default()).unwrap();
        let angles = [120.0, 100.0, 90.0, 90.0, 90.0, 132.0, 134.0, 134.0];

        assert_eq!(run(&mut state, &angles, 0, 100), 1);
        let score = state.form_score();
        assert!(score < 85.0, "score {}", score);
    }

    #[test]
    fn test_flared_elbows_penalized() {
        let mut clean = BenchPressState::new(&ExerciseConfig::default()).unwrap();
        let mut flared = BenchPressState::new(&ExerciseConfig::default()).unwrap();
        let angles = [170.0, 95.0, 95.0, 95.0, 95.0, 170.0, 170.0];

        for (i, angle) in angles.iter().enumerate() {
            clean.update_rep_count(&bench_pose(*angle, 1.3), ms(i as i64 * 100));
            flared.update_rep_count(&bench_pose(*angle, 2.4), ms(i as i64 * 100));
        }
        assert!(flared.form_score() < clean.form_score() - 20.0);
    }

    #[test]
    fn test_elbow_flare_ratio() {
        let ratio = elbow_flare_ratio(&bench_pose(150.0, 1.3)).unwrap();
        assert!((ratio - 1.3).abs() < 1e-3);
        assert!(elbow_flare_ratio(&Landmarks::empty()).is_none());
    }

    #[test]
    fn test_feedback_banding() {
        let state = BenchPressState::new(&ExerciseConfig::default()).unwrap();

        assert_eq!(state.analyze_feedback(&Landmarks::empty()), "Move into frame - arms not visible");
        assert_eq!(state.analyze_feedback(&bench_pose(90.0, 1.3)), "Good depth! Press up");
        assert_eq!(
            state.analyze_feedback(&bench_pose(140.0, 1.3)),
            "Full range - touch the chest, lock out on top"
        );
        assert_eq!(state.analyze_feedback(&bench_pose(170.0, 1.3)), "Good lockout!");
        assert_eq!(state.analyze_feedback(&bench_pose(170.0, 2.0)), "Tuck your elbows in");
    }

    #[test]
    fn test_feedback_uses_smoothed_angle() {
        let mut state = BenchPressState::new(&ExerciseConfig::default()).unwrap();
        state.update_rep_count(&bench_pose(170.0, 1.3), ms(0));
        state.update_rep_count(&bench_pose(170.0, 1.3), ms(33));

        // Raw 100 alone would read as depth; smoothed it is ~146
        assert_eq!(
            state.analyze_feedback(&bench_pose(100.0, 1.3)),
            "Full range - touch the chest, lock out on top"
        );
    }

    #[test]
    fn test_single_arm_visible_still_counts() {
        let mut state = BenchPressState::new(&ExerciseConfig::default()).unwrap();
        let angles = [170.0, 95.0, 95.0, 95.0, 95.0, 170.0, 170.0];
        let mut reps = 0;
        for (i, angle) in angles.iter().enumerate() {
            let pose = bench_pose(*angle, 1.3).without(BodyJoint::RightWrist);
            if state.update_rep_count(&pose, ms(i as i64 * 100)) {
                reps += 1;
            }
        }
        assert_eq!(reps, 1);
    }

    #[test]
    fn test_reset_clears_progress() {
        let mut state = BenchPressState::new(&ExerciseConfig::default()).unwrap();
        run(&mut state, &[95.0, 95.0, 95.0, 95.0], 0, 100);
        assert!(state.is_at_bottom());

        state.reset();
        assert!(!state.is_at_bottom());
        assert_eq!(state.form_score(), 0.0);
        assert_eq!(state.stability_frames(), 0);
    }
}
