//! Deadlift - hip hinge state machine
//!
//! Driven by the bilateral hip angle (shoulder-hip-knee). Back position is
//! tracked through the trunk alignment ratio: vertical shoulder-hip span over
//! vertical hip-knee span. A collapsing torso drives the ratio toward zero.

use liftform_core::{
    bilateral_mean, AngleSmoother, BodyJoint, ExerciseType, Landmarks, LiftformResult,
    SessionTime, LEFT_HIP_CHAIN, RIGHT_HIP_CHAIN,
};

use crate::{CycleEvent, Exercise, ExerciseConfig, RepCycle, ScoreCard};

/// Hip angle below which the lifter is at the bottom of the pull
pub const DEADLIFT_ENTRY_ANGLE: f32 = 115.0;
/// Hip angle above which the pull counts as completed
pub const DEADLIFT_EXIT_ANGLE: f32 = 130.0;
/// Hip angle of a full lockout
pub const DEADLIFT_LOCKOUT_ANGLE: f32 = 160.0;
/// Hip angle below which the lift has turned into a squat
pub const DEADLIFT_SQUAT_ANGLE: f32 = 80.0;

pub const DEADLIFT_SQUAT_PENALTY: f32 = 40.0;

/// Trunk ratio below which the back is considered rounding
pub const DEADLIFT_MIN_TRUNK_RATIO: f32 = 0.85;
pub const DEADLIFT_BACK_DEAD_ZONE: f32 = 0.3;
/// Remaining span of the ratio below the dead zone, so a fully collapsed torso
/// takes the whole weight
pub const DEADLIFT_BACK_SCALE: f32 = DEADLIFT_MIN_TRUNK_RATIO - DEADLIFT_BACK_DEAD_ZONE;
pub const DEADLIFT_BACK_WEIGHT: f32 = 30.0;

pub const DEADLIFT_LOCKOUT_WEIGHT: f32 = 20.0;
pub const DEADLIFT_LOCKOUT_SCALE: f32 = 25.0;

/// Upper bound of the trunk ratio
pub const MAX_TRUNK_RATIO: f32 = 2.0;

const MIN_THIGH_SPAN: f32 = 1e-3;

/// Extrema of the pull in progress
#[derive(Debug, Clone, Copy, PartialEq)]
struct PullExtrema {
    min_hip: f32,
    max_hip: f32,
    min_trunk: Option<f32>,
}

impl PullExtrema {
    fn fresh() -> Self {
        PullExtrema {
            min_hip: f32::INFINITY,
            max_hip: f32::NEG_INFINITY,
            min_trunk: None,
        }
    }

    fn observe(&mut self, hip: f32, trunk: Option<f32>) {
        self.min_hip = self.min_hip.min(hip);
        self.max_hip = self.max_hip.max(hip);
        if let Some(ratio) = trunk {
            self.min_trunk = Some(self.min_trunk.map_or(ratio, |m| m.min(ratio)));
        }
    }

    fn squatted(&self) -> bool {
        self.min_hip < DEADLIFT_SQUAT_ANGLE
    }

    fn score(&self) -> f32 {
        let mut card = ScoreCard::new();

        if self.squatted() {
            card.deduct_flat(DEADLIFT_SQUAT_PENALTY);
        }

        if let Some(trunk) = self.min_trunk {
            let deviation = (DEADLIFT_MIN_TRUNK_RATIO - trunk) - DEADLIFT_BACK_DEAD_ZONE;
            card.deduct(deviation, DEADLIFT_BACK_SCALE, DEADLIFT_BACK_WEIGHT);
        }

        if self.max_hip < DEADLIFT_LOCKOUT_ANGLE {
            card.deduct(
                DEADLIFT_LOCKOUT_ANGLE - self.max_hip,
                DEADLIFT_LOCKOUT_SCALE,
                DEADLIFT_LOCKOUT_WEIGHT,
            );
        }

        card.finish()
    }
}

fn side_trunk_ratio(
    landmarks: &Landmarks,
    shoulder: BodyJoint,
    hip: BodyJoint,
    knee: BodyJoint,
) -> Option<f32> {
    let s = landmarks.get(shoulder)?;
    let h = landmarks.get(hip)?;
    let k = landmarks.get(knee)?;

    let thigh = (h.y - k.y).abs();
    if thigh < MIN_THIGH_SPAN {
        return None;
    }
    Some(((s.y - h.y).abs() / thigh).clamp(0.0, MAX_TRUNK_RATIO))
}

/// Bilateral trunk alignment ratio, clamped to [0, 2]
pub fn trunk_alignment_ratio(landmarks: &Landmarks) -> Option<f32> {
    let left = side_trunk_ratio(
        landmarks,
        BodyJoint::LeftShoulder,
        BodyJoint::LeftHip,
        BodyJoint::LeftKnee,
    );
    let right = side_trunk_ratio(
        landmarks,
        BodyJoint::RightShoulder,
        BodyJoint::RightHip,
        BodyJoint::RightKnee,
    );
    bilateral_mean(left, right)
}

/// Deadlift state machine
#[derive(Debug, Clone)]
pub struct DeadliftState {
    cycle: RepCycle,
    hip_smoother: AngleSmoother,
    trunk_smoother: AngleSmoother,
    rep: PullExtrema,
    last_score: f32,
}

impl DeadliftState {
    pub fn new(config: &ExerciseConfig) -> LiftformResult<Self> {
        Ok(DeadliftState {
            cycle: RepCycle::new(config),
            hip_smoother: AngleSmoother::new(config.smoothing_window)?,
            trunk_smoother: AngleSmoother::new(config.smoothing_window)?,
            rep: PullExtrema::fresh(),
            last_score: 0.0,
        })
    }

    fn hip_angle(landmarks: &Landmarks) -> Option<f32> {
        landmarks.bilateral_angle(LEFT_HIP_CHAIN, RIGHT_HIP_CHAIN)
    }
}

impl Exercise for DeadliftState {
    fn exercise_type(&self) -> ExerciseType {
        ExerciseType::Deadlift
    }

    fn analyze_feedback(&self, landmarks: &Landmarks) -> &'static str {
        let Some(raw) = Self::hip_angle(landmarks) else {
            return "Move into frame - hips not visible";
        };
        let hip = self.hip_smoother.preview(raw);

        if let Some(trunk) = trunk_alignment_ratio(landmarks) {
            let trunk = self.trunk_smoother.preview(trunk);
            if trunk < DEADLIFT_MIN_TRUNK_RATIO - DEADLIFT_BACK_DEAD_ZONE {
                return "Keep back straight!";
            }
        }

        if hip < DEADLIFT_SQUAT_ANGLE {
            "Hinge at the hips - don't squat the weight"
        } else if hip < DEADLIFT_ENTRY_ANGLE {
            "Drive your hips forward"
        } else if hip < DEADLIFT_LOCKOUT_ANGLE {
            "Stand tall - finish the lockout"
        } else {
            "Good lockout!"
        }
    }

    fn update_rep_count(&mut self, landmarks: &Landmarks, now: SessionTime) -> bool {
        let Some(raw) = Self::hip_angle(landmarks) else {
            self.cycle.signal_lost();
            return false;
        };

        let hip = self.hip_smoother.add(raw);
        let trunk = trunk_alignment_ratio(landmarks).map(|r| self.trunk_smoother.add(r));
        self.rep.observe(hip, trunk);

        match self.cycle.step(
            hip < DEADLIFT_ENTRY_ANGLE,
            hip > DEADLIFT_EXIT_ANGLE,
            now,
        ) {
            CycleEvent::BottomEntered => {
                tracing::debug!(hip, "deadlift: bottom reached");
                self.rep = PullExtrema::fresh();
                self.rep.observe(hip, trunk);
                false
            }
            CycleEvent::Completed => {
                self.last_score = self.rep.score();
                tracing::debug!(
                    min_hip = self.rep.min_hip,
                    max_hip = self.rep.max_hip,
                    squatted = self.rep.squatted(),
                    score = self.last_score,
                    "deadlift: repetition scored"
                );
                self.rep = PullExtrema::fresh();
                true
            }
            CycleEvent::Debounced => {
                tracing::debug!(hip, "deadlift: lockout ignored, too soon after last rep");
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
        self.hip_smoother.reset();
        self.trunk_smoother.reset();
        self.rep = PullExtrema::fresh();
        self.last_score = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{deadlift_pose, ms};

    fn run(state: &mut DeadliftState, frames: &[(f32, f32)], step_ms: i64) -> u32 {
        let mut reps = 0;
        for (i, (angle, trunk)) in frames.iter().enumerate() {
            if state.update_rep_count(&deadlift_pose(*angle, *trunk), ms(i as i64 * step_ms)) {
                reps += 1;
            }
        }
        reps
    }

    #[test]
    fn test_trunk_ratio() {
        let ratio = trunk_alignment_ratio(&deadlift_pose(120.0, 1.0)).unwrap();
        assert!((ratio - 1.0).abs() < 1e-3);

        let clamped = trunk_alignment_ratio(&deadlift_pose(120.0, 3.0)).unwrap();
        assert_eq!(clamped, MAX_TRUNK_RATIO);

        assert!(trunk_alignment_ratio(&Landmarks::empty()).is_none());
    }

    #[test]
    fn test_clean_pull() {
        let mut state = DeadliftState::new(&ExerciseConfig::default()).unwrap();
        let frames: Vec<(f32, f32)> = [175.0, 175.0, 100.0, 95.0, 95.0, 100.0, 170.0, 175.0, 175.0, 175.0]
            .iter()
            .map(|a| (*a, 1.0))
            .collect();

        assert_eq!(run(&mut state, &frames, 100), 1);
        assert!(state.form_score() >= 80.0, "score {}", state.form_score());
    }

    #[test]
    fn test_squatting_the_pull() {
        let mut state = DeadliftState::new(&ExerciseConfig::default()).unwrap();
        let frames: Vec<(f32, f32)> = [170.0, 110.0, 100.0, 60.0, 60.0, 60.0, 100.0, 165.0, 170.0, 170.0]
            .iter()
            .map(|a| (*a, 1.0))
            .collect();

        assert_eq!(run(&mut state, &frames, 100), 1);
        assert!(state.form_score() <= 60.0, "score {}", state.form_score());
        assert!(!state.had_good_form());
    }

    #[test]
    fn test_rounded_back_penalized() {
        let mut state = DeadliftState::new(&ExerciseConfig::default()).unwrap();
        let frames = [
            (175.0, 1.0),
            (100.0, 0.1),
            (95.0, 0.1),
            (95.0, 0.1),
            (95.0, 0.1),
            (175.0, 1.0),
            (175.0, 1.0),
        ];

        assert_eq!(run(&mut state, &frames, 100), 1);
        assert!(state.form_score() < 80.0, "score {}", state.form_score());
    }

    #[test]
    fn test_feedback() {
        let state = DeadliftState::new(&ExerciseConfig::default()).unwrap();

        assert_eq!(state.analyze_feedback(&Landmarks::empty()), "Move into frame - hips not visible");
        assert_eq!(state.analyze_feedback(&deadlift_pose(100.0, 0.2)), "Keep back straight!");
        assert_eq!(
            state.analyze_feedback(&deadlift_pose(70.0, 1.0)),
            "Hinge at the hips - don't squat the weight"
        );
        assert_eq!(state.analyze_feedback(&deadlift_pose(100.0, 1.0)), "Drive your hips forward");
        assert_eq!(
            state.analyze_feedback(&deadlift_pose(140.0, 1.0)),
            "Stand tall - finish the lockout"
        );
        assert_eq!(state.analyze_feedback(&deadlift_pose(175.0, 1.0)), "Good lockout!");
    }

    #[test]
    fn test_occluded_frame_breaks_stability() {
        let mut state = DeadliftState::new(&ExerciseConfig::default()).unwrap();
        state.update_rep_count(&deadlift_pose(90.0, 1.0), ms(0));
        assert_eq!(state.stability_frames(), 1);

        assert!(!state.update_rep_count(&Landmarks::empty(), ms(33)));
        assert_eq!(state.stability_frames(), 0);
        assert!(!state.is_at_bottom());
    }
}
