//! Squat - hip-below-knee state machine
//!
//! The driving signal is the smoothed vertical offset of the hips below the
//! knees (image y grows downward). Positive means the hip crease is below the
//! knee, which is both the entry and the depth criterion.
//!
//! Scoring is a placeholder: every counted squat scores full marks until a
//! depth and valgus model reaches parity with the other lifts.

use liftform_core::{
    bilateral_mean, AngleSmoother, BodyJoint, ExerciseType, Landmarks, LiftformResult,
    SessionTime,
};

use crate::{CycleEvent, Exercise, ExerciseConfig, RepCycle};

/// Score given to every counted squat
pub const SQUAT_PLACEHOLDER_SCORE: f32 = 100.0;

/// Horizontal knee offset inside the ankle that triggers the valgus warning
pub const KNEE_VALGUS_TOLERANCE: f32 = 0.05;

fn side_depth(landmarks: &Landmarks, hip: BodyJoint, knee: BodyJoint) -> Option<f32> {
    let h = landmarks.get(hip)?;
    let k = landmarks.get(knee)?;
    Some(h.y - k.y)
}

/// Mean hip.y minus mean knee.y, falling back to one side
pub fn hip_depth(landmarks: &Landmarks) -> Option<f32> {
    bilateral_mean(
        side_depth(landmarks, BodyJoint::LeftHip, BodyJoint::LeftKnee),
        side_depth(landmarks, BodyJoint::RightHip, BodyJoint::RightKnee),
    )
}

/// Either knee has caved inside its ankle
pub fn knee_valgus(landmarks: &Landmarks) -> bool {
    [
        (BodyJoint::LeftKnee, BodyJoint::LeftAnkle),
        (BodyJoint::RightKnee, BodyJoint::RightAnkle),
    ]
    .iter()
    .any(|&(knee, ankle)| match (landmarks.get(knee), landmarks.get(ankle)) {
        (Some(k), Some(a)) => k.x < a.x - KNEE_VALGUS_TOLERANCE,
        _ => false,
    })
}

/// Squat state machine
#[derive(Debug, Clone)]
pub struct SquatState {
    cycle: RepCycle,
    depth_smoother: AngleSmoother,
    last_score: f32,
}

impl SquatState {
    pub fn new(config: &ExerciseConfig) -> LiftformResult<Self> {
        Ok(SquatState {
            cycle: RepCycle::new(config),
            depth_smoother: AngleSmoother::new(config.smoothing_window)?,
            last_score: SQUAT_PLACEHOLDER_SCORE,
        })
    }
}

impl Exercise for SquatState {
    fn exercise_type(&self) -> ExerciseType {
        ExerciseType::Squat
    }

    fn analyze_feedback(&self, landmarks: &Landmarks) -> &'static str {
        let Some(raw) = hip_depth(landmarks) else {
            return "Move into frame - legs not visible";
        };

        if knee_valgus(landmarks) {
            "Push your knees out!"
        } else if self.depth_smoother.preview(raw) > 0.0 {
            "Good depth! Drive up"
        } else {
            "Go deeper"
        }
    }

    fn update_rep_count(&mut self, landmarks: &Landmarks, now: SessionTime) -> bool {
        let Some(raw) = hip_depth(landmarks) else {
            self.cycle.signal_lost();
            return false;
        };

        let below = self.depth_smoother.add(raw) > 0.0;
        match self.cycle.step(below, !below, now) {
            CycleEvent::BottomEntered => {
                tracing::debug!("squat: below parallel");
                false
            }
            CycleEvent::Completed => {
                self.last_score = SQUAT_PLACEHOLDER_SCORE;
                true
            }
            CycleEvent::Debounced => {
                tracing::debug!("squat: rise ignored, too soon after last rep");
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
        self.depth_smoother.reset();
        self.last_score = SQUAT_PLACEHOLDER_SCORE;
    }
}
