//! Synthetic poses for unit tests

use liftform_core::{Landmarks, SessionTime};
use liftform_test::PoseSynth;

pub fn ms(v: i64) -> SessionTime {
    SessionTime::from_millis(v)
}

/// Lying press pose with a given elbow angle and elbow/shoulder width ratio
pub fn bench_pose(elbow_angle: f32, flare_ratio: f32) -> Landmarks {
    PoseSynth::new().bench(elbow_angle, flare_ratio)
}

/// Side-view hinge pose with a given hip angle and trunk alignment ratio
pub fn deadlift_pose(hip_angle: f32, trunk_ratio: f32) -> Landmarks {
    PoseSynth::new().deadlift(hip_angle, trunk_ratio)
}

/// Front-view squat pose; `depth` is hip.y - knee.y
pub fn squat_pose(depth: f32, knee_shift: f32) -> Landmarks {
    PoseSynth::new().squat(depth, knee_shift)
}
