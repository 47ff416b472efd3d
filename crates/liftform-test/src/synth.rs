//! Synthetic pose generator
//!
//! Builds landmark sets whose joint angles are known exactly, so a script can
//! ask for "elbows at 95 degrees" instead of hand-placing 33 points. Optional
//! positional jitter comes from a seeded RNG to keep runs reproducible.

use liftform_core::{BodyJoint, ExerciseType, Landmark, Landmarks};
use liftform_exercise::BENCH_IDEAL_FLARE_RATIO;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Visibility given to generated joints
pub const DEFAULT_SYNTH_VISIBILITY: f32 = 0.95;

/// Forearm length used for bench poses
const FOREARM: f32 = 0.15;
/// Torso length used for deadlift poses
const TORSO: f32 = 0.2;

/// Point `c` such that the angle at `b` between b->a and b->c is `angle` degrees
fn close_chain(a: (f32, f32), b: (f32, f32), angle: f32, length: f32) -> (f32, f32) {
    let base = (a.1 - b.1).atan2(a.0 - b.0);
    let dir = base + angle.to_radians();
    (b.0 + length * dir.cos(), b.1 + length * dir.sin())
}

/// Seeded synthetic pose source
#[derive(Debug, Clone)]
pub struct PoseSynth {
    rng: StdRng,
    jitter: f32,
    visibility: f32,
}

impl PoseSynth {
    /// Exact poses, no jitter
    pub fn new() -> Self {
        Self::with_seed(0)
    }

    pub fn with_seed(seed: u64) -> Self {
        PoseSynth {
            rng: StdRng::seed_from_u64(seed),
            jitter: 0.0,
            visibility: DEFAULT_SYNTH_VISIBILITY,
        }
    }

    /// Uniform positional noise of up to `amount` on each coordinate
    pub fn jitter(mut self, amount: f32) -> Self {
        self.jitter = amount.abs();
        self
    }

    /// Visibility of every generated joint
    pub fn visibility(mut self, visibility: f32) -> Self {
        self.visibility = visibility.clamp(0.0, 1.0);
        self
    }

    fn landmark(&mut self, p: (f32, f32)) -> Landmark {
        let (mut x, mut y) = p;
        if self.jitter > 0.0 {
            x += self.rng.gen_range(-self.jitter..=self.jitter);
            y += self.rng.gen_range(-self.jitter..=self.jitter);
        }
        Landmark::new(x, y, self.visibility)
    }

    /// Pose for a lift with its driving signal at `signal` and clean form
    ///
    /// `signal` is the elbow angle for bench press, the hip angle for
    /// deadlift, and hip-below-knee depth for squat.
    pub fn pose(&mut self, exercise: ExerciseType, signal: f32) -> Landmarks {
        match exercise {
            ExerciseType::BenchPress => self.bench(signal, BENCH_IDEAL_FLARE_RATIO),
            ExerciseType::Deadlift => self.deadlift(signal, 1.0),
            ExerciseType::Squat => self.squat(signal, 0.0),
        }
    }

    /// Lying press with a given elbow angle and elbow-width/shoulder-width ratio
    pub fn bench(&mut self, elbow_angle: f32, flare_ratio: f32) -> Landmarks {
        let half_shoulder = 0.15;
        let half_elbow = half_shoulder * flare_ratio;

        let ls = (0.5 - half_shoulder, 0.3);
        let rs = (0.5 + half_shoulder, 0.3);
        let le = (0.5 - half_elbow, 0.45);
        let re = (0.5 + half_elbow, 0.45);
        let lw = close_chain(ls, le, elbow_angle, FOREARM);
        let rw = close_chain(rs, re, -elbow_angle, FOREARM);

        Landmarks::from_joints([
            (BodyJoint::LeftShoulder, self.landmark(ls)),
            (BodyJoint::RightShoulder, self.landmark(rs)),
            (BodyJoint::LeftElbow, self.landmark(le)),
            (BodyJoint::RightElbow, self.landmark(re)),
            (BodyJoint::LeftWrist, self.landmark(lw)),
            (BodyJoint::RightWrist, self.landmark(rw)),
        ])
    }

    /// Side-view hinge with a given hip angle and trunk alignment ratio
    pub fn deadlift(&mut self, hip_angle: f32, trunk_ratio: f32) -> Landmarks {
        let thigh = TORSO / trunk_ratio.max(0.05);
        // Equal lean on torso and thigh keeps the vertical spans proportional
        // to the segment lengths
        let lean = (180.0 - hip_angle) / 2.0;
        let torso_dir = (-90.0 + lean).to_radians();
        let thigh_dir = (-90.0 + lean + hip_angle).to_radians();

        let mut landmarks = Landmarks::empty();
        for (hip_x, shoulder, hip, knee) in [
            (0.45, BodyJoint::LeftShoulder, BodyJoint::LeftHip, BodyJoint::LeftKnee),
            (0.55, BodyJoint::RightShoulder, BodyJoint::RightHip, BodyJoint::RightKnee),
        ] {
            let h = (hip_x, 0.5);
            let s = (h.0 + TORSO * torso_dir.cos(), h.1 + TORSO * torso_dir.sin());
            let k = (h.0 + thigh * thigh_dir.cos(), h.1 + thigh * thigh_dir.sin());
            landmarks.set(hip, self.landmark(h));
            landmarks.set(shoulder, self.landmark(s));
            landmarks.set(knee, self.landmark(k));
        }
        landmarks
    }

    /// Front-view squat; `depth` is hip.y - knee.y, `knee_shift` moves both
    /// knees toward -x relative to the ankles
    pub fn squat(&mut self, depth: f32, knee_shift: f32) -> Landmarks {
        let knee_y = 0.6;
        Landmarks::from_joints([
            (BodyJoint::LeftHip, self.landmark((0.42, knee_y + depth))),
            (BodyJoint::RightHip, self.landmark((0.58, knee_y + depth))),
            (BodyJoint::LeftKnee, self.landmark((0.42 - knee_shift, knee_y))),
            (BodyJoint::RightKnee, self.landmark((0.58 - knee_shift, knee_y))),
            (BodyJoint::LeftAnkle, self.landmark((0.42, 0.85))),
            (BodyJoint::RightAnkle, self.landmark((0.58, 0.85))),
        ])
    }
}

impl Default for PoseSynth {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use liftform_core::{LEFT_ELBOW_CHAIN, LEFT_HIP_CHAIN, RIGHT_ELBOW_CHAIN, RIGHT_HIP_CHAIN};
    use liftform_exercise::{elbow_flare_ratio, hip_depth, trunk_alignment_ratio};

    #[test]
    fn test_bench_angles_exact() {
        let mut synth = PoseSynth::new();
        for angle in [60.0, 95.0, 130.0, 175.0] {
            let pose = synth.bench(angle, 1.3);
            let left = pose.angle(LEFT_ELBOW_CHAIN).unwrap();
            let right = pose.angle(RIGHT_ELBOW_CHAIN).unwrap();
            assert!((left - angle).abs() < 0.01, "{angle}: left {left}");
            assert!((right - angle).abs() < 0.01, "{angle}: right {right}");
            assert!((elbow_flare_ratio(&pose).unwrap() - 1.3).abs() < 1e-4);
        }
    }

    #[test]
    fn test_deadlift_geometry() {
        let mut synth = PoseSynth::new();
        let pose = synth.deadlift(100.0, 0.7);

        let hip = pose.bilateral_angle(LEFT_HIP_CHAIN, RIGHT_HIP_CHAIN).unwrap();
        assert!((hip - 100.0).abs() < 0.01);
        assert!((trunk_alignment_ratio(&pose).unwrap() - 0.7).abs() < 1e-3);
    }

    #[test]
    fn test_squat_depth() {
        let mut synth = PoseSynth::new();
        let depth = hip_depth(&synth.pose(ExerciseType::Squat, 0.08)).unwrap();
        assert!((depth - 0.08).abs() < 1e-5);
    }

    #[test]
    fn test_seeded_jitter_reproducible() {
        let mut a = PoseSynth::with_seed(7).jitter(0.01);
        let mut b = PoseSynth::with_seed(7).jitter(0.01);
        assert_eq!(a.bench(100.0, 1.3), b.bench(100.0, 1.3));

        let exact = PoseSynth::new().bench(100.0, 1.3);
        assert_ne!(a.bench(100.0, 1.3), exact);
    }

    #[test]
    fn test_visibility() {
        let mut synth = PoseSynth::new().visibility(0.3);
        let pose = synth.bench(100.0, 1.3);
        // Below the visibility floor every joint reads as absent
        assert!(pose.get(BodyJoint::LeftElbow).is_none());
        assert_eq!(pose.raw(BodyJoint::LeftElbow).unwrap().visibility, 0.3);
    }
}
