//! Joint angle calculation
//!
//! Angle at the middle joint of a three-joint chain, e.g. the elbow between
//! shoulder->elbow and elbow->wrist. Rotation of the whole limb in the image
//! plane does not change the result.

use crate::{BodyJoint, Landmark, Landmarks};

/// Angle at vertex `b` between rays b->a and b->c, in degrees [0, 180]
///
/// Returns `None` if any landmark is missing.
pub fn angle_at(a: Option<&Landmark>, b: Option<&Landmark>, c: Option<&Landmark>) -> Option<f32> {
    let (a, b, c) = (a?, b?, c?);

    let radians = (c.y - b.y).atan2(c.x - b.x) - (a.y - b.y).atan2(a.x - b.x);
    let mut angle = radians.abs().to_degrees();

    if angle > 180.0 {
        angle = 360.0 - angle;
    }

    Some(angle)
}

/// Joint angle averaged over both sides of the body
///
/// - both sides available: mean of the two
/// - one side available: that side
/// - neither: `None`
pub fn bilateral_angle(
    left_a: Option<&Landmark>,
    left_b: Option<&Landmark>,
    left_c: Option<&Landmark>,
    right_a: Option<&Landmark>,
    right_b: Option<&Landmark>,
    right_c: Option<&Landmark>,
) -> Option<f32> {
    let left = angle_at(left_a, left_b, left_c);
    let right = angle_at(right_a, right_b, right_c);
    bilateral_mean(left, right)
}

/// Mean of two optional per-side measurements, falling back to whichever exists
#[inline]
pub fn bilateral_mean(left: Option<f32>, right: Option<f32>) -> Option<f32> {
    match (left, right) {
        (Some(l), Some(r)) => Some((l + r) / 2.0),
        (Some(v), None) | (None, Some(v)) => Some(v),
        (None, None) => None,
    }
}

/// Three-joint chain on one side of the body
pub type JointChain = [BodyJoint; 3];

/// Left elbow chain: shoulder, elbow, wrist
pub const LEFT_ELBOW_CHAIN: JointChain = [
    BodyJoint::LeftShoulder,
    BodyJoint::LeftElbow,
    BodyJoint::LeftWrist,
];

/// Right elbow chain: shoulder, elbow, wrist
pub const RIGHT_ELBOW_CHAIN: JointChain = [
    BodyJoint::RightShoulder,
    BodyJoint::RightElbow,
    BodyJoint::RightWrist,
];

/// Left hip chain: shoulder, hip, knee
pub const LEFT_HIP_CHAIN: JointChain = [
    BodyJoint::LeftShoulder,
    BodyJoint::LeftHip,
    BodyJoint::LeftKnee,
];

/// Right hip chain: shoulder, hip, knee
pub const RIGHT_HIP_CHAIN: JointChain = [
    BodyJoint::RightShoulder,
    BodyJoint::RightHip,
    BodyJoint::RightKnee,
];

impl Landmarks {
    /// Angle at the middle joint of a chain
    pub fn angle(&self, chain: JointChain) -> Option<f32> {
        let [a, b, c] = chain;
        angle_at(self.get(a), self.get(b), self.get(c))
    }

    /// Bilateral angle over a left and right chain
    pub fn bilateral_angle(&self, left: JointChain, right: JointChain) -> Option<f32> {
        bilateral_mean(self.angle(left), self.angle(right))
    }
}
