//! Pose data - body joints, landmarks and per-frame detector output
//!
//! Landmarks are produced by an external pose detector. This crate only reads
//! them; a joint below the visibility floor is treated exactly like a joint the
//! detector did not report.

use serde::{Deserialize, Serialize};

use crate::{LiftformError, LiftformResult};

/// Minimum visibility for a landmark to be used
pub const MIN_LANDMARK_VISIBILITY: f32 = 0.5;

/// Number of landmark slots in a pose
pub const LANDMARK_COUNT: usize = 33;

/// Body joint identifier, numbered in the detector's fixed landmark order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum BodyJoint {
    // Head
    Nose = 0,
    LeftEyeInner = 1,
    LeftEye = 2,
    LeftEyeOuter = 3,
    RightEyeInner = 4,
    RightEye = 5,
    RightEyeOuter = 6,
    LeftEar = 7,
    RightEar = 8,
    MouthLeft = 9,
    MouthRight = 10,

    // Arms
    LeftShoulder = 11,
    RightShoulder = 12,
    LeftElbow = 13,
    RightElbow = 14,
    LeftWrist = 15,
    RightWrist = 16,

    // Hands
    LeftPinky = 17,
    RightPinky = 18,
    LeftIndex = 19,
    RightIndex = 20,
    LeftThumb = 21,
    RightThumb = 22,

    // Legs
    LeftHip = 23,
    RightHip = 24,
    LeftKnee = 25,
    RightKnee = 26,
    LeftAnkle = 27,
    RightAnkle = 28,

    // Feet
    LeftHeel = 29,
    RightHeel = 30,
    LeftFootIndex = 31,
    RightFootIndex = 32,
}

impl BodyJoint {
    /// All joints in landmark order
    pub fn all() -> &'static [BodyJoint] {
        use BodyJoint::*;
        &[
            Nose,
            LeftEyeInner,
            LeftEye,
            LeftEyeOuter,
            RightEyeInner,
            RightEye,
            RightEyeOuter,
            LeftEar,
            RightEar,
            MouthLeft,
            MouthRight,
            LeftShoulder,
            RightShoulder,
            LeftElbow,
            RightElbow,
            LeftWrist,
            RightWrist,
            LeftPinky,
            RightPinky,
            LeftIndex,
            RightIndex,
            LeftThumb,
            RightThumb,
            LeftHip,
            RightHip,
            LeftKnee,
            RightKnee,
            LeftAnkle,
            RightAnkle,
            LeftHeel,
            RightHeel,
            LeftFootIndex,
            RightFootIndex,
        ]
    }

    /// Slot of this joint in a landmark array
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Joint at a landmark slot
    pub fn from_index(index: usize) -> Option<BodyJoint> {
        Self::all().get(index).copied()
    }
}

/// A single detected 2D landmark (normalized image coordinates)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    /// Horizontal position, 0-1
    pub x: f32,
    /// Vertical position, 0-1 (grows downward)
    pub y: f32,
    /// Detector confidence that the joint is visible, 0-1
    pub visibility: f32,
}

impl Landmark {
    pub fn new(x: f32, y: f32, visibility: f32) -> Self {
        Self { x, y, visibility }
    }

    /// Fully visible landmark
    pub fn visible(x: f32, y: f32) -> Self {
        Self::new(x, y, 1.0)
    }

    /// Whether this landmark clears the visibility floor
    #[inline]
    pub fn is_visible(&self) -> bool {
        self.visibility >= MIN_LANDMARK_VISIBILITY
    }
}

/// All landmarks of one detected pose, indexed by [`BodyJoint`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Option<Landmark>>", into = "Vec<Option<Landmark>>")]
pub struct Landmarks {
    slots: [Option<Landmark>; LANDMARK_COUNT],
}

impl Default for Landmarks {
    fn default() -> Self {
        Self::empty()
    }
}

impl Landmarks {
    /// A pose with no joints reported
    pub fn empty() -> Self {
        Self {
            slots: [None; LANDMARK_COUNT],
        }
    }

    /// Build from an iterator of (joint, landmark) pairs
    pub fn from_joints<I>(joints: I) -> Self
    where
        I: IntoIterator<Item = (BodyJoint, Landmark)>,
    {
        let mut landmarks = Self::empty();
        for (joint, landmark) in joints {
            landmarks.set(joint, landmark);
        }
        landmarks
    }

    /// Build from a flat `[x, y, visibility] x 33` buffer
    pub fn from_flat(data: &[f32]) -> LiftformResult<Self> {
        let expected = LANDMARK_COUNT * 3;
        if data.len() != expected {
            return Err(LiftformError::InvalidLandmarkCount {
                expected,
                actual: data.len(),
            });
        }

        let mut landmarks = Self::empty();
        for (slot, chunk) in landmarks.slots.iter_mut().zip(data.chunks_exact(3)) {
            *slot = Some(Landmark::new(chunk[0], chunk[1], chunk[2]));
        }
        Ok(landmarks)
    }

    /// Set a joint
    pub fn set(&mut self, joint: BodyJoint, landmark: Landmark) {
        self.slots[joint.index()] = Some(landmark);
    }

    /// Remove a joint
    pub fn clear(&mut self, joint: BodyJoint) {
        self.slots[joint.index()] = None;
    }

    /// Builder-style [`Landmarks::set`]
    pub fn with(mut self, joint: BodyJoint, landmark: Landmark) -> Self {
        self.set(joint, landmark);
        self
    }

    /// Builder-style [`Landmarks::clear`]
    pub fn without(mut self, joint: BodyJoint) -> Self {
        self.clear(joint);
        self
    }

    /// Usable landmark for a joint (present and visible)
    #[inline]
    pub fn get(&self, joint: BodyJoint) -> Option<&Landmark> {
        self.slots[joint.index()]
            .as_ref()
            .filter(|landmark| landmark.is_visible())
    }

    /// Landmark as reported, ignoring the visibility floor
    #[inline]
    pub fn raw(&self, joint: BodyJoint) -> Option<&Landmark> {
        self.slots[joint.index()].as_ref()
    }

    /// Number of usable joints
    pub fn visible_count(&self) -> usize {
        self.slots
            .iter()
            .flatten()
            .filter(|landmark| landmark.is_visible())
            .count()
    }

    /// Whether no joint is usable
    pub fn is_empty(&self) -> bool {
        self.visible_count() == 0
    }
}

impl TryFrom<Vec<Option<Landmark>>> for Landmarks {
    type Error = LiftformError;

    fn try_from(value: Vec<Option<Landmark>>) -> Result<Self, Self::Error> {
        let actual = value.len();
        let slots: [Option<Landmark>; LANDMARK_COUNT] =
            value
                .try_into()
                .map_err(|_| LiftformError::InvalidLandmarkCount {
                    expected: LANDMARK_COUNT,
                    actual,
                })?;
        Ok(Self { slots })
    }
}

impl From<Landmarks> for Vec<Option<Landmark>> {
    fn from(value: Landmarks) -> Self {
        value.slots.to_vec()
    }
}

/// Output of the pose detector for one camera frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PoseFrame {
    /// A body was found
    Detected(Landmarks),
    /// No body in frame
    NotDetected,
    /// The detector reported a failure
    DetectionError(String),
}

impl PoseFrame {
    /// Landmarks if a body was detected
    pub fn landmarks(&self) -> Option<&Landmarks> {
        match self {
            PoseFrame::Detected(landmarks) => Some(landmarks),
            _ => None,
        }
    }

    pub fn is_detected(&self) -> bool {
        matches!(self, PoseFrame::Detected(_))
    }
}
