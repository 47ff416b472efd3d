//! Exercise types

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{BodyJoint, LiftformError};

/// Supported lifts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExerciseType {
    Squat,
    Deadlift,
    BenchPress,
}

impl ExerciseType {
    /// All exercise types
    pub fn all() -> &'static [ExerciseType] {
        &[
            ExerciseType::Squat,
            ExerciseType::Deadlift,
            ExerciseType::BenchPress,
        ]
    }

    /// Stable tag used in recordings and on the command line
    pub fn tag(&self) -> &'static str {
        match self {
            ExerciseType::Squat => "squat",
            ExerciseType::Deadlift => "deadlift",
            ExerciseType::BenchPress => "bench_press",
        }
    }

    /// Joints a detector must see for this lift to be analyzed
    pub fn key_joints(&self) -> &'static [BodyJoint] {
        use BodyJoint::*;
        match self {
            ExerciseType::Squat => &[
                LeftHip, RightHip, LeftKnee, RightKnee, LeftAnkle, RightAnkle,
            ],
            ExerciseType::Deadlift => &[
                LeftShoulder,
                RightShoulder,
                LeftHip,
                RightHip,
                LeftKnee,
                RightKnee,
            ],
            ExerciseType::BenchPress => &[
                LeftShoulder,
                RightShoulder,
                LeftElbow,
                RightElbow,
                LeftWrist,
                RightWrist,
            ],
        }
    }
}

impl fmt::Display for ExerciseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for ExerciseType {
    type Err = LiftformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "squat" => Ok(ExerciseType::Squat),
            "deadlift" => Ok(ExerciseType::Deadlift),
            "bench_press" | "benchpress" | "bench" => Ok(ExerciseType::BenchPress),
            _ => Err(LiftformError::UnknownExerciseType(s.to_string())),
        }
    }
}
