//! Canonical set scenarios
//!
//! Signal values are chosen well clear of the thresholds so the expected
//! outcome does not hinge on rounding in the smoother.

use std::time::Duration;

use liftform_core::ExerciseType;

use crate::{ScriptFrame, SetScript};

pub const BENCH_TOP: f32 = 170.0;
pub const BENCH_BOTTOM: f32 = 95.0;
pub const DEADLIFT_TOP: f32 = 175.0;
pub const DEADLIFT_BOTTOM: f32 = 95.0;
/// Hip angle of a deadlift turned into a squat
pub const DEADLIFT_SQUAT_BOTTOM: f32 = 60.0;
pub const SQUAT_TOP: f32 = -0.2;
pub const SQUAT_BOTTOM: f32 = 0.08;

const RAMP_FRAMES: usize = 5;
const HOLD_FRAMES: usize = 6;

/// Controlled bench press reps with tucked elbows
pub fn clean_bench_set(reps: usize) -> SetScript {
    (0..reps).fold(
        SetScript::new(ExerciseType::BenchPress).hold(BENCH_TOP, 5),
        |script, _| script.rep(BENCH_TOP, BENCH_BOTTOM, RAMP_FRAMES, HOLD_FRAMES),
    )
}

/// Bench reps with elbows flared to `flare` at the bottom
pub fn flared_bench_set(reps: usize, flare: f32) -> SetScript {
    let mut script = SetScript::new(ExerciseType::BenchPress).hold(BENCH_TOP, 5);
    for _ in 0..reps {
        script = script
            .ramp(BENCH_TOP, BENCH_BOTTOM, RAMP_FRAMES)
            .push(ScriptFrame::Bench {
                elbow: BENCH_BOTTOM,
                flare,
            });
        for _ in 1..HOLD_FRAMES {
            script = script.push(ScriptFrame::Bench {
                elbow: BENCH_BOTTOM,
                flare,
            });
        }
        script = script
            .ramp(BENCH_BOTTOM, BENCH_TOP, RAMP_FRAMES)
            .hold(BENCH_TOP, HOLD_FRAMES);
    }
    script
}

/// Hip-hinge deadlift reps with a neutral back
pub fn clean_deadlift_set(reps: usize) -> SetScript {
    (0..reps).fold(
        SetScript::new(ExerciseType::Deadlift).hold(DEADLIFT_TOP, 5),
        |script, _| script.rep(DEADLIFT_TOP, DEADLIFT_BOTTOM, RAMP_FRAMES, HOLD_FRAMES),
    )
}

/// Deadlift reps where the lifter sits down into a squat
pub fn squatted_deadlift_set(reps: usize) -> SetScript {
    (0..reps).fold(
        SetScript::new(ExerciseType::Deadlift).hold(170.0, 5),
        |script, _| script.rep(170.0, DEADLIFT_SQUAT_BOTTOM, 6, 5),
    )
}

/// Squats to below parallel
pub fn squat_set(reps: usize) -> SetScript {
    (0..reps).fold(
        SetScript::new(ExerciseType::Squat).hold(SQUAT_TOP, 5),
        |script, _| script.rep(SQUAT_TOP, SQUAT_BOTTOM, RAMP_FRAMES, HOLD_FRAMES),
    )
}

/// Bench signal oscillating around the entry threshold without ever
/// reaching lockout territory
pub fn bench_hover_at_entry(frames: usize) -> SetScript {
    SetScript::new(ExerciseType::BenchPress)
        .signals((0..frames).map(|i| if i % 2 == 0 { 104.0 } else { 116.0 }))
}

/// Bench signal oscillating around the exit threshold after a real descent
/// was never made
pub fn bench_hover_at_exit(frames: usize) -> SetScript {
    SetScript::new(ExerciseType::BenchPress)
        .signals((0..frames).map(|i| if i % 2 == 0 { 124.0 } else { 136.0 }))
}

/// Bounces packed far tighter than the rep debounce
pub fn bench_bounces(bounces: usize) -> SetScript {
    let mut script = SetScript::new(ExerciseType::BenchPress).hold(BENCH_TOP, 3);
    for _ in 0..bounces {
        script = script.hold(BENCH_BOTTOM, 4).hold(BENCH_TOP, 3);
    }
    script
}

/// One real rep, a quick second dip of `dip_frames` frames, then a held
/// lockout
pub fn bench_bounce_then_lockout(dip_frames: usize) -> SetScript {
    SetScript::new(ExerciseType::BenchPress)
        .hold(BENCH_TOP, 3)
        .hold(BENCH_BOTTOM, 4)
        .hold(BENCH_TOP, 3)
        .hold(BENCH_BOTTOM, dip_frames)
        .hold(BENCH_TOP, 20)
}

/// A bench rep with the lifter briefly occluded at the bottom
pub fn bench_with_occlusion() -> SetScript {
    SetScript::new(ExerciseType::BenchPress)
        .hold(BENCH_TOP, 5)
        .ramp(BENCH_TOP, BENCH_BOTTOM, RAMP_FRAMES)
        .hold(BENCH_BOTTOM, 3)
        .push(ScriptFrame::Occluded)
        .push(ScriptFrame::Occluded)
        .push(ScriptFrame::Occluded)
        .hold(BENCH_BOTTOM, 3)
        .ramp(BENCH_BOTTOM, BENCH_TOP, RAMP_FRAMES)
        .hold(BENCH_TOP, HOLD_FRAMES)
}

/// 30 fps set at a slower 15 fps camera
pub fn slow_camera(script: SetScript) -> SetScript {
    script.interval(Duration::from_micros(66_667))
}
