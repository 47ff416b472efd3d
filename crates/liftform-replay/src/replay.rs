//! Replay loop

use std::io::{BufRead, Write};

use liftform_core::{RepetitionStats, SessionTime};
use liftform_engine::WorkoutEngine;

use crate::{FrameReader, ReplayResult};

/// Outcome of a replay
#[derive(Debug, Clone, PartialEq)]
pub struct ReplaySummary {
    pub frames: usize,
    pub stats: RepetitionStats,
    /// Mean blended score over all repetitions, `None` for an empty set
    pub mean_score: Option<f32>,
}

/// Feed every frame of a recording through the engine
///
/// Prints one line per counted repetition to `out`.
pub fn replay<R, W>(
    engine: &mut WorkoutEngine,
    frames: FrameReader<R>,
    out: &mut W,
) -> ReplayResult<ReplaySummary>
where
    R: BufRead,
    W: Write,
{
    let mut count = 0;
    let mut last_time: Option<SessionTime> = None;

    for frame in frames {
        let frame = frame?;
        let now = frame.time();
        if let Some(last) = last_time {
            if now < last {
                tracing::warn!(t_ms = frame.t_ms, "frame timestamp went backwards");
            }
        }
        last_time = Some(now);

        let before = engine.rep_count();
        let state = engine.process_pose_frame_at(&frame.frame, now);
        count += 1;

        if state.rep_count > before {
            if let Some(rep) = state.reps.last() {
                writeln!(
                    out,
                    "rep {:>3}  t={:>8.2}s  score {:>5.1}  confidence {:.2}  {}",
                    rep.rep_number,
                    rep.timestamp.as_millis() as f64 / 1000.0,
                    rep.form_score,
                    rep.pose_confidence,
                    if rep.is_good_form { "good" } else { "bad" },
                )?;
            }
        }
    }

    let reps = engine.reps();
    let mean_score = (!reps.is_empty())
        .then(|| reps.iter().map(|r| r.form_score).sum::<f32>() / reps.len() as f32);

    Ok(ReplaySummary {
        frames: count,
        stats: engine.repetition_stats(),
        mean_score,
    })
}
