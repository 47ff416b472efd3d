//! LIFTFORM Replay - run a recorded pose stream through the workout engine
//!
//! ```text
//! liftform-replay <exercise> <recording.jsonl> [--config cfg.json] [--record out.jsonl]
//! ```
//!
//! Logging is controlled through `RUST_LOG`, e.g. `RUST_LOG=liftform_exercise=debug`.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::process::ExitCode;

use liftform_engine::{EngineConfig, WorkoutEngine};
use liftform_replay::{replay, FrameReader, JsonLinesRecorder, ReplayArgs, ReplayError, ReplayResult};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(ReplayError::Usage(message)) => {
            eprintln!("{message}");
            ExitCode::from(2)
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> ReplayResult<()> {
    let args = ReplayArgs::parse(std::env::args().skip(1))?;

    let config = match &args.config {
        Some(path) => serde_json::from_reader(BufReader::new(File::open(path)?))?,
        None => EngineConfig::default(),
    };

    let mut engine = WorkoutEngine::with_config(args.exercise, config)?;
    if let Some(path) = &args.record {
        let recorder = JsonLinesRecorder::new(BufWriter::new(File::create(path)?));
        engine = engine.with_recorder(recorder);
        engine.start_session();
    }

    tracing::info!(exercise = %args.exercise, input = %args.input.display(), "replaying");
    let frames = FrameReader::new(BufReader::new(File::open(&args.input)?));

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let summary = replay(&mut engine, frames, &mut out)?;
    engine.stop_session();

    writeln!(
        out,
        "{} frames, {} reps: {} good, {} bad",
        summary.frames, summary.stats.total, summary.stats.good, summary.stats.bad
    )?;
    if let Some(mean) = summary.mean_score {
        writeln!(out, "mean form score {mean:.1}")?;
    }
    Ok(())
}
