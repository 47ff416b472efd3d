//! Scripted set runner
//!
//! A [`SetScript`] describes a set frame by frame in terms of the lift's
//! driving signal. [`SetRunner`] renders each frame through a [`PoseSynth`],
//! feeds it to a [`WorkoutEngine`] and advances a [`ManualClock`] by the
//! script's frame interval, collecting a [`SetResult`].

use std::time::Duration;

use liftform_core::{
    BodyJoint, Clock, ExerciseType, Landmarks, LiftformResult, ManualClock, PoseFrame,
    RepetitionRecord, RepetitionStats, SessionTime,
};
use liftform_engine::{EngineConfig, WorkoutEngine, WorkoutState};

use crate::PoseSynth;

/// Frame interval of a 30 fps camera
pub const DEFAULT_FRAME_INTERVAL: Duration = Duration::from_micros(33_333);

/// One scripted camera frame
#[derive(Debug, Clone, PartialEq)]
pub enum ScriptFrame {
    /// Clean-form pose with the driving signal at this value
    Signal(f32),
    Bench { elbow: f32, flare: f32 },
    Deadlift { hip: f32, trunk: f32 },
    Squat { depth: f32, knee_shift: f32 },
    /// Body detected but no joints visible
    Occluded,
    NotDetected,
    DetectionError(String),
}

/// Frame-by-frame description of a set
#[derive(Debug, Clone)]
pub struct SetScript {
    pub exercise: ExerciseType,
    pub frame_interval: Duration,
    /// Joints removed from every detected frame
    pub hidden: Vec<BodyJoint>,
    pub frames: Vec<ScriptFrame>,
}

impl SetScript {
    pub fn new(exercise: ExerciseType) -> Self {
        SetScript {
            exercise,
            frame_interval: DEFAULT_FRAME_INTERVAL,
            hidden: Vec::new(),
            frames: Vec::new(),
        }
    }

    pub fn interval(mut self, interval: Duration) -> Self {
        self.frame_interval = interval;
        self
    }

    /// Drop a joint from every detected frame
    pub fn hide(mut self, joint: BodyJoint) -> Self {
        self.hidden.push(joint);
        self
    }

    pub fn push(mut self, frame: ScriptFrame) -> Self {
        self.frames.push(frame);
        self
    }

    /// Hold the signal for `frames` frames
    pub fn hold(mut self, signal: f32, frames: usize) -> Self {
        self.frames
            .extend(std::iter::repeat(ScriptFrame::Signal(signal)).take(frames));
        self
    }

    /// Linear ramp over `frames` frames, ending exactly on `to`
    pub fn ramp(mut self, from: f32, to: f32, frames: usize) -> Self {
        for i in 1..=frames {
            let t = i as f32 / frames as f32;
            self.frames.push(ScriptFrame::Signal(from + (to - from) * t));
        }
        self
    }

    /// Signal sequence taken verbatim
    pub fn signals<I: IntoIterator<Item = f32>>(mut self, signals: I) -> Self {
        self.frames.extend(signals.into_iter().map(ScriptFrame::Signal));
        self
    }

    /// One full repetition: down, pause, up, pause
    pub fn rep(self, top: f32, bottom: f32, ramp_frames: usize, hold_frames: usize) -> Self {
        self.ramp(top, bottom, ramp_frames)
            .hold(bottom, hold_frames)
            .ramp(bottom, top, ramp_frames)
            .hold(top, hold_frames)
    }

    /// `frames` frames without a detected body
    pub fn lose_pose(mut self, frames: usize) -> Self {
        self.frames
            .extend(std::iter::repeat(ScriptFrame::NotDetected).take(frames));
        self
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Wall time covered by the script
    pub fn duration(&self) -> Duration {
        self.frame_interval * self.frames.len() as u32
    }
}

/// Per-frame outcome of a scripted set
#[derive(Debug, Clone, Default)]
pub struct SetResult {
    /// Rep count after each frame
    pub rep_counts: Vec<u32>,
    /// Feedback after each frame
    pub feedback: Vec<String>,
    /// Records at the end of the script
    pub reps: Vec<RepetitionRecord>,
    pub last_state: Option<WorkoutState>,
}

impl SetResult {
    pub fn rep_count(&self) -> u32 {
        self.rep_counts.last().copied().unwrap_or(0)
    }

    pub fn stats(&self) -> RepetitionStats {
        RepetitionStats::from_records(&self.reps)
    }

    /// Rep count never decreased
    pub fn is_monotonic(&self) -> bool {
        self.rep_counts.windows(2).all(|w| w[0] <= w[1])
    }

    /// Frame indices at which a repetition was counted
    pub fn counted_at(&self) -> Vec<usize> {
        let mut previous = 0;
        let mut frames = Vec::new();
        for (i, &count) in self.rep_counts.iter().enumerate() {
            if count > previous {
                frames.push(i);
            }
            previous = count;
        }
        frames
    }

    /// Form scores of the counted repetitions
    pub fn scores(&self) -> Vec<f32> {
        self.reps.iter().map(|r| r.form_score).collect()
    }
}

/// Replays scripts through an engine driven by a manual clock
pub struct SetRunner {
    engine: WorkoutEngine,
    clock: ManualClock,
    synth: PoseSynth,
}

impl SetRunner {
    pub fn new(exercise: ExerciseType) -> LiftformResult<Self> {
        Self::with_config(exercise, EngineConfig::default())
    }

    pub fn with_config(exercise: ExerciseType, config: EngineConfig) -> LiftformResult<Self> {
        let clock = ManualClock::new();
        let engine = WorkoutEngine::with_config(exercise, config)?.with_clock(clock.clone());
        Ok(SetRunner {
            engine,
            clock,
            synth: PoseSynth::new(),
        })
    }

    pub fn with_synth(mut self, synth: PoseSynth) -> Self {
        self.synth = synth;
        self
    }

    pub fn engine(&self) -> &WorkoutEngine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut WorkoutEngine {
        &mut self.engine
    }

    pub fn now(&self) -> SessionTime {
        self.clock.now()
    }

    /// Render one scripted frame
    pub fn render(&mut self, script: &SetScript, frame: &ScriptFrame) -> PoseFrame {
        let landmarks = match frame {
            ScriptFrame::Signal(signal) => self.synth.pose(script.exercise, *signal),
            ScriptFrame::Bench { elbow, flare } => self.synth.bench(*elbow, *flare),
            ScriptFrame::Deadlift { hip, trunk } => self.synth.deadlift(*hip, *trunk),
            ScriptFrame::Squat { depth, knee_shift } => self.synth.squat(*depth, *knee_shift),
            ScriptFrame::Occluded => Landmarks::empty(),
            ScriptFrame::NotDetected => return PoseFrame::NotDetected,
            ScriptFrame::DetectionError(message) => {
                return PoseFrame::DetectionError(message.clone())
            }
        };
        let landmarks = script
            .hidden
            .iter()
            .fold(landmarks, |acc, &joint| acc.without(joint));
        PoseFrame::Detected(landmarks)
    }

    /// Play a script, continuing from the engine's current state
    ///
    /// A script for a different lift switches the engine first, which clears
    /// the set.
    pub fn run(&mut self, script: &SetScript) -> LiftformResult<SetResult> {
        self.engine.set_exercise_type(script.exercise)?;

        let mut result = SetResult::default();
        for frame in &script.frames {
            let pose = self.render(script, frame);
            let state = self.engine.process_pose_frame(&pose);
            self.clock.advance(script.frame_interval);

            result.rep_counts.push(state.rep_count);
            result.feedback.push(state.form_feedback.clone());
            result.last_state = Some(state);
        }
        result.reps = self.engine.reps().to_vec();
        Ok(result)
    }
}

/// Run a script on a fresh default engine
pub fn run_script(script: &SetScript) -> LiftformResult<SetResult> {
    SetRunner::new(script.exercise)?.run(script)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_builders() {
        let script = SetScript::new(ExerciseType::BenchPress)
            .hold(170.0, 3)
            .ramp(170.0, 100.0, 7)
            .lose_pose(2);

        assert_eq!(script.len(), 12);
        assert_eq!(script.frames[9], ScriptFrame::Signal(100.0));
        assert_eq!(script.frames[3], ScriptFrame::Signal(160.0));
        assert_eq!(script.frames[11], ScriptFrame::NotDetected);
        assert_eq!(script.duration(), DEFAULT_FRAME_INTERVAL * 12);
    }

    #[test]
    fn test_runner_advances_clock() {
        let script = SetScript::new(ExerciseType::Squat)
            .interval(Duration::from_millis(50))
            .hold(-0.2, 10);
        let mut runner = SetRunner::new(ExerciseType::Squat).unwrap();
        let result = runner.run(&script).unwrap();

        assert_eq!(result.rep_counts.len(), 10);
        assert_eq!(runner.now(), SessionTime::from_millis(500));
        assert_eq!(result.rep_count(), 0);
        assert!(result.is_monotonic());
    }

    #[test]
    fn test_runner_switches_exercise() {
        let mut runner = SetRunner::new(ExerciseType::Squat).unwrap();
        let script = SetScript::new(ExerciseType::Deadlift).hold(170.0, 2);
        runner.run(&script).unwrap();
        assert_eq!(runner.engine().exercise_type(), ExerciseType::Deadlift);
    }

    #[test]
    fn test_hidden_joints() {
        let script = SetScript::new(ExerciseType::BenchPress).hide(BodyJoint::LeftWrist);
        let mut runner = SetRunner::new(ExerciseType::BenchPress).unwrap();
        let frame = runner.render(&script, &ScriptFrame::Signal(120.0));

        let landmarks = frame.landmarks().unwrap();
        assert!(landmarks.get(BodyJoint::LeftWrist).is_none());
        assert!(landmarks.get(BodyJoint::RightWrist).is_some());
    }

    #[test]
    fn test_counted_at() {
        let result = SetResult {
            rep_counts: vec![0, 0, 1, 1, 2],
            ..SetResult::default()
        };
        assert_eq!(result.counted_at(), vec![2, 4]);
        assert_eq!(result.rep_count(), 2);
    }
}
