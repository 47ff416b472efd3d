//! Workout Engine - per-frame set processing
//!
//! The engine is the single owner of the mutable set state: the active
//! exercise state machine, the repetition records and the rep counter. It is
//! driven one frame at a time from whichever thread runs pose detection.

use liftform_core::{
    Clock, ExerciseType, Landmarks, LiftformResult, MonotonicClock, PoseFrame, RepetitionRecord,
    RepetitionStats, SessionTime,
};
use liftform_exercise::{Exercise, ExerciseState};
use serde::{Deserialize, Serialize};

use crate::{
    EngineConfig, PoseQuality, PoseQualityAnalyzer, RecordedFrame, SessionRecorder,
    VisibilityQualityAnalyzer,
};

/// Feedback when the detector found no body
pub const NOT_DETECTED_FEEDBACK: &str = "Position yourself in frame";

/// Prefix of the feedback for detector failures
pub const DETECTION_ERROR_PREFIX: &str = "Error: ";

/// Snapshot of the set after one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutState {
    /// One instruction for this frame
    pub form_feedback: String,
    /// Pose-quality confidence for this frame (0 when no pose)
    pub pose_quality_score: f32,
    pub rep_count: u32,
    pub reps: Vec<RepetitionRecord>,
    /// The frame this snapshot was built from
    pub raw_frame: PoseFrame,
}

/// Rep counting and form scoring for one workout set
pub struct WorkoutEngine {
    config: EngineConfig,
    exercise_type: ExerciseType,
    state: ExerciseState,
    reps: Vec<RepetitionRecord>,
    rep_count: u32,
    analyzer: Box<dyn PoseQualityAnalyzer>,
    recorder: Option<Box<dyn SessionRecorder>>,
    recording: bool,
    clock: Box<dyn Clock>,
}

impl WorkoutEngine {
    /// Engine with default configuration
    pub fn new(exercise: ExerciseType) -> LiftformResult<Self> {
        Self::with_config(exercise, EngineConfig::default())
    }

    pub fn with_config(exercise: ExerciseType, config: EngineConfig) -> LiftformResult<Self> {
        config.validate()?;
        let state = ExerciseState::create(exercise, &config.exercise)?;

        Ok(WorkoutEngine {
            config,
            exercise_type: exercise,
            state,
            reps: Vec::new(),
            rep_count: 0,
            analyzer: Box::new(VisibilityQualityAnalyzer),
            recorder: None,
            recording: false,
            clock: Box::new(MonotonicClock::new()),
        })
    }

    /// Replace the session clock
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Replace the pose-quality analyzer
    pub fn with_analyzer(mut self, analyzer: impl PoseQualityAnalyzer + 'static) -> Self {
        self.analyzer = Box::new(analyzer);
        self
    }

    /// Attach a recorder. Nothing is recorded until [`start_session`](Self::start_session).
    pub fn with_recorder(mut self, recorder: impl SessionRecorder + 'static) -> Self {
        self.recorder = Some(Box::new(recorder));
        self
    }

    /// Begin forwarding frames and repetitions to the recorder
    pub fn start_session(&mut self) {
        if self.recorder.is_none() {
            tracing::debug!("start_session without a recorder attached");
        }
        self.recording = true;
        tracing::info!(exercise = %self.exercise_type, "session started");
    }

    pub fn stop_session(&mut self) {
        if self.recording {
            tracing::info!(
                exercise = %self.exercise_type,
                reps = self.rep_count,
                "session stopped"
            );
        }
        self.recording = false;
    }

    pub fn is_recording(&self) -> bool {
        self.recording && self.recorder.is_some()
    }

    /// Switch lifts. A different lift gets a fresh state machine and an empty set.
    pub fn set_exercise_type(&mut self, exercise: ExerciseType) -> LiftformResult<()> {
        if exercise == self.exercise_type {
            return Ok(());
        }
        self.state = ExerciseState::create(exercise, &self.config.exercise)?;
        tracing::debug!(from = %self.exercise_type, to = %exercise, "exercise changed");
        self.exercise_type = exercise;
        self.clear_reps();
        Ok(())
    }

    /// Process a frame stamped with the engine clock
    pub fn process_pose_frame(&mut self, frame: &PoseFrame) -> WorkoutState {
        let now = self.clock.now();
        self.process_pose_frame_at(frame, now)
    }

    /// Process a frame captured at `now`
    pub fn process_pose_frame_at(&mut self, frame: &PoseFrame, now: SessionTime) -> WorkoutState {
        match frame {
            PoseFrame::NotDetected => self.snapshot(NOT_DETECTED_FEEDBACK.to_string(), 0.0, frame),
            PoseFrame::DetectionError(message) => {
                tracing::warn!(%message, "pose detection failed");
                self.snapshot(format!("{DETECTION_ERROR_PREFIX}{message}"), 0.0, frame)
            }
            PoseFrame::Detected(landmarks) => {
                let quality = self.analyzer.analyze(landmarks, self.exercise_type);
                let feedback = self.state.analyze_feedback(landmarks);

                self.record_frame(landmarks, now);

                if self.state.update_rep_count(landmarks, now) {
                    self.complete_repetition(now, quality);
                }

                self.snapshot(feedback.to_string(), quality.confidence(), frame)
            }
        }
    }

    /// Clear the state machine and the recorded set
    pub fn reset(&mut self) {
        self.state.reset();
        self.clear_reps();
        tracing::debug!(exercise = %self.exercise_type, "workout reset");
    }

    pub fn repetition_stats(&self) -> RepetitionStats {
        RepetitionStats::from_records(&self.reps)
    }

    pub fn exercise_type(&self) -> ExerciseType {
        self.exercise_type
    }

    pub fn rep_count(&self) -> u32 {
        self.rep_count
    }

    pub fn reps(&self) -> &[RepetitionRecord] {
        &self.reps
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Active state machine, for inspection
    pub fn state(&self) -> &ExerciseState {
        &self.state
    }

    fn clear_reps(&mut self) {
        self.reps.clear();
        self.rep_count = 0;
    }

    fn record_frame(&mut self, landmarks: &Landmarks, now: SessionTime) {
        if !self.recording {
            return;
        }
        let Some(recorder) = self.recorder.as_mut() else {
            return;
        };
        let frame = RecordedFrame {
            timestamp: now,
            exercise: self.exercise_type,
            landmarks: landmarks.clone(),
        };
        if let Err(e) = recorder.record_frame(&frame) {
            tracing::warn!(error = %e, "failed to record frame");
        }
    }

    fn complete_repetition(&mut self, now: SessionTime, quality: PoseQuality) {
        self.rep_count += 1;

        let raw_score = self.state.form_score();
        let form_score = self.config.blend_score(raw_score, quality.confidence());
        let record = RepetitionRecord {
            rep_number: self.rep_count,
            timestamp: now,
            pose_confidence: quality.confidence(),
            is_good_form: form_score >= self.config.good_form_threshold,
            form_score,
        };

        tracing::info!(
            exercise = %self.exercise_type,
            rep = record.rep_number,
            raw_score,
            form_score,
            confidence = quality.confidence(),
            good_form = record.is_good_form,
            "repetition counted"
        );

        if self.recording {
            if let Some(recorder) = self.recorder.as_mut() {
                if let Err(e) = recorder.record_repetition(&record) {
                    tracing::warn!(error = %e, rep = record.rep_number, "failed to record repetition");
                }
            }
        }

        self.reps.push(record);
    }

    fn snapshot(&self, form_feedback: String, pose_quality_score: f32, frame: &PoseFrame) -> WorkoutState {
        WorkoutState {
            form_feedback,
            pose_quality_score,
            rep_count: self.rep_count,
            reps: self.reps.clone(),
            raw_frame: frame.clone(),
        }
    }
}

impl std::fmt::Debug for WorkoutEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkoutEngine")
            .field("exercise_type", &self.exercise_type)
            .field("rep_count", &self.rep_count)
            .field("recording", &self.recording)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryRecorder;
    use liftform_core::{LiftformError, ManualClock};
    use liftform_test::PoseSynth;
    use std::time::Duration;

    /// Fixed confidence regardless of the frame
    struct FixedQuality(f32);

    impl PoseQualityAnalyzer for FixedQuality {
        fn analyze(&self, _: &Landmarks, _: ExerciseType) -> PoseQuality {
            PoseQuality::new(self.0)
        }
    }

    fn bench(angle: f32) -> PoseFrame {
        PoseFrame::Detected(PoseSynth::new().pose(ExerciseType::BenchPress, angle))
    }

    const CLEAN_PRESS: [f32; 11] = [
        170.0, 170.0, 100.0, 95.0, 95.0, 98.0, 100.0, 160.0, 165.0, 170.0, 170.0,
    ];

    fn press_set(engine: &mut WorkoutEngine, angles: &[f32], start_ms: i64) -> WorkoutState {
        let mut last = None;
        for (i, angle) in angles.iter().enumerate() {
            let t = SessionTime::from_millis(start_ms + i as i64 * 100);
            last = Some(engine.process_pose_frame_at(&bench(*angle), t));
        }
        last.unwrap()
    }

    #[test]
    fn test_not_detected() {
        let mut engine = WorkoutEngine::new(ExerciseType::Squat).unwrap();
        let state = engine.process_pose_frame_at(&PoseFrame::NotDetected, SessionTime::ZERO);

        assert_eq!(state.form_feedback, "Position yourself in frame");
        assert_eq!(state.pose_quality_score, 0.0);
        assert_eq!(state.rep_count, 0);
        assert_eq!(state.raw_frame, PoseFrame::NotDetected);
    }

    #[test]
    fn test_detection_error() {
        let mut engine = WorkoutEngine::new(ExerciseType::BenchPress).unwrap();
        let frame = PoseFrame::DetectionError("model not loaded".to_string());
        let state = engine.process_pose_frame_at(&frame, SessionTime::ZERO);

        assert_eq!(state.form_feedback, "Error: model not loaded");
        assert_eq!(state.pose_quality_score, 0.0);
    }

    #[test]
    fn test_counts_clean_press() {
        let mut engine = WorkoutEngine::new(ExerciseType::BenchPress)
            .unwrap()
            .with_analyzer(FixedQuality(0.9));

        let state = press_set(&mut engine, &CLEAN_PRESS, 0);

        assert_eq!(state.rep_count, 1);
        assert_eq!(state.reps.len(), 1);
        let rep = &state.reps[0];
        assert_eq!(rep.rep_number, 1);
        assert_eq!(rep.timestamp, SessionTime::from_millis(800));
        assert!(rep.is_good_form);
        assert!(rep.form_score >= 80.0, "score {}", rep.form_score);
        assert_eq!(rep.pose_confidence, 0.9);
        assert_eq!(engine.repetition_stats(), RepetitionStats { total: 1, good: 1, bad: 0 });
    }

    #[test]
    fn test_low_confidence_discount() {
        let mut engine = WorkoutEngine::new(ExerciseType::BenchPress)
            .unwrap()
            .with_analyzer(FixedQuality(0.3));

        press_set(&mut engine, &CLEAN_PRESS, 0);

        let rep = &engine.reps()[0];
        let raw = engine.state().form_score();
        assert!((rep.form_score - raw * 0.6).abs() < 1e-3);
        assert!(!rep.is_good_form);
        assert_eq!(engine.repetition_stats().bad, 1);
    }

    #[test]
    fn test_analyzer_confidence_stays_in_range() {
        let mut engine = WorkoutEngine::new(ExerciseType::BenchPress)
            .unwrap()
            .with_analyzer(FixedQuality(1.5));

        let state = press_set(&mut engine, &CLEAN_PRESS, 0);

        assert_eq!(state.pose_quality_score, 1.0);
        assert_eq!(engine.reps()[0].pose_confidence, 1.0);
    }

    #[test]
    fn test_good_form_threshold_applies_to_records() {
        let config = EngineConfig {
            good_form_threshold: 99.0,
            ..EngineConfig::default()
        };
        let mut engine = WorkoutEngine::with_config(ExerciseType::BenchPress, config)
            .unwrap()
            .with_analyzer(FixedQuality(1.0));

        press_set(&mut engine, &CLEAN_PRESS, 0);

        let rep = &engine.reps()[0];
        assert!(rep.form_score < 99.0);
        assert!(!rep.is_good_form);
        assert_eq!(engine.repetition_stats().bad, 1);
        // Raw verdict keeps the fixed bar
        assert!(engine.state().had_good_form());
    }

    #[test]
    fn test_exercise_change_clears_set() {
        let mut engine = WorkoutEngine::new(ExerciseType::BenchPress)
            .unwrap()
            .with_analyzer(FixedQuality(1.0));
        press_set(&mut engine, &CLEAN_PRESS, 0);
        assert_eq!(engine.rep_count(), 1);

        // Same lift keeps the set
        engine.set_exercise_type(ExerciseType::BenchPress).unwrap();
        assert_eq!(engine.rep_count(), 1);

        engine.set_exercise_type(ExerciseType::Deadlift).unwrap();
        assert_eq!(engine.exercise_type(), ExerciseType::Deadlift);
        assert_eq!(engine.rep_count(), 0);
        assert!(engine.reps().is_empty());
        assert_eq!(engine.state().exercise_type(), ExerciseType::Deadlift);
    }

    #[test]
    fn test_reset() {
        let mut engine = WorkoutEngine::new(ExerciseType::BenchPress)
            .unwrap()
            .with_analyzer(FixedQuality(1.0));
        press_set(&mut engine, &CLEAN_PRESS, 0);

        engine.reset();
        assert_eq!(engine.rep_count(), 0);
        assert_eq!(engine.repetition_stats(), RepetitionStats::default());
        assert!(!engine.state().is_at_bottom());

        // Debounce history is gone too
        let state = press_set(&mut engine, &CLEAN_PRESS, 1000);
        assert_eq!(state.rep_count, 1);
        assert_eq!(state.reps[0].rep_number, 1);
    }

    #[test]
    fn test_second_set_numbering() {
        let mut engine = WorkoutEngine::new(ExerciseType::BenchPress)
            .unwrap()
            .with_analyzer(FixedQuality(1.0));
        press_set(&mut engine, &CLEAN_PRESS, 0);
        let state = press_set(&mut engine, &CLEAN_PRESS, 2000);

        assert_eq!(state.rep_count, 2);
        assert_eq!(state.reps[1].rep_number, 2);
        assert!(state.reps[1].timestamp > state.reps[0].timestamp);
    }

    #[test]
    fn test_recorder_only_while_session_active() {
        let recorder = MemoryRecorder::new();
        let mut engine = WorkoutEngine::new(ExerciseType::BenchPress)
            .unwrap()
            .with_analyzer(FixedQuality(1.0))
            .with_recorder(recorder.clone());

        engine.process_pose_frame_at(&bench(170.0), SessionTime::ZERO);
        assert_eq!(recorder.frame_count(), 0);
        assert!(!engine.is_recording());

        engine.start_session();
        assert!(engine.is_recording());
        press_set(&mut engine, &CLEAN_PRESS, 100);
        engine.process_pose_frame_at(&PoseFrame::NotDetected, SessionTime::from_millis(1500));

        let recording = recorder.snapshot();
        assert_eq!(recording.frames.len(), CLEAN_PRESS.len());
        assert_eq!(recording.repetitions, engine.reps().to_vec());

        engine.stop_session();
        engine.process_pose_frame_at(&bench(170.0), SessionTime::from_millis(1600));
        assert_eq!(recorder.frame_count(), CLEAN_PRESS.len());
    }

    #[test]
    fn test_engine_clock() {
        let clock = ManualClock::new();
        let mut engine = WorkoutEngine::new(ExerciseType::BenchPress)
            .unwrap()
            .with_analyzer(FixedQuality(1.0))
            .with_clock(clock.clone());

        for angle in CLEAN_PRESS {
            engine.process_pose_frame(&bench(angle));
            clock.advance(Duration::from_millis(100));
        }

        assert_eq!(engine.rep_count(), 1);
        assert_eq!(engine.reps()[0].timestamp, SessionTime::from_millis(800));
    }

    #[test]
    fn test_invalid_config() {
        let mut config = EngineConfig::default();
        config.exercise.smoothing_window = 0;
        let err = WorkoutEngine::with_config(ExerciseType::Squat, config).unwrap_err();
        assert_eq!(err, LiftformError::EmptySmoothingWindow);
    }

    #[test]
    fn test_engine_is_send() {
        fn assert_send<T: Send>() {}
        assert_send::<WorkoutEngine>();
    }
}
