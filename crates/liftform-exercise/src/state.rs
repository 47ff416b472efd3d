//! Exercise state - the per-set state machine and its factory

use liftform_core::{ExerciseType, Landmarks, LiftformResult, SessionTime, GOOD_FORM_SCORE};

use crate::{BenchPressState, DeadliftState, ExerciseConfig, SquatState};

/// Contract every exercise state machine fulfils
pub trait Exercise {
    /// Lift this machine analyzes
    fn exercise_type(&self) -> ExerciseType;

    /// One instruction for the current frame. Does not advance the machine.
    fn analyze_feedback(&self, landmarks: &Landmarks) -> &'static str;

    /// Advance one frame; `true` iff a repetition just completed
    fn update_rep_count(&mut self, landmarks: &Landmarks, now: SessionTime) -> bool;

    /// Score (0-100) of the most recently completed repetition
    fn form_score(&self) -> f32;

    /// Raw score of the last repetition reached [`GOOD_FORM_SCORE`]
    ///
    /// Engines that discount or re-threshold scores keep their own verdict
    /// on each `RepetitionRecord`.
    fn had_good_form(&self) -> bool {
        self.form_score() >= GOOD_FORM_SCORE
    }

    /// Bottom position currently latched
    fn is_at_bottom(&self) -> bool;

    /// Current run of frames below the entry threshold
    fn stability_frames(&self) -> u32;

    /// Clear hysteresis, accumulators and smoothers
    fn reset(&mut self);
}

/// State machine for one workout set, one variant per lift
#[derive(Debug, Clone)]
pub enum ExerciseState {
    Squat(SquatState),
    Deadlift(DeadliftState),
    BenchPress(BenchPressState),
}

impl ExerciseState {
    /// Fresh state machine for a lift
    pub fn create(exercise: ExerciseType, config: &ExerciseConfig) -> LiftformResult<Self> {
        config.validate()?;
        let state = match exercise {
            ExerciseType::Squat => ExerciseState::Squat(SquatState::new(config)?),
            ExerciseType::Deadlift => ExerciseState::Deadlift(DeadliftState::new(config)?),
            ExerciseType::BenchPress => ExerciseState::BenchPress(BenchPressState::new(config)?),
        };
        Ok(state)
    }

    fn inner(&self) -> &dyn Exercise {
        match self {
            ExerciseState::Squat(s) => s,
            ExerciseState::Deadlift(s) => s,
            ExerciseState::BenchPress(s) => s,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn Exercise {
        match self {
            ExerciseState::Squat(s) => s,
            ExerciseState::Deadlift(s) => s,
            ExerciseState::BenchPress(s) => s,
        }
    }
}

impl Exercise for ExerciseState {
    fn exercise_type(&self) -> ExerciseType {
        self.inner().exercise_type()
    }

    fn analyze_feedback(&self, landmarks: &Landmarks) -> &'static str {
        self.inner().analyze_feedback(landmarks)
    }

    fn update_rep_count(&mut self, landmarks: &Landmarks, now: SessionTime) -> bool {
        self.inner_mut().update_rep_count(landmarks, now)
    }

    fn form_score(&self) -> f32 {
        self.inner().form_score()
    }

    /// Raw score of the last repetition reached [`GOOD_FORM_SCORE`]
    ///
    /// Engines that discount or re-threshold scores keep their own verdict
    /// on each `RepetitionRecord`.
    fn had_good_form(&self) -> bool {
        self.inner().had_good_form()
    }

    fn is_at_bottom(&self) -> bool {
        self.inner().is_at_bottom()
    }

    fn stability_frames(&self) -> u32 {
        self.inner().stability_frames()
    }

    fn reset(&mut self) {
        self.inner_mut().reset()
    }
}
