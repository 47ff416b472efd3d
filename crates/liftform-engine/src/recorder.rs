//! Session recording seam

use std::io;
use std::sync::Arc;

use liftform_core::{ExerciseType, Landmarks, RepetitionRecord, SessionTime};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

/// One detected frame as seen by the engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordedFrame {
    pub timestamp: SessionTime,
    pub exercise: ExerciseType,
    pub landmarks: Landmarks,
}

/// Sink for frames and repetitions of an active session
///
/// Failures are reported back to the engine, which logs them and carries on;
/// a broken recorder never stops rep counting.
pub trait SessionRecorder: Send {
    fn record_frame(&mut self, frame: &RecordedFrame) -> io::Result<()>;

    fn record_repetition(&mut self, record: &RepetitionRecord) -> io::Result<()>;
}

/// Everything captured by a [`MemoryRecorder`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Recording {
    pub frames: Vec<RecordedFrame>,
    pub repetitions: Vec<RepetitionRecord>,
}

/// In-memory recorder
///
/// Clones share one [`Recording`], so a caller can hand one clone to the
/// engine and read captured data back through another.
#[derive(Debug, Clone, Default)]
pub struct MemoryRecorder {
    inner: Arc<Mutex<Recording>>,
}

impl MemoryRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the data captured so far
    pub fn snapshot(&self) -> Recording {
        self.inner.lock().clone()
    }

    pub fn frame_count(&self) -> usize {
        self.inner.lock().frames.len()
    }

    pub fn repetition_count(&self) -> usize {
        self.inner.lock().repetitions.len()
    }
}

impl SessionRecorder for MemoryRecorder {
    fn record_frame(&mut self, frame: &RecordedFrame) -> io::Result<()> {
        self.inner.lock().frames.push(frame.clone());
        Ok(())
    }

    fn record_repetition(&mut self, record: &RepetitionRecord) -> io::Result<()> {
        self.inner.lock().repetitions.push(record.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(ms: i64) -> RecordedFrame {
        RecordedFrame {
            timestamp: SessionTime::from_millis(ms),
            exercise: ExerciseType::Squat,
            landmarks: Landmarks::empty(),
        }
    }

    #[test]
    fn test_clones_share_recording() {
        let reader = MemoryRecorder::new();
        let mut writer = reader.clone();

        writer.record_frame(&frame(0)).unwrap();
        writer.record_frame(&frame(33)).unwrap();
        writer
            .record_repetition(&RepetitionRecord {
                rep_number: 1,
                timestamp: SessionTime::from_millis(33),
                pose_confidence: 1.0,
                is_good_form: true,
                form_score: 100.0,
            })
            .unwrap();

        assert_eq!(reader.frame_count(), 2);
        assert_eq!(reader.repetition_count(), 1);
        assert_eq!(reader.snapshot().frames[1].timestamp, SessionTime::from_millis(33));
    }
}
