//! JSON-lines pose recordings
//!
//! Input: one `{ "t_ms": <u64>, "frame": <PoseFrame> }` object per line, blank
//! lines ignored. Output of [`JsonLinesRecorder`]: one tagged object per line,
//! `{"frame": {...}}` or `{"repetition": {...}}`.

use std::io::{self, BufRead, Write};

use liftform_core::{PoseFrame, RepetitionRecord, SessionTime};
use liftform_engine::{RecordedFrame, SessionRecorder};
use serde::{Deserialize, Serialize};

use crate::{ReplayError, ReplayResult};

/// One captured camera frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimedFrame {
    /// Milliseconds since the start of the recording
    pub t_ms: u64,
    pub frame: PoseFrame,
}

impl TimedFrame {
    pub fn time(&self) -> SessionTime {
        SessionTime::from_millis(self.t_ms.min(i64::MAX as u64) as i64)
    }
}

/// Streaming reader over a recording
pub struct FrameReader<R> {
    lines: io::Lines<R>,
    line: usize,
}

impl<R: BufRead> FrameReader<R> {
    pub fn new(reader: R) -> Self {
        FrameReader {
            lines: reader.lines(),
            line: 0,
        }
    }
}

impl<R: BufRead> Iterator for FrameReader<R> {
    type Item = ReplayResult<TimedFrame>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let text = match self.lines.next()? {
                Ok(text) => text,
                Err(e) => return Some(Err(e.into())),
            };
            self.line += 1;
            if text.trim().is_empty() {
                continue;
            }
            return Some(
                serde_json::from_str(&text).map_err(|source| ReplayError::BadLine {
                    line: self.line,
                    source,
                }),
            );
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "snake_case")]
enum OutputLine<'a> {
    Frame(&'a RecordedFrame),
    Repetition(&'a RepetitionRecord),
}

/// Session recorder writing JSON lines
pub struct JsonLinesRecorder<W: Write> {
    out: W,
}

impl<W: Write> JsonLinesRecorder<W> {
    pub fn new(out: W) -> Self {
        JsonLinesRecorder { out }
    }

    fn write_line(&mut self, line: &OutputLine<'_>) -> io::Result<()> {
        serde_json::to_writer(&mut self.out, line)
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
        self.out.write_all(b"\n")
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + Send> SessionRecorder for JsonLinesRecorder<W> {
    fn record_frame(&mut self, frame: &RecordedFrame) -> io::Result<()> {
        self.write_line(&OutputLine::Frame(frame))
    }

    fn record_repetition(&mut self, record: &RepetitionRecord) -> io::Result<()> {
        self.write_line(&OutputLine::Repetition(record))?;
        self.out.flush()
    }
}
