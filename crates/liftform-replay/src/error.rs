//! Replay errors

use liftform_core::LiftformError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReplayError {
    #[error("{0}")]
    Usage(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Line {line}: {source}")]
    BadLine {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Liftform(#[from] LiftformError),
}

pub type ReplayResult<T> = Result<T, ReplayError>;
