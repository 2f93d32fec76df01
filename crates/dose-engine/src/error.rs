//! Error types for dose-engine operations.

use thiserror::Error;

use crate::request::RequestId;
use crate::slot::TimelineId;

#[derive(Error, Debug)]
pub enum AllocError {
    /// An input line did not decode into the expected integers.
    /// `line` is the 1-based line number in the input stream.
    #[error("Format error at line {line}: {message}")]
    Format { line: usize, message: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A well-formed request whose constraints contradict each other.
    #[error("Invalid request {id}: {message}")]
    InvalidRequest { id: RequestId, message: String },

    /// Timeline occupancy is inconsistent with what the search reported.
    /// Never expected in correct operation; the run must not continue.
    #[error("Invariant violation on timeline {timeline}: {message}")]
    InvariantViolation { timeline: TimelineId, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, AllocError>;
