//! Error types for doubling experiments
//!
//! Only [`Error::OutOfResources`] is recovered by the experiment loop; every
//! other variant propagates to the caller.

use std::collections::TryReserveError;

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Doubling experiment error types
#[derive(Error, Debug)]
pub enum Error {
    /// A ratio or prediction was requested before enough levels were measured
    #[error("Insufficient data: {required} levels required, {available} available")]
    InsufficientData {
        /// Levels needed to answer the query
        required: usize,
        /// Levels currently recorded
        available: usize,
    },

    /// A measurement skipped ahead or went back a level
    #[error("Non-contiguous level: expected {expected}, got {got}")]
    NonContiguousLevel {
        /// Highest level that would keep the series contiguous
        expected: usize,
        /// Level that was appended
        got: usize,
    },

    /// Elapsed time is negative, NaN or infinite
    #[error("Invalid measurement: {0}")]
    InvalidMeasurement(String),

    /// Configuration rejected at construction
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Memory or another resource ran out while running the subject
    #[error("Out of resources: {0}")]
    OutOfResources(String),

    /// The measured subject failed
    #[error("Subject failed: {0}")]
    Subject(String),

    /// `run()` was invoked on a runner that has already finished
    #[error("Experiment already ran; create a new runner for another run")]
    AlreadyRan,

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Whether the experiment loop treats this error as a terminal state
    /// rather than propagating it.
    #[must_use]
    pub const fn is_resource_exhaustion(&self) -> bool {
        matches!(self, Self::OutOfResources(_))
    }
}

impl From<TryReserveError> for Error {
    fn from(err: TryReserveError) -> Self {
        Self::OutOfResources(err.to_string())
    }
}
