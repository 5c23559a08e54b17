//! Error types shared by the loader, the configuration layer and the CLI.

use thiserror::Error;

/// Errors raised before or around a GA run.
///
/// The GA loop itself never fails: missing edges are represented as
/// [`Fitness::NoPath`](crate::fitness::Fitness::NoPath), not as errors.
#[derive(Debug, Error)]
pub enum SolverError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed graph input (non-integer token, odd neighbour/weight list, ...)
    #[error("format error on line {line}: {message}")]
    Format { line: usize, message: String },

    /// A vertex index outside `[0, n)` in the graph input
    #[error("vertex {vertex} on line {line} is out of range for a graph of {dimension} vertices")]
    OutOfRange {
        line: usize,
        vertex: i64,
        dimension: usize,
    },

    #[error("invalid configuration: {0}")]
    Configuration(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl SolverError {
    pub(crate) fn format(line: usize, message: impl Into<String>) -> Self {
        SolverError::Format { line, message: message.into() }
    }
}

pub type Result<T> = std::result::Result<T, SolverError>;
