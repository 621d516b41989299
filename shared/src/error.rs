//! Domain errors raised while validating forecast inputs

use thiserror::Error;

/// Failures detected before any external collaborator is contacted
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Unknown region: {0}")]
    InvalidRegion(String),

    #[error("Invalid time range: {0}")]
    InvalidRange(String),

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// Raw predictions do not line up with the horizon they were generated for
    #[error("Series length mismatch: expected {expected} values, got {actual}")]
    SeriesLengthMismatch { expected: usize, actual: usize },
}
