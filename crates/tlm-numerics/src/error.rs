//! Error types for numeric primitive construction.

use thiserror::Error;

pub type NumericResult<T> = Result<T, NumericError>;

/// Errors raised when a primitive is configured with invalid values.
///
/// Misuse on the hot path (non-positive timestep, integrating before seeding)
/// panics instead; see the individual primitives.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum NumericError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Lower limit {min} exceeds upper limit {max}")]
    InvertedLimits { min: f64, max: f64 },
}
