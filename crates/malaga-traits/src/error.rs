//! Error types for the Malaga pipeline.
//!
//! Numerical degeneracies (zero variance, missing observations) are not
//! errors; they surface as NaN markers in the computed panels. The variants
//! here cover structural problems with the inputs and invalid parameters.

use thiserror::Error;

/// The main error type for Malaga operations.
#[derive(Debug, Error)]
pub enum MalagaError {
    /// Error due to invalid or malformed data.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Error when a required column is missing from a table.
    #[error("Missing required column: {0}")]
    MissingColumn(String),

    /// Error when two inputs disagree on a dimension.
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// The expected length.
        expected: usize,
        /// The length actually found.
        actual: usize,
    },

    /// Error when data is insufficient for the requested operation.
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    /// Error when a parameter is outside its valid domain.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

/// A specialized Result type for Malaga operations.
pub type Result<T> = std::result::Result<T, MalagaError>;
