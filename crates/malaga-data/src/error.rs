//! Error types for data loading and storage.

use malaga_traits::MalagaError;
use polars::error::PolarsError;
use thiserror::Error;

/// Errors that can occur when reading, writing or configuring pipeline data.
#[derive(Debug, Error)]
pub enum DataError {
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing or serialization failed.
    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Polars operation failed.
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),

    /// Environment variable error.
    #[error("Environment error: {0}")]
    Env(#[from] dotenvy::Error),

    /// No data files or rows were found.
    #[error("No data found: {0}")]
    NotFound(String),

    /// Configuration is invalid.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Error raised by the core pipeline.
    #[error(transparent)]
    Core(#[from] MalagaError),
}
