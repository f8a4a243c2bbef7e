//! Data access for the malaga factor momentum pipeline.
//!
//! This crate connects the pure pipeline crates to files on disk:
//! - [`config`]: pipeline parameters, date splits and result paths
//! - [`store`]: reading directories of Parquet files and writing results
//! - [`frames`]: conversions between `DataFrame`s and pipeline types
//!
//! # Usage
//!
//! ```rust,ignore
//! use malaga_data::{PipelineConfig, Split, frames, store};
//!
//! let config = PipelineConfig::load(None)?;
//! let range = config.split(Split::Train);
//! let df = store::read_parquet_dir(&config.factors_dir, Some(range))?;
//! let returns = frames::factor_panel(&df)?;
//! ```
//!
//! # Environment Variables
//!
//! Paths can be set in the environment or a `.env` file:
//!
//! ```bash
//! MALAGA_PROJECT_ROOT=/data/momentum
//! MALAGA_FACTORS_DIR=/data/barra/factors
//! MALAGA_EXPOSURES_DIR=/data/barra/exposures
//! MALAGA_ASSETS_DIR=/data/barra/assets
//! MALAGA_RISK_DIR=/data/barra/factor_vol
//! ```

pub mod config;
mod error;
pub mod frames;
pub mod store;

pub use config::{DateRange, PipelineConfig, Split};
pub use error::DataError;

/// Result type for data operations.
pub type Result<T> = std::result::Result<T, DataError>;
