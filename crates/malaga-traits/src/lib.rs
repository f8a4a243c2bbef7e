#![doc(issue_tracker_base_url = "https://github.com/factordynamics/malaga/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Core types and trait definitions for the Malaga factor momentum pipeline.
//!
//! This crate provides the shared vocabulary of the workspace: the factor
//! panel that every signal reads and writes, the exposure matrix used to map
//! factor alphas onto stocks, the alpha table handed to the optimizer, and the
//! [`Signal`] and [`AlphaModel`] traits that tie them together.

/// The version of the malaga-traits crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// Module declarations
pub mod alpha;
pub mod error;
pub mod signal;
pub mod stats;
pub mod types;

// Re-exports
pub use alpha::AlphaModel;
pub use error::{MalagaError, Result};
pub use signal::Signal;
pub use types::{
    AlphaRecord, AlphaTable, AssetRecord, CE_TO_UNIX_EPOCH_DAYS, Date, ExposureMatrix,
    ExposureSlice, FactorId, FactorPanel, StockId, WeightRecord,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
        assert!(VERSION.contains('.'));
    }
}
