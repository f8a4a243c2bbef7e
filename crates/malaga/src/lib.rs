#![doc(issue_tracker_base_url = "https://github.com/factordynamics/malaga/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! # malaga
//!
//! Factor momentum alphas with EWMA half-life selection.
//!
//! malaga is an umbrella crate that re-exports all malaga sub-crates for
//! convenience. It covers the full research loop: volatility-adjusted
//! momentum on factor returns, cross-sectional scoring, stock alphas for a
//! portfolio optimizer, and the comparison of EWMA decay rates on the
//! resulting portfolios.
//!
//! ## Quick Start
//!
//! ```ignore
//! use malaga::prelude::*;
//! use malaga::combine::{FactorMomentumConfig, FactorMomentumModel, UniverseFilter};
//!
//! # fn run(
//! #     returns: &FactorPanel,
//! #     exposures: &ExposureMatrix,
//! #     assets: &[AssetRecord],
//! # ) -> Result<()> {
//! for half_life in [21.0, 63.0, 252.0] {
//!     let lambda = Smoothing::from_half_life(half_life)?;
//!     let model = FactorMomentumModel::new(FactorMomentumConfig::new(lambda))?;
//!     let alphas = model.stock_alphas(returns, exposures)?;
//!     let tradable = UniverseFilter::default().apply(&alphas, assets);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Crate Organization
//!
//! - [`traits`] - Core types and trait definitions ([`Signal`], [`AlphaModel`])
//! - [`signals`] - EWMA momentum and cross-sectional standardization
//! - [`combine`] - Factor and stock alpha aggregation
//! - [`eval`] - Portfolio returns, performance metrics and λ selection
//! - [`data`] - Configuration and Parquet storage
//!
//! ## Pipeline
//!
//! 1. **Signal**: `EWMA(r) / sqrt(EWMA(r²))` per factor
//! 2. **Scores**: z-score across factors on each date
//! 3. **Factor alphas**: `IC × σ_{t-1} × z_{t-1}`
//! 4. **Stock alphas**: exposure-weighted sum of factor alphas
//! 5. **Selection**: the λ whose optimized portfolio has the best Sharpe ratio

/// Version information for the malaga crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core types and trait definitions.
pub mod traits {
    pub use malaga_traits::*;
}

// Re-export core traits at top level for convenience
pub use malaga_traits::{AlphaModel, Signal};

// Re-export error types
pub use malaga_traits::{MalagaError, Result};

// Re-export common types
pub use malaga_traits::{AlphaTable, Date, ExposureMatrix, FactorPanel};

/// Signal construction.
///
/// ```ignore
/// use malaga::signals::{EwmaMomentum, EwmaMomentumConfig, Smoothing};
///
/// let momentum = EwmaMomentum::new(EwmaMomentumConfig::new(Smoothing::from_half_life(63.0)?));
/// let output = momentum.evaluate(&returns)?;
/// println!("latest risk: {:?}", output.risk.row(output.risk.n_dates() - 1));
/// ```
pub mod signals {
    pub use malaga_signals::*;
}

/// Alpha aggregation and the factor momentum model.
pub mod combine {
    pub use malaga_combine::*;
}

/// Portfolio evaluation and λ selection.
///
/// ## Metrics
///
/// All figures are annualized with 252 periods per year and reported in
/// percent:
///
/// ```text
/// mean   = mean(r) × 252 × 100
/// vol    = std(r) × √252 × 100
/// sharpe = mean / vol
/// ```
pub mod eval {
    pub use malaga_eval::*;
}

/// Configuration, storage and frame adapters.
pub mod data {
    pub use malaga_data::*;
}

/// Prelude module for convenient imports.
///
/// ```ignore
/// use malaga::prelude::*;
/// ```
pub mod prelude {
    pub use crate::traits::*;
    pub use malaga_signals::Smoothing;
}
