//! Alpha construction for malaga.
//!
//! Standardized factor scores become factor alphas through
//! `IC × σ_{t-1} × z_{t-1}`, and factor alphas become stock alphas through
//! the stocks' factor exposures:
//!
//! - [`AlphaAggregator`]: the two aggregation steps
//! - [`FactorMomentumModel`]: the complete per-λ [`AlphaModel`](malaga_traits::AlphaModel)
//! - [`UniverseFilter`]: price and beta screens before optimization
//!
//! # Examples
//!
//! ```rust,no_run
//! use malaga_combine::{FactorMomentumConfig, FactorMomentumModel};
//! use malaga_signals::Smoothing;
//! use malaga_traits::{AlphaModel, ExposureMatrix, FactorPanel};
//!
//! # fn run(returns: &FactorPanel, exposures: &ExposureMatrix) -> malaga_traits::Result<()> {
//! let smoothing = Smoothing::from_half_life(63.0)?;
//! let model = FactorMomentumModel::new(FactorMomentumConfig::new(smoothing))?;
//! let alphas = model.stock_alphas(returns, exposures)?;
//! # Ok(())
//! # }
//! ```

mod aggregator;
mod model;
mod universe;

// Re-export main types
pub use aggregator::{AggregatorConfig, AlphaAggregator};
pub use model::{FactorMomentumConfig, FactorMomentumModel};
pub use universe::{AssetIndex, UniverseFilter};
