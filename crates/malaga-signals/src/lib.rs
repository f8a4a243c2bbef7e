//! Signal construction for the Malaga factor momentum pipeline.
//!
//! This crate turns a panel of factor returns into standardized factor
//! scores:
//! - [`ewma`]: exponentially weighted averages and the λ / half-life conversion
//! - [`momentum`]: the volatility-adjusted EWMA momentum signal and its risk proxy
//! - [`standardize`]: cross-sectional z-scoring across factors
//!
//! # Example
//!
//! ```ignore
//! use malaga_signals::{CrossSectionalStandardizer, EwmaMomentum, EwmaMomentumConfig, Smoothing};
//!
//! let smoothing = Smoothing::from_half_life(63.0)?;
//! let momentum = EwmaMomentum::new(EwmaMomentumConfig::new(smoothing));
//! let output = momentum.evaluate(&factor_returns)?;
//! let scores = CrossSectionalStandardizer::default().standardize(&output.signal)?;
//! ```

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod ewma;
pub mod momentum;
pub mod standardize;

// Re-export key types
pub use ewma::{Ewma, HALF_LIFE_NUMERATOR, Smoothing};
pub use momentum::{EwmaMomentum, EwmaMomentumConfig, MomentumOutput, signal_name};
pub use standardize::{CrossSectionalStandardizer, StandardizerConfig};
