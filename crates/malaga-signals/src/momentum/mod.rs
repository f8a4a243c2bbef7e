//! Factor momentum signals.
//!
//! The momentum of a factor is its exponentially weighted mean return scaled
//! by its exponentially weighted root-mean-square return:
//!
//! ```text
//! signal_{i,t} = EWMA(r_i)_t / sqrt(EWMA(r_i²)_t)
//! ```
//!
//! The denominator doubles as the factor risk estimate used when the
//! standardized scores are turned into alphas.

mod ewma_momentum;

pub use ewma_momentum::{EwmaMomentum, EwmaMomentumConfig, MomentumOutput, signal_name};
