//! Signal trait for factor-level scores.
//!
//! A signal reads a panel of factor returns and produces a panel of scores
//! with the same axes. Implementations must not look ahead: the score at
//! row `t` may only depend on rows `0..=t` of the input.

use crate::{FactorPanel, Result};

/// A time-series signal computed independently for each factor.
///
/// # Example
///
/// ```
/// use malaga_traits::{FactorPanel, Result, Signal};
///
/// struct Sign;
///
/// impl Signal for Sign {
///     fn name(&self) -> &str {
///         "sign"
///     }
///
///     fn compute(&self, returns: &FactorPanel) -> Result<FactorPanel> {
///         returns.with_values(returns.values().mapv(f64::signum))
///     }
///
///     fn lookback(&self) -> usize {
///         1
///     }
/// }
/// ```
pub trait Signal: Send + Sync {
    /// Returns the name of this signal.
    ///
    /// The name should be unique and descriptive; it is used to name result
    /// files and in log output.
    fn name(&self) -> &str;

    /// Computes scores for every (date, factor) cell of `returns`.
    ///
    /// # Returns
    ///
    /// A panel with the same dates and factors as the input. Cells without
    /// enough history, or whose computation is degenerate, are `NaN`.
    ///
    /// # Errors
    ///
    /// Returns an error only for structurally invalid input.
    fn compute(&self, returns: &FactorPanel) -> Result<FactorPanel>;

    /// Number of observations needed before the signal is defined.
    fn lookback(&self) -> usize;
}
