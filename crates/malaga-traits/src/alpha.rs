//! Alpha model trait for generating expected returns.
//!
//! An alpha model turns factor returns into factor-level alphas, then maps
//! those onto stocks through factor exposures. The resulting [`AlphaTable`]
//! is the input of the external portfolio optimizer.

use crate::{AlphaTable, ExposureMatrix, FactorPanel, Result};

/// An alpha model that generates expected return forecasts.
///
/// Both methods must respect the no-lookahead rule: the alpha for date `t`
/// may only use factor returns observed strictly before `t`.
pub trait AlphaModel: Send + Sync {
    /// Returns the name of this model, e.g. the signal name for one λ.
    fn name(&self) -> &str;

    /// Computes the expected return of each factor on each date.
    ///
    /// # Errors
    ///
    /// Returns an error if the factor returns are structurally invalid.
    fn factor_alphas(&self, returns: &FactorPanel) -> Result<FactorPanel>;

    /// Computes stock alphas by combining factor alphas with exposures.
    ///
    /// # Errors
    ///
    /// Returns an error if the factor returns are structurally invalid.
    fn stock_alphas(&self, returns: &FactorPanel, exposures: &ExposureMatrix)
    -> Result<AlphaTable>;
}
