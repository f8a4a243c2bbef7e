//! Volatility-adjusted EWMA momentum signal.

use log::debug;
use malaga_traits::stats::MIN_STD_THRESHOLD;
use malaga_traits::{FactorPanel, Result, Signal};
use ndarray::{Array2, ArrayView1};
use serde::{Deserialize, Serialize};

use crate::ewma::{Ewma, Smoothing};

/// Canonical signal name for a smoothing weight, e.g.
/// `factor_momentum_lambda_0.011000`.
///
/// Result files for a λ are keyed by this name.
pub fn signal_name(smoothing: Smoothing) -> String {
    format!("factor_momentum_lambda_{smoothing}")
}

/// Configuration for the EWMA momentum signal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EwmaMomentumConfig {
    /// EWMA weight on the newest observation.
    pub smoothing: Smoothing,
    /// Finite observations required before the signal is defined.
    pub min_periods: usize,
}

impl EwmaMomentumConfig {
    /// Configuration with the default warm-up of one observation.
    pub const fn new(smoothing: Smoothing) -> Self {
        Self {
            smoothing,
            min_periods: 1,
        }
    }
}

/// Signal and risk panels produced by one pass over the factor returns.
#[derive(Debug, Clone)]
pub struct MomentumOutput {
    /// `EWMA(r) / sqrt(EWMA(r²))` per factor and date.
    pub signal: FactorPanel,
    /// `sqrt(EWMA(r²))` per factor and date, the factor risk proxy.
    pub risk: FactorPanel,
}

/// Factor momentum scaled by its own EWMA volatility.
///
/// Each factor is processed independently. The value at row `t` only uses
/// returns at rows `0..=t`. Missing returns leave the averages unchanged;
/// cells before the warm-up and cells whose volatility is (near) zero are
/// `NaN`.
///
/// # Example
///
/// ```
/// use malaga_signals::{EwmaMomentum, EwmaMomentumConfig, Smoothing};
/// use malaga_traits::{Date, FactorPanel, Signal};
/// use ndarray::array;
///
/// let returns = FactorPanel::new(
///     vec![
///         Date::from_ymd_opt(2024, 1, 2).unwrap(),
///         Date::from_ymd_opt(2024, 1, 3).unwrap(),
///     ],
///     vec!["value".to_string()],
///     array![[0.01], [0.03]],
/// )
/// .unwrap();
///
/// let signal = EwmaMomentum::new(EwmaMomentumConfig::new(Smoothing::new(0.5).unwrap()));
/// let scores = signal.compute(&returns).unwrap();
/// assert!((scores.values()[[0, 0]] - 1.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct EwmaMomentum {
    config: EwmaMomentumConfig,
    name: String,
}

impl EwmaMomentum {
    /// Create a new momentum signal with the given configuration.
    #[must_use]
    pub fn new(config: EwmaMomentumConfig) -> Self {
        Self {
            name: signal_name(config.smoothing),
            config,
        }
    }

    /// The smoothing weight.
    #[must_use]
    pub const fn smoothing(&self) -> Smoothing {
        self.config.smoothing
    }

    /// Computes the signal and the risk proxy in one pass.
    ///
    /// # Errors
    ///
    /// Propagates panel construction errors; numerical degeneracies are
    /// reported as `NaN` cells.
    pub fn evaluate(&self, returns: &FactorPanel) -> Result<MomentumOutput> {
        let dim = returns.values().dim();
        let mut signal = Array2::from_elem(dim, f64::NAN);
        let mut risk = Array2::from_elem(dim, f64::NAN);

        for (j, column) in returns.values().columns().into_iter().enumerate() {
            let (s, r) = self.factor_series(column);
            for t in 0..dim.0 {
                signal[[t, j]] = s[t];
                risk[[t, j]] = r[t];
            }
        }

        debug!(
            "{}: computed momentum for {} factors over {} dates",
            self.name, dim.1, dim.0
        );

        Ok(MomentumOutput {
            signal: returns.with_values(signal)?,
            risk: returns.with_values(risk)?,
        })
    }

    fn factor_series(&self, returns: ArrayView1<'_, f64>) -> (Vec<f64>, Vec<f64>) {
        let mut mean = Ewma::new(self.config.smoothing);
        let mut second_moment = Ewma::new(self.config.smoothing);
        let warm_up = self.lookback();

        let mut signal = Vec::with_capacity(returns.len());
        let mut risk = Vec::with_capacity(returns.len());

        for &r in returns {
            mean.update(r);
            second_moment.update(r * r);

            match (mean.value(), second_moment.value()) {
                (Some(m), Some(m2)) if mean.count() >= warm_up => {
                    let rms = m2.sqrt();
                    risk.push(rms);
                    signal.push(if rms > MIN_STD_THRESHOLD {
                        m / rms
                    } else {
                        f64::NAN
                    });
                }
                _ => {
                    signal.push(f64::NAN);
                    risk.push(f64::NAN);
                }
            }
        }

        (signal, risk)
    }
}

impl Signal for EwmaMomentum {
    fn name(&self) -> &str {
        &self.name
    }

    fn compute(&self, returns: &FactorPanel) -> Result<FactorPanel> {
        Ok(self.evaluate(returns)?.signal)
    }

    fn lookback(&self) -> usize {
        self.config.min_periods.max(1)
    }
}
