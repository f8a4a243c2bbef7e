//! Performance metrics for a return series.
//!
//! All figures are annualized and expressed in percent:
//! - mean return: `mean(r) × P × 100`
//! - volatility: `std(r) × √P × 100`, sample standard deviation
//! - Sharpe ratio: mean return / volatility

use malaga_traits::stats::{MIN_STD_THRESHOLD, finite_mean, finite_std};
use serde::{Deserialize, Serialize};

/// Configuration for metrics calculation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MetricsConfig {
    /// Number of return periods per year for annualization.
    pub periods_per_year: usize,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            periods_per_year: 252,
        }
    }
}

/// Annualized performance of one return series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    /// Annualized mean return, percent.
    pub mean_return: f64,
    /// Annualized volatility, percent.
    pub volatility: f64,
    /// Sharpe ratio; zero when volatility is (near) zero.
    pub sharpe: f64,
    /// Number of finite observations.
    pub n_obs: usize,
}

impl PerformanceMetrics {
    /// Calculate metrics from period returns given as fractions.
    ///
    /// Non-finite returns are ignored. With fewer than two observations, or
    /// a standard deviation at or below [`MIN_STD_THRESHOLD`], the volatility
    /// and Sharpe ratio are zero.
    ///
    /// # Example
    ///
    /// ```
    /// use malaga_eval::{MetricsConfig, PerformanceMetrics};
    ///
    /// let returns = [0.001, -0.0005, 0.002];
    /// let metrics = PerformanceMetrics::calculate(&returns, &MetricsConfig::default());
    /// assert!(metrics.sharpe > 0.0);
    /// assert_eq!(metrics.n_obs, 3);
    /// ```
    pub fn calculate(returns: &[f64], config: &MetricsConfig) -> Self {
        let valid: Vec<f64> = returns.iter().copied().filter(|x| x.is_finite()).collect();
        let n_obs = valid.len();
        let periods = config.periods_per_year as f64;

        let Some(mean) = finite_mean(&valid) else {
            return Self {
                mean_return: 0.0,
                volatility: 0.0,
                sharpe: 0.0,
                n_obs,
            };
        };
        // rounding leaves a residual std on constant series
        let std = finite_std(&valid, 1)
            .filter(|std| *std > MIN_STD_THRESHOLD)
            .unwrap_or(0.0);

        let mean_return = mean * periods * 100.0;
        let volatility = std * periods.sqrt() * 100.0;
        let sharpe = if volatility > 0.0 {
            mean_return / volatility
        } else {
            0.0
        };

        Self {
            mean_return,
            volatility,
            sharpe,
            n_obs,
        }
    }
}
