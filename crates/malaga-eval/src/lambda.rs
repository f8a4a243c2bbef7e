//! Lambda grid evaluation and selection.

use std::cmp::Ordering;

use log::debug;
use malaga_signals::Smoothing;
use malaga_traits::{MalagaError, Result};
use serde::{Deserialize, Serialize};

use crate::metrics::{MetricsConfig, PerformanceMetrics};

/// Performance of the portfolio built for one λ.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LambdaPerformance {
    /// Smoothing weight.
    pub lambda: Smoothing,
    /// Half-life in trading days.
    pub half_life_days: usize,
    /// Annualized mean return, percent.
    pub mean_return: f64,
    /// Annualized volatility, percent.
    pub volatility: f64,
    /// Sharpe ratio.
    pub sharpe: f64,
}

impl LambdaPerformance {
    /// Computes the performance of a λ from its period returns.
    pub fn from_returns(lambda: Smoothing, returns: &[f64], config: &MetricsConfig) -> Self {
        let metrics = PerformanceMetrics::calculate(returns, config);
        Self {
            lambda,
            half_life_days: lambda.half_life_days(),
            mean_return: metrics.mean_return,
            volatility: metrics.volatility,
            sharpe: metrics.sharpe,
        }
    }

    /// Ranking used for selection: Sharpe, then mean return, then the
    /// smaller λ wins.
    fn rank(&self, other: &Self) -> Ordering {
        self.sharpe
            .total_cmp(&other.sharpe)
            .then_with(|| self.mean_return.total_cmp(&other.mean_return))
            .then_with(|| other.lambda.alpha().total_cmp(&self.lambda.alpha()))
    }
}

/// The chosen λ together with the full comparison table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LambdaSelection {
    /// Best λ by Sharpe ratio.
    pub optimal: LambdaPerformance,
    /// All evaluated λ values, sorted by half-life.
    pub table: Vec<LambdaPerformance>,
}

/// Scores a λ grid and picks the best value.
#[derive(Debug, Clone, Default)]
pub struct LambdaEvaluator {
    config: MetricsConfig,
}

impl LambdaEvaluator {
    /// Create a new evaluator.
    pub const fn new(config: MetricsConfig) -> Self {
        Self { config }
    }

    /// Computes metrics for every λ and selects the best one.
    ///
    /// # Errors
    ///
    /// Returns [`MalagaError::InsufficientData`] if no λ is given.
    ///
    /// # Example
    ///
    /// ```
    /// use malaga_eval::LambdaEvaluator;
    /// use malaga_signals::Smoothing;
    ///
    /// let fast = Smoothing::from_half_life(21.0).unwrap();
    /// let slow = Smoothing::from_half_life(252.0).unwrap();
    /// let selection = LambdaEvaluator::default()
    ///     .evaluate(&[(fast, vec![0.01, -0.02, 0.0]), (slow, vec![0.01, 0.0, 0.005])])
    ///     .unwrap();
    /// assert_eq!(selection.optimal.half_life_days, 252);
    /// ```
    pub fn evaluate(&self, series: &[(Smoothing, Vec<f64>)]) -> Result<LambdaSelection> {
        let table = series
            .iter()
            .map(|(lambda, returns)| {
                let perf = LambdaPerformance::from_returns(*lambda, returns, &self.config);
                debug!(
                    "λ={} (HL={}d): mean={:.2}% vol={:.2}% sharpe={:.3}",
                    perf.lambda, perf.half_life_days, perf.mean_return, perf.volatility, perf.sharpe
                );
                perf
            })
            .collect();
        Self::select(table)
    }

    /// Picks the best λ from precomputed performance rows.
    ///
    /// # Errors
    ///
    /// Returns [`MalagaError::InsufficientData`] if `table` is empty.
    pub fn select(mut table: Vec<LambdaPerformance>) -> Result<LambdaSelection> {
        let optimal = table
            .iter()
            .copied()
            .max_by(LambdaPerformance::rank)
            .ok_or_else(|| MalagaError::InsufficientData("no lambda values to evaluate".into()))?;

        table.sort_by(|a, b| {
            a.half_life_days
                .cmp(&b.half_life_days)
                .then_with(|| b.lambda.alpha().total_cmp(&a.lambda.alpha()))
        });

        Ok(LambdaSelection { optimal, table })
    }
}
