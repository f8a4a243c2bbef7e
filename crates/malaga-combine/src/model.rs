//! The factor momentum alpha model.

use log::debug;
use malaga_signals::{
    CrossSectionalStandardizer, EwmaMomentum, EwmaMomentumConfig, MomentumOutput, Smoothing,
    StandardizerConfig,
};
use malaga_traits::{AlphaModel, AlphaTable, ExposureMatrix, FactorPanel, Result, Signal};
use serde::{Deserialize, Serialize};

use crate::aggregator::{AggregatorConfig, AlphaAggregator};

/// Configuration for [`FactorMomentumModel`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FactorMomentumConfig {
    /// EWMA smoothing weight (the λ of the grid).
    pub smoothing: Smoothing,
    /// Warm-up observations for the momentum signal.
    pub min_periods: usize,
    /// Information coefficient.
    pub ic: f64,
    /// Z-score clip bound.
    pub clip: Option<f64>,
}

impl FactorMomentumConfig {
    /// Default configuration for a smoothing weight.
    pub const fn new(smoothing: Smoothing) -> Self {
        Self {
            smoothing,
            min_periods: 1,
            ic: 0.05,
            clip: Some(3.0),
        }
    }
}

/// Factor momentum alpha model for a single λ.
///
/// Runs the full chain: EWMA momentum, cross-sectional standardization,
/// then `IC × σ_{t-1} × z_{t-1}` factor alphas. The risk proxy defaults to
/// the EWMA volatility of the same pass; an external risk panel can be
/// supplied with [`FactorMomentumModel::with_risk`].
#[derive(Debug, Clone)]
pub struct FactorMomentumModel {
    momentum: EwmaMomentum,
    standardizer: CrossSectionalStandardizer,
    aggregator: AlphaAggregator,
    risk: Option<FactorPanel>,
}

impl FactorMomentumModel {
    /// Creates the model.
    ///
    /// # Errors
    ///
    /// Returns an error if the clip bound or IC is invalid.
    pub fn new(config: FactorMomentumConfig) -> Result<Self> {
        Ok(Self {
            momentum: EwmaMomentum::new(EwmaMomentumConfig {
                smoothing: config.smoothing,
                min_periods: config.min_periods,
            }),
            standardizer: CrossSectionalStandardizer::new(StandardizerConfig {
                clip: config.clip,
            })?,
            aggregator: AlphaAggregator::new(AggregatorConfig { ic: config.ic })?,
            risk: None,
        })
    }

    /// Uses an externally estimated factor risk instead of the EWMA proxy.
    #[must_use]
    pub fn with_risk(mut self, risk: FactorPanel) -> Self {
        self.risk = Some(risk);
        self
    }

    /// The smoothing weight.
    pub const fn smoothing(&self) -> Smoothing {
        self.momentum.smoothing()
    }

    /// Computes standardized scores and the risk used for the alphas.
    ///
    /// # Errors
    ///
    /// Propagates signal errors.
    pub fn scores(&self, returns: &FactorPanel) -> Result<(FactorPanel, FactorPanel)> {
        let MomentumOutput { signal, risk } = self.momentum.evaluate(returns)?;
        let scores = self.standardizer.standardize(&signal)?;
        let risk = self.risk.clone().unwrap_or(risk);
        Ok((scores, risk))
    }

    /// Maps precomputed factor alphas onto the stocks of `exposures`.
    ///
    /// Lets exposures be processed in chunks (e.g. one yearly file at a time)
    /// without recomputing the factor alphas for every chunk.
    pub fn map_to_stocks(
        &self,
        factor_alphas: &FactorPanel,
        exposures: &ExposureMatrix,
    ) -> AlphaTable {
        self.aggregator.stock_alphas(factor_alphas, exposures)
    }
}

impl AlphaModel for FactorMomentumModel {
    fn name(&self) -> &str {
        self.momentum.name()
    }

    fn factor_alphas(&self, returns: &FactorPanel) -> Result<FactorPanel> {
        let (scores, risk) = self.scores(returns)?;
        self.aggregator.factor_alphas(&scores, &risk)
    }

    fn stock_alphas(
        &self,
        returns: &FactorPanel,
        exposures: &ExposureMatrix,
    ) -> Result<AlphaTable> {
        let factor_alphas = self.factor_alphas(returns)?;
        let table = self.map_to_stocks(&factor_alphas, exposures);
        debug!("{}: {} stock alphas", self.name(), table.len());
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::{Duration, NaiveDate};
    use malaga_traits::ExposureSlice;
    use ndarray::{Array2, array};

    fn returns() -> FactorPanel {
        let start = NaiveDate::from_ymd_opt(2005, 3, 1).unwrap();
        let values = array![
            [0.010, -0.004, 0.002],
            [0.006, -0.002, 0.001],
            [-0.003, 0.008, 0.000],
            [0.012, -0.001, 0.004],
        ];
        let dates = (0..values.nrows())
            .map(|i| start + Duration::days(i as i64))
            .collect();
        FactorPanel::new(
            dates,
            vec!["value".into(), "size".into(), "momentum".into()],
            values,
        )
        .unwrap()
    }

    fn model() -> FactorMomentumModel {
        FactorMomentumModel::new(FactorMomentumConfig::new(
            Smoothing::from_half_life(21.0).unwrap(),
        ))
        .unwrap()
    }

    #[test]
    fn test_factor_alphas_use_previous_date() {
        let returns = returns();
        let model = model();
        let (scores, risk) = model.scores(&returns).unwrap();
        let alphas = model.factor_alphas(&returns).unwrap();

        assert_eq!(alphas.dates(), &returns.dates()[1..]);
        for t in 0..alphas.n_dates() {
            for j in 0..alphas.n_factors() {
                let expected = 0.05 * risk.values()[[t, j]] * scores.values()[[t, j]];
                assert_relative_eq!(alphas.values()[[t, j]], expected);
            }
        }
    }

    #[test]
    fn test_no_lookahead_in_alphas() {
        let base = returns();
        let mut values = base.values().clone();
        values[[3, 0]] = 0.5;
        let perturbed = base.with_values(values).unwrap();

        let model = model();
        let a = model.factor_alphas(&base).unwrap();
        let b = model.factor_alphas(&perturbed).unwrap();

        // the last return only reaches alphas after the last date
        assert_eq!(a, b);
    }

    #[test]
    fn test_external_risk() {
        let returns = returns();
        let risk = returns.with_values(Array2::from_elem((4, 3), 2.0)).unwrap();
        let model = model().with_risk(risk);

        let (scores, _) = model.scores(&returns).unwrap();
        let alphas = model.factor_alphas(&returns).unwrap();

        assert_relative_eq!(alphas.values()[[0, 1]], 0.05 * 2.0 * scores.values()[[0, 1]]);
    }

    #[test]
    fn test_stock_alphas() {
        let returns = returns();
        let mut exposures = ExposureMatrix::new(vec!["value".into(), "size".into()]);
        exposures
            .insert(
                returns.dates()[2],
                ExposureSlice::new(vec!["AAA".into()], array![[1.0, 1.0]]).unwrap(),
            )
            .unwrap();

        let model = model();
        let alphas = model.factor_alphas(&returns).unwrap();
        let table = model.stock_alphas(&returns, &exposures).unwrap();

        let date = returns.dates()[2];
        let expected = alphas.get(date, "value").unwrap() + alphas.get(date, "size").unwrap();
        assert_eq!(table.len(), 1);
        assert_relative_eq!(table.records()[0].alpha, expected);
        assert_eq!(model.name(), "factor_momentum_lambda_0.033000");
    }

    #[test]
    fn test_chunked_exposures_match_whole() {
        let returns = returns();
        let slice = |v: f64| ExposureSlice::new(vec!["AAA".into()], array![[v, -v]]).unwrap();
        let factors = vec!["value".to_string(), "momentum".to_string()];

        let mut whole = ExposureMatrix::new(factors.clone());
        let mut early = ExposureMatrix::new(factors.clone());
        let mut late = ExposureMatrix::new(factors);
        for (t, date) in returns.dates().iter().enumerate() {
            whole.insert(*date, slice(t as f64)).unwrap();
            let chunk = if t < 2 { &mut early } else { &mut late };
            chunk.insert(*date, slice(t as f64)).unwrap();
        }

        let model = model();
        let factor_alphas = model.factor_alphas(&returns).unwrap();
        let mut chunked = model.map_to_stocks(&factor_alphas, &early).into_inner();
        chunked.extend(model.map_to_stocks(&factor_alphas, &late).into_inner());

        assert_eq!(chunked, model.stock_alphas(&returns, &whole).unwrap().into_inner());
    }
}
