//! Alpha aggregation.
//!
//! Factor alphas follow the Grinold-Kahn form `IC × σ × z`, using the risk
//! and score of the previous date. Stock alphas are the exposure-weighted
//! sum of factor alphas on the same date.

use log::debug;
use malaga_traits::{
    AlphaRecord, AlphaTable, Date, ExposureMatrix, FactorPanel, MalagaError, Result,
};
use ndarray::Array2;
use serde::{Deserialize, Serialize};

/// Configuration for alpha aggregation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AggregatorConfig {
    /// Information coefficient applied to every factor.
    pub ic: f64,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self { ic: 0.05 }
    }
}

/// Turns standardized scores and risk into factor alphas, and factor alphas
/// into stock alphas.
#[derive(Debug, Clone, Default)]
pub struct AlphaAggregator {
    config: AggregatorConfig,
}

impl AlphaAggregator {
    /// Creates an aggregator.
    ///
    /// # Errors
    ///
    /// Returns an error if the IC is not finite.
    pub fn new(config: AggregatorConfig) -> Result<Self> {
        if !config.ic.is_finite() {
            return Err(MalagaError::InvalidParameter(format!(
                "information coefficient must be finite, got {}",
                config.ic
            )));
        }
        Ok(Self { config })
    }

    /// The information coefficient.
    pub const fn ic(&self) -> f64 {
        self.config.ic
    }

    /// Computes `IC × risk_{t-1} × score_{t-1}` for every factor and date.
    ///
    /// `risk` is aligned to the dates and factors of `scores`; cells it does
    /// not cover become `NaN`. The first date and dates without any finite
    /// factor alpha are dropped.
    ///
    /// # Errors
    ///
    /// Propagates panel construction errors.
    pub fn factor_alphas(&self, scores: &FactorPanel, risk: &FactorPanel) -> Result<FactorPanel> {
        let risk = risk.reindex(scores.dates(), scores.factors())?;
        let n_factors = scores.n_factors();

        let mut dates = Vec::new();
        let mut values = Vec::new();

        for t in 1..scores.n_dates() {
            let row: Vec<f64> = (0..n_factors)
                .map(|j| self.config.ic * risk.values()[[t - 1, j]] * scores.values()[[t - 1, j]])
                .collect();
            if row.iter().any(|a| a.is_finite()) {
                dates.push(scores.dates()[t]);
                values.extend(row);
            }
        }

        debug!(
            "factor alphas: kept {} of {} dates",
            dates.len(),
            scores.n_dates()
        );

        let values = Array2::from_shape_vec((dates.len(), n_factors), values)
            .map_err(|e| MalagaError::InvalidData(e.to_string()))?;
        FactorPanel::new(dates, scores.factors().to_vec(), values)
    }

    /// Maps factor alphas onto stocks: `alpha_s = Σ_i exposure_{s,i} × a_i`.
    ///
    /// Missing exposures or factor alphas contribute zero, as do factors
    /// the exposure matrix does not carry. Exposure dates without factor
    /// alphas produce no rows.
    pub fn stock_alphas(
        &self,
        factor_alphas: &FactorPanel,
        exposures: &ExposureMatrix,
    ) -> AlphaTable {
        let columns: Vec<Option<usize>> = exposures
            .factors()
            .iter()
            .map(|f| factor_alphas.factor_index(f))
            .collect();

        let mut records = Vec::new();
        let mut skipped: Vec<Date> = Vec::new();

        for (date, slice) in exposures.iter() {
            let Some(t) = factor_alphas.date_index(*date) else {
                skipped.push(*date);
                continue;
            };
            let alphas = factor_alphas.row(t);

            for (stock, loadings) in slice.stocks().iter().zip(slice.values().rows()) {
                let alpha = loadings
                    .iter()
                    .zip(&columns)
                    .filter_map(|(e, c)| c.map(|c| e * alphas[c]))
                    .filter(|term| term.is_finite())
                    .sum();
                records.push(AlphaRecord {
                    date: *date,
                    stock: stock.clone(),
                    predicted_beta: None,
                    alpha,
                });
            }
        }

        if !skipped.is_empty() {
            debug!(
                "stock alphas: {} exposure dates without factor alphas",
                skipped.len()
            );
        }

        AlphaTable::new(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use malaga_traits::ExposureSlice;
    use ndarray::array;

    fn d(day: u32) -> Date {
        Date::from_ymd_opt(2023, 6, day).unwrap()
    }

    fn factors() -> Vec<String> {
        vec!["value".to_string(), "size".to_string()]
    }

    fn exposures(scale: f64) -> ExposureMatrix {
        let mut matrix = ExposureMatrix::new(factors());
        for day in [5, 6] {
            let slice = ExposureSlice::new(
                vec!["AAA".into(), "BBB".into(), "CCC".into()],
                array![[1.0, 0.5], [-0.3, 2.0], [f64::NAN, 1.0]] * scale,
            )
            .unwrap();
            matrix.insert(d(day), slice).unwrap();
        }
        matrix
    }

    #[test]
    fn test_factor_alpha_lagged() {
        let scores = FactorPanel::new(
            vec![d(5), d(6), d(7)],
            factors(),
            array![[1.0, -2.0], [0.5, 0.0], [9.0, 9.0]],
        )
        .unwrap();
        let risk = scores.with_values(array![[0.2, 0.1], [0.4, 0.3], [9.0, 9.0]]).unwrap();

        let alphas = AlphaAggregator::default().factor_alphas(&scores, &risk).unwrap();

        assert_eq!(alphas.dates(), &[d(6), d(7)]);
        assert_relative_eq!(alphas.values()[[0, 0]], 0.05 * 0.2 * 1.0);
        assert_relative_eq!(alphas.values()[[0, 1]], 0.05 * 0.1 * -2.0);
        assert_relative_eq!(alphas.values()[[1, 0]], 0.05 * 0.4 * 0.5);
        assert_relative_eq!(alphas.values()[[1, 1]], 0.0);
    }

    #[test]
    fn test_all_nan_dates_dropped() {
        let scores = FactorPanel::new(
            vec![d(5), d(6), d(7)],
            factors(),
            array![[f64::NAN, f64::NAN], [1.0, 1.0], [0.0, 0.0]],
        )
        .unwrap();
        let risk = scores.with_values(array![[0.1, 0.1], [0.1, 0.1], [0.1, 0.1]]).unwrap();

        let alphas = AlphaAggregator::default().factor_alphas(&scores, &risk).unwrap();

        assert_eq!(alphas.dates(), &[d(7)]);
    }

    #[test]
    fn test_external_risk_reindexed() {
        let scores = FactorPanel::new(vec![d(5), d(6)], factors(), array![[1.0, 1.0], [1.0, 1.0]])
            .unwrap();
        // covers only one factor
        let risk = FactorPanel::new(vec![d(5)], vec!["size".to_string()], array![[0.2]]).unwrap();

        let alphas = AlphaAggregator::default().factor_alphas(&scores, &risk).unwrap();

        assert!(alphas.values()[[0, 0]].is_nan());
        assert_relative_eq!(alphas.values()[[0, 1]], 0.01);
    }

    #[test]
    fn test_stock_alphas_dot_product() {
        let factor_alphas =
            FactorPanel::new(vec![d(6)], factors(), array![[0.02, f64::NAN]]).unwrap();

        let table = AlphaAggregator::default().stock_alphas(&factor_alphas, &exposures(1.0));

        // d(5) has no factor alphas
        assert_eq!(table.len(), 3);
        let alpha: Vec<f64> = table.iter().map(|r| r.alpha).collect();
        assert_relative_eq!(alpha[0], 0.02);
        assert_relative_eq!(alpha[1], -0.006);
        assert_relative_eq!(alpha[2], 0.0);
    }

    #[test]
    fn test_missing_exposure_factor_contributes_zero() {
        let factor_alphas = FactorPanel::new(
            vec![d(6)],
            vec!["value".into(), "size".into(), "quality".into()],
            array![[0.01, 0.02, 5.0]],
        )
        .unwrap();

        let table = AlphaAggregator::default().stock_alphas(&factor_alphas, &exposures(1.0));

        assert_relative_eq!(table.records()[0].alpha, 0.01 + 0.5 * 0.02);
    }

    #[test]
    fn test_linear_in_exposures() {
        let factor_alphas =
            FactorPanel::new(vec![d(5), d(6)], factors(), array![[0.01, -0.03], [0.02, 0.04]])
                .unwrap();
        let aggregator = AlphaAggregator::default();

        let base = aggregator.stock_alphas(&factor_alphas, &exposures(1.0));
        let scaled = aggregator.stock_alphas(&factor_alphas, &exposures(-2.5));

        for (a, b) in base.iter().zip(scaled.iter()) {
            assert_relative_eq!(b.alpha, -2.5 * a.alpha, epsilon = 1e-15);
        }
    }

    #[test]
    fn test_invalid_ic() {
        assert!(AlphaAggregator::new(AggregatorConfig { ic: f64::NAN }).is_err());
    }
}
