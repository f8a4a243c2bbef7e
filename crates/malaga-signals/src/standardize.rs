//! Cross-sectional standardization of factor signals.
//!
//! At every date the finite signals are demeaned and divided by their
//! population standard deviation, so scores are comparable across factors.
//! Dates where the factors are indistinguishable (zero dispersion) produce
//! all-zero scores.

use malaga_traits::stats::{clip_inplace, standardize};
use malaga_traits::{FactorPanel, MalagaError, Result};
use ndarray::Array2;
use serde::{Deserialize, Serialize};

/// Configuration for cross-sectional standardization.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct StandardizerConfig {
    /// Clip z-scores to `[-clip, clip]`; `None` disables clipping.
    pub clip: Option<f64>,
}

impl Default for StandardizerConfig {
    fn default() -> Self {
        Self { clip: Some(3.0) }
    }
}

/// Z-scores a signal panel across factors, one date at a time.
#[derive(Debug, Clone, Default)]
pub struct CrossSectionalStandardizer {
    config: StandardizerConfig,
}

impl CrossSectionalStandardizer {
    /// Creates a standardizer.
    ///
    /// # Errors
    ///
    /// Returns an error if the clip bound is not positive.
    pub fn new(config: StandardizerConfig) -> Result<Self> {
        if let Some(clip) = config.clip
            && !(clip.is_finite() && clip > 0.0)
        {
            return Err(MalagaError::InvalidParameter(format!(
                "clip bound must be positive, got {clip}"
            )));
        }
        Ok(Self { config })
    }

    /// The clip bound, if any.
    pub const fn clip(&self) -> Option<f64> {
        self.config.clip
    }

    /// Standardizes one cross-section.
    pub fn standardize_row(&self, row: &[f64]) -> Vec<f64> {
        let (mut z, _) = standardize(row);
        if let Some(bound) = self.config.clip {
            clip_inplace(&mut z, bound);
        }
        z
    }

    /// Standardizes every date of a signal panel.
    ///
    /// # Errors
    ///
    /// Propagates panel construction errors.
    pub fn standardize(&self, signal: &FactorPanel) -> Result<FactorPanel> {
        let mut scores = Array2::from_elem(signal.values().dim(), f64::NAN);

        for (t, row) in signal.values().rows().into_iter().enumerate() {
            let z = self.standardize_row(&row.to_vec());
            for (j, value) in z.into_iter().enumerate() {
                scores[[t, j]] = value;
            }
        }

        signal.with_values(scores)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;
    use ndarray::array;

    fn panel(values: Array2<f64>) -> FactorPanel {
        let dates = (0..values.nrows())
            .map(|i| NaiveDate::from_ymd_opt(2021, 3, 1 + i as u32).unwrap())
            .collect();
        let factors = (0..values.ncols()).map(|j| format!("f{j}")).collect();
        FactorPanel::new(dates, factors, values).unwrap()
    }

    #[test]
    fn test_rows_have_zero_mean_unit_std() {
        let signal = panel(array![[0.5, -0.2, 0.1, 0.9], [-0.4, -0.1, 0.3, 0.2]]);
        let standardizer =
            CrossSectionalStandardizer::new(StandardizerConfig { clip: None }).unwrap();
        let scores = standardizer.standardize(&signal).unwrap();

        for row in scores.values().rows() {
            let n = row.len() as f64;
            let mean = row.sum() / n;
            let std = (row.mapv(|x| (x - mean).powi(2)).sum() / n).sqrt();
            assert!(row.sum().abs() < 1e-12);
            assert_relative_eq!(std, 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_zero_dispersion_gives_zeros() {
        let signal = panel(array![[0.3, 0.3, 0.3]]);
        let scores = CrossSectionalStandardizer::default()
            .standardize(&signal)
            .unwrap();

        assert!(scores.values().iter().all(|&z| z == 0.0));
    }

    #[test]
    fn test_nan_excluded() {
        let signal = panel(array![[1.0, f64::NAN, 3.0]]);
        let scores = CrossSectionalStandardizer::default()
            .standardize(&signal)
            .unwrap();

        assert_relative_eq!(scores.values()[[0, 0]], -1.0);
        assert!(scores.values()[[0, 1]].is_nan());
        assert_relative_eq!(scores.values()[[0, 2]], 1.0);
    }

    #[test]
    fn test_clipping() {
        // one outlier among many identical values has |z| = sqrt(n - 1)
        let mut row = vec![0.0; 16];
        row[0] = 1.0;
        let signal = panel(Array2::from_shape_vec((1, 16), row).unwrap());

        let clipped = CrossSectionalStandardizer::default()
            .standardize(&signal)
            .unwrap();
        assert_relative_eq!(clipped.values()[[0, 0]], 3.0);

        let raw = CrossSectionalStandardizer::new(StandardizerConfig { clip: None })
            .unwrap()
            .standardize(&signal)
            .unwrap();
        assert_relative_eq!(raw.values()[[0, 0]], 15.0_f64.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn test_invalid_clip() {
        assert!(CrossSectionalStandardizer::new(StandardizerConfig { clip: Some(0.0) }).is_err());
        assert!(
            CrossSectionalStandardizer::new(StandardizerConfig {
                clip: Some(f64::NAN)
            })
            .is_err()
        );
    }

    #[test]
    fn test_dates_independent() {
        let signal = panel(array![[1.0, 2.0, 3.0], [100.0, -50.0, 7.0]]);
        let standardizer = CrossSectionalStandardizer::default();
        let both = standardizer.standardize(&signal).unwrap();
        let first = standardizer.standardize_row(&[1.0, 2.0, 3.0]);

        assert_eq!(both.row(0).to_vec(), first);
    }
}
