//! Statistical utility functions shared by signals and evaluators.
//!
//! Every function here ignores non-finite inputs when computing statistics
//! and reports degenerate cases instead of dividing by (near) zero.

/// Minimum threshold for standard deviation to avoid division by zero.
/// Values below this threshold are treated as zero variance.
pub const MIN_STD_THRESHOLD: f64 = 1e-10;

/// Z-score standardization result containing computed statistics.
#[derive(Debug, Clone, Copy)]
pub struct StandardizeResult {
    /// The computed mean of the finite input values.
    pub mean: f64,
    /// The computed population standard deviation (N denominator).
    pub std: f64,
    /// Whether the standardization was applied (false if variance was too low).
    pub applied: bool,
}

/// Mean of the finite values, or `None` if there are none.
pub fn finite_mean(values: &[f64]) -> Option<f64> {
    let (sum, n) = values
        .iter()
        .filter(|x| x.is_finite())
        .fold((0.0, 0usize), |(s, n), x| (s + x, n + 1));
    (n > 0).then(|| sum / n as f64)
}

/// Standard deviation of the finite values with `ddof` delta degrees of
/// freedom, or `None` if fewer than `ddof + 1` finite values exist.
pub fn finite_std(values: &[f64], ddof: usize) -> Option<f64> {
    let finite: Vec<f64> = values.iter().copied().filter(|x| x.is_finite()).collect();
    if finite.len() <= ddof {
        return None;
    }
    let mean = finite.iter().sum::<f64>() / finite.len() as f64;
    let variance =
        finite.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (finite.len() - ddof) as f64;
    Some(variance.sqrt())
}

/// Standardize a slice of f64 values to z-scores (mean=0, std=1).
///
/// Uses the population standard deviation (N denominator), so the finite
/// outputs have exactly unit population variance. If the standard deviation
/// is below [`MIN_STD_THRESHOLD`], every finite output is zero.
///
/// # Edge Cases
///
/// - Empty input: returns an empty vector with mean=NaN, std=NaN, applied=false
/// - Single value: returns [0.0] with std=0.0, applied=false
/// - Constant values: returns zeros with applied=false
/// - NaN inputs are excluded from the statistics and stay NaN in the output
///
/// # Examples
///
/// ```
/// use malaga_traits::stats::standardize;
///
/// let values = vec![1.0, 2.0, 3.0, 4.0, 5.0];
/// let (z, result) = standardize(&values);
///
/// assert!(result.applied);
/// assert!((result.mean - 3.0).abs() < 1e-12);
/// assert!(z.iter().sum::<f64>().abs() < 1e-12);
/// ```
pub fn standardize(values: &[f64]) -> (Vec<f64>, StandardizeResult) {
    let Some(mean) = finite_mean(values) else {
        return (
            vec![f64::NAN; values.len()],
            StandardizeResult {
                mean: f64::NAN,
                std: f64::NAN,
                applied: false,
            },
        );
    };
    let std = finite_std(values, 0).unwrap_or(0.0);
    let applied = std > MIN_STD_THRESHOLD;

    let standardized = values
        .iter()
        .map(|&x| {
            if !x.is_finite() {
                f64::NAN
            } else if applied {
                (x - mean) / std
            } else {
                0.0
            }
        })
        .collect();

    (standardized, StandardizeResult { mean, std, applied })
}

/// Clamp every finite value into `[-bound, bound]`, leaving NaN untouched.
pub fn clip_inplace(values: &mut [f64], bound: f64) {
    for v in values.iter_mut().filter(|v| v.is_finite()) {
        *v = v.clamp(-bound, bound);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_standardize_basic() {
        let values = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let (standardized, result) = standardize(&values);

        assert!(result.applied);
        assert_relative_eq!(result.mean, 3.0);
        assert_relative_eq!(result.std, 2.0_f64.sqrt());

        let mean: f64 = standardized.iter().sum::<f64>() / standardized.len() as f64;
        assert!(mean.abs() < 1e-12);

        let variance: f64 =
            standardized.iter().map(|x| x.powi(2)).sum::<f64>() / standardized.len() as f64;
        assert_relative_eq!(variance.sqrt(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_standardize_empty() {
        let (standardized, result) = standardize(&[]);

        assert!(standardized.is_empty());
        assert!(!result.applied);
        assert!(result.mean.is_nan());
        assert!(result.std.is_nan());
    }

    #[test]
    fn test_standardize_single_value() {
        let (standardized, result) = standardize(&[42.0]);

        assert_eq!(standardized, vec![0.0]);
        assert!(!result.applied);
    }

    #[test]
    fn test_standardize_constant_values() {
        let (standardized, result) = standardize(&[5.0, 5.0, 5.0, 5.0]);

        assert!(!result.applied);
        assert!(standardized.iter().all(|&x| x == 0.0));
    }

    #[test]
    fn test_standardize_with_nan() {
        let values = vec![1.0, 2.0, f64::NAN, 4.0, 5.0];
        let (standardized, result) = standardize(&values);

        assert!(result.applied);
        assert_relative_eq!(result.mean, 3.0);
        assert!(standardized[2].is_nan());
        assert!(standardized.iter().filter(|x| x.is_finite()).count() == 4);
    }

    #[test]
    fn test_standardize_all_nan() {
        let (standardized, result) = standardize(&[f64::NAN, f64::NAN]);

        assert!(!result.applied);
        assert!(standardized.iter().all(|x| x.is_nan()));
    }

    #[test]
    fn test_min_std_threshold() {
        let values = vec![1.0, 1.0 + 1e-12, 1.0 - 1e-12, 1.0 + 2e-12, 1.0 - 2e-12];
        let (standardized, result) = standardize(&values);

        assert!(!result.applied);
        assert!(standardized.iter().all(|&x| x == 0.0));
    }

    #[test]
    fn test_finite_std_ddof() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_relative_eq!(finite_std(&values, 0).unwrap(), 2.0);
        assert_relative_eq!(
            finite_std(&values, 1).unwrap(),
            (32.0_f64 / 7.0).sqrt(),
            epsilon = 1e-12
        );
        assert!(finite_std(&[1.0], 1).is_none());
    }

    #[test]
    fn test_clip_inplace() {
        let mut values = vec![-5.0, -1.0, f64::NAN, 2.5, 4.0];
        clip_inplace(&mut values, 3.0);

        assert_eq!(values[0], -3.0);
        assert_eq!(values[1], -1.0);
        assert!(values[2].is_nan());
        assert_eq!(values[3], 2.5);
        assert_eq!(values[4], 3.0);
    }
}
