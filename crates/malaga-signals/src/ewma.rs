//! Exponentially weighted moving averages.
//!
//! The smoothing parameter is stored as the weight `α` given to the newest
//! observation. The recursion is
//!
//! ```text
//! E_0 = x_0
//! E_t = (1 - α) · E_{t-1} + α · x_t
//! ```
//!
//! so the decay factor applied to the previous state is `λ = 1 - α`.
//! Grids are usually specified as half-lives in trading days and converted
//! with `α = 0.693 / half_life`.

use std::fmt;

use malaga_traits::{MalagaError, Result};
use serde::{Deserialize, Serialize};

/// Numerator of the half-life conversion `α = 0.693 / half_life`.
pub const HALF_LIFE_NUMERATOR: f64 = 0.693;

/// EWMA smoothing weight `α ∈ (0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Smoothing(f64);

impl Smoothing {
    /// Creates a smoothing weight.
    ///
    /// # Errors
    ///
    /// Returns [`MalagaError::InvalidParameter`] unless `0 < alpha <= 1`.
    pub fn new(alpha: f64) -> Result<Self> {
        if alpha.is_finite() && alpha > 0.0 && alpha <= 1.0 {
            Ok(Self(alpha))
        } else {
            Err(MalagaError::InvalidParameter(format!(
                "smoothing weight must lie in (0, 1], got {alpha}"
            )))
        }
    }

    /// Creates the smoothing weight for a half-life in periods.
    ///
    /// # Errors
    ///
    /// Returns an error if the half-life is not positive or is shorter than
    /// the conversion allows (`α` would exceed 1).
    ///
    /// # Example
    ///
    /// ```
    /// use malaga_signals::Smoothing;
    ///
    /// let smoothing = Smoothing::from_half_life(63.0).unwrap();
    /// assert!((smoothing.alpha() - 0.011).abs() < 1e-12);
    /// assert_eq!(smoothing.half_life_days(), 63);
    /// ```
    pub fn from_half_life(half_life: f64) -> Result<Self> {
        if !(half_life.is_finite() && half_life > 0.0) {
            return Err(MalagaError::InvalidParameter(format!(
                "half-life must be positive, got {half_life}"
            )));
        }
        Self::new(HALF_LIFE_NUMERATOR / half_life)
    }

    /// The weight on the newest observation.
    pub const fn alpha(&self) -> f64 {
        self.0
    }

    /// The decay factor `λ = 1 - α` applied to the previous state.
    pub fn decay(&self) -> f64 {
        1.0 - self.0
    }

    /// Half-life in whole periods, truncated.
    pub fn half_life_days(&self) -> usize {
        (HALF_LIFE_NUMERATOR / self.0).floor() as usize
    }
}

impl TryFrom<f64> for Smoothing {
    type Error = MalagaError;

    fn try_from(alpha: f64) -> Result<Self> {
        Self::new(alpha)
    }
}

impl From<Smoothing> for f64 {
    fn from(smoothing: Smoothing) -> Self {
        smoothing.0
    }
}

impl fmt::Display for Smoothing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}", self.0)
    }
}

/// Streaming EWMA state, seeded by the first observation.
#[derive(Debug, Clone)]
pub struct Ewma {
    smoothing: Smoothing,
    state: Option<f64>,
    count: usize,
}

impl Ewma {
    /// Creates an empty average.
    pub const fn new(smoothing: Smoothing) -> Self {
        Self {
            smoothing,
            state: None,
            count: 0,
        }
    }

    /// Folds in one observation and returns the updated average.
    ///
    /// Non-finite observations leave the state untouched.
    pub fn update(&mut self, x: f64) -> Option<f64> {
        if x.is_finite() {
            let alpha = self.smoothing.alpha();
            self.state = Some(match self.state {
                Some(prev) => (1.0 - alpha) * prev + alpha * x,
                None => x,
            });
            self.count += 1;
        }
        self.state
    }

    /// The current average, if any observation has been seen.
    pub const fn value(&self) -> Option<f64> {
        self.state
    }

    /// Number of finite observations folded in.
    pub const fn count(&self) -> usize {
        self.count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_smoothing_bounds() {
        assert!(Smoothing::new(0.0).is_err());
        assert!(Smoothing::new(-0.1).is_err());
        assert!(Smoothing::new(1.5).is_err());
        assert!(Smoothing::new(f64::NAN).is_err());
        assert!(Smoothing::new(1.0).is_ok());
        assert!(Smoothing::from_half_life(0.0).is_err());
        // 0.693 / 0.5 > 1
        assert!(Smoothing::from_half_life(0.5).is_err());
    }

    #[test]
    fn test_half_life_round_trip() {
        for half_life in [21, 42, 63, 126, 189, 252] {
            let smoothing = Smoothing::from_half_life(half_life as f64).unwrap();
            assert_eq!(smoothing.half_life_days(), half_life);
            assert_relative_eq!(smoothing.decay(), 1.0 - 0.693 / half_life as f64);
        }
    }

    #[test]
    fn test_display_six_decimals() {
        let smoothing = Smoothing::from_half_life(189.0).unwrap();
        assert_eq!(smoothing.to_string(), "0.003667");
    }

    fn run(values: &[f64], alpha: f64) -> Vec<Option<f64>> {
        let mut ewma = Ewma::new(Smoothing::new(alpha).unwrap());
        values.iter().map(|&x| ewma.update(x)).collect()
    }

    #[test]
    fn test_ewma_recursion() {
        let series = run(&[2.0, 4.0, 0.0], 0.5);

        assert_relative_eq!(series[0].unwrap(), 2.0);
        assert_relative_eq!(series[1].unwrap(), 3.0);
        assert_relative_eq!(series[2].unwrap(), 1.5);
    }

    #[test]
    fn test_ewma_skips_missing() {
        let series = run(&[f64::NAN, 2.0, f64::NAN, 4.0], 0.5);

        assert_eq!(series[0], None);
        assert_relative_eq!(series[1].unwrap(), 2.0);
        assert_relative_eq!(series[2].unwrap(), 2.0);
        assert_relative_eq!(series[3].unwrap(), 3.0);
    }

    #[test]
    fn test_ewma_count() {
        let mut ewma = Ewma::new(Smoothing::new(0.1).unwrap());
        assert_eq!(ewma.value(), None);
        ewma.update(1.0);
        ewma.update(f64::NAN);
        ewma.update(2.0);
        assert_eq!(ewma.count(), 2);
    }
}
