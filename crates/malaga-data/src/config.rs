//! Pipeline configuration.
//!
//! Defaults reproduce the research setup: two fifteen-year splits, a grid of
//! six half-lives from one month to one year, IC 0.05 and γ = 50. A JSON
//! file may override any field, and the data locations can be overridden
//! from the environment (or a `.env` file).

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::NaiveDate;
use derive_more::Display;
use log::debug;
use malaga_signals::{Smoothing, signal_name};
use serde::{Deserialize, Serialize};

use crate::{DataError, Result};

/// A named evaluation period.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Split {
    /// In-sample period used to choose λ.
    #[display("train")]
    Train,
    /// Out-of-sample period.
    #[display("test")]
    Test,
}

impl FromStr for Split {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self> {
        if s.eq_ignore_ascii_case("train") {
            Ok(Self::Train)
        } else if s.eq_ignore_ascii_case("test") {
            Ok(Self::Test)
        } else {
            Err(DataError::Config(format!(
                "unknown split '{s}', expected 'train' or 'test'"
            )))
        }
    }
}

/// An inclusive date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    /// First date.
    pub start: NaiveDate,
    /// Last date.
    pub end: NaiveDate,
}

impl DateRange {
    /// Creates a range.
    pub const fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }
}

/// Configuration of the whole pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Root under which `results/` is written.
    pub project_root: PathBuf,
    /// Directory of wide factor return files (`date` plus one column per factor).
    pub factors_dir: PathBuf,
    /// Directory of exposure files (`date`, `barrid`, one column per factor).
    pub exposures_dir: PathBuf,
    /// Directory of asset files (`date`, `barrid`, `price`, `predicted_beta`, `return`).
    pub assets_dir: PathBuf,
    /// Optional directory of factor risk files shaped like the factor returns.
    pub risk_dir: Option<PathBuf>,
    /// Training period.
    pub train: DateRange,
    /// Test period.
    pub test: DateRange,
    /// Risk aversion of the external optimizer; names the weights directory.
    pub gamma: u32,
    /// Information coefficient.
    pub ic: f64,
    /// λ grid as half-lives in trading days.
    pub half_lives: Vec<f64>,
    /// Minimum previous-date price of a tradable stock.
    pub min_price: f64,
    /// Return periods per year.
    pub periods_per_year: usize,
    /// Z-score clip bound.
    pub clip: Option<f64>,
    /// Momentum warm-up observations.
    pub min_periods: usize,
}

fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            project_root: PathBuf::from("."),
            factors_dir: PathBuf::from("data/factors"),
            exposures_dir: PathBuf::from("data/exposures"),
            assets_dir: PathBuf::from("data/assets"),
            risk_dir: None,
            train: DateRange::new(ymd(1995, 1, 1), ymd(2010, 1, 1)),
            test: DateRange::new(ymd(2010, 1, 1), ymd(2025, 1, 1)),
            gamma: 50,
            ic: 0.05,
            half_lives: vec![21.0, 42.0, 63.0, 126.0, 189.0, 252.0],
            min_price: 5.0,
            periods_per_year: 252,
            clip: Some(3.0),
            min_periods: 1,
        }
    }
}

impl PipelineConfig {
    /// Loads the configuration.
    ///
    /// Starts from the defaults or the JSON file at `path`, then applies
    /// `MALAGA_*` environment overrides. A `.env` file is loaded if present.
    ///
    /// # Errors
    ///
    /// Returns an error if the file or a present `.env` cannot be read or
    /// parsed, or if the resulting configuration is invalid.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        read_dotenv(dotenvy::dotenv())?;

        let mut config = match path {
            Some(path) => {
                debug!("reading configuration from {}", path.display());
                serde_json::from_str(&fs::read_to_string(path)?)?
            }
            None => Self::default(),
        };
        config.apply_overrides(|key| env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Applies path overrides from a variable lookup.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let targets: [(&str, &mut PathBuf); 4] = [
            ("MALAGA_PROJECT_ROOT", &mut self.project_root),
            ("MALAGA_FACTORS_DIR", &mut self.factors_dir),
            ("MALAGA_EXPOSURES_DIR", &mut self.exposures_dir),
            ("MALAGA_ASSETS_DIR", &mut self.assets_dir),
        ];
        for (key, target) in targets {
            if let Some(value) = lookup(key) {
                *target = PathBuf::from(value);
            }
        }
        if let Some(value) = lookup("MALAGA_RISK_DIR") {
            self.risk_dir = Some(PathBuf::from(value));
        }
    }

    /// Checks parameter ranges.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::Config`] describing the first invalid field.
    pub fn validate(&self) -> Result<()> {
        for (name, range) in [("train", self.train), ("test", self.test)] {
            if range.start > range.end {
                return Err(DataError::Config(format!(
                    "{name} split starts after it ends ({} > {})",
                    range.start, range.end
                )));
            }
        }
        if self.half_lives.is_empty() {
            return Err(DataError::Config("half_lives must not be empty".into()));
        }
        if !self.ic.is_finite() {
            return Err(DataError::Config(format!("ic must be finite, got {}", self.ic)));
        }
        if !self.min_price.is_finite() {
            return Err(DataError::Config(format!(
                "min_price must be finite, got {}",
                self.min_price
            )));
        }
        if self.periods_per_year == 0 {
            return Err(DataError::Config("periods_per_year must be positive".into()));
        }
        self.lambda_grid().map(|_| ())
    }

    /// Date range of a split.
    pub const fn split(&self, split: Split) -> DateRange {
        match split {
            Split::Train => self.train,
            Split::Test => self.test,
        }
    }

    /// The λ grid as smoothing weights, in configuration order.
    ///
    /// # Errors
    ///
    /// Returns an error for a half-life that does not map into `(0, 1]`.
    pub fn lambda_grid(&self) -> Result<Vec<Smoothing>> {
        self.half_lives
            .iter()
            .map(|h| Smoothing::from_half_life(*h).map_err(DataError::from))
            .collect()
    }

    /// `<root>/results/<split>`.
    pub fn split_dir(&self, split: Split) -> PathBuf {
        self.project_root.join("results").join(split.to_string())
    }

    /// Stock alpha file for one λ.
    pub fn alphas_path(&self, split: Split, lambda: Smoothing) -> PathBuf {
        self.split_dir(split)
            .join("alphas")
            .join(format!("{}.parquet", signal_name(lambda)))
    }

    /// Directory of optimizer weights for one λ.
    pub fn weights_dir(&self, split: Split, lambda: Smoothing) -> PathBuf {
        self.split_dir(split)
            .join("weights")
            .join(signal_name(lambda))
            .join(self.gamma.to_string())
    }

    /// λ comparison report with the given extension (`csv` or `json`).
    pub fn report_path(&self, split: Split, extension: &str) -> PathBuf {
        self.split_dir(split)
            .join(format!("lambda_performance.{extension}"))
    }

    /// Cumulative return series written by `inspect`.
    pub fn cumulative_path(&self, split: Split, lambda: Smoothing) -> PathBuf {
        self.split_dir(split)
            .join("cumulative")
            .join(format!("{}.csv", signal_name(lambda)))
    }
}

/// A missing `.env` is fine; a malformed one is not.
fn read_dotenv(found: dotenvy::Result<PathBuf>) -> Result<()> {
    match found {
        Ok(path) => {
            debug!("loaded environment from {}", path.display());
            Ok(())
        }
        Err(e) if e.not_found() => Ok(()),
        Err(e) => Err(e.into()),
    }
}
