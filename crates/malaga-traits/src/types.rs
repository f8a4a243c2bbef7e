//! Common types used throughout the Malaga pipeline.
//!
//! The central type is [`FactorPanel`], a dates × factors matrix. Factor
//! returns, momentum signals, standardized scores, risk estimates and factor
//! alphas all share this shape, so every stage can hand its output straight
//! to the next one.

use std::collections::{BTreeMap, HashSet};

use ndarray::{Array2, ArrayView1};
use serde::{Deserialize, Serialize};

use crate::{MalagaError, Result};

// Re-export date type from chrono
pub use chrono::NaiveDate as Date;

/// Days between 0001-01-01 (CE) and 1970-01-01, used to convert Polars date
/// columns (days since the Unix epoch) into [`Date`] values.
pub const CE_TO_UNIX_EPOCH_DAYS: i32 = 719_163;

/// A factor identifier, e.g. `"USSLOWL_MOMENTUM"` or `"Beta"`.
pub type FactorId = String;

/// A stock identifier (Barra id).
pub type StockId = String;

/// A dates × factors matrix of real values.
///
/// Dates are strictly increasing and factor names are unique. Missing values
/// are stored as `NaN`.
///
/// # Example
///
/// ```
/// use malaga_traits::{Date, FactorPanel};
/// use ndarray::array;
///
/// let dates = vec![
///     Date::from_ymd_opt(2024, 1, 2).unwrap(),
///     Date::from_ymd_opt(2024, 1, 3).unwrap(),
/// ];
/// let panel = FactorPanel::new(
///     dates,
///     vec!["value".to_string(), "size".to_string()],
///     array![[0.01, -0.02], [0.03, 0.00]],
/// )
/// .unwrap();
///
/// assert_eq!(panel.n_dates(), 2);
/// assert_eq!(panel.column("size").unwrap()[0], -0.02);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct FactorPanel {
    dates: Vec<Date>,
    factors: Vec<FactorId>,
    values: Array2<f64>,
}

impl FactorPanel {
    /// Creates a panel, validating its shape and axes.
    ///
    /// # Errors
    ///
    /// Returns an error if the matrix shape disagrees with the axes, if the
    /// dates are not strictly increasing, or if a factor name repeats.
    pub fn new(dates: Vec<Date>, factors: Vec<FactorId>, values: Array2<f64>) -> Result<Self> {
        let (rows, cols) = values.dim();
        if rows != dates.len() {
            return Err(MalagaError::DimensionMismatch {
                expected: dates.len(),
                actual: rows,
            });
        }
        if cols != factors.len() {
            return Err(MalagaError::DimensionMismatch {
                expected: factors.len(),
                actual: cols,
            });
        }
        if let Some(w) = dates.windows(2).find(|w| w[0] >= w[1]) {
            return Err(MalagaError::InvalidData(format!(
                "dates must be strictly increasing ({} followed by {})",
                w[0], w[1]
            )));
        }
        let mut seen = HashSet::with_capacity(factors.len());
        for factor in &factors {
            if !seen.insert(factor.as_str()) {
                return Err(MalagaError::InvalidData(format!(
                    "duplicate factor: {factor}"
                )));
            }
        }

        Ok(Self {
            dates,
            factors,
            values,
        })
    }

    /// Creates a panel with no dates for the given factors.
    pub fn empty(factors: Vec<FactorId>) -> Self {
        let n = factors.len();
        Self {
            dates: Vec::new(),
            factors,
            values: Array2::zeros((0, n)),
        }
    }

    /// Returns a panel with the same axes and new values.
    ///
    /// # Errors
    ///
    /// Returns an error if `values` does not match the panel's shape.
    pub fn with_values(&self, values: Array2<f64>) -> Result<Self> {
        if values.dim() != self.values.dim() {
            return Err(MalagaError::DimensionMismatch {
                expected: self.values.len(),
                actual: values.len(),
            });
        }
        Ok(Self {
            dates: self.dates.clone(),
            factors: self.factors.clone(),
            values,
        })
    }

    /// The dates, in increasing order.
    pub fn dates(&self) -> &[Date] {
        &self.dates
    }

    /// The factor names, in column order.
    pub fn factors(&self) -> &[FactorId] {
        &self.factors
    }

    /// The underlying dates × factors matrix.
    pub const fn values(&self) -> &Array2<f64> {
        &self.values
    }

    /// Number of dates.
    pub fn n_dates(&self) -> usize {
        self.dates.len()
    }

    /// Number of factors.
    pub fn n_factors(&self) -> usize {
        self.factors.len()
    }

    /// Whether the panel holds no dates.
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// The cross-section at row `t`.
    ///
    /// # Panics
    ///
    /// Panics if `t` is out of bounds.
    pub fn row(&self, t: usize) -> ArrayView1<'_, f64> {
        self.values.row(t)
    }

    /// The time series of a factor, if present.
    pub fn column(&self, factor: &str) -> Option<ArrayView1<'_, f64>> {
        self.factor_index(factor).map(|j| self.values.column(j))
    }

    /// Column position of a factor.
    pub fn factor_index(&self, factor: &str) -> Option<usize> {
        self.factors.iter().position(|f| f == factor)
    }

    /// Row position of a date.
    pub fn date_index(&self, date: Date) -> Option<usize> {
        self.dates.binary_search(&date).ok()
    }

    /// Value at (`date`, `factor`), if both exist.
    pub fn get(&self, date: Date, factor: &str) -> Option<f64> {
        let t = self.date_index(date)?;
        let j = self.factor_index(factor)?;
        Some(self.values[[t, j]])
    }

    /// Rearranges the panel onto new axes.
    ///
    /// Dates or factors absent from `self` are filled with `NaN`. `dates`
    /// must be strictly increasing.
    ///
    /// # Errors
    ///
    /// Returns an error if the requested axes are invalid.
    pub fn reindex(&self, dates: &[Date], factors: &[FactorId]) -> Result<Self> {
        let mut values = Array2::from_elem((dates.len(), factors.len()), f64::NAN);
        let columns: Vec<Option<usize>> = factors.iter().map(|f| self.factor_index(f)).collect();

        for (t, date) in dates.iter().enumerate() {
            let Some(src) = self.date_index(*date) else {
                continue;
            };
            for (j, column) in columns.iter().enumerate() {
                if let Some(c) = column {
                    values[[t, j]] = self.values[[src, *c]];
                }
            }
        }

        Self::new(dates.to_vec(), factors.to_vec(), values)
    }
}

/// Exposures of a set of stocks to the factors on a single date.
#[derive(Debug, Clone, PartialEq)]
pub struct ExposureSlice {
    stocks: Vec<StockId>,
    values: Array2<f64>,
}

impl ExposureSlice {
    /// Creates a stocks × factors exposure slice.
    ///
    /// # Errors
    ///
    /// Returns an error if the number of rows differs from the number of stocks.
    pub fn new(stocks: Vec<StockId>, values: Array2<f64>) -> Result<Self> {
        if values.nrows() != stocks.len() {
            return Err(MalagaError::DimensionMismatch {
                expected: stocks.len(),
                actual: values.nrows(),
            });
        }
        Ok(Self { stocks, values })
    }

    /// Stock identifiers, in row order.
    pub fn stocks(&self) -> &[StockId] {
        &self.stocks
    }

    /// The stocks × factors matrix.
    pub const fn values(&self) -> &Array2<f64> {
        &self.values
    }

    /// Number of stocks.
    pub fn len(&self) -> usize {
        self.stocks.len()
    }

    /// Whether the slice has no stocks.
    pub fn is_empty(&self) -> bool {
        self.stocks.is_empty()
    }
}

/// Factor exposures keyed by date.
///
/// Every slice shares the matrix's factor columns. Missing exposures are
/// stored as `NaN`.
#[derive(Debug, Clone, PartialEq)]
pub struct ExposureMatrix {
    factors: Vec<FactorId>,
    slices: BTreeMap<Date, ExposureSlice>,
}

impl ExposureMatrix {
    /// Creates an empty exposure matrix over the given factors.
    pub const fn new(factors: Vec<FactorId>) -> Self {
        Self {
            factors,
            slices: BTreeMap::new(),
        }
    }

    /// Adds (or replaces) the exposures for a date.
    ///
    /// # Errors
    ///
    /// Returns an error if the slice has the wrong number of factor columns.
    pub fn insert(&mut self, date: Date, slice: ExposureSlice) -> Result<()> {
        if slice.values.ncols() != self.factors.len() {
            return Err(MalagaError::DimensionMismatch {
                expected: self.factors.len(),
                actual: slice.values.ncols(),
            });
        }
        self.slices.insert(date, slice);
        Ok(())
    }

    /// The factor columns shared by every slice.
    pub fn factors(&self) -> &[FactorId] {
        &self.factors
    }

    /// Exposures on `date`, if any.
    pub fn get(&self, date: Date) -> Option<&ExposureSlice> {
        self.slices.get(&date)
    }

    /// Iterates over (date, slice) pairs in date order.
    pub fn iter(&self) -> impl Iterator<Item = (&Date, &ExposureSlice)> {
        self.slices.iter()
    }

    /// Number of dates.
    pub fn len(&self) -> usize {
        self.slices.len()
    }

    /// Whether no dates have exposures.
    pub fn is_empty(&self) -> bool {
        self.slices.is_empty()
    }
}

/// A stock-level expected return forecast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlphaRecord {
    /// Forecast date.
    pub date: Date,
    /// Stock identifier.
    pub stock: StockId,
    /// Predicted beta, attached once the alpha is joined with asset data.
    pub predicted_beta: Option<f64>,
    /// Expected return forecast.
    pub alpha: f64,
}

/// A table of stock alphas for one λ.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AlphaTable {
    records: Vec<AlphaRecord>,
}

impl AlphaTable {
    /// Creates a table from records.
    pub const fn new(records: Vec<AlphaRecord>) -> Self {
        Self { records }
    }

    /// The records.
    pub fn records(&self) -> &[AlphaRecord] {
        &self.records
    }

    /// Iterates over the records.
    pub fn iter(&self) -> std::slice::Iter<'_, AlphaRecord> {
        self.records.iter()
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Consumes the table and returns its records.
    pub fn into_inner(self) -> Vec<AlphaRecord> {
        self.records
    }

    /// Sorts the records by date, then stock.
    pub fn sort(&mut self) {
        self.records
            .sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.stock.cmp(&b.stock)));
    }
}

impl FromIterator<AlphaRecord> for AlphaTable {
    fn from_iter<I: IntoIterator<Item = AlphaRecord>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a AlphaTable {
    type Item = &'a AlphaRecord;
    type IntoIter = std::slice::Iter<'a, AlphaRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// One row of stock-level market data.
///
/// Fields not loaded for a given step are `None`. `ret` is the period
/// return in percent, as delivered by the data vendor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetRecord {
    /// Trading date.
    pub date: Date,
    /// Stock identifier.
    pub stock: StockId,
    /// Closing price.
    pub price: Option<f64>,
    /// Predicted beta from the risk model.
    pub predicted_beta: Option<f64>,
    /// Period return, in percent.
    pub ret: Option<f64>,
}

/// A portfolio weight produced by the optimizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightRecord {
    /// Holding date.
    pub date: Date,
    /// Stock identifier.
    pub stock: StockId,
    /// Portfolio weight.
    pub weight: f64,
}
