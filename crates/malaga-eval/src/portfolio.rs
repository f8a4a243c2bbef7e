//! Realized portfolio returns from optimizer weights.

use std::collections::{BTreeMap, HashMap};

use log::debug;
use malaga_traits::{AssetRecord, Date, WeightRecord};
use serde::{Deserialize, Serialize};

/// Next-period return of every (date, stock), as a fraction.
///
/// Asset returns are in percent. Each stock's rows are ordered by date and
/// the return of the following row is attached to the current one; the
/// last row of a stock, and rows followed by a missing return, get none.
pub fn forward_returns(assets: &[AssetRecord]) -> HashMap<(Date, &str), f64> {
    let mut by_stock: HashMap<&str, Vec<&AssetRecord>> = HashMap::new();
    for asset in assets {
        by_stock.entry(asset.stock.as_str()).or_default().push(asset);
    }

    let mut forward = HashMap::with_capacity(assets.len());
    for rows in by_stock.values_mut() {
        rows.sort_by_key(|a| a.date);
        for pair in rows.windows(2) {
            let (current, following) = (pair[0], pair[1]);
            if let Some(next) = following.ret.filter(|r| r.is_finite()) {
                forward.insert((current.date, current.stock.as_str()), next / 100.0);
            }
        }
    }
    forward
}

/// A dated series of portfolio returns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PortfolioReturns {
    dates: Vec<Date>,
    returns: Vec<f64>,
}

impl PortfolioReturns {
    /// Builds a series from dates and returns of equal length.
    pub fn new(dates: Vec<Date>, returns: Vec<f64>) -> Self {
        debug_assert_eq!(dates.len(), returns.len());
        Self { dates, returns }
    }

    /// Return per weight date: `Σ weight × forward_return`.
    ///
    /// Holdings without a forward return contribute nothing; a date with no
    /// forward return at all has a return of zero.
    pub fn from_weights(weights: &[WeightRecord], assets: &[AssetRecord]) -> Self {
        let forward = forward_returns(assets);
        let mut by_date: BTreeMap<Date, f64> = BTreeMap::new();
        let mut missing = 0usize;

        for w in weights {
            let total = by_date.entry(w.date).or_insert(0.0);
            match forward.get(&(w.date, w.stock.as_str())) {
                Some(r) if w.weight.is_finite() => *total += w.weight * r,
                _ => missing += 1,
            }
        }

        if missing > 0 {
            debug!("{missing} holdings without a forward return");
        }

        let (dates, returns) = by_date.into_iter().unzip();
        Self { dates, returns }
    }

    /// The dates.
    pub fn dates(&self) -> &[Date] {
        &self.dates
    }

    /// The returns, as fractions.
    pub fn returns(&self) -> &[f64] {
        &self.returns
    }

    /// Number of periods.
    pub fn len(&self) -> usize {
        self.returns.len()
    }

    /// Whether the series is empty.
    pub fn is_empty(&self) -> bool {
        self.returns.is_empty()
    }

    /// Cumulative log return in percent: `100 × Σ ln(1 + r)`.
    pub fn cumulative_log_returns(&self) -> Vec<f64> {
        self.returns
            .iter()
            .scan(0.0, |acc, r| {
                *acc += r.ln_1p();
                Some(*acc * 100.0)
            })
            .collect()
    }
}
