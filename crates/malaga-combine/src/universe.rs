//! Tradable universe filter applied to stock alphas.

use std::collections::HashMap;

use log::debug;
use malaga_traits::{AlphaRecord, AlphaTable, AssetRecord, Date};
use serde::{Deserialize, Serialize};

/// Filter keeping stocks that were tradable on the previous date.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct UniverseFilter {
    /// Minimum previous-date price.
    pub min_price: f64,
}

impl Default for UniverseFilter {
    fn default() -> Self {
        Self { min_price: 5.0 }
    }
}

impl UniverseFilter {
    /// Joins alphas with asset data and keeps the tradable rows.
    ///
    /// A row survives when the stock's price on its previous asset row is
    /// above `min_price`, its predicted beta is known and its alpha is
    /// finite. The predicted beta is attached to the output, which is sorted
    /// by date then stock.
    pub fn apply(&self, alphas: &AlphaTable, assets: &[AssetRecord]) -> AlphaTable {
        self.apply_indexed(alphas, &AssetIndex::new(assets))
    }

    /// Same as [`UniverseFilter::apply`] with a prebuilt asset index, for
    /// callers filtering several alpha tables against the same assets.
    pub fn apply_indexed(&self, alphas: &AlphaTable, assets: &AssetIndex<'_>) -> AlphaTable {
        let mut table: AlphaTable = alphas
            .iter()
            .filter(|record| record.alpha.is_finite())
            .filter_map(|record| {
                let (prev_price, beta) = assets.get(record.date, &record.stock)?;
                let beta = beta?;
                (prev_price.is_some_and(|p| p > self.min_price)).then(|| AlphaRecord {
                    predicted_beta: Some(beta),
                    ..record.clone()
                })
            })
            .collect();
        table.sort();

        debug!(
            "universe filter: kept {} of {} alphas",
            table.len(),
            alphas.len()
        );
        table
    }
}

/// Asset rows keyed by (date, stock), each carrying the stock's price on
/// its previous row and its predicted beta.
#[derive(Debug, Clone)]
pub struct AssetIndex<'a> {
    lookup: HashMap<(Date, &'a str), (Option<f64>, Option<f64>)>,
}

impl<'a> AssetIndex<'a> {
    /// Indexes asset rows; input order does not matter.
    pub fn new(assets: &'a [AssetRecord]) -> Self {
        let mut by_stock: HashMap<&str, Vec<&AssetRecord>> = HashMap::new();
        for asset in assets {
            by_stock.entry(asset.stock.as_str()).or_default().push(asset);
        }

        let mut lookup = HashMap::with_capacity(assets.len());
        for mut rows in by_stock.into_values() {
            rows.sort_by_key(|a| a.date);
            let mut prev_price = None;
            for row in rows {
                lookup.insert(
                    (row.date, row.stock.as_str()),
                    (prev_price, row.predicted_beta),
                );
                prev_price = row.price;
            }
        }
        Self { lookup }
    }

    /// (previous price, predicted beta) of a stock on a date.
    pub fn get(&self, date: Date, stock: &str) -> Option<(Option<f64>, Option<f64>)> {
        self.lookup.get(&(date, stock)).copied()
    }

    /// Number of indexed rows.
    pub fn len(&self) -> usize {
        self.lookup.len()
    }

    /// Whether no row was indexed.
    pub fn is_empty(&self) -> bool {
        self.lookup.is_empty()
    }
}
