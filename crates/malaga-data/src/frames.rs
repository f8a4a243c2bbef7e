//! Conversions between polars frames and pipeline types.
//!
//! Vendor tables use the Barra naming: stocks are identified by `barrid`,
//! factor tables are wide (one column per factor) and asset returns are in
//! percent.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use log::warn;
use malaga_eval::{LambdaPerformance, PortfolioReturns};
use malaga_traits::{
    AlphaRecord, AlphaTable, AssetRecord, CE_TO_UNIX_EPOCH_DAYS, ExposureMatrix, ExposureSlice,
    FactorId, FactorPanel, MalagaError, WeightRecord,
};
use ndarray::Array2;
use polars::prelude::*;

use crate::{DataError, Result};
use crate::store::{date_column, require_column};

const DATE: &str = "date";
const STOCK: &str = "barrid";

fn f64_column(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>> {
    let values = require_column(df, name)?
        .as_materialized_series()
        .cast(&DataType::Float64)?;
    Ok(values.f64()?.into_iter().collect())
}

fn optional_f64_column(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>> {
    if df.get_column_names().iter().any(|c| c.as_str() == name) {
        f64_column(df, name)
    } else {
        Ok(vec![None; df.height()])
    }
}

fn str_column(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>> {
    let values = require_column(df, name)?
        .as_materialized_series()
        .cast(&DataType::String)?;
    Ok(values
        .str()?
        .into_iter()
        .map(|s| s.map(str::to_string))
        .collect())
}

fn required_dates(df: &DataFrame) -> Result<Vec<NaiveDate>> {
    date_column(df, DATE)?
        .into_iter()
        .map(|d| d.ok_or_else(|| DataError::from(MalagaError::InvalidData("null date".into()))))
        .collect()
}

fn date_series(dates: &[NaiveDate]) -> Result<Column> {
    let days: Vec<i32> = dates
        .iter()
        .map(|d| d.num_days_from_ce() - CE_TO_UNIX_EPOCH_DAYS)
        .collect();
    Ok(Column::new(DATE.into(), days).cast(&DataType::Date)?)
}

/// Columns of `df` other than the identifier columns.
pub fn factor_columns(df: &DataFrame) -> Vec<FactorId> {
    df.get_column_names()
        .iter()
        .map(|c| c.to_string())
        .filter(|c| c != DATE && c != STOCK)
        .collect()
}

/// Wide factor table (`date` plus one column per factor) to a panel.
///
/// Rows are sorted by date; nulls become `NaN`.
///
/// # Errors
///
/// Returns an error on missing or null dates, duplicate dates, or factor
/// columns that are not numeric.
pub fn factor_panel(df: &DataFrame) -> Result<FactorPanel> {
    let factors = factor_columns(df);
    let dates = required_dates(df)?;

    let mut order: Vec<usize> = (0..dates.len()).collect();
    order.sort_by_key(|&i| dates[i]);

    let mut values = Array2::from_elem((dates.len(), factors.len()), f64::NAN);
    for (j, factor) in factors.iter().enumerate() {
        let column = f64_column(df, factor)?;
        for (t, &row) in order.iter().enumerate() {
            if let Some(v) = column[row] {
                values[[t, j]] = v;
            }
        }
    }

    let sorted = order.iter().map(|&i| dates[i]).collect();
    Ok(FactorPanel::new(sorted, factors, values)?)
}

/// Long exposure table (`date`, `barrid`, factor columns) to an exposure
/// matrix over `factors`.
///
/// Factors without a column in `df` are left out; the aggregator then
/// treats them as zero exposure. Null exposures become `NaN`.
///
/// # Errors
///
/// Returns an error on missing identifier columns or null identifiers.
pub fn exposure_matrix(df: &DataFrame, factors: &[FactorId]) -> Result<ExposureMatrix> {
    let available = factor_columns(df);
    let (present, missing): (Vec<FactorId>, Vec<FactorId>) =
        factors.iter().cloned().partition(|f| available.contains(f));
    if !missing.is_empty() {
        warn!("exposures missing for {} factors: {}", missing.len(), missing.join(", "));
    }

    let dates = required_dates(df)?;
    let stocks = str_column(df, STOCK)?;
    let columns = present
        .iter()
        .map(|f| f64_column(df, f))
        .collect::<Result<Vec<_>>>()?;

    let mut by_date: BTreeMap<NaiveDate, Vec<usize>> = BTreeMap::new();
    for (row, date) in dates.iter().enumerate() {
        by_date.entry(*date).or_default().push(row);
    }

    let mut matrix = ExposureMatrix::new(present.clone());
    for (date, rows) in by_date {
        let mut ids = Vec::with_capacity(rows.len());
        let mut values = Array2::from_elem((rows.len(), present.len()), f64::NAN);
        for (i, &row) in rows.iter().enumerate() {
            let id = stocks[row]
                .clone()
                .ok_or_else(|| MalagaError::InvalidData(format!("null {STOCK} on {date}")))?;
            ids.push(id);
            for (k, column) in columns.iter().enumerate() {
                if let Some(v) = column[row] {
                    values[[i, k]] = v;
                }
            }
        }
        matrix.insert(date, ExposureSlice::new(ids, values)?)?;
    }
    Ok(matrix)
}

/// Asset table to records. `price`, `predicted_beta` and `return` are
/// optional columns.
///
/// # Errors
///
/// Returns an error on missing identifier columns or null identifiers.
pub fn asset_records(df: &DataFrame) -> Result<Vec<AssetRecord>> {
    let dates = required_dates(df)?;
    let stocks = str_column(df, STOCK)?;
    let prices = optional_f64_column(df, "price")?;
    let betas = optional_f64_column(df, "predicted_beta")?;
    let returns = optional_f64_column(df, "return")?;

    dates
        .into_iter()
        .zip(stocks)
        .enumerate()
        .map(|(i, (date, stock))| -> Result<AssetRecord> {
            Ok(AssetRecord {
                date,
                stock: stock
                    .ok_or_else(|| MalagaError::InvalidData(format!("null {STOCK} on {date}")))?,
                price: prices[i],
                predicted_beta: betas[i],
                ret: returns[i],
            })
        })
        .collect()
}

/// Optimizer weights (`date`, `barrid`, `weight`) to records. Rows with a
/// null weight are skipped.
///
/// # Errors
///
/// Returns an error on missing columns or null identifiers.
pub fn weight_records(df: &DataFrame) -> Result<Vec<WeightRecord>> {
    let dates = required_dates(df)?;
    let stocks = str_column(df, STOCK)?;
    let weights = f64_column(df, "weight")?;

    let mut records = Vec::with_capacity(dates.len());
    for ((date, stock), weight) in dates.into_iter().zip(stocks).zip(weights) {
        let stock =
            stock.ok_or_else(|| MalagaError::InvalidData(format!("null {STOCK} on {date}")))?;
        if let Some(weight) = weight {
            records.push(WeightRecord {
                date,
                stock,
                weight,
            });
        }
    }
    Ok(records)
}

/// Alpha table to the optimizer input frame
/// (`date`, `barrid`, `predicted_beta`, `alpha`).
///
/// # Errors
///
/// Returns an error if the frame cannot be assembled.
pub fn alpha_frame(table: &AlphaTable) -> Result<DataFrame> {
    let dates: Vec<NaiveDate> = table.iter().map(|r| r.date).collect();
    let stocks: Vec<&str> = table.iter().map(|r| r.stock.as_str()).collect();
    let betas: Vec<Option<f64>> = table.iter().map(|r| r.predicted_beta).collect();
    let alphas: Vec<f64> = table.iter().map(|r| r.alpha).collect();

    Ok(DataFrame::new(vec![
        date_series(&dates)?,
        Column::new(STOCK.into(), stocks),
        Column::new("predicted_beta".into(), betas),
        Column::new("alpha".into(), alphas),
    ])?)
}

/// Optimizer input frame back to an alpha table.
///
/// # Errors
///
/// Returns an error on missing columns or null identifiers or alphas.
pub fn alpha_table(df: &DataFrame) -> Result<AlphaTable> {
    let dates = required_dates(df)?;
    let stocks = str_column(df, STOCK)?;
    let betas = optional_f64_column(df, "predicted_beta")?;
    let alphas = f64_column(df, "alpha")?;

    dates
        .into_iter()
        .zip(stocks)
        .zip(betas.into_iter().zip(alphas))
        .map(|((date, stock), (predicted_beta, alpha))| -> Result<AlphaRecord> {
            let missing = || MalagaError::InvalidData(format!("incomplete alpha row on {date}"));
            Ok(AlphaRecord {
                date,
                stock: stock.ok_or_else(missing)?,
                predicted_beta,
                alpha: alpha.ok_or_else(missing)?,
            })
        })
        .collect()
}

/// λ comparison table.
///
/// # Errors
///
/// Returns an error if the frame cannot be assembled.
pub fn performance_frame(table: &[LambdaPerformance]) -> Result<DataFrame> {
    let lambdas: Vec<f64> = table.iter().map(|p| p.lambda.alpha()).collect();
    let half_lives: Vec<u32> = table.iter().map(|p| p.half_life_days as u32).collect();
    let means: Vec<f64> = table.iter().map(|p| p.mean_return).collect();
    let vols: Vec<f64> = table.iter().map(|p| p.volatility).collect();
    let sharpes: Vec<f64> = table.iter().map(|p| p.sharpe).collect();

    Ok(DataFrame::new(vec![
        Column::new("lambda".into(), lambdas),
        Column::new("half_life_days".into(), half_lives),
        Column::new("mean_return".into(), means),
        Column::new("volatility".into(), vols),
        Column::new("sharpe".into(), sharpes),
    ])?)
}

/// Daily and cumulative log returns of one portfolio.
///
/// # Errors
///
/// Returns an error if the frame cannot be assembled.
pub fn cumulative_frame(portfolio: &PortfolioReturns) -> Result<DataFrame> {
    Ok(DataFrame::new(vec![
        date_series(portfolio.dates())?,
        Column::new("return".into(), portfolio.returns().to_vec()),
        Column::new("cumulative_return".into(), portfolio.cumulative_log_returns()),
    ])?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn dates(days: &[NaiveDate]) -> Column {
        date_series(days).unwrap()
    }

    #[test]
    fn test_factor_panel_sorts_dates() {
        let df = DataFrame::new(vec![
            dates(&[ymd(2001, 3, 2), ymd(2001, 3, 1)]),
            Column::new("value".into(), [Some(0.02), None]),
            Column::new("size".into(), [-0.01, 0.03]),
        ])
        .unwrap();

        let panel = factor_panel(&df).unwrap();

        assert_eq!(panel.dates(), &[ymd(2001, 3, 1), ymd(2001, 3, 2)]);
        assert_eq!(panel.factors(), &["value".to_string(), "size".to_string()]);
        assert!(panel.values()[[0, 0]].is_nan());
        assert_relative_eq!(panel.values()[[1, 0]], 0.02);
        assert_relative_eq!(panel.values()[[0, 1]], 0.03);
    }

    #[test]
    fn test_missing_weight_column() {
        let df = DataFrame::new(vec![
            dates(&[ymd(2001, 3, 1)]),
            Column::new(STOCK.into(), ["AAA"]),
            Column::new("w".into(), [0.4]),
        ])
        .unwrap();

        let err = weight_records(&df).unwrap_err();
        assert!(matches!(
            err,
            DataError::Core(MalagaError::MissingColumn(ref c)) if c == "weight"
        ));
        assert_eq!(err.to_string(), "Missing required column: weight");
    }

    #[test]
    fn test_exposure_matrix_groups_by_date() {
        let df = DataFrame::new(vec![
            dates(&[ymd(2001, 3, 1), ymd(2001, 3, 2), ymd(2001, 3, 1)]),
            Column::new(STOCK.into(), ["AAA", "AAA", "BBB"]),
            Column::new("value".into(), [Some(1.0), Some(1.1), None]),
        ])
        .unwrap();

        let matrix = exposure_matrix(&df, &["value".into(), "size".into()]).unwrap();

        assert_eq!(matrix.factors(), &["value".to_string()]);
        assert_eq!(matrix.len(), 2);
        let first = matrix.get(ymd(2001, 3, 1)).unwrap();
        assert_eq!(first.stocks(), &["AAA".to_string(), "BBB".to_string()]);
        assert!(first.values()[[1, 0]].is_nan());
    }

    #[test]
    fn test_asset_records_optional_columns() {
        let df = DataFrame::new(vec![
            dates(&[ymd(2001, 3, 1)]),
            Column::new(STOCK.into(), ["AAA"]),
            Column::new("return".into(), [1.5]),
        ])
        .unwrap();

        let records = asset_records(&df).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].price, None);
        assert_eq!(records[0].ret, Some(1.5));
    }

    #[test]
    fn test_weight_records_skip_null() {
        let df = DataFrame::new(vec![
            dates(&[ymd(2001, 3, 1), ymd(2001, 3, 1)]),
            Column::new(STOCK.into(), ["AAA", "BBB"]),
            Column::new("weight".into(), [Some(0.4), None]),
        ])
        .unwrap();

        let records = weight_records(&df).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].stock, "AAA");
    }

    #[test]
    fn test_alpha_frame_round_trip() {
        let table = AlphaTable::new(vec![
            AlphaRecord {
                date: ymd(2001, 3, 1),
                stock: "AAA".into(),
                predicted_beta: Some(1.1),
                alpha: 0.002,
            },
            AlphaRecord {
                date: ymd(2001, 3, 2),
                stock: "BBB".into(),
                predicted_beta: None,
                alpha: -0.001,
            },
        ]);

        let df = alpha_frame(&table).unwrap();
        assert_eq!(
            df.get_column_names()
                .iter()
                .map(|c| c.as_str())
                .collect::<Vec<_>>(),
            ["date", "barrid", "predicted_beta", "alpha"]
        );
        assert_eq!(alpha_table(&df).unwrap(), table);
    }

    #[test]
    fn test_cumulative_frame() {
        let portfolio =
            PortfolioReturns::new(vec![ymd(2001, 3, 1), ymd(2001, 3, 2)], vec![0.01, 0.02]);
        let df = cumulative_frame(&portfolio).unwrap();

        let cumulative = f64_column(&df, "cumulative_return").unwrap();
        assert_relative_eq!(
            cumulative[1].unwrap(),
            100.0 * (1.01_f64.ln() + 1.02_f64.ln()),
            epsilon = 1e-12
        );
    }
}
