//! Parquet and CSV storage.
//!
//! Vendor data sets are directories of yearly Parquet files
//! (`factors_1995.parquet`, `factors_1996.parquet`, ...). They are read file
//! by file, restricted to the requested dates, and stacked in file-name
//! order.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use log::{debug, warn};
use malaga_traits::{CE_TO_UNIX_EPOCH_DAYS, MalagaError};
use polars::prelude::*;

use crate::{DataError, DateRange, Result};

/// Sorted list of `*.parquet` files in a directory.
///
/// # Errors
///
/// Returns an error if the directory cannot be read or holds no Parquet file.
pub fn parquet_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.extension().is_some_and(|ext| ext == "parquet"))
        .collect();
    files.sort();

    if files.is_empty() {
        return Err(DataError::NotFound(format!(
            "no parquet files in {}",
            dir.display()
        )));
    }
    Ok(files)
}

/// Scans one Parquet file, keeping only the rows whose `date` lies within
/// `range`.
///
/// The date predicate is pushed into the scan, so rows outside the range are
/// never materialized.
///
/// # Errors
///
/// Returns an error if the file cannot be decoded or has no usable `date`
/// column.
pub fn scan_parquet(path: &Path, range: Option<DateRange>) -> Result<DataFrame> {
    let mut lf = LazyFrame::scan_parquet(path, ScanArgsParquet::default())?;
    if let Some(range) = range {
        lf = lf.filter(within(range));
    }
    Ok(lf.collect()?)
}

/// Reads and stacks every Parquet file of a directory.
///
/// With a `range`, rows whose `date` falls outside it are dropped file by
/// file, and files without any remaining row are skipped.
///
/// # Errors
///
/// Returns an error if no file can be found, a file cannot be decoded, the
/// files disagree on their schema, or no row survives the date filter.
pub fn read_parquet_dir(dir: &Path, range: Option<DateRange>) -> Result<DataFrame> {
    let mut stacked: Option<DataFrame> = None;

    for path in parquet_files(dir)? {
        let df = scan_parquet(&path, range)?;
        if df.height() == 0 {
            continue;
        }
        debug!("{}: {} rows", path.display(), df.height());

        match stacked.as_mut() {
            Some(acc) => {
                acc.vstack_mut(&df)?;
            }
            None => stacked = Some(df),
        }
    }

    stacked.ok_or_else(|| {
        warn!("no rows left in {} after date filtering", dir.display());
        DataError::NotFound(format!("no rows in {}", dir.display()))
    })
}

/// A column of `df`, reported as [`MalagaError::MissingColumn`] when absent.
pub(crate) fn require_column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Column> {
    df.column(name)
        .map_err(|_| MalagaError::MissingColumn(name.to_string()).into())
}

/// Values of a date column, whatever its temporal type.
///
/// # Errors
///
/// Returns an error if the column is missing or cannot be cast to a date.
pub fn date_column(df: &DataFrame, name: &str) -> Result<Vec<Option<NaiveDate>>> {
    let days = require_column(df, name)?
        .as_materialized_series()
        .cast(&DataType::Date)?
        .cast(&DataType::Int32)?;

    Ok(days
        .i32()?
        .into_iter()
        .map(|d| d.and_then(|d| NaiveDate::from_num_days_from_ce_opt(d + CE_TO_UNIX_EPOCH_DAYS)))
        .collect())
}

/// `start <= date <= end`, whatever the temporal type of `date`.
fn within(range: DateRange) -> Expr {
    let date = col("date").cast(DataType::Date);
    date.clone()
        .gt_eq(lit(range.start))
        .and(date.lt_eq(lit(range.end)))
}

fn create_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

/// Writes a frame as Parquet, creating parent directories.
///
/// # Errors
///
/// Returns an error if the file cannot be created or encoded.
pub fn write_parquet(path: &Path, df: &mut DataFrame) -> Result<()> {
    create_parent(path)?;
    let file = File::create(path)?;
    ParquetWriter::new(file).finish(df)?;
    debug!("wrote {} rows to {}", df.height(), path.display());
    Ok(())
}

/// Writes a frame as CSV with a header row, creating parent directories.
///
/// # Errors
///
/// Returns an error if the file cannot be created or encoded.
pub fn write_csv(path: &Path, df: &mut DataFrame) -> Result<()> {
    create_parent(path)?;
    let mut file = File::create(path)?;
    CsvWriter::new(&mut file).include_header(true).finish(df)?;
    debug!("wrote {} rows to {}", df.height(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("malaga-store-{name}-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn frame(days: &[i32], values: &[f64]) -> DataFrame {
        let date = Column::new("date".into(), days.to_vec())
            .cast(&DataType::Date)
            .unwrap();
        let value = Column::new("value".into(), values.to_vec());
        DataFrame::new(vec![date, value]).unwrap()
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_date_column() {
        // 2000-01-01 is day 10957 of the Unix epoch
        let df = frame(&[10957, 10958], &[1.0, 2.0]);
        let dates = date_column(&df, "date").unwrap();

        assert_eq!(dates, [Some(ymd(2000, 1, 1)), Some(ymd(2000, 1, 2))]);
    }

    #[test]
    fn test_read_dir_stacks_in_order() {
        let dir = scratch("stack");
        write_parquet(&dir.join("factors_2001.parquet"), &mut frame(&[11323], &[2.0])).unwrap();
        write_parquet(&dir.join("factors_2000.parquet"), &mut frame(&[10957], &[1.0])).unwrap();
        fs::write(dir.join("README.txt"), "not data").unwrap();

        let df = read_parquet_dir(&dir, None).unwrap();
        let dates = date_column(&df, "date").unwrap();
        assert_eq!(dates, [Some(ymd(2000, 1, 1)), Some(ymd(2001, 1, 1))]);

        let year_2001 = DateRange::new(ymd(2001, 1, 1), ymd(2001, 12, 31));
        let only_2001 = read_parquet_dir(&dir, Some(year_2001)).unwrap();
        assert_eq!(only_2001.height(), 1);

        let year_1990 = DateRange::new(ymd(1990, 1, 1), ymd(1990, 12, 31));
        let none = read_parquet_dir(&dir, Some(year_1990));
        assert!(matches!(none, Err(DataError::NotFound(_))));

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_scan_parquet_pushes_date_filter() {
        let dir = scratch("scan");
        let path = dir.join("exposures_2000.parquet");
        write_parquet(&path, &mut frame(&[10957, 10958, 10959], &[1.0, 2.0, 3.0])).unwrap();

        let range = DateRange::new(ymd(2000, 1, 2), ymd(2000, 1, 3));
        let df = scan_parquet(&path, Some(range)).unwrap();
        assert_eq!(
            date_column(&df, "date").unwrap(),
            [Some(ymd(2000, 1, 2)), Some(ymd(2000, 1, 3))]
        );

        let outside = DateRange::new(ymd(2005, 1, 1), ymd(2005, 12, 31));
        assert_eq!(scan_parquet(&path, Some(outside)).unwrap().height(), 0);
        assert_eq!(scan_parquet(&path, None).unwrap().height(), 3);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_missing_date_column() {
        let df = DataFrame::new(vec![Column::new("value".into(), vec![1.0])]).unwrap();
        assert!(matches!(
            date_column(&df, "date"),
            Err(DataError::Core(MalagaError::MissingColumn(ref c))) if c == "date"
        ));
    }

    #[test]
    fn test_empty_dir() {
        let dir = scratch("empty");
        assert!(matches!(parquet_files(&dir), Err(DataError::NotFound(_))));
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_write_csv() {
        let dir = scratch("csv");
        let path = dir.join("nested").join("out.csv");
        write_csv(&path, &mut frame(&[10957], &[1.5])).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("date,value"));
        assert!(text.contains("2000-01-01,1.5"));

        fs::remove_dir_all(&dir).unwrap();
    }
}
