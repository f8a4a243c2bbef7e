//! Data loading utilities for the Malaga CLI.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::info;
use malaga_data::{DataError, DateRange, PipelineConfig, frames, store};
use malaga_signals::Smoothing;
use malaga_traits::{AssetRecord, ExposureMatrix, FactorId, FactorPanel, WeightRecord};

/// The λ values to process: a single value when given, the grid otherwise.
pub(crate) fn resolve_lambdas(
    config: &PipelineConfig,
    lambda: Option<f64>,
) -> Result<Vec<Smoothing>> {
    match lambda {
        Some(alpha) => Ok(vec![Smoothing::new(alpha)?]),
        None => Ok(config.lambda_grid()?),
    }
}

/// Factor returns within `range`.
pub(crate) fn load_factor_returns(
    config: &PipelineConfig,
    range: DateRange,
) -> Result<FactorPanel> {
    let df = store::read_parquet_dir(&config.factors_dir, Some(range))
        .with_context(|| format!("loading factor returns from {}", config.factors_dir.display()))?;
    let panel = frames::factor_panel(&df)?;
    info!(
        "Loaded {} factors over {} dates",
        panel.n_factors(),
        panel.n_dates()
    );
    Ok(panel)
}

/// External factor risk, when a risk directory is configured.
pub(crate) fn load_risk(config: &PipelineConfig, range: DateRange) -> Result<Option<FactorPanel>> {
    let Some(dir) = config.risk_dir.as_deref() else {
        return Ok(None);
    };
    let df = store::read_parquet_dir(dir, Some(range))
        .with_context(|| format!("loading factor risk from {}", dir.display()))?;
    Ok(Some(frames::factor_panel(&df)?))
}

/// Yearly exposure files, in date order.
pub(crate) fn exposure_files(config: &PipelineConfig) -> Result<Vec<PathBuf>> {
    store::parquet_files(&config.exposures_dir)
        .with_context(|| format!("listing exposures in {}", config.exposures_dir.display()))
}

/// Stock exposures to `factors` from one file, restricted to `range`.
///
/// Returns `None` when no row of the file falls within `range`.
pub(crate) fn load_exposure_chunk(
    path: &Path,
    range: DateRange,
    factors: &[FactorId],
) -> Result<Option<ExposureMatrix>> {
    let df = store::scan_parquet(path, Some(range))
        .with_context(|| format!("loading exposures from {}", path.display()))?;
    if df.height() == 0 {
        return Ok(None);
    }
    let exposures = frames::exposure_matrix(&df, factors)?;
    info!(
        "Loaded exposures for {} dates from {}",
        exposures.len(),
        path.display()
    );
    Ok(Some(exposures))
}

/// Asset prices, betas and returns within `range`.
pub(crate) fn load_assets(config: &PipelineConfig, range: DateRange) -> Result<Vec<AssetRecord>> {
    let df = store::read_parquet_dir(&config.assets_dir, Some(range))
        .with_context(|| format!("loading assets from {}", config.assets_dir.display()))?;
    let assets = frames::asset_records(&df)?;
    info!("Loaded {} asset rows", assets.len());
    Ok(assets)
}

/// Optimizer weights stored in `dir`, or `None` while none have been
/// written (missing directory, or no Parquet file in it yet).
pub(crate) fn load_weights(dir: &Path) -> Result<Option<Vec<WeightRecord>>> {
    if !dir.is_dir() {
        return Ok(None);
    }
    match store::parquet_files(dir) {
        Ok(_) => {}
        Err(DataError::NotFound(_)) => return Ok(None),
        Err(e) => {
            return Err(e).with_context(|| format!("listing weights in {}", dir.display()));
        }
    }
    let df = store::read_parquet_dir(dir, None)
        .with_context(|| format!("loading weights from {}", dir.display()))?;
    Ok(Some(frames::weight_records(&df)?))
}
