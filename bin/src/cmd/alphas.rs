//! Alphas command implementation.

use anyhow::Result;
use log::info;
use malaga_combine::{AssetIndex, FactorMomentumConfig, FactorMomentumModel, UniverseFilter};
use malaga_data::{PipelineConfig, Split, frames, store};
use malaga_traits::{AlphaModel, AlphaTable};

use crate::data;

/// Compute filtered stock alphas for each λ and write one Parquet file per λ.
pub(crate) fn compute_alphas(
    config: &PipelineConfig,
    split: Split,
    lambda: Option<f64>,
) -> Result<()> {
    println!("\n╔══════════════════════════════════════════════════════════════╗");
    println!("║                      Computing Alphas                        ║");
    println!("╚══════════════════════════════════════════════════════════════╝\n");

    let range = config.split(split);
    let lambdas = data::resolve_lambdas(config, lambda)?;

    println!("Split:   {} ({} to {})", split, range.start, range.end);
    println!("Lambdas: {}", lambdas.len());
    println!();

    let returns = data::load_factor_returns(config, range)?;
    let risk = data::load_risk(config, range)?;
    let assets = data::load_assets(config, range)?;
    let index = AssetIndex::new(&assets);
    let universe = UniverseFilter {
        min_price: config.min_price,
    };

    let mut runs = Vec::with_capacity(lambdas.len());
    for lambda in lambdas {
        info!("λ={} (half-life {}d)", lambda, lambda.half_life_days());

        let mut model = FactorMomentumModel::new(FactorMomentumConfig {
            smoothing: lambda,
            min_periods: config.min_periods,
            ic: config.ic,
            clip: config.clip,
        })?;
        if let Some(risk) = &risk {
            model = model.with_risk(risk.clone());
        }
        let factor_alphas = model.factor_alphas(&returns)?;
        runs.push((lambda, model, factor_alphas, Vec::new()));
    }

    // one exposure file at a time keeps memory bounded by a single year
    for path in data::exposure_files(config)? {
        let Some(exposures) = data::load_exposure_chunk(&path, range, returns.factors())? else {
            continue;
        };
        for (_, model, factor_alphas, records) in &mut runs {
            let alphas = model.map_to_stocks(factor_alphas, &exposures);
            records.extend(universe.apply_indexed(&alphas, &index).into_inner());
        }
    }

    for (lambda, _, _, records) in runs {
        let mut filtered = AlphaTable::new(records);
        filtered.sort();

        let path = config.alphas_path(split, lambda);
        store::write_parquet(&path, &mut frames::alpha_frame(&filtered)?)?;

        println!(
            "  ✓ λ={} (HL={:>4}d): {} rows → {}",
            lambda,
            lambda.half_life_days(),
            filtered.len(),
            path.display()
        );
    }

    println!("\nDone.");
    Ok(())
}
