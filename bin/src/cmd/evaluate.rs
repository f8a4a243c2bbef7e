//! Evaluate command implementation.

use anyhow::{Result, bail};
use log::info;
use malaga_data::{PipelineConfig, Split, frames, store};
use malaga_eval::{LambdaEvaluator, LambdaSelection, MetricsConfig, PortfolioReturns};

use crate::data;

/// Evaluate the optimized portfolio of every λ and report the best one.
pub(crate) fn evaluate_lambdas(config: &PipelineConfig, split: Split, format: &str) -> Result<()> {
    let json = match format {
        "text" => false,
        "json" => true,
        other => bail!("unknown format '{other}', expected 'text' or 'json'"),
    };

    if !json {
        println!("\n╔══════════════════════════════════════════════════════════════╗");
        println!("║                     Lambda Evaluation                        ║");
        println!("╚══════════════════════════════════════════════════════════════╝\n");
    }

    let range = config.split(split);
    let assets = data::load_assets(config, range)?;

    let mut series = Vec::new();
    for lambda in config.lambda_grid()? {
        let dir = config.weights_dir(split, lambda);
        let Some(weights) = data::load_weights(&dir)? else {
            info!(
                "λ={} (HL={}d): no weights in {}, skipping",
                lambda,
                lambda.half_life_days(),
                dir.display()
            );
            continue;
        };

        let portfolio = PortfolioReturns::from_weights(&weights, &assets);
        info!(
            "λ={} (HL={}d): {} portfolio dates",
            lambda,
            lambda.half_life_days(),
            portfolio.len()
        );
        series.push((lambda, portfolio.returns().to_vec()));
    }

    if series.is_empty() {
        bail!("no weights found for split {split}; run the optimizer on the alpha files first");
    }

    let evaluator = LambdaEvaluator::new(MetricsConfig {
        periods_per_year: config.periods_per_year,
    });
    let selection = evaluator.evaluate(&series)?;

    store::write_csv(
        &config.report_path(split, "csv"),
        &mut frames::performance_frame(&selection.table)?,
    )?;
    std::fs::write(
        config.report_path(split, "json"),
        serde_json::to_string_pretty(&selection)?,
    )?;

    if json {
        println!("{}", serde_json::to_string_pretty(&selection)?);
    } else {
        print_selection(&selection);
        println!(
            "Report written to {}",
            config.report_path(split, "csv").display()
        );
    }

    Ok(())
}

fn print_selection(selection: &LambdaSelection) {
    println!(
        "{:>10}  {:>6}  {:>9}  {:>8}  {:>7}",
        "λ", "HL", "Mean (%)", "Vol (%)", "Sharpe"
    );
    println!("{}", "-".repeat(50));

    for perf in &selection.table {
        let marker = if perf.lambda == selection.optimal.lambda {
            " *"
        } else {
            ""
        };
        println!(
            "{:>10}  {:>5}d  {:>9.2}  {:>8.2}  {:>7.3}{}",
            perf.lambda.to_string(),
            perf.half_life_days,
            perf.mean_return,
            perf.volatility,
            perf.sharpe,
            marker
        );
    }

    let best = &selection.optimal;
    println!("\n{}", "=".repeat(60));
    println!(
        "Optimal lambda: {} (half-life: {} days)",
        best.lambda, best.half_life_days
    );
    println!("Sharpe ratio:   {:.3}", best.sharpe);
    println!("{}\n", "=".repeat(60));
}
