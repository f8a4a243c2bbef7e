//! Inspect command implementation.

use anyhow::{Result, anyhow};
use malaga_data::{PipelineConfig, Split, frames, store};
use malaga_eval::{MetricsConfig, PerformanceMetrics, PortfolioReturns};
use malaga_signals::{Smoothing, signal_name};

use crate::data;

/// Summarize one λ's portfolio and write its cumulative log returns.
pub(crate) fn inspect_lambda(config: &PipelineConfig, split: Split, lambda: f64) -> Result<()> {
    let lambda = Smoothing::new(lambda)?;

    println!("\n╔══════════════════════════════════════════════════════════════╗");
    println!("║                     Portfolio Inspection                     ║");
    println!("╚══════════════════════════════════════════════════════════════╝\n");

    println!("Signal: {}", signal_name(lambda));
    println!("Split:  {}", split);
    println!();

    let dir = config.weights_dir(split, lambda);
    let weights = data::load_weights(&dir)?
        .ok_or_else(|| anyhow!("no weights found in {}", dir.display()))?;
    let assets = data::load_assets(config, config.split(split))?;

    let portfolio = PortfolioReturns::from_weights(&weights, &assets);
    let metrics = PerformanceMetrics::calculate(
        portfolio.returns(),
        &MetricsConfig {
            periods_per_year: config.periods_per_year,
        },
    );

    println!("Periods:          {}", metrics.n_obs);
    if let (Some(first), Some(last)) = (portfolio.dates().first(), portfolio.dates().last()) {
        println!("Range:            {} to {}", first, last);
    }
    println!("Mean return:      {:.2}%", metrics.mean_return);
    println!("Volatility:       {:.2}%", metrics.volatility);
    println!("Sharpe ratio:     {:.3}", metrics.sharpe);
    if let Some(total) = portfolio.cumulative_log_returns().last() {
        println!("Cumulative (log): {:.2}%", total);
    }

    let path = config.cumulative_path(split, lambda);
    store::write_csv(&path, &mut frames::cumulative_frame(&portfolio)?)?;
    println!("\nCumulative returns written to {}", path.display());

    Ok(())
}
