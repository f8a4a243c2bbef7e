//! Malaga CLI binary.
//!
//! Runs the factor momentum research loop: compute stock alphas for every
//! λ of the grid, then compare the optimized portfolios and pick the best λ.

mod cmd;
mod data;

use std::path::PathBuf;
use std::process;

use anyhow::Result;
use clap::{Parser, Subcommand};
use malaga_data::{PipelineConfig, Split};

#[derive(Parser)]
#[command(name = "malaga")]
#[command(about = "Factor momentum alphas with EWMA half-life selection", long_about = None)]
#[command(version)]
struct Cli {
    /// JSON configuration file (defaults and MALAGA_* variables otherwise)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the λ grid with half-lives and signal names
    Grid,

    /// Compute stock alphas for the optimizer
    Alphas {
        /// Data split (train or test)
        #[arg(short, long)]
        split: Split,

        /// Single smoothing weight instead of the full grid
        #[arg(short, long = "lambda")]
        lambda: Option<f64>,
    },

    /// Compare optimized portfolios across the λ grid
    Evaluate {
        /// Data split (train or test)
        #[arg(short, long)]
        split: Split,

        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Summarize the portfolio of a single λ
    Inspect {
        /// Data split (train or test)
        #[arg(short, long)]
        split: Split,

        /// Smoothing weight
        #[arg(short, long = "lambda")]
        lambda: f64,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run() {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = PipelineConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Grid => cmd::grid::show_grid(&config)?,
        Commands::Alphas { split, lambda } => cmd::alphas::compute_alphas(&config, split, lambda)?,
        Commands::Evaluate { split, format } => {
            cmd::evaluate::evaluate_lambdas(&config, split, &format)?;
        }
        Commands::Inspect { split, lambda } => {
            cmd::inspect::inspect_lambda(&config, split, lambda)?;
        }
    }

    Ok(())
}
