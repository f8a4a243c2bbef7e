//! Grid command implementation.

use anyhow::Result;
use malaga_data::{PipelineConfig, Split};
use malaga_signals::signal_name;

/// Print the λ grid with half-lives and the names results are stored under.
pub(crate) fn show_grid(config: &PipelineConfig) -> Result<()> {
    println!("\n╔══════════════════════════════════════════════════════════════╗");
    println!("║                        Lambda Grid                           ║");
    println!("╚══════════════════════════════════════════════════════════════╝\n");

    for split in [Split::Train, Split::Test] {
        let range = config.split(split);
        println!("{:6} {} to {}", split, range.start, range.end);
    }
    println!("IC:    {}", config.ic);
    println!("Gamma: {}", config.gamma);
    println!();

    println!("{:>10}  {:>10}  {:>8}  Signal", "λ", "Decay", "HL");
    println!("{}", "-".repeat(72));

    for lambda in config.lambda_grid()? {
        println!(
            "{:>10}  {:>10.6}  {:>7}d  {}",
            lambda.to_string(),
            lambda.decay(),
            lambda.half_life_days(),
            signal_name(lambda)
        );
    }
    println!();

    Ok(())
}
