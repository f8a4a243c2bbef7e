//! Evaluation of the factor momentum λ grid.
//!
//! This crate turns optimizer output into performance figures:
//! - [`PortfolioReturns`]: realized returns from weights and next-period asset returns
//! - [`PerformanceMetrics`]: annualized mean, volatility and Sharpe ratio
//! - [`LambdaEvaluator`]: per-λ comparison and selection of the best λ
//!
//! # Example
//!
//! ```rust,ignore
//! use malaga_eval::{LambdaEvaluator, PortfolioReturns};
//!
//! let returns = PortfolioReturns::from_weights(&weights, &assets);
//! let selection = LambdaEvaluator::default().evaluate(&[(lambda, returns.returns().to_vec())])?;
//! println!("optimal half-life: {}d", selection.optimal.half_life_days);
//! ```

pub mod lambda;
pub mod metrics;
pub mod portfolio;

// Re-export main types
pub use lambda::{LambdaEvaluator, LambdaPerformance, LambdaSelection};
pub use metrics::{MetricsConfig, PerformanceMetrics};
pub use portfolio::{PortfolioReturns, forward_returns};
