// Allow unwrap/expect in tests - tests should panic on unexpected errors
// Allow test-specific patterns and pedantic lints in test code
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::float_cmp,
        clippy::too_many_lines,
        clippy::match_same_arms,
        clippy::needless_pass_by_value,
        clippy::needless_collect,
        clippy::option_if_let_else,
        clippy::default_trait_access,
        clippy::items_after_statements,
        clippy::or_fun_call
    )
)]

//! PNTVL Engine - Rust Core Library
//!
//! Deterministic backtester for a price-neutral TVL divergence signal.
//!
//! # Layout
//!
//! - **backtest**: the computational core. Series alignment, the
//!   price-neutral metric, divergence, signals, the T+1 simulator,
//!   performance metrics, the look-ahead audit and the parameter sweep.
//!   Pure functions over in-memory series; no IO.
//! - **feed**: CSV ingestion of the TVL and close-price exports.
//! - **report**: console summary, record preview, chart markers and
//!   CSV/JSON exports.
//! - **config**: YAML configuration with environment interpolation.
//! - **telemetry**: tracing subscriber setup.
//!
//! # Example
//!
//! ```rust,ignore
//! use pntvl_engine::{PreparedSeries, load_config, load_inputs, run_backtest};
//!
//! let config = load_config(Some("config.yaml"))?;
//! let inputs = load_inputs(&config.data)?;
//! let backtest = config.backtest();
//! let prepared = PreparedSeries::new(&inputs.tvl, &inputs.prices, backtest.strategy.rounding)?;
//! let run = run_backtest(&prepared, &backtest)?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

/// Backtest core: metric, divergence, signal, simulation, metrics, sweep.
pub mod backtest;

/// Configuration loading and validation.
pub mod config;

/// Core error taxonomy.
pub mod error;

/// CSV ingestion.
pub mod feed;

/// Reports and exports.
pub mod report;

/// Tracing subscriber setup.
pub mod telemetry;

pub use backtest::{
    BacktestConfig, BacktestRun, DailyRecord, DatedValue, ParallelSweeper, PerformanceSummary,
    PreparedSeries, Signal, SweepGrid, SweepResult, run_backtest, simulate,
};
pub use config::{Config, ConfigError, load_config, load_config_from_string};
pub use error::BacktestError;
pub use feed::{InputSeries, LoadError, load_inputs};
pub use telemetry::init_telemetry;
