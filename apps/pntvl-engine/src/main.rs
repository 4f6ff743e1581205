//! PNTVL Engine Binary
//!
//! Runs one backtest of the price-neutral TVL divergence signal and,
//! optionally, a (window, threshold) Sharpe sweep.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin pntvl-engine -- config.yaml
//! ```
//!
//! # Environment Variables
//!
//! - `PNTVL_CONFIG`: config path when no argument is given (default: config.yaml)
//! - `RUST_LOG`: overrides `observability.logging.level`
//!
//! Any `${VAR}` referenced from the config file is read after `.env` is loaded.

use anyhow::{Context, Result};
use pntvl_engine::backtest::{ParallelSweeper, PreparedSeries, run_backtest};
use pntvl_engine::config::{Config, load_config};
use pntvl_engine::feed::load_inputs;
use pntvl_engine::report::{
    render_preview, render_summary, signal_markers, write_markers_csv, write_records_csv,
    write_summary_json, write_sweep_json,
};
use pntvl_engine::telemetry::init_telemetry;

/// Default config path.
const DEFAULT_CONFIG_PATH: &str = "config.yaml";

fn main() -> Result<()> {
    load_dotenv();

    let config_path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("PNTVL_CONFIG").ok())
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());

    let config = load_config(Some(config_path.as_str()))
        .with_context(|| format!("Failed to load config from {config_path}"))?;
    init_telemetry(&config.observability.logging).context("Failed to initialize tracing")?;

    tracing::info!(config = %config_path, "Starting PNTVL backtest");

    run(&config)
}

fn run(config: &Config) -> Result<()> {
    let inputs = load_inputs(&config.data).context("Failed to load input series")?;
    let backtest = config.backtest();

    let prepared = PreparedSeries::new(&inputs.tvl, &inputs.prices, backtest.strategy.rounding)
        .context("Failed to prepare joined series")?;
    let outcome = run_backtest(&prepared, &backtest).context("Backtest failed")?;

    println!("{}", render_summary(&outcome.summary));
    println!();
    println!("{}", render_preview(&outcome.records, config.output.preview_rows));

    let markers = signal_markers(&outcome.records);
    tracing::info!(
        markers = markers.len(),
        audit = %outcome.audit,
        "Run finished"
    );

    if let Some(path) = &config.output.records_path {
        write_records_csv(path, &outcome.records)
            .with_context(|| format!("Failed to write records to {path}"))?;
    }
    if let Some(path) = &config.output.summary_path {
        write_summary_json(path, &outcome.summary)
            .with_context(|| format!("Failed to write summary to {path}"))?;
    }
    if let Some(path) = &config.output.markers_path {
        write_markers_csv(path, &markers)
            .with_context(|| format!("Failed to write markers to {path}"))?;
    }

    if config.sweep.enabled {
        let grid = config.sweep_grid().context("Invalid sweep grid")?;
        let sweeper = ParallelSweeper::new(config.sweep.parallel());
        let result = sweeper
            .run_grid(&prepared, &backtest, &grid)
            .context("Parameter sweep failed")?;

        match result.best() {
            Some(best) => tracing::info!(
                window = best.window,
                threshold = best.threshold,
                sharpe = best.sharpe,
                undefined_cells = result.undefined_cells(),
                "Best sweep cell"
            ),
            None => tracing::warn!(
                cells = result.cells.len(),
                "No sweep cell produced a defined Sharpe ratio"
            ),
        }

        if let Some(path) = &config.output.sweep_path {
            write_sweep_json(path, &result)
                .with_context(|| format!("Failed to write sweep to {path}"))?;
        }
    }

    Ok(())
}

/// Load `.env` from the working directory or the nearest ancestor.
fn load_dotenv() {
    if dotenvy::dotenv().is_err() {
        load_dotenv_from_ancestors();
    }
}

fn load_dotenv_from_ancestors() {
    if let Ok(cwd) = std::env::current_dir() {
        let mut dir = cwd.as_path();
        while let Some(parent) = dir.parent() {
            let env_path = parent.join(".env");
            if env_path.exists() {
                let _ = dotenvy::from_path(&env_path);
                return;
            }
            dir = parent;
        }
    }
}
