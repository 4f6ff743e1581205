//! End-to-end backtest pipeline.
//!
//! Alignment and the price-neutral metric depend only on the input series
//! and the rounding policy, so they are built once as [`PreparedSeries`].
//! Everything downstream (divergence, signal, simulation) depends on window
//! and threshold and is recomputed from scratch for each configuration.

use tracing::{info, warn};

use super::config::{BacktestConfig, DivergenceMode, RoundingPolicy};
use super::divergence::compute_divergence;
use super::engine::simulate_records;
use super::look_ahead::{LookAheadChecker, LookAheadSummary};
use super::metrics::{PerformanceCalculator, PerformanceSummary};
use super::price_neutral::build_base_records;
use super::record::{BaseRecord, DailyRecord};
use super::series::{AlignedRow, DatedValue, align_series};
use super::signal::generate_signals;
use crate::error::BacktestError;

/// Joined series with the window-independent metric columns.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedSeries {
    rounding: RoundingPolicy,
    records: Vec<BaseRecord>,
}

impl PreparedSeries {
    /// Align the two series and build the price-neutral metric.
    ///
    /// # Errors
    ///
    /// Propagates alignment and metric errors (empty input, duplicate date,
    /// invalid price or TVL).
    pub fn new(
        tvl: &[DatedValue],
        prices: &[DatedValue],
        rounding: RoundingPolicy,
    ) -> Result<Self, BacktestError> {
        let rows = align_series(tvl, prices)?;
        Self::from_aligned(&rows, rounding)
    }

    /// Build from rows that are already joined and ascending.
    ///
    /// # Errors
    ///
    /// Returns [`BacktestError::MissingData`] for no rows, or a metric error.
    pub fn from_aligned(rows: &[AlignedRow], rounding: RoundingPolicy) -> Result<Self, BacktestError> {
        if rows.is_empty() {
            return Err(BacktestError::MissingData {
                series: crate::error::JOINED_SERIES,
            });
        }
        let records = build_base_records(rows, rounding)?;
        Ok(Self { rounding, records })
    }

    /// Rounding policy the metric was built with.
    #[must_use]
    pub const fn rounding(&self) -> RoundingPolicy {
        self.rounding
    }

    /// Base records in ascending date order.
    #[must_use]
    pub fn records(&self) -> &[BaseRecord] {
        &self.records
    }

    /// Number of joined dates.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.records.len()
    }

    /// Always false for a successfully built series.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// The first divergence is undefined, so the first z-score needs
/// `window + 1` records.
const fn zscore_never_defined(records: usize, window: usize) -> bool {
    records <= window
}

/// Result of a single-configuration backtest.
#[derive(Debug, Clone, PartialEq)]
pub struct BacktestRun {
    /// Fully simulated records.
    pub records: Vec<DailyRecord>,
    /// Performance over the whole run.
    pub summary: PerformanceSummary,
    /// Outcome of the no-lookahead audit.
    pub audit: LookAheadSummary,
}

/// Divergence, signals and simulation for one configuration.
///
/// # Errors
///
/// - [`BacktestError::InvalidParameter`] if the configuration is invalid or
///   its rounding policy differs from the one `prepared` was built with.
pub fn simulate(
    prepared: &PreparedSeries,
    config: &BacktestConfig,
) -> Result<Vec<DailyRecord>, BacktestError> {
    config.validate()?;
    if config.strategy.rounding != prepared.rounding() {
        return Err(BacktestError::invalid_parameter(
            "rounding",
            format!(
                "series prepared with {:?} but configuration asks for {:?}",
                prepared.rounding(),
                config.strategy.rounding
            ),
        ));
    }

    let strategy = &config.strategy;
    let base = prepared.records();
    let points = compute_divergence(base, strategy.divergence_mode, strategy.window);
    let signals = generate_signals(base, &points, strategy);

    Ok(simulate_records(base, &points, &signals, config.costs))
}

/// Run one configuration end to end: simulate, audit and summarize.
///
/// # Errors
///
/// Same as [`simulate`].
pub fn run_backtest(
    prepared: &PreparedSeries,
    config: &BacktestConfig,
) -> Result<BacktestRun, BacktestError> {
    let strategy = &config.strategy;
    if strategy.divergence_mode == DivergenceMode::ZScore
        && zscore_never_defined(prepared.len(), strategy.window)
    {
        warn!(
            records = prepared.len(),
            window = strategy.window,
            "Series too short for the rolling window; every z-score is undefined"
        );
    }

    let records = simulate(prepared, config)?;

    let audit = LookAheadChecker::with_defaults().audit(&records);
    if !audit.is_clean() {
        warn!(%audit, "Simulated records failed the look-ahead audit");
    }

    let summary = PerformanceCalculator::new(config.analysis.annualization).calculate(&records);

    info!(
        records = records.len(),
        rounding = ?strategy.rounding,
        signal_policy = ?strategy.signal_policy,
        divergence_mode = ?strategy.divergence_mode,
        window = strategy.window,
        threshold = strategy.threshold,
        total_trades = summary.total_trades,
        sharpe = ?summary.sharpe,
        "Backtest complete"
    );

    Ok(BacktestRun {
        records,
        summary,
        audit,
    })
}
