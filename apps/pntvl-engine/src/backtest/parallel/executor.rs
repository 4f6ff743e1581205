//! Parallel sweep executor using Rayon.

use std::time::Instant;

use rayon::prelude::*;
use tracing::{Level, debug, info, span, warn};

use crate::backtest::config::BacktestConfig;
use crate::backtest::metrics::PerformanceCalculator;
use crate::backtest::pipeline::{PreparedSeries, simulate};
use crate::error::BacktestError;

use super::config::ParallelConfig;
use super::error::SweepError;
use super::grid::SweepGrid;
use super::progress::ProgressTracker;
use super::result::{SharpeGrid, SweepResult};
use super::types::{SweepCell, SweepCellResult};

/// Evaluates every (window, threshold) cell of a sweep grid.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParallelSweeper {
    config: ParallelConfig,
}

impl ParallelSweeper {
    /// Create a new sweeper.
    #[must_use]
    pub const fn new(config: ParallelConfig) -> Self {
        Self { config }
    }

    /// Get effective thread count.
    #[must_use]
    pub fn effective_thread_count(&self) -> usize {
        if self.config.max_threads > 0 {
            self.config.max_threads
        } else {
            rayon::current_num_threads()
        }
    }

    /// Run every cell of `grid` against the prepared series.
    ///
    /// Each cell takes `base` with threshold policy, z-score divergence and
    /// the cell's window and threshold. Cell results are identical whether
    /// the grid runs in parallel or sequentially.
    ///
    /// # Errors
    ///
    /// - [`SweepError::ThreadPool`] if a dedicated pool cannot be built.
    /// - [`SweepError::Backtest`] if a cell configuration is invalid.
    pub fn run_grid(
        &self,
        prepared: &PreparedSeries,
        base: &BacktestConfig,
        grid: &SweepGrid,
    ) -> Result<SweepResult, SweepError> {
        let cells = grid.cells();
        if cells.is_empty() {
            return Err(SweepError::EmptyGrid);
        }

        let tracker = ProgressTracker::new(cells.len() as u64);
        let start_time = Instant::now();

        info!(
            cells = cells.len(),
            windows = grid.windows().len(),
            thresholds = grid.thresholds().len(),
            threads = self.effective_thread_count(),
            "Starting parameter sweep"
        );

        let results = if cells.len() >= self.config.min_parallel_cells {
            self.run_parallel(prepared, base, &cells, &tracker)?
        } else {
            self.run_sequential(prepared, base, &cells, &tracker)?
        };

        let elapsed = start_time.elapsed();
        let final_progress = tracker.progress();

        if final_progress.undefined > 0 {
            warn!(
                undefined = final_progress.undefined,
                total = final_progress.total,
                "Sweep cells with undefined Sharpe"
            );
        }
        info!(
            "Parameter sweep complete: {} cells in {:.2}s ({:.1} cells/s)",
            final_progress.completed,
            elapsed.as_secs_f64(),
            final_progress.cells_per_sec
        );

        Ok(SweepResult {
            grid: SharpeGrid::from_cells(grid, &results),
            cells: results,
            total_time_ms: elapsed.as_millis() as u64,
        })
    }

    fn run_parallel(
        &self,
        prepared: &PreparedSeries,
        base: &BacktestConfig,
        cells: &[SweepCell],
        tracker: &ProgressTracker,
    ) -> Result<Vec<SweepCellResult>, SweepError> {
        let run = || {
            cells
                .par_iter()
                .map(|cell| self.execute_cell(prepared, base, *cell, tracker))
                .collect::<Result<Vec<_>, BacktestError>>()
        };

        // A local pool keeps the thread cap scoped to this sweep.
        let results = if self.config.max_threads > 0 {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(self.config.max_threads)
                .build()
                .map_err(|e| SweepError::ThreadPool {
                    message: e.to_string(),
                })?;
            pool.install(run)
        } else {
            run()
        };

        Ok(results?)
    }

    fn run_sequential(
        &self,
        prepared: &PreparedSeries,
        base: &BacktestConfig,
        cells: &[SweepCell],
        tracker: &ProgressTracker,
    ) -> Result<Vec<SweepCellResult>, SweepError> {
        let results = cells
            .iter()
            .map(|cell| self.execute_cell(prepared, base, *cell, tracker))
            .collect::<Result<Vec<_>, BacktestError>>()?;
        Ok(results)
    }

    fn execute_cell(
        &self,
        prepared: &PreparedSeries,
        base: &BacktestConfig,
        cell: SweepCell,
        tracker: &ProgressTracker,
    ) -> Result<SweepCellResult, BacktestError> {
        let span = span!(
            Level::DEBUG,
            "sweep_cell",
            window = cell.window,
            threshold = cell.threshold
        );
        let _enter = span.enter();

        let result = evaluate_cell(prepared, base, cell)?;
        tracker.cell_completed(result.sharpe.is_some());

        debug!(
            sharpe = ?result.sharpe,
            total_trades = result.total_trades,
            "Sweep cell evaluated"
        );
        if self.config.track_progress {
            let progress = tracker.progress();
            debug!(
                "Progress: {:.1}% ({}/{}) - ETA: {}s",
                progress.percentage(),
                progress.completed,
                progress.total,
                progress.eta_secs
            );
        }

        Ok(result)
    }
}

/// Evaluate one cell: rebuild z with its window, signal with its threshold,
/// simulate, and reduce to Sharpe.
///
/// # Errors
///
/// Returns [`BacktestError::InvalidParameter`] for an invalid cell config.
pub fn evaluate_cell(
    prepared: &PreparedSeries,
    base: &BacktestConfig,
    cell: SweepCell,
) -> Result<SweepCellResult, BacktestError> {
    let config = base.for_sweep_cell(cell.window, cell.threshold);
    let records = simulate(prepared, &config)?;

    let returns: Vec<f64> = records.iter().map(|r| r.strategy_return).collect();
    let sharpe = PerformanceCalculator::new(config.analysis.annualization).sharpe_ratio(&returns);

    Ok(SweepCellResult {
        cell,
        sharpe,
        total_trades: records.iter().filter(|r| r.trade_flag).count(),
    })
}
