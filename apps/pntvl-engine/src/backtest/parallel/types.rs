//! Core types for sweep cells.

use serde::{Deserialize, Serialize};

/// One (window, threshold) combination and its position in the grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SweepCell {
    /// Row index into the grid's windows.
    pub window_index: usize,
    /// Column index into the grid's thresholds.
    pub threshold_index: usize,
    /// Rolling z-score window.
    pub window: usize,
    /// Z-score threshold.
    pub threshold: f64,
}

/// Outcome of evaluating one cell.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SweepCellResult {
    /// The evaluated cell.
    pub cell: SweepCell,
    /// Annualized Sharpe ratio; `None` when undefined.
    pub sharpe: Option<f64>,
    /// Position changes in the cell's run.
    pub total_trades: usize,
}
