//! Result types for parameter sweeps.

use serde::{Deserialize, Serialize};

use super::grid::SweepGrid;
use super::types::SweepCellResult;

/// Window by threshold matrix of Sharpe ratios.
///
/// `sharpe[i][j]` belongs to `windows[i]` and `thresholds[j]`. Undefined
/// Sharpe values stay `None` (serialized as `null`), never zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SharpeGrid {
    /// Row axis.
    pub windows: Vec<usize>,
    /// Column axis.
    pub thresholds: Vec<f64>,
    /// Row-major Sharpe values.
    pub sharpe: Vec<Vec<Option<f64>>>,
}

/// The best cell of a sweep.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BestCell {
    /// Rolling window.
    pub window: usize,
    /// Z-score threshold.
    pub threshold: f64,
    /// Sharpe ratio of the cell.
    pub sharpe: f64,
}

impl SharpeGrid {
    /// Assemble the matrix from per-cell results.
    #[must_use]
    pub fn from_cells(grid: &SweepGrid, cells: &[SweepCellResult]) -> Self {
        let mut sharpe = vec![vec![None; grid.thresholds().len()]; grid.windows().len()];
        for result in cells {
            if let Some(row) = sharpe.get_mut(result.cell.window_index)
                && let Some(slot) = row.get_mut(result.cell.threshold_index)
            {
                *slot = result.sharpe;
            }
        }

        Self {
            windows: grid.windows().to_vec(),
            thresholds: grid.thresholds().to_vec(),
            sharpe,
        }
    }

    /// Sharpe at row and column indices.
    #[must_use]
    pub fn get_index(&self, window_index: usize, threshold_index: usize) -> Option<f64> {
        self.sharpe
            .get(window_index)
            .and_then(|row| row.get(threshold_index))
            .copied()
            .flatten()
    }

    /// Sharpe for a (window, threshold) pair, looked up by value.
    #[must_use]
    pub fn get(&self, window: usize, threshold: f64) -> Option<f64> {
        let i = self.windows.iter().position(|w| *w == window)?;
        let j = self.thresholds.iter().position(|t| *t == threshold)?;
        self.get_index(i, j)
    }

    /// Number of cells with a defined Sharpe.
    #[must_use]
    pub fn defined_cells(&self) -> usize {
        self.sharpe.iter().flatten().filter(|s| s.is_some()).count()
    }

    /// Highest-Sharpe cell, ignoring undefined cells. Ties keep the first
    /// cell in row-major order.
    #[must_use]
    pub fn best(&self) -> Option<BestCell> {
        let mut best: Option<BestCell> = None;
        for (i, row) in self.sharpe.iter().enumerate() {
            for (j, value) in row.iter().enumerate() {
                let Some(sharpe) = *value else { continue };
                if best.is_none_or(|b| sharpe > b.sharpe) {
                    best = Some(BestCell {
                        window: self.windows[i],
                        threshold: self.thresholds[j],
                        sharpe,
                    });
                }
            }
        }
        best
    }
}

/// Result of a full sweep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepResult {
    /// Sharpe matrix for the heatmap consumer.
    pub grid: SharpeGrid,
    /// Individual cell results in row-major order.
    pub cells: Vec<SweepCellResult>,
    /// Total execution time in milliseconds.
    pub total_time_ms: u64,
}

impl SweepResult {
    /// Best cell of the grid.
    #[must_use]
    pub fn best(&self) -> Option<BestCell> {
        self.grid.best()
    }

    /// Number of cells whose Sharpe is undefined.
    #[must_use]
    pub fn undefined_cells(&self) -> usize {
        self.cells.iter().filter(|c| c.sharpe.is_none()).count()
    }
}
