//! Window by threshold grid for the parameter sweep.

use serde::{Deserialize, Serialize};

use super::error::SweepError;
use super::types::SweepCell;
use crate::backtest::config::{validate_threshold, validate_window};

/// Rolling windows swept when none are configured.
pub const DEFAULT_WINDOWS: [usize; 5] = [10, 20, 30, 60, 90];
/// Z-score thresholds swept when none are configured.
pub const DEFAULT_THRESHOLDS: [f64; 5] = [0.5, 1.0, 1.5, 2.0, 2.5];

/// A validated, non-empty sweep grid. Axis order is preserved as given.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepGrid {
    windows: Vec<usize>,
    thresholds: Vec<f64>,
}

impl Default for SweepGrid {
    fn default() -> Self {
        Self {
            windows: DEFAULT_WINDOWS.to_vec(),
            thresholds: DEFAULT_THRESHOLDS.to_vec(),
        }
    }
}

impl SweepGrid {
    /// Create a new sweep grid builder.
    #[must_use]
    pub fn builder() -> SweepGridBuilder {
        SweepGridBuilder::new()
    }

    /// Window axis.
    #[must_use]
    pub fn windows(&self) -> &[usize] {
        &self.windows
    }

    /// Threshold axis.
    #[must_use]
    pub fn thresholds(&self) -> &[f64] {
        &self.thresholds
    }

    /// Get the total number of cells.
    #[must_use]
    pub const fn total_cells(&self) -> usize {
        self.windows.len() * self.thresholds.len()
    }

    /// All cells, row-major (windows outer, thresholds inner).
    #[must_use]
    pub fn cells(&self) -> Vec<SweepCell> {
        let mut cells = Vec::with_capacity(self.total_cells());
        for (window_index, window) in self.windows.iter().enumerate() {
            for (threshold_index, threshold) in self.thresholds.iter().enumerate() {
                cells.push(SweepCell {
                    window_index,
                    threshold_index,
                    window: *window,
                    threshold: *threshold,
                });
            }
        }
        cells
    }
}

/// Builder for sweep grids.
#[derive(Debug, Default)]
pub struct SweepGridBuilder {
    windows: Vec<usize>,
    thresholds: Vec<f64>,
}

impl SweepGridBuilder {
    /// Create a new builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add window values.
    #[must_use]
    pub fn windows(mut self, values: impl IntoIterator<Item = usize>) -> Self {
        self.windows.extend(values);
        self
    }

    /// Add threshold values.
    #[must_use]
    pub fn thresholds(mut self, values: impl IntoIterator<Item = f64>) -> Self {
        self.thresholds.extend(values);
        self
    }

    /// Add an inclusive window range.
    #[must_use]
    pub fn window_range(self, start: usize, end: usize, step: usize) -> Self {
        let values: Vec<usize> = (start..=end).step_by(step.max(1)).collect();
        self.windows(values)
    }

    /// Validate and build the grid.
    ///
    /// # Errors
    ///
    /// - [`SweepError::EmptyGrid`] if either axis is empty.
    /// - [`SweepError::Backtest`] for a window below 2 or a negative or
    ///   non-finite threshold.
    pub fn build(self) -> Result<SweepGrid, SweepError> {
        if self.windows.is_empty() || self.thresholds.is_empty() {
            return Err(SweepError::EmptyGrid);
        }
        for window in &self.windows {
            validate_window(*window)?;
        }
        for threshold in &self.thresholds {
            validate_threshold(*threshold)?;
        }

        Ok(SweepGrid {
            windows: self.windows,
            thresholds: self.thresholds,
        })
    }
}
