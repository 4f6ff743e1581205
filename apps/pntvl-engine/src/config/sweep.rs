//! Parameter sweep configuration.

use serde::{Deserialize, Serialize};

use crate::backtest::{DEFAULT_THRESHOLDS, DEFAULT_WINDOWS, ParallelConfig};

/// Parameter sweep configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepConfig {
    /// Whether to run the sweep after the single backtest.
    #[serde(default)]
    pub enabled: bool,
    /// Rolling windows to sweep.
    #[serde(default = "default_windows")]
    pub windows: Vec<usize>,
    /// Z-score thresholds to sweep.
    #[serde(default = "default_thresholds")]
    pub thresholds: Vec<f64>,
    /// Maximum worker threads (0 = rayon default).
    #[serde(default)]
    pub max_threads: usize,
    /// Grids smaller than this run sequentially.
    #[serde(default = "default_min_parallel_cells")]
    pub min_parallel_cells: usize,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            windows: default_windows(),
            thresholds: default_thresholds(),
            max_threads: 0,
            min_parallel_cells: default_min_parallel_cells(),
        }
    }
}

impl SweepConfig {
    /// Executor settings for this sweep.
    #[must_use]
    pub const fn parallel(&self) -> ParallelConfig {
        ParallelConfig {
            max_threads: self.max_threads,
            min_parallel_cells: self.min_parallel_cells,
            track_progress: true,
        }
    }
}

fn default_windows() -> Vec<usize> {
    DEFAULT_WINDOWS.to_vec()
}

fn default_thresholds() -> Vec<f64> {
    DEFAULT_THRESHOLDS.to_vec()
}

const fn default_min_parallel_cells() -> usize {
    4
}
