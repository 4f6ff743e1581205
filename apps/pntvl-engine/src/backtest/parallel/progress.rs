//! Progress tracking for parallel sweep execution.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use serde::{Deserialize, Serialize};

/// Progress tracker shared by sweep workers.
#[derive(Debug)]
pub struct ProgressTracker {
    total_cells: u64,
    completed_cells: AtomicU64,
    undefined_cells: AtomicU64,
    start_time: Instant,
}

impl ProgressTracker {
    /// Create a new progress tracker.
    #[must_use]
    pub fn new(total_cells: u64) -> Self {
        Self {
            total_cells,
            completed_cells: AtomicU64::new(0),
            undefined_cells: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    /// Mark a cell as completed.
    pub fn cell_completed(&self, sharpe_defined: bool) {
        self.completed_cells.fetch_add(1, Ordering::Relaxed);
        if !sharpe_defined {
            self.undefined_cells.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Get current progress.
    #[must_use]
    pub fn progress(&self) -> Progress {
        let completed = self.completed_cells.load(Ordering::Relaxed);
        let undefined = self.undefined_cells.load(Ordering::Relaxed);
        let elapsed = self.start_time.elapsed();

        let cells_per_sec = if elapsed.as_secs_f64() > 0.0 {
            completed as f64 / elapsed.as_secs_f64()
        } else {
            0.0
        };

        let remaining = self.total_cells.saturating_sub(completed);
        let eta_secs = if cells_per_sec > 0.0 {
            (remaining as f64 / cells_per_sec) as u64
        } else {
            0
        };

        Progress {
            total: self.total_cells,
            completed,
            undefined,
            elapsed_secs: elapsed.as_secs(),
            eta_secs,
            cells_per_sec,
        }
    }
}

/// Progress snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Progress {
    /// Total number of cells.
    pub total: u64,
    /// Completed cells.
    pub completed: u64,
    /// Completed cells whose Sharpe is undefined.
    pub undefined: u64,
    /// Elapsed time in seconds.
    pub elapsed_secs: u64,
    /// Estimated time remaining in seconds.
    pub eta_secs: u64,
    /// Cells processed per second.
    pub cells_per_sec: f64,
}

impl Progress {
    /// Get completion percentage.
    #[must_use]
    pub fn percentage(&self) -> f64 {
        if self.total == 0 {
            100.0
        } else {
            (self.completed as f64 / self.total as f64) * 100.0
        }
    }
}
