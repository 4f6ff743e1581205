//! Configuration for parallel sweep execution.

use serde::{Deserialize, Serialize};

/// Configuration for parallel sweep execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParallelConfig {
    /// Maximum number of threads to use (0 = rayon default).
    pub max_threads: usize,

    /// Grids with fewer cells than this run sequentially.
    pub min_parallel_cells: usize,

    /// Whether to log progress after each cell.
    pub track_progress: bool,
}

impl Default for ParallelConfig {
    fn default() -> Self {
        Self {
            max_threads: 0,
            min_parallel_cells: 4,
            track_progress: true,
        }
    }
}
