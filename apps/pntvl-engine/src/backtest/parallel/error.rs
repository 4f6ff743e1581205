//! Error types for parameter sweeps.

use thiserror::Error;

use crate::error::BacktestError;

/// Errors from parameter sweeps.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SweepError {
    /// The grid has no windows or no thresholds.
    #[error("EMPTY_GRID: sweep needs at least one window and one threshold")]
    EmptyGrid,

    /// Thread pool initialization failed.
    #[error("THREAD_POOL: failed to initialize thread pool: {message}")]
    ThreadPool {
        /// Error message.
        message: String,
    },

    /// A cell could not be simulated.
    #[error(transparent)]
    Backtest(#[from] BacktestError),
}
