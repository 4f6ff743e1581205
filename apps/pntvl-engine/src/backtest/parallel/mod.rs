//! Parallel parameter sweep using Rayon.
//!
//! Every (window, threshold) cell reruns divergence, signal and simulation
//! from the shared, read-only [`PreparedSeries`](crate::backtest::PreparedSeries)
//! and writes only its own result. Cells are independent, so evaluation
//! order never changes the outcome.
//!
//! # Thread Pool Configuration
//!
//! With `max_threads = 0` the sweep runs on rayon's global pool. A positive
//! value builds a dedicated pool of that size for the duration of the sweep.
//!
//! # Example
//!
//! ```ignore
//! use pntvl_engine::backtest::{
//!     BacktestConfig, ParallelConfig, ParallelSweeper, SweepGrid,
//! };
//!
//! let grid = SweepGrid::builder()
//!     .windows([10, 20, 30, 60, 90])
//!     .thresholds([0.5, 1.0, 1.5, 2.0, 2.5])
//!     .build()?;
//!
//! let sweeper = ParallelSweeper::new(ParallelConfig::default());
//! let result = sweeper.run_grid(&prepared, &BacktestConfig::default(), &grid)?;
//! println!("{:?}", result.best());
//! ```

mod config;
mod error;
mod executor;
mod grid;
mod progress;
mod result;
mod types;

pub use config::ParallelConfig;
pub use error::SweepError;
pub use executor::{ParallelSweeper, evaluate_cell};
pub use grid::{DEFAULT_THRESHOLDS, DEFAULT_WINDOWS, SweepGrid, SweepGridBuilder};
pub use progress::{Progress, ProgressTracker};
pub use result::{BestCell, SharpeGrid, SweepResult};
pub use types::{SweepCell, SweepCellResult};
