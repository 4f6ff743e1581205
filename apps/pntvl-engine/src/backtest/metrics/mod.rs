//! Performance metrics calculation for backtest evaluation.
//!
//! Reduces the per-day strategy returns and equity curve to:
//! - CAGR and annualized mean return
//! - Maximum drawdown (equity over running peak, minus one)
//! - Sharpe ratio (mean over sample deviation, annualized)
//! - Calmar ratio (CAGR over absolute max drawdown)
//! - Win rate over days with a nonzero return, and trade count
//!
//! Every ratio that would divide by zero or produce a non-finite number is
//! reported as `None`.

mod calculator;
mod constants;
mod format;
pub mod math;
mod types;

pub use calculator::PerformanceCalculator;
pub use constants::DAYS_PER_YEAR;
pub use format::{format_decimal, format_pct, format_ratio};
pub use types::{DrawdownPoint, PerformanceSummary};
