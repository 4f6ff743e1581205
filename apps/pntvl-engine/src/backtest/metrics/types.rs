//! Core types for backtest performance metrics.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Drawdown tracking point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DrawdownPoint {
    /// Calendar date.
    pub date: NaiveDate,
    /// Equity value.
    pub equity: f64,
    /// Peak equity so far, including this day.
    pub peak: f64,
    /// `equity / peak - 1`; zero or negative.
    pub drawdown: f64,
}

/// Performance summary with all calculated metrics.
///
/// Undefined values serialize as `null`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PerformanceSummary {
    // Headline metrics
    /// Compound annual growth rate (decimal, e.g., 0.15 = 15%).
    pub cagr: Option<f64>,
    /// Mean daily strategy return times the annualization constant.
    pub annual_return: Option<f64>,
    /// Worst `equity / running_peak - 1` (zero or negative).
    pub max_drawdown: Option<f64>,
    /// Annualized Sharpe ratio, no risk-free rate.
    pub sharpe: Option<f64>,
    /// CAGR over absolute max drawdown.
    pub calmar: Option<f64>,
    /// Share of nonzero-return days that were positive.
    pub win_rate: Option<f64>,
    /// Number of position changes.
    pub total_trades: usize,

    // Supporting statistics
    /// Final equity over the 1.0 baseline, minus one.
    pub total_return: Option<f64>,
    /// Equity after the last record.
    pub final_equity: f64,
    /// Number of records.
    pub trading_days: usize,
    /// Days with a positive strategy return.
    pub winning_days: usize,
    /// Days with a negative strategy return.
    pub losing_days: usize,
    /// Sum of all trade costs.
    pub total_cost: f64,
}
