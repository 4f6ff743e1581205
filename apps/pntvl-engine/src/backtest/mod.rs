//! Price-neutral TVL divergence backtest.
//!
//! The pipeline runs in fixed stages:
//!
//! - **Alignment**: inner join of the TVL and close-price series by date
//! - **Metric**: price-neutral TVL (`tvl / price`), rounded, and its daily change
//! - **Divergence**: asset return minus metric change, optionally as a rolling z-score
//! - **Signal**: threshold or comparison policy mapping divergence to {-1, 0, +1}
//! - **Simulation**: T+1 positions, fee plus slippage per position change, compounded equity
//! - **Metrics**: CAGR, annual return, max drawdown, Sharpe, Calmar, win rate, trades
//! - **Sweep**: Sharpe over a (window, threshold) grid, evaluated with rayon
//!
//! # Example
//!
//! ```ignore
//! use pntvl_engine::backtest::{BacktestConfig, DatedValue, PreparedSeries, run_backtest};
//!
//! let config = BacktestConfig::default();
//! let prepared = PreparedSeries::new(&tvl, &prices, config.strategy.rounding)?;
//! let run = run_backtest(&prepared, &config)?;
//!
//! assert!(run.audit.is_clean());
//! println!("sharpe: {:?}", run.summary.sharpe);
//! ```

mod config;
mod divergence;
mod engine;
mod look_ahead;
mod metrics;
mod parallel;
mod pipeline;
mod price_neutral;
mod record;
mod series;
mod signal;

pub use config::{
    AnalysisConfig, BacktestConfig, CostConfig, DivergenceMode, RoundingPolicy, SignalPolicy,
    StrategyConfig, validate_threshold, validate_window,
};
pub use divergence::{DivergencePoint, RollingZScore, compute_divergence, divergence_strength};
pub use engine::{INITIAL_EQUITY, SimulationEngine, simulate_records};
pub use look_ahead::{
    LookAheadChecker, LookAheadConfig, LookAheadError, LookAheadSummary, ValidationResult,
    validate_equity_step, validate_position_lag, validate_trade_flag,
};
pub use metrics::{
    DAYS_PER_YEAR, DrawdownPoint, PerformanceCalculator, PerformanceSummary, format_decimal,
    format_pct, format_ratio,
};
pub use parallel::{
    BestCell, DEFAULT_THRESHOLDS, DEFAULT_WINDOWS, ParallelConfig, ParallelSweeper, Progress,
    ProgressTracker, SharpeGrid, SweepCell, SweepCellResult, SweepError, SweepGrid,
    SweepGridBuilder, SweepResult, evaluate_cell,
};
pub use pipeline::{BacktestRun, PreparedSeries, run_backtest, simulate};
pub use price_neutral::{build_base_records, pct_change, round_2dp, round_4sig};
pub use record::{BaseRecord, DailyRecord, Signal};
pub use series::{AlignedRow, DatedValue, align_series};
pub use signal::{
    SignalInputs, comparison_signal, generate_signal, generate_signals, threshold_signal,
};
