//! Per-record checks of the T+1 execution law.

use super::types::{LookAheadError, ValidationResult};
use crate::backtest::engine::INITIAL_EQUITY;
use crate::backtest::record::{DailyRecord, Signal};

/// Check that a record's position is the previous record's signal.
///
/// `previous` is `None` for the first record, whose position must be flat.
#[must_use]
pub fn validate_position_lag(previous: Option<&DailyRecord>, current: &DailyRecord) -> ValidationResult {
    let expected = previous.map_or(Signal::Flat, |p| p.signal);
    if current.position == expected {
        return ValidationResult::pass();
    }

    let error = match previous {
        None => LookAheadError::InitialPosition {
            date: current.date,
            position: current.position,
        },
        Some(_) => LookAheadError::PositionNotLagged {
            date: current.date,
            position: current.position,
            expected,
        },
    };
    ValidationResult::fail(error)
}

/// Check that `trade_flag` marks exactly the position changes.
#[must_use]
pub fn validate_trade_flag(previous: Option<&DailyRecord>, current: &DailyRecord) -> ValidationResult {
    let prior_position = previous.map_or(Signal::Flat, |p| p.position);
    let changed = current.position != prior_position;
    if current.trade_flag == changed {
        return ValidationResult::pass();
    }
    ValidationResult::fail(LookAheadError::TradeFlagMismatch {
        date: current.date,
        flag: current.trade_flag,
        changed,
    })
}

/// Check the compounding step from the previous equity.
#[must_use]
pub fn validate_equity_step(
    previous: Option<&DailyRecord>,
    current: &DailyRecord,
    tolerance: f64,
) -> ValidationResult {
    let prior_equity = previous.map_or(INITIAL_EQUITY, |p| p.equity_curve);
    let expected = prior_equity * (1.0 + current.strategy_return);
    let scale = expected.abs().max(1.0);

    let result = if (current.equity_curve - expected).abs() <= tolerance * scale {
        ValidationResult::pass()
    } else {
        ValidationResult::fail(LookAheadError::EquityMismatch {
            date: current.date,
            expected,
            actual: current.equity_curve,
        })
    };

    if current.equity_curve <= 0.0 {
        return result.with_warning(format!(
            "equity on {} is {}, the strategy is wiped out",
            current.date, current.equity_curve
        ));
    }
    result
}
