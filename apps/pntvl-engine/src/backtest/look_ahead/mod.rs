//! Look-ahead bias detection for simulated records.
//!
//! A record sequence is free of look-ahead when every position equals the
//! previous day's signal (flat on the first day), trade flags mark exactly
//! the position changes, and equity compounds strictly from the prior day.
//! The pipeline audits every single-configuration run with this checker.

mod checker;
mod types;
mod validation;

pub use checker::LookAheadChecker;
pub use types::{LookAheadConfig, LookAheadError, LookAheadSummary, ValidationResult};
pub use validation::{validate_equity_step, validate_position_lag, validate_trade_flag};

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::backtest::record::Signal;

    #[test]
    fn test_look_ahead_error_display() {
        let Some(date) = NaiveDate::from_ymd_opt(2024, 6, 1) else {
            panic!("invalid test date");
        };
        let error = LookAheadError::PositionNotLagged {
            date,
            position: Signal::Long,
            expected: Signal::Flat,
        };
        let display = format!("{error}");
        assert!(display.contains("SAME_DAY_SIGNAL"));
        assert!(display.contains("2024-06-01"));
    }

    #[test]
    fn test_look_ahead_summary_display() {
        let summary = LookAheadSummary {
            records_checked: 100,
            valid_records: 98,
            violations: 2,
            warnings: 5,
        };
        let display = format!("{summary}");
        assert!(display.contains("98/100"));
        assert!(display.contains("2 violations"));
        assert!(display.contains("5 warnings"));
    }

    #[test]
    fn test_validation_result_chaining() {
        let result = ValidationResult::pass()
            .with_warning("Warning 1")
            .merge(ValidationResult::pass().with_warning("Warning 2"));
        assert!(result.valid);
        assert!(result.has_warnings());
        assert!(!ValidationResult::pass().has_warnings());
        assert_eq!(result.warnings.len(), 2);
    }
}
