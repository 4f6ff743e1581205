//! Type definitions for look-ahead bias detection.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::backtest::record::Signal;

/// Errors related to look-ahead bias detection.
#[derive(Debug, Error, Clone, PartialEq, Serialize, Deserialize)]
pub enum LookAheadError {
    /// The first record already holds a position.
    #[error("INITIAL_POSITION: first record on {date} holds {position:?}, expected Flat")]
    InitialPosition {
        /// Date of the first record.
        date: NaiveDate,
        /// Position found.
        position: Signal,
    },

    /// A position does not equal the previous day's signal.
    #[error(
        "SAME_DAY_SIGNAL: position {position:?} on {date} does not match prior signal {expected:?}"
    )]
    PositionNotLagged {
        /// Date of the offending record.
        date: NaiveDate,
        /// Position found.
        position: Signal,
        /// Signal of the previous record.
        expected: Signal,
    },

    /// `trade_flag` disagrees with the position change.
    #[error("TRADE_FLAG_MISMATCH: trade flag on {date} is {flag} but position change is {changed}")]
    TradeFlagMismatch {
        /// Date of the offending record.
        date: NaiveDate,
        /// Flag found.
        flag: bool,
        /// Whether the position actually changed.
        changed: bool,
    },

    /// Equity does not follow `equity[i-1] * (1 + strategy_return[i])`.
    #[error("EQUITY_MISMATCH: equity on {date} is {actual}, recurrence gives {expected}")]
    EquityMismatch {
        /// Date of the offending record.
        date: NaiveDate,
        /// Equity implied by the recurrence.
        expected: f64,
        /// Equity found.
        actual: f64,
    },
}

/// Result of a look-ahead bias validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    /// Whether the validation passed.
    pub valid: bool,
    /// Any errors found.
    pub errors: Vec<LookAheadError>,
    /// Warning messages for suspicious patterns.
    pub warnings: Vec<String>,
}

impl ValidationResult {
    /// Create a passing validation result.
    #[must_use]
    pub const fn pass() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Create a failing validation result.
    #[must_use]
    pub fn fail(error: LookAheadError) -> Self {
        Self {
            valid: false,
            errors: vec![error],
            warnings: Vec::new(),
        }
    }

    /// Fold another result into this one.
    #[must_use = "method returns modified result"]
    pub fn merge(mut self, other: Self) -> Self {
        self.valid &= other.valid;
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
        self
    }

    /// Add a warning to the result.
    #[must_use = "method returns modified result"]
    pub fn with_warning(mut self, warning: impl Into<String>) -> Self {
        self.warnings.push(warning.into());
        self
    }

    /// Check if there are any warnings.
    #[must_use]
    pub const fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Configuration for look-ahead bias detection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LookAheadConfig {
    /// Relative tolerance for the equity recurrence check.
    pub equity_tolerance: f64,
}

impl Default for LookAheadConfig {
    fn default() -> Self {
        Self {
            equity_tolerance: 1e-9,
        }
    }
}

/// Summary of look-ahead bias checking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LookAheadSummary {
    /// Records audited.
    pub records_checked: usize,
    /// Records with no violation.
    pub valid_records: usize,
    /// Number of violations found.
    pub violations: usize,
    /// Number of warnings issued.
    pub warnings: usize,
}

impl LookAheadSummary {
    /// Whether the audit found no violation.
    #[must_use]
    pub const fn is_clean(&self) -> bool {
        self.violations == 0
    }
}

impl std::fmt::Display for LookAheadSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Look-ahead check: {}/{} valid, {} violations, {} warnings",
            self.valid_records, self.records_checked, self.violations, self.warnings
        )
    }
}
