//! Look-ahead bias checker over a finished record sequence.

use tracing::{debug, warn};

use super::types::{LookAheadConfig, LookAheadError, LookAheadSummary, ValidationResult};
use super::validation::{validate_equity_step, validate_position_lag, validate_trade_flag};
use crate::backtest::record::DailyRecord;

/// Audits simulated records against the T+1 law and the equity recurrence.
#[derive(Debug)]
pub struct LookAheadChecker {
    config: LookAheadConfig,
    violations: Vec<LookAheadError>,
    warnings: Vec<String>,
    records_checked: usize,
    valid_records: usize,
}

impl LookAheadChecker {
    /// Create a new look-ahead bias checker.
    #[must_use]
    pub const fn new(config: LookAheadConfig) -> Self {
        Self {
            config,
            violations: Vec::new(),
            warnings: Vec::new(),
            records_checked: 0,
            valid_records: 0,
        }
    }

    /// Create with default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(LookAheadConfig::default())
    }

    /// Validate one record given its predecessor, and record the outcome.
    pub fn validate_record(
        &mut self,
        previous: Option<&DailyRecord>,
        current: &DailyRecord,
    ) -> ValidationResult {
        let result = validate_position_lag(previous, current)
            .merge(validate_trade_flag(previous, current))
            .merge(validate_equity_step(
                previous,
                current,
                self.config.equity_tolerance,
            ));

        self.records_checked += 1;
        if result.valid {
            self.valid_records += 1;
        } else {
            for error in &result.errors {
                warn!(error = %error, "Look-ahead violation");
            }
        }
        self.violations.extend(result.errors.iter().cloned());
        self.warnings.extend(result.warnings.iter().cloned());

        result
    }

    /// Audit a whole sequence and return the summary.
    pub fn audit(&mut self, records: &[DailyRecord]) -> LookAheadSummary {
        let mut previous: Option<&DailyRecord> = None;
        for record in records {
            let _ = self.validate_record(previous, record);
            previous = Some(record);
        }

        let summary = self.summary();
        debug!(%summary, "Look-ahead audit complete");
        summary
    }

    /// Violations found so far.
    #[must_use]
    pub fn violations(&self) -> &[LookAheadError] {
        &self.violations
    }

    /// Warnings issued so far.
    #[must_use]
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Check if any violations were found.
    #[must_use]
    pub const fn has_violations(&self) -> bool {
        !self.violations.is_empty()
    }

    /// Generate a summary report.
    #[must_use]
    pub const fn summary(&self) -> LookAheadSummary {
        LookAheadSummary {
            records_checked: self.records_checked,
            valid_records: self.valid_records,
            violations: self.violations.len(),
            warnings: self.warnings.len(),
        }
    }
}
