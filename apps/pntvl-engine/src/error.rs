//! Error taxonomy for the backtest pipeline.
//!
//! Structural problems with the input series are fatal and surface as
//! [`BacktestError`], naming the offending date or value. Statistical
//! degeneracies (rolling warm-up, zero variance, no nonzero returns) are
//! not errors: they appear as `None` in the affected record fields or
//! summary metrics so callers can tell "no value" apart from zero.

use chrono::NaiveDate;
use thiserror::Error;

/// Series label used in diagnostics.
pub const TVL_SERIES: &str = "tvl";
/// Series label used in diagnostics.
pub const PRICE_SERIES: &str = "price";
/// Label for the inner join of the two input series.
pub const JOINED_SERIES: &str = "joined";

/// Fatal errors raised while building or simulating a backtest.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum BacktestError {
    /// An input series is empty, or the join left no overlapping dates.
    #[error("MISSING_DATA: {series} series has no rows to work with")]
    MissingData {
        /// Which series was empty.
        series: &'static str,
    },

    /// The same calendar date appears twice in one input series.
    #[error("DUPLICATE_DATE: {series} series contains {date} more than once")]
    DuplicateDate {
        /// Which series held the duplicate.
        series: &'static str,
        /// The repeated date.
        date: NaiveDate,
    },

    /// Asset price is zero, negative, or not finite.
    #[error("INVALID_PRICE: close price {price} on {date} must be a positive finite number")]
    InvalidPrice {
        /// Date of the offending row.
        date: NaiveDate,
        /// The rejected price.
        price: f64,
    },

    /// TVL is negative or not finite.
    #[error("INVALID_TVL: TVL {value} on {date} must be a non-negative finite number")]
    InvalidTvl {
        /// Date of the offending row.
        date: NaiveDate,
        /// The rejected TVL value.
        value: f64,
    },

    /// A configuration value is outside its valid domain.
    #[error("INVALID_PARAMETER: {name}: {message}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// What is wrong with it.
        message: String,
    },
}

impl BacktestError {
    /// Shorthand for an [`BacktestError::InvalidParameter`].
    pub fn invalid_parameter(name: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            message: message.into(),
        }
    }
}
