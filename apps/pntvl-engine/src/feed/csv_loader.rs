//! CSV loader for the TVL and close-price exports.
//!
//! Both files are headed CSV. Only the configured date and value columns are
//! read; every other column is ignored. Timestamps are cut down to their
//! calendar date.

use std::fs::File;
use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use thiserror::Error;
use tracing::{debug, info};

use crate::backtest::DatedValue;
use crate::config::DataConfig;

/// Unix timestamps at or above this magnitude are read as milliseconds.
const MILLIS_CUTOFF: i64 = 10_000_000_000;

const NAIVE_DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

/// Errors raised while reading an input CSV.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The file could not be opened.
    #[error("OPEN_FAILED: cannot open '{path}': {source}")]
    Open {
        /// File path.
        path: String,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Malformed CSV (ragged rows, bad UTF-8, IO failure mid-read).
    #[error("CSV_ERROR: {0}")]
    Csv(#[from] csv::Error),

    /// A configured column is absent from the header row.
    #[error("MISSING_COLUMN: '{path}' has no column named '{column}'")]
    MissingColumn {
        /// File path.
        path: String,
        /// Column that was looked up.
        column: String,
    },

    /// A date cell matches none of the accepted formats.
    #[error("INVALID_DATE: '{path}' line {line}: cannot parse '{value}' as a date")]
    InvalidDate {
        /// File path.
        path: String,
        /// 1-based line number in the file.
        line: u64,
        /// Raw cell content.
        value: String,
    },

    /// A value cell is not a number.
    #[error("INVALID_NUMBER: '{path}' line {line}: column '{column}' holds '{value}'")]
    InvalidNumber {
        /// File path.
        path: String,
        /// 1-based line number in the file.
        line: u64,
        /// Column name.
        column: String,
        /// Raw cell content.
        value: String,
    },
}

/// Both input series, as read from disk.
#[derive(Debug, Clone, PartialEq)]
pub struct InputSeries {
    /// Daily TVL in USD.
    pub tvl: Vec<DatedValue>,
    /// Daily close price.
    pub prices: Vec<DatedValue>,
}

/// Load both series named by the data configuration.
///
/// # Errors
///
/// Returns the first [`LoadError`] hit in either file.
pub fn load_inputs(config: &DataConfig) -> Result<InputSeries, LoadError> {
    let tvl = load_tvl_csv(
        &config.tvl_path,
        &config.tvl_date_column,
        &config.tvl_value_column,
    )?;
    let prices = load_price_csv(
        &config.price_path,
        &config.price_date_column,
        &config.price_close_column,
    )?;
    Ok(InputSeries { tvl, prices })
}

/// Load the daily TVL series.
///
/// # Errors
///
/// See [`LoadError`].
pub fn load_tvl_csv(
    path: impl AsRef<Path>,
    date_column: &str,
    value_column: &str,
) -> Result<Vec<DatedValue>, LoadError> {
    load_column(path.as_ref(), date_column, value_column, "tvl")
}

/// Load the daily close-price series.
///
/// # Errors
///
/// See [`LoadError`].
pub fn load_price_csv(
    path: impl AsRef<Path>,
    date_column: &str,
    close_column: &str,
) -> Result<Vec<DatedValue>, LoadError> {
    load_column(path.as_ref(), date_column, close_column, "price")
}

fn load_column(
    path: &Path,
    date_column: &str,
    value_column: &str,
    series: &'static str,
) -> Result<Vec<DatedValue>, LoadError> {
    let path_label = path.display().to_string();
    let file = File::open(path).map_err(|source| LoadError::Open {
        path: path_label.clone(),
        source,
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(file);

    let headers = reader.headers()?.clone();
    let column_index = |name: &str| {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| LoadError::MissingColumn {
                path: path_label.clone(),
                column: name.to_string(),
            })
    };
    let date_idx = column_index(date_column)?;
    let value_idx = column_index(value_column)?;

    let mut values = Vec::new();
    for result in reader.records() {
        let record = result?;
        let line = record.position().map_or(0, csv::Position::line);
        let raw_date = record.get(date_idx).unwrap_or_default();
        let raw_value = record.get(value_idx).unwrap_or_default();

        let date = parse_date(raw_date).ok_or_else(|| LoadError::InvalidDate {
            path: path_label.clone(),
            line,
            value: raw_date.to_string(),
        })?;
        let value = raw_value
            .parse::<f64>()
            .map_err(|_| LoadError::InvalidNumber {
                path: path_label.clone(),
                line,
                column: value_column.to_string(),
                value: raw_value.to_string(),
            })?;

        values.push(DatedValue::new(date, value));
    }

    debug!(path = %path_label, series, rows = values.len(), "Parsed CSV rows");
    info!(
        series,
        path = %path_label,
        rows = values.len(),
        first = ?values.first().map(|v| v.date),
        last = ?values.last().map(|v| v.date),
        "Loaded input series"
    );

    Ok(values)
}

/// Parse a date cell into a calendar date.
///
/// Accepts `YYYY-MM-DD`, `YYYY-MM-DD HH:MM:SS[.f]` (space or `T`), RFC 3339
/// (the date as written, offset ignored) and integer Unix timestamps in
/// seconds or milliseconds (UTC). Returns `None` for anything else.
#[must_use]
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(dt.date());
        }
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }

    let ts = raw.parse::<i64>().ok()?;
    let dt = if ts.abs() >= MILLIS_CUTOFF {
        DateTime::from_timestamp_millis(ts)?
    } else {
        DateTime::from_timestamp(ts, 0)?
    };
    Some(dt.date_naive())
}
