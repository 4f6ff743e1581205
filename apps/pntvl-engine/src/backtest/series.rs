//! Inner join of the TVL and close-price series on calendar date.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{BacktestError, JOINED_SERIES, PRICE_SERIES, TVL_SERIES};

/// One observation of a daily series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DatedValue {
    /// Calendar date (time-of-day already discarded).
    pub date: NaiveDate,
    /// Observed value.
    pub value: f64,
}

impl DatedValue {
    /// Create an observation.
    #[must_use]
    pub const fn new(date: NaiveDate, value: f64) -> Self {
        Self { date, value }
    }
}

/// A date present in both input series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AlignedRow {
    /// Calendar date.
    pub date: NaiveDate,
    /// Total value locked in USD.
    pub tvl_usd: f64,
    /// Asset close price.
    pub eth_price: f64,
}

/// Inner-join two daily series on exact date equality.
///
/// Inputs may arrive in any order; the output is ascending by date with one
/// row per date present in both.
///
/// # Errors
///
/// - [`BacktestError::MissingData`] if either input or the join is empty.
/// - [`BacktestError::DuplicateDate`] if a date repeats within one input.
pub fn align_series(
    tvl: &[DatedValue],
    prices: &[DatedValue],
) -> Result<Vec<AlignedRow>, BacktestError> {
    let tvl_by_date = index_by_date(tvl, TVL_SERIES)?;
    let price_by_date = index_by_date(prices, PRICE_SERIES)?;

    let rows: Vec<AlignedRow> = tvl_by_date
        .iter()
        .filter_map(|(date, tvl_usd)| {
            price_by_date.get(date).map(|eth_price| AlignedRow {
                date: *date,
                tvl_usd: *tvl_usd,
                eth_price: *eth_price,
            })
        })
        .collect();

    debug!(
        tvl_rows = tvl_by_date.len(),
        price_rows = price_by_date.len(),
        joined_rows = rows.len(),
        "Aligned TVL and price series"
    );

    if rows.is_empty() {
        return Err(BacktestError::MissingData {
            series: JOINED_SERIES,
        });
    }

    Ok(rows)
}

fn index_by_date(
    values: &[DatedValue],
    series: &'static str,
) -> Result<BTreeMap<NaiveDate, f64>, BacktestError> {
    if values.is_empty() {
        return Err(BacktestError::MissingData { series });
    }

    let mut by_date = BTreeMap::new();
    for observation in values {
        if by_date.insert(observation.date, observation.value).is_some() {
            return Err(BacktestError::DuplicateDate {
                series,
                date: observation.date,
            });
        }
    }
    Ok(by_date)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        let Some(date) = NaiveDate::from_ymd_opt(2024, 1, d) else {
            panic!("invalid test date");
        };
        date
    }

    #[test]
    fn test_inner_join_drops_unmatched_dates() {
        let tvl = vec![
            DatedValue::new(day(1), 1000.0),
            DatedValue::new(day(2), 1100.0),
            DatedValue::new(day(4), 1200.0),
        ];
        let prices = vec![
            DatedValue::new(day(2), 110.0),
            DatedValue::new(day(3), 105.0),
            DatedValue::new(day(4), 120.0),
        ];

        let Ok(rows) = align_series(&tvl, &prices) else {
            panic!("join should succeed");
        };
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].date, day(2));
        assert!((rows[0].tvl_usd - 1100.0).abs() < f64::EPSILON);
        assert!((rows[1].eth_price - 120.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_unsorted_inputs_produce_ascending_rows() {
        let tvl = vec![
            DatedValue::new(day(3), 3.0),
            DatedValue::new(day(1), 1.0),
            DatedValue::new(day(2), 2.0),
        ];
        let prices = vec![
            DatedValue::new(day(2), 20.0),
            DatedValue::new(day(3), 30.0),
            DatedValue::new(day(1), 10.0),
        ];

        let Ok(rows) = align_series(&tvl, &prices) else {
            panic!("join should succeed");
        };
        let dates: Vec<NaiveDate> = rows.iter().map(|r| r.date).collect();
        assert_eq!(dates, vec![day(1), day(2), day(3)]);
    }

    #[test]
    fn test_empty_join_is_missing_data() {
        let tvl = vec![DatedValue::new(day(1), 1.0)];
        let prices = vec![DatedValue::new(day(2), 1.0)];

        assert_eq!(
            align_series(&tvl, &prices),
            Err(BacktestError::MissingData {
                series: JOINED_SERIES
            })
        );
    }

    #[test]
    fn test_empty_input_is_missing_data() {
        let prices = vec![DatedValue::new(day(2), 1.0)];
        assert_eq!(
            align_series(&[], &prices),
            Err(BacktestError::MissingData { series: TVL_SERIES })
        );
    }

    #[test]
    fn test_duplicate_date_is_rejected() {
        let tvl = vec![DatedValue::new(day(1), 1.0)];
        let prices = vec![DatedValue::new(day(1), 1.0), DatedValue::new(day(1), 2.0)];

        assert_eq!(
            align_series(&tvl, &prices),
            Err(BacktestError::DuplicateDate {
                series: PRICE_SERIES,
                date: day(1)
            })
        );
    }
}
