//! Price-neutral TVL and day-over-day changes.
//!
//! Dividing TVL by the asset price strips out price-driven moves in the
//! deposit figure. The rounded metric is what the change series is measured
//! on, so the rounding policy decides how much noise reaches the signal.

use tracing::debug;

use super::config::RoundingPolicy;
use super::record::BaseRecord;
use super::series::AlignedRow;
use crate::error::BacktestError;

impl RoundingPolicy {
    /// Apply this policy to a price-neutral TVL value.
    #[must_use]
    pub fn apply(self, value: f64) -> f64 {
        match self {
            Self::Round2 => round_2dp(value),
            Self::Round4Sig => round_4sig(value),
        }
    }
}

/// Round to 2 decimal places, ties to even on the scaled value.
#[must_use]
pub fn round_2dp(value: f64) -> f64 {
    round_to_places(value, 2)
}

/// Round to 4 significant digits and truncate to an integer.
///
/// The mantissa `x / 10^e` (with `e = floor(log10|x|)`) is rounded to 3
/// decimals, rescaled by `10^e`, and truncated toward zero, so
/// `123_456.0 -> 123_500.0`. Values below 1 in magnitude therefore truncate
/// to 0. Zero maps to exactly 0; non-finite input is returned unchanged.
///
/// The rescale works on the 4-digit integer mantissa so that it is exact in
/// decimal: `9.87 * 10^2` must truncate to 987, not to 986.
#[must_use]
pub fn round_4sig(value: f64) -> f64 {
    if value == 0.0 {
        return 0.0;
    }
    if !value.is_finite() {
        return value;
    }

    let exponent = value.abs().log10().floor() as i32;
    let digits = (value / 10f64.powi(exponent) * 1000.0).round_ties_even();
    let shift = exponent - 3;
    let result = if shift >= 0 {
        digits * 10f64.powi(shift)
    } else {
        (digits / 10f64.powi(-shift)).trunc()
    };

    // Collapse -0.0 so downstream equality and sign checks stay simple.
    if result == 0.0 { 0.0 } else { result }
}

fn round_to_places(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round_ties_even() / factor
}

/// Simple percentage change `(current - previous) / previous`.
///
/// `None` when the previous value is zero or the result is not finite.
#[must_use]
pub fn pct_change(previous: f64, current: f64) -> Option<f64> {
    if previous == 0.0 {
        return None;
    }
    let change = (current - previous) / previous;
    change.is_finite().then_some(change)
}

/// Build the window-independent columns for every joined row.
///
/// # Errors
///
/// - [`BacktestError::InvalidPrice`] for a zero, negative or non-finite price.
/// - [`BacktestError::InvalidTvl`] for a negative or non-finite TVL.
pub fn build_base_records(
    rows: &[AlignedRow],
    rounding: RoundingPolicy,
) -> Result<Vec<BaseRecord>, BacktestError> {
    let mut records: Vec<BaseRecord> = Vec::with_capacity(rows.len());

    for row in rows {
        if !row.eth_price.is_finite() || row.eth_price <= 0.0 {
            return Err(BacktestError::InvalidPrice {
                date: row.date,
                price: row.eth_price,
            });
        }
        if !row.tvl_usd.is_finite() || row.tvl_usd < 0.0 {
            return Err(BacktestError::InvalidTvl {
                date: row.date,
                value: row.tvl_usd,
            });
        }

        let price_neutral_tvl = row.tvl_usd / row.eth_price;
        let price_neutral_tvl_rounded = rounding.apply(price_neutral_tvl);

        let (eth_return, pntvl_change) = match records.last() {
            Some(prev) => (
                pct_change(prev.eth_price, row.eth_price),
                pct_change(prev.price_neutral_tvl_rounded, price_neutral_tvl_rounded),
            ),
            None => (None, None),
        };

        records.push(BaseRecord {
            date: row.date,
            tvl_usd: row.tvl_usd,
            eth_price: row.eth_price,
            price_neutral_tvl,
            price_neutral_tvl_rounded,
            eth_return,
            pntvl_change,
        });
    }

    debug!(
        records = records.len(),
        rounding = ?rounding,
        "Built price-neutral TVL metrics"
    );

    Ok(records)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use proptest::prelude::*;
    use test_case::test_case;

    use super::*;

    fn row(d: u32, tvl_usd: f64, eth_price: f64) -> AlignedRow {
        let Some(date) = NaiveDate::from_ymd_opt(2024, 1, d) else {
            panic!("invalid test date");
        };
        AlignedRow {
            date,
            tvl_usd,
            eth_price,
        }
    }

    #[test_case(123_456.0, 123_500.0 ; "six digits")]
    #[test_case(1234.0, 1234.0 ; "already four digits")]
    #[test_case(-123_456.0, -123_500.0 ; "negative keeps sign")]
    #[test_case(12.345, 12.0 ; "fractional part truncated")]
    #[test_case(987.894_819, 987.0 ; "exact decimal rescale")]
    #[test_case(221_129.32, 221_100.0 ; "rescale does not fall one short")]
    #[test_case(987_654_321.0, 987_700_000.0 ; "large magnitude")]
    #[test_case(0.5, 0.0 ; "below one truncates to zero")]
    #[test_case(0.0, 0.0 ; "zero")]
    fn test_round_4sig(input: f64, expected: f64) {
        assert_eq!(round_4sig(input), expected);
    }

    #[test_case(10.004, 10.0 ; "down")]
    #[test_case(10.006, 10.01 ; "up")]
    #[test_case(0.125, 0.12 ; "tie to even")]
    fn test_round_2dp(input: f64, expected: f64) {
        assert!((round_2dp(input) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_pct_change() {
        let Some(change) = pct_change(100.0, 110.0) else {
            panic!("change should be defined");
        };
        assert!((change - 0.10).abs() < 1e-12);
        assert_eq!(pct_change(0.0, 5.0), None);
    }

    #[test]
    fn test_price_neutral_scenario() {
        let rows = vec![
            row(1, 1000.0, 100.0),
            row(2, 1100.0, 110.0),
            row(3, 1050.0, 100.0),
        ];

        let Ok(records) = build_base_records(&rows, RoundingPolicy::Round2) else {
            panic!("metrics should build");
        };

        let pntvl: Vec<f64> = records.iter().map(|r| r.price_neutral_tvl_rounded).collect();
        assert_eq!(pntvl, vec![10.0, 10.0, 10.5]);

        assert_eq!(records[0].eth_return, None);
        assert_eq!(records[0].pntvl_change, None);

        let (Some(r1), Some(r2)) = (records[1].eth_return, records[2].eth_return) else {
            panic!("returns should be defined after the first record");
        };
        assert!((r1 - 0.10).abs() < 1e-9);
        assert!((r2 - (-0.090_909)).abs() < 1e-6);

        let (Some(c1), Some(c2)) = (records[1].pntvl_change, records[2].pntvl_change) else {
            panic!("changes should be defined after the first record");
        };
        assert!(c1.abs() < 1e-12);
        assert!((c2 - 0.05).abs() < 1e-12);
    }

    #[test]
    fn test_non_positive_price_is_rejected() {
        let rows = vec![row(1, 1000.0, 100.0), row(2, 1000.0, 0.0)];
        let Err(err) = build_base_records(&rows, RoundingPolicy::Round2) else {
            panic!("zero price must fail");
        };
        assert!(matches!(err, BacktestError::InvalidPrice { price, .. } if price == 0.0));
    }

    #[test]
    fn test_negative_tvl_is_rejected() {
        let rows = vec![row(1, -1.0, 100.0)];
        assert!(matches!(
            build_base_records(&rows, RoundingPolicy::Round4Sig),
            Err(BacktestError::InvalidTvl { .. })
        ));
    }

    #[test]
    fn test_zero_rounded_metric_gives_undefined_change() {
        // 0.5 / 1.0 rounds to 0 under round4sig, so the next change divides by zero.
        let rows = vec![row(1, 0.5, 1.0), row(2, 5000.0, 1.0)];
        let Ok(records) = build_base_records(&rows, RoundingPolicy::Round4Sig) else {
            panic!("metrics should build");
        };
        assert_eq!(records[1].pntvl_change, None);
        assert!(records[1].eth_return.is_some());
    }

    proptest! {
        #[test]
        fn prop_round_4sig_is_idempotent(x in prop_oneof![1.0f64..1e12, -1e12f64..-1.0]) {
            let once = round_4sig(x);
            prop_assert_eq!(round_4sig(once), once);
        }
    }
}
