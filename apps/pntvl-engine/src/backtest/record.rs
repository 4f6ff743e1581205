//! Per-day record types produced by the pipeline.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Discrete trading signal.
///
/// Serialized as the integers `-1`, `0`, `1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "i8", try_from = "i8")]
pub enum Signal {
    /// Short one unit.
    Short,
    /// No exposure.
    #[default]
    Flat,
    /// Long one unit.
    Long,
}

impl Signal {
    /// Integer form (-1, 0, 1).
    #[must_use]
    pub const fn as_i8(self) -> i8 {
        match self {
            Self::Short => -1,
            Self::Flat => 0,
            Self::Long => 1,
        }
    }

    /// Exposure multiplier applied to the asset return.
    #[must_use]
    pub const fn exposure(self) -> f64 {
        match self {
            Self::Short => -1.0,
            Self::Flat => 0.0,
            Self::Long => 1.0,
        }
    }
}

impl From<Signal> for i8 {
    fn from(signal: Signal) -> Self {
        signal.as_i8()
    }
}

impl TryFrom<i8> for Signal {
    type Error = String;

    fn try_from(value: i8) -> Result<Self, Self::Error> {
        match value {
            -1 => Ok(Self::Short),
            0 => Ok(Self::Flat),
            1 => Ok(Self::Long),
            other => Err(format!("signal must be -1, 0 or 1, got {other}")),
        }
    }
}

/// Window- and threshold-independent columns for one joined date.
///
/// Built once per input pair and rounding policy, then shared read-only by
/// every backtest run and sweep cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaseRecord {
    /// Calendar date.
    pub date: NaiveDate,
    /// Total value locked in USD.
    pub tvl_usd: f64,
    /// Asset close price.
    pub eth_price: f64,
    /// `tvl_usd / eth_price`.
    pub price_neutral_tvl: f64,
    /// Price-neutral TVL after the configured rounding.
    pub price_neutral_tvl_rounded: f64,
    /// Simple return of the asset price; `None` for the first record.
    pub eth_return: Option<f64>,
    /// Simple change of the rounded metric; `None` for the first record.
    pub pntvl_change: Option<f64>,
}

/// One fully simulated day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyRecord {
    /// Calendar date.
    pub date: NaiveDate,
    /// Total value locked in USD.
    pub tvl_usd: f64,
    /// Asset close price.
    pub eth_price: f64,
    /// `tvl_usd / eth_price`.
    pub price_neutral_tvl: f64,
    /// Price-neutral TVL after the configured rounding.
    pub price_neutral_tvl_rounded: f64,
    /// Simple return of the asset price.
    pub eth_return: Option<f64>,
    /// Simple change of the rounded metric.
    pub pntvl_change: Option<f64>,
    /// `eth_return - pntvl_change`.
    pub divergence_strength: Option<f64>,
    /// Rolling z-score of the divergence (z-score mode only).
    pub divergence_z: Option<f64>,
    /// Signal decided at this day's close.
    pub signal: Signal,
    /// Position held over this day (previous day's signal).
    pub position: Signal,
    /// Net return of the strategy for this day.
    pub strategy_return: f64,
    /// Whether the position changed from the previous day.
    pub trade_flag: bool,
    /// Cost charged for the position change.
    pub trade_cost: f64,
    /// Compounded equity, starting from 1.0 before the first record.
    pub equity_curve: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signal_integer_round_trip() {
        for signal in [Signal::Short, Signal::Flat, Signal::Long] {
            assert_eq!(Signal::try_from(signal.as_i8()), Ok(signal));
        }
        assert!(Signal::try_from(2).is_err());
    }

    #[test]
    fn test_signal_serializes_as_integer() {
        let json = match serde_json::to_string(&[Signal::Short, Signal::Flat, Signal::Long]) {
            Ok(j) => j,
            Err(e) => panic!("serialization failed: {e}"),
        };
        assert_eq!(json, "[-1,0,1]");
    }

    #[test]
    fn test_exposure() {
        assert!((Signal::Long.exposure() - 1.0).abs() < f64::EPSILON);
        assert!((Signal::Short.exposure() + 1.0).abs() < f64::EPSILON);
        assert!(Signal::Flat.exposure().abs() < f64::EPSILON);
    }
}
