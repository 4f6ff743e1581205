//! Long/short markers for a price chart overlay.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::backtest::{DailyRecord, Signal};

/// A non-flat signal placed on the close price of the day it was decided.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SignalMarker {
    /// Signal date.
    pub date: NaiveDate,
    /// Close price on that date.
    pub price: f64,
    /// Long or short.
    pub signal: Signal,
}

/// Collect a marker for every long or short signal, in date order.
#[must_use]
pub fn signal_markers(records: &[DailyRecord]) -> Vec<SignalMarker> {
    records
        .iter()
        .filter(|r| r.signal != Signal::Flat)
        .map(|r| SignalMarker {
            date: r.date,
            price: r.eth_price,
            signal: r.signal,
        })
        .collect()
}
