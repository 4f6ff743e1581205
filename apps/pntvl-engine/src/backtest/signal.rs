//! Signal generation from divergence and directional conditions.

use super::config::{SignalPolicy, StrategyConfig};
use super::divergence::DivergencePoint;
use super::record::{BaseRecord, Signal};

/// Inputs the signal policies read for one record.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SignalInputs {
    /// Asset return for the day.
    pub eth_return: Option<f64>,
    /// Change of the rounded price-neutral TVL.
    pub pntvl_change: Option<f64>,
    /// Raw divergence or its z-score, per the divergence mode.
    pub metric: Option<f64>,
}

impl SignalInputs {
    /// Gather the inputs for one record under the given divergence mode.
    #[must_use]
    pub const fn from_record(
        record: &BaseRecord,
        point: &DivergencePoint,
        config: &StrategyConfig,
    ) -> Self {
        Self {
            eth_return: record.eth_return,
            pntvl_change: record.pntvl_change,
            metric: point.metric(config.divergence_mode),
        }
    }
}

/// Threshold policy.
///
/// Long when the price fell, price-neutral TVL grew, and the metric is below
/// `-threshold`. Short in the mirrored case. Flat otherwise, including when
/// any input is undefined.
#[must_use]
pub fn threshold_signal(inputs: SignalInputs, threshold: f64) -> Signal {
    let (Some(ret), Some(change), Some(metric)) =
        (inputs.eth_return, inputs.pntvl_change, inputs.metric)
    else {
        return Signal::Flat;
    };

    if ret < 0.0 && change > 0.0 && metric < -threshold {
        Signal::Long
    } else if ret > 0.0 && change < 0.0 && metric > threshold {
        Signal::Short
    } else {
        Signal::Flat
    }
}

/// Comparison policy: long when price-neutral TVL outgrew the price, short
/// when it lagged, flat on a tie or undefined input.
#[must_use]
pub fn comparison_signal(inputs: SignalInputs) -> Signal {
    let (Some(ret), Some(change)) = (inputs.eth_return, inputs.pntvl_change) else {
        return Signal::Flat;
    };

    if change > ret {
        Signal::Long
    } else if change < ret {
        Signal::Short
    } else {
        Signal::Flat
    }
}

/// Apply the configured policy to one record.
#[must_use]
pub fn generate_signal(inputs: SignalInputs, config: &StrategyConfig) -> Signal {
    match config.signal_policy {
        SignalPolicy::Threshold => threshold_signal(inputs, config.threshold),
        SignalPolicy::Comparison => comparison_signal(inputs),
    }
}

/// Generate the signal for every record.
///
/// `points` must be index-aligned with `records`; extra entries on either
/// side are ignored.
#[must_use]
pub fn generate_signals(
    records: &[BaseRecord],
    points: &[DivergencePoint],
    config: &StrategyConfig,
) -> Vec<Signal> {
    records
        .iter()
        .zip(points)
        .map(|(record, point)| generate_signal(SignalInputs::from_record(record, point, config), config))
        .collect()
}
