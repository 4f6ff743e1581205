//! Divergence between the asset return and the price-neutral TVL change.
//!
//! Positive divergence means price rose faster than price-neutral deposits;
//! negative means deposits grew while price lagged. In z-score mode the raw
//! divergence is normalized against its own trailing window.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use super::config::DivergenceMode;
use super::metrics::math::{mean, std_dev};
use super::record::BaseRecord;

/// Divergence columns for one record.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DivergencePoint {
    /// `eth_return - pntvl_change`.
    pub strength: Option<f64>,
    /// Rolling z-score of `strength`; always `None` in raw mode.
    pub z: Option<f64>,
}

impl DivergencePoint {
    /// The value the threshold policy compares for the given mode.
    #[must_use]
    pub const fn metric(&self, mode: DivergenceMode) -> Option<f64> {
        match mode {
            DivergenceMode::Raw => self.strength,
            DivergenceMode::ZScore => self.z,
        }
    }
}

/// `eth_return - pntvl_change`, undefined if either input is.
#[must_use]
pub fn divergence_strength(eth_return: Option<f64>, pntvl_change: Option<f64>) -> Option<f64> {
    let strength = eth_return? - pntvl_change?;
    strength.is_finite().then_some(strength)
}

/// Trailing z-score over a fixed-size window, fed one value at a time.
///
/// The window includes the current value. An undefined input empties the
/// window, so a z-score is only produced once `window` consecutive defined
/// values have been seen. A window with zero variance yields `None`.
#[derive(Debug, Clone)]
pub struct RollingZScore {
    window: usize,
    values: VecDeque<f64>,
}

impl RollingZScore {
    /// Create an accumulator for the given window length.
    #[must_use]
    pub fn new(window: usize) -> Self {
        Self {
            window,
            values: VecDeque::with_capacity(window),
        }
    }

    /// Whether the window currently holds `window` values.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.window > 0 && self.values.len() == self.window
    }

    /// Push the next observation and return its z-score, if defined.
    pub fn push(&mut self, value: Option<f64>) -> Option<f64> {
        let Some(value) = value else {
            self.values.clear();
            return None;
        };
        if self.window == 0 {
            return None;
        }

        if self.values.len() == self.window {
            self.values.pop_front();
        }
        self.values.push_back(value);

        if !self.is_full() {
            return None;
        }

        let window = self.values.make_contiguous();
        let avg = mean(window)?;
        let std = std_dev(window)?;
        if std == 0.0 {
            return None;
        }

        let z = (value - avg) / std;
        z.is_finite().then_some(z)
    }
}

/// Compute divergence (and, in z-score mode, its rolling z) for every record.
#[must_use]
pub fn compute_divergence(
    records: &[BaseRecord],
    mode: DivergenceMode,
    window: usize,
) -> Vec<DivergencePoint> {
    match mode {
        DivergenceMode::Raw => records
            .iter()
            .map(|r| DivergencePoint {
                strength: divergence_strength(r.eth_return, r.pntvl_change),
                z: None,
            })
            .collect(),
        DivergenceMode::ZScore => {
            let mut rolling = RollingZScore::new(window);
            records
                .iter()
                .map(|r| {
                    let strength = divergence_strength(r.eth_return, r.pntvl_change);
                    DivergencePoint {
                        strength,
                        z: rolling.push(strength),
                    }
                })
                .collect()
        }
    }
}
