//! Backtest configuration types.
//!
//! Every variation point of the pipeline is an explicit field here and is
//! threaded through each component call.

use serde::{Deserialize, Serialize};

use super::metrics::DAYS_PER_YEAR;
use crate::error::BacktestError;

/// Rounding applied to price-neutral TVL before its change is measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RoundingPolicy {
    /// Round to 2 decimal places.
    #[default]
    Round2,
    /// Round to 4 significant digits, then truncate to an integer.
    Round4Sig,
}

/// How divergence is turned into a trading signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SignalPolicy {
    /// Directional agreement plus a magnitude threshold on divergence.
    #[default]
    Threshold,
    /// Sign of `pntvl_change - eth_return`, no threshold.
    Comparison,
}

/// Which divergence measure the threshold policy compares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DivergenceMode {
    /// Raw `eth_return - pntvl_change`.
    #[default]
    Raw,
    /// Rolling z-score of the raw divergence.
    ZScore,
}

/// Signal construction parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyConfig {
    /// Rounding applied to price-neutral TVL.
    #[serde(default)]
    pub rounding: RoundingPolicy,
    /// Signal policy.
    #[serde(default)]
    pub signal_policy: SignalPolicy,
    /// Divergence measure used by the threshold policy.
    #[serde(default)]
    pub divergence_mode: DivergenceMode,
    /// Rolling window for the z-score (records, inclusive of current).
    #[serde(default = "default_window")]
    pub window: usize,
    /// Divergence threshold (raw units or standard deviations).
    #[serde(default = "default_threshold")]
    pub threshold: f64,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            rounding: RoundingPolicy::default(),
            signal_policy: SignalPolicy::default(),
            divergence_mode: DivergenceMode::default(),
            window: default_window(),
            threshold: default_threshold(),
        }
    }
}

const fn default_window() -> usize {
    20
}

const fn default_threshold() -> f64 {
    0.01
}

/// Fixed transaction costs charged whenever the position changes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostConfig {
    /// Exchange fee as a fraction of notional (0.0005 = 5 bps).
    #[serde(default = "default_fee_rate")]
    pub fee_rate: f64,
    /// Slippage as a fraction of notional.
    #[serde(default = "default_slippage_rate")]
    pub slippage_rate: f64,
}

impl CostConfig {
    /// Total cost charged on a day the position changes.
    #[must_use]
    pub fn per_trade(&self) -> f64 {
        self.fee_rate + self.slippage_rate
    }
}

impl Default for CostConfig {
    fn default() -> Self {
        Self {
            fee_rate: default_fee_rate(),
            slippage_rate: default_slippage_rate(),
        }
    }
}

const fn default_fee_rate() -> f64 {
    0.0005
}

const fn default_slippage_rate() -> f64 {
    0.005
}

/// Performance analysis parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Periods per year (365 for daily crypto data).
    #[serde(default = "default_annualization")]
    pub annualization: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            annualization: default_annualization(),
        }
    }
}

const fn default_annualization() -> f64 {
    DAYS_PER_YEAR
}

/// Complete backtest configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BacktestConfig {
    /// Signal construction.
    #[serde(default)]
    pub strategy: StrategyConfig,
    /// Transaction costs.
    #[serde(default)]
    pub costs: CostConfig,
    /// Performance analysis.
    #[serde(default)]
    pub analysis: AnalysisConfig,
}

impl BacktestConfig {
    /// Configuration for one sweep cell: threshold policy on the z-score
    /// with the given window and threshold, everything else unchanged.
    #[must_use]
    pub fn for_sweep_cell(&self, window: usize, threshold: f64) -> Self {
        let mut cell = self.clone();
        cell.strategy.signal_policy = SignalPolicy::Threshold;
        cell.strategy.divergence_mode = DivergenceMode::ZScore;
        cell.strategy.window = window;
        cell.strategy.threshold = threshold;
        cell
    }

    /// Check every parameter is inside its domain.
    ///
    /// # Errors
    ///
    /// Returns [`BacktestError::InvalidParameter`] naming the first bad value.
    pub fn validate(&self) -> Result<(), BacktestError> {
        validate_window(self.strategy.window)?;
        validate_threshold(self.strategy.threshold)?;

        for (name, rate) in [
            ("fee_rate", self.costs.fee_rate),
            ("slippage_rate", self.costs.slippage_rate),
        ] {
            if !rate.is_finite() || !(0.0..1.0).contains(&rate) {
                return Err(BacktestError::invalid_parameter(
                    name,
                    format!("{rate} must be in [0, 1)"),
                ));
            }
        }

        let annualization = self.analysis.annualization;
        if !annualization.is_finite() || annualization <= 0.0 {
            return Err(BacktestError::invalid_parameter(
                "annualization",
                format!("{annualization} must be positive"),
            ));
        }

        Ok(())
    }
}

/// A z-score window needs at least two observations for a sample deviation.
///
/// # Errors
///
/// Returns [`BacktestError::InvalidParameter`] if `window < 2`.
pub fn validate_window(window: usize) -> Result<(), BacktestError> {
    if window < 2 {
        return Err(BacktestError::invalid_parameter(
            "window",
            format!("{window} must be at least 2"),
        ));
    }
    Ok(())
}

/// Thresholds are magnitudes: finite and non-negative.
///
/// # Errors
///
/// Returns [`BacktestError::InvalidParameter`] if `threshold` is negative or
/// not finite.
pub fn validate_threshold(threshold: f64) -> Result<(), BacktestError> {
    if !threshold.is_finite() || threshold < 0.0 {
        return Err(BacktestError::invalid_parameter(
            "threshold",
            format!("{threshold} must be a finite non-negative number"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = BacktestConfig::default();

        assert_eq!(config.strategy.rounding, RoundingPolicy::Round2);
        assert_eq!(config.strategy.signal_policy, SignalPolicy::Threshold);
        assert_eq!(config.strategy.divergence_mode, DivergenceMode::Raw);
        assert_eq!(config.strategy.window, 20);
        assert!((config.costs.per_trade() - 0.0055).abs() < 1e-12);
        assert!((config.analysis.annualization - 365.0).abs() < f64::EPSILON);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_policy_names_deserialize() {
        let strategy: StrategyConfig = match serde_json::from_str(
            r#"{"rounding":"round4sig","signal_policy":"comparison","divergence_mode":"zscore"}"#,
        ) {
            Ok(s) => s,
            Err(e) => panic!("strategy should parse: {e}"),
        };
        assert_eq!(strategy.rounding, RoundingPolicy::Round4Sig);
        assert_eq!(strategy.signal_policy, SignalPolicy::Comparison);
        assert_eq!(strategy.divergence_mode, DivergenceMode::ZScore);
        assert_eq!(strategy.window, 20);
    }

    #[test]
    fn test_sweep_cell_forces_zscore_threshold_policy() {
        let mut base = BacktestConfig::default();
        base.strategy.signal_policy = SignalPolicy::Comparison;
        base.costs.fee_rate = 0.001;

        let cell = base.for_sweep_cell(30, 1.5);
        assert_eq!(cell.strategy.signal_policy, SignalPolicy::Threshold);
        assert_eq!(cell.strategy.divergence_mode, DivergenceMode::ZScore);
        assert_eq!(cell.strategy.window, 30);
        assert!((cell.strategy.threshold - 1.5).abs() < f64::EPSILON);
        assert!((cell.costs.fee_rate - 0.001).abs() < f64::EPSILON);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = BacktestConfig::default();
        config.strategy.window = 1;
        assert!(matches!(
            config.validate(),
            Err(BacktestError::InvalidParameter { name: "window", .. })
        ));

        let mut config = BacktestConfig::default();
        config.strategy.threshold = f64::NAN;
        assert!(config.validate().is_err());

        let mut config = BacktestConfig::default();
        config.costs.slippage_rate = 1.0;
        assert!(matches!(
            config.validate(),
            Err(BacktestError::InvalidParameter {
                name: "slippage_rate",
                ..
            })
        ));

        let mut config = BacktestConfig::default();
        config.analysis.annualization = 0.0;
        assert!(config.validate().is_err());
    }
}
