//! Configuration module for the backtest engine.
//!
//! Provides configuration loading, validation, and environment variable
//! interpolation for every stage of the pipeline.
//!
//! # Usage
//!
//! ```rust,ignore
//! use pntvl_engine::config::{Config, load_config};
//!
//! // Load from default path (config.yaml)
//! let config = load_config(None)?;
//!
//! // Load from custom path
//! let config = load_config(Some("custom/config.yaml"))?;
//!
//! // Access configuration values
//! println!("window: {}", config.strategy.window);
//! ```

mod data;
mod observability;
mod output;
mod sweep;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::backtest::{
    AnalysisConfig, BacktestConfig, CostConfig, StrategyConfig, SweepError, SweepGrid,
};

pub use data::DataConfig;
pub use observability::{LogFormat, LoggingConfig, ObservabilityConfig};
pub use output::OutputConfig;
pub use sweep::SweepConfig;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        /// Path to the config file.
        path: String,
        /// The underlying IO error.
        source: std::io::Error,
    },

    /// Failed to parse YAML configuration.
    #[error("Failed to parse config YAML: {0}")]
    ParseError(#[from] serde_yaml_bw::Error),

    /// Configuration validation failed.
    #[error("Config validation failed: {0}")]
    ValidationError(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Input files.
    pub data: DataConfig,
    /// Signal construction.
    #[serde(default)]
    pub strategy: StrategyConfig,
    /// Transaction costs.
    #[serde(default)]
    pub costs: CostConfig,
    /// Performance analysis.
    #[serde(default)]
    pub analysis: AnalysisConfig,
    /// Parameter sweep.
    #[serde(default)]
    pub sweep: SweepConfig,
    /// Reports and exports.
    #[serde(default)]
    pub output: OutputConfig,
    /// Observability configuration.
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl Config {
    /// Backtest parameters for the single-configuration run.
    #[must_use]
    pub fn backtest(&self) -> BacktestConfig {
        BacktestConfig {
            strategy: self.strategy.clone(),
            costs: self.costs,
            analysis: self.analysis,
        }
    }

    /// Sweep grid from the configured axes.
    ///
    /// # Errors
    ///
    /// Returns [`SweepError`] for an empty axis or an invalid value.
    pub fn sweep_grid(&self) -> Result<SweepGrid, SweepError> {
        SweepGrid::builder()
            .windows(self.sweep.windows.iter().copied())
            .thresholds(self.sweep.thresholds.iter().copied())
            .build()
    }
}

// ============================================
// Configuration Loading
// ============================================

/// Load configuration from a YAML file with environment variable interpolation.
///
/// # Arguments
///
/// * `path` - Optional path to the config file. Defaults to "config.yaml".
///
/// # Errors
///
/// Returns a `ConfigError` if the file cannot be read, parsed, or validated.
pub fn load_config(path: Option<&str>) -> Result<Config, ConfigError> {
    let path = path.unwrap_or("config.yaml");

    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_string(),
        source: e,
    })?;

    load_config_from_string(&contents)
}

/// Load configuration from a YAML string (useful for testing).
///
/// # Errors
///
/// Returns a `ConfigError` if the YAML cannot be parsed or validated.
pub fn load_config_from_string(yaml: &str) -> Result<Config, ConfigError> {
    let interpolated = interpolate_env_vars(yaml);
    let config: Config = serde_yaml_bw::from_str(&interpolated)?;
    validate_config(&config)?;
    Ok(config)
}

/// Interpolate environment variables in a string.
///
/// Supports both `${VAR}` and `${VAR:-default}` syntax.
#[allow(clippy::expect_used)] // Regex is compile-time constant; expect() is safe here
fn interpolate_env_vars(input: &str) -> String {
    use std::sync::OnceLock;

    static ENV_VAR_REGEX: OnceLock<regex::Regex> = OnceLock::new();

    let re = ENV_VAR_REGEX.get_or_init(|| {
        regex::Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(?::-([^}]*))?\}")
            .expect("env var regex is valid")
    });

    re.replace_all(input, |cap: &regex::Captures<'_>| {
        let default_value = cap.get(2).map_or("", |m| m.as_str());
        match cap.get(1).map(|m| std::env::var(m.as_str())) {
            Some(Ok(v)) if !v.is_empty() => v,
            _ => default_value.to_string(),
        }
    })
    .into_owned()
}

/// Validate configuration values.
fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.data.tvl_path.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "data.tvl_path must not be empty".to_string(),
        ));
    }
    if config.data.price_path.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "data.price_path must not be empty".to_string(),
        ));
    }

    config
        .backtest()
        .validate()
        .map_err(|e| ConfigError::ValidationError(e.to_string()))?;

    if config.sweep.enabled {
        config
            .sweep_grid()
            .map_err(|e| ConfigError::ValidationError(format!("sweep: {e}")))?;
    }

    let level = &config.observability.logging.level;
    if tracing_subscriber::EnvFilter::try_new(level).is_err() {
        return Err(ConfigError::ValidationError(format!(
            "observability.logging.level '{level}' is not a valid filter"
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backtest::{DivergenceMode, RoundingPolicy, SignalPolicy};

    const MINIMAL: &str = r"
data:
  tvl_path: tvl.csv
  price_path: prices.csv
";

    #[test]
    fn test_load_minimal_config() {
        let config = match load_config_from_string(MINIMAL) {
            Ok(c) => c,
            Err(e) => panic!("should load minimal config: {e}"),
        };
        assert_eq!(config.data.tvl_date_column, "date");
        assert_eq!(config.data.price_close_column, "close");
        assert_eq!(config.strategy.rounding, RoundingPolicy::Round2);
        assert_eq!(config.strategy.window, 20);
        assert!((config.costs.slippage_rate - 0.005).abs() < f64::EPSILON);
        assert!(!config.sweep.enabled);
        assert_eq!(config.sweep.windows, vec![10, 20, 30, 60, 90]);
        assert_eq!(config.output.preview_rows, 5);
        assert_eq!(config.observability.logging.format, LogFormat::Pretty);
    }

    #[test]
    fn test_load_config_from_file() {
        use std::io::Write;

        let Ok(mut file) = tempfile::NamedTempFile::new() else {
            panic!("temp file");
        };
        if let Err(e) = file.write_all(MINIMAL.as_bytes()) {
            panic!("write temp file: {e}");
        }
        let Some(path) = file.path().to_str() else {
            panic!("temp path is not UTF-8");
        };

        let Ok(config) = load_config(Some(path)) else {
            panic!("config file should load");
        };
        assert_eq!(config.data.tvl_path, "tvl.csv");
    }

    #[test]
    fn test_missing_config_file() {
        assert!(matches!(
            load_config(Some("/nonexistent/pntvl/config.yaml")),
            Err(ConfigError::ReadError { .. })
        ));
    }

    #[test]
    fn test_missing_data_section_fails() {
        assert!(matches!(
            load_config_from_string("strategy:\n  window: 10\n"),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_env_var_with_default_when_missing() {
        let input = "rounding: ${PNTVL_CONFIG_TEST_NONEXISTENT_VAR:-round4sig}";
        let result = interpolate_env_vars(input);

        assert_eq!(result, "rounding: round4sig");
    }

    #[test]
    #[expect(clippy::literal_string_with_formatting_args)] // ${...} is env var syntax, not format args
    fn test_env_var_with_default_uses_existing() {
        let input = "path: ${PATH:-default}";
        let result = interpolate_env_vars(input);

        assert_ne!(result, "path: default");
        assert!(result.starts_with("path: "));
    }

    #[test]
    fn test_env_var_without_default_becomes_empty() {
        let input = "tvl_path: ${PNTVL_CONFIG_TEST_UNLIKELY_TO_EXIST}";
        let result = interpolate_env_vars(input);

        assert_eq!(result, "tvl_path: ");
    }

    #[test]
    fn test_validation_empty_path() {
        let yaml = r#"
data:
  tvl_path: ""
  price_path: prices.csv
"#;
        let Err(err) = load_config_from_string(yaml) else {
            panic!("expected error for empty path");
        };
        assert!(err.to_string().contains("tvl_path"));
    }

    #[test]
    fn test_validation_invalid_window() {
        let yaml = format!("{MINIMAL}strategy:\n  window: 1\n");
        let Err(err) = load_config_from_string(&yaml) else {
            panic!("expected error for window 1");
        };
        assert!(err.to_string().contains("window"));
    }

    #[test]
    fn test_validation_invalid_fee_rate() {
        let yaml = format!("{MINIMAL}costs:\n  fee_rate: 1.5\n");
        let Err(err) = load_config_from_string(&yaml) else {
            panic!("expected error for fee_rate");
        };
        assert!(err.to_string().contains("fee_rate"));
    }

    #[test]
    fn test_validation_empty_sweep_axis_when_enabled() {
        let yaml = format!("{MINIMAL}sweep:\n  enabled: true\n  thresholds: []\n");
        let Err(err) = load_config_from_string(&yaml) else {
            panic!("expected error for empty thresholds");
        };
        assert!(err.to_string().contains("EMPTY_GRID"));

        // The same grid is accepted while the sweep is off.
        let yaml = format!("{MINIMAL}sweep:\n  enabled: false\n  thresholds: []\n");
        assert!(load_config_from_string(&yaml).is_ok());
    }

    #[test]
    fn test_full_config_parse() {
        let yaml = r#"
data:
  tvl_path: "data/ethereum_tvl.csv"
  price_path: "data/kline_ETHUSDT_D_spot.csv"
  price_date_column: "open_time"

strategy:
  rounding: round4sig
  signal_policy: comparison
  divergence_mode: zscore
  window: 30
  threshold: 1.5

costs:
  fee_rate: 0.001
  slippage_rate: 0.002

analysis:
  annualization: 252

sweep:
  enabled: true
  windows: [10, 20]
  thresholds: [0.5, 1.0, 1.5]
  max_threads: 2

output:
  records_path: "out/records.csv"
  summary_path: "out/summary.json"
  sweep_path: "out/sweep.json"
  preview_rows: 3

observability:
  logging:
    level: "debug"
    format: "json"
    include_spans: false
"#;

        let config = match load_config_from_string(yaml) {
            Ok(c) => c,
            Err(e) => panic!("should load full config: {e}"),
        };

        assert_eq!(config.data.price_date_column, "open_time");
        assert_eq!(config.strategy.rounding, RoundingPolicy::Round4Sig);
        assert_eq!(config.strategy.signal_policy, SignalPolicy::Comparison);
        assert_eq!(config.strategy.divergence_mode, DivergenceMode::ZScore);
        assert_eq!(config.strategy.window, 30);
        assert!((config.costs.per_trade() - 0.003).abs() < 1e-12);
        assert!((config.analysis.annualization - 252.0).abs() < f64::EPSILON);
        assert_eq!(config.sweep.parallel().max_threads, 2);
        assert_eq!(config.output.sweep_path.as_deref(), Some("out/sweep.json"));
        assert_eq!(config.observability.logging.format, LogFormat::Json);
        assert!(!config.observability.logging.include_spans);

        let Ok(grid) = config.sweep_grid() else {
            panic!("grid should build");
        };
        assert_eq!(grid.total_cells(), 6);
    }
}
