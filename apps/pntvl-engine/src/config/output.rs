//! Report and export configuration.

use serde::{Deserialize, Serialize};

/// Where to write results. Unset paths skip that export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Per-day records as CSV.
    #[serde(default)]
    pub records_path: Option<String>,
    /// Performance summary as JSON.
    #[serde(default)]
    pub summary_path: Option<String>,
    /// Sharpe grid as JSON.
    #[serde(default)]
    pub sweep_path: Option<String>,
    /// Long/short chart markers as CSV.
    #[serde(default)]
    pub markers_path: Option<String>,
    /// Rows shown at each end of the console preview.
    #[serde(default = "default_preview_rows")]
    pub preview_rows: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            records_path: None,
            summary_path: None,
            sweep_path: None,
            markers_path: None,
            preview_rows: default_preview_rows(),
        }
    }
}

const fn default_preview_rows() -> usize {
    5
}
