//! Input data configuration.

use serde::{Deserialize, Serialize};

/// Locations and column names of the two input CSV files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataConfig {
    /// TVL CSV path.
    pub tvl_path: String,
    /// Close-price (daily kline) CSV path.
    pub price_path: String,
    /// Date column of the TVL file.
    #[serde(default = "default_tvl_date_column")]
    pub tvl_date_column: String,
    /// Value column of the TVL file.
    #[serde(default = "default_tvl_value_column")]
    pub tvl_value_column: String,
    /// Timestamp column of the price file.
    #[serde(default = "default_price_date_column")]
    pub price_date_column: String,
    /// Close column of the price file.
    #[serde(default = "default_price_close_column")]
    pub price_close_column: String,
}

fn default_tvl_date_column() -> String {
    "date".to_string()
}

fn default_tvl_value_column() -> String {
    "tvl_usd".to_string()
}

fn default_price_date_column() -> String {
    "datetime".to_string()
}

fn default_price_close_column() -> String {
    "close".to_string()
}
