//! Formatting utilities for performance metrics display.

use super::constants::HUNDRED;

/// Format a fraction as a percentage string, `N/A` when undefined.
#[must_use]
pub fn format_pct(value: Option<f64>) -> String {
    value.map_or_else(|| "N/A".to_string(), |v| format!("{:.2}%", v * HUNDRED))
}

/// Format a value with 2 decimal places.
#[must_use]
pub fn format_decimal(value: f64) -> String {
    format!("{value:.2}")
}

/// Format an optional ratio.
#[must_use]
pub fn format_ratio(value: Option<f64>) -> String {
    value.map_or_else(|| "N/A".to_string(), format_decimal)
}
