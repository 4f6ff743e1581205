//! Constants for performance metric calculations.

/// Periods per year for daily crypto data, which trades every calendar day.
pub const DAYS_PER_YEAR: f64 = 365.0;
/// Percentage scale.
pub const HUNDRED: f64 = 100.0;
