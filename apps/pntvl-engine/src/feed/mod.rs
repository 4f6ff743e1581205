//! Input series ingestion.
//!
//! Reads the daily TVL export and the asset kline export from CSV and
//! normalizes both to one value per calendar date. Structural checks on the
//! values themselves (positive prices, duplicate dates) stay in the core.

mod csv_loader;

pub use csv_loader::{
    InputSeries, LoadError, load_inputs, load_price_csv, load_tvl_csv, parse_date,
};
