//! Console reports and file exports for a finished run.
//!
//! Nothing here renders charts. The exports carry what a charting or
//! heatmap consumer needs: the full record table, the summary metrics and
//! the Sharpe grid and the long/short markers.

mod export;
mod markers;
mod summary;

pub use export::{
    ExportError, write_markers_csv, write_records_csv, write_summary_json, write_sweep_json,
};
pub use markers::{SignalMarker, signal_markers};
pub use summary::{render_preview, render_summary};
