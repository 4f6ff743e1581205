//! File exports: records and chart markers as CSV, summary and sweep as JSON.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;
use thiserror::Error;
use tracing::info;

use super::SignalMarker;
use crate::backtest::{BestCell, DailyRecord, PerformanceSummary, SweepResult};

/// Errors raised while writing an export.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The file or its parent directory could not be created or written.
    #[error("EXPORT_IO: '{path}': {source}")]
    Io {
        /// Target path.
        path: String,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// CSV serialization failed.
    #[error("EXPORT_CSV: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization failed.
    #[error("EXPORT_JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Sweep export layout: the heatmap matrix plus its best cell.
#[derive(Serialize)]
struct SweepExport<'a> {
    windows: &'a [usize],
    thresholds: &'a [f64],
    /// Rows follow `windows`, columns follow `thresholds`.
    sharpe: &'a [Vec<Option<f64>>],
    best: Option<BestCell>,
    undefined_cells: usize,
    total_time_ms: u64,
}

/// Write every record as one CSV row, undefined values as empty cells.
///
/// # Errors
///
/// Returns [`ExportError`] if the file cannot be created or written.
pub fn write_records_csv(path: impl AsRef<Path>, records: &[DailyRecord]) -> Result<(), ExportError> {
    let path = path.as_ref();
    let file = create(path)?;
    let mut writer = csv::Writer::from_writer(file);
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush().map_err(|source| io_error(path, source))?;

    info!(path = %path.display(), rows = records.len(), "Wrote records CSV");
    Ok(())
}

/// Write the long/short markers as `date,price,signal` rows.
///
/// # Errors
///
/// Returns [`ExportError`] if the file cannot be created or written.
pub fn write_markers_csv(
    path: impl AsRef<Path>,
    markers: &[SignalMarker],
) -> Result<(), ExportError> {
    let path = path.as_ref();
    let mut writer = csv::Writer::from_writer(create(path)?);
    for marker in markers {
        writer.serialize(marker)?;
    }
    writer.flush().map_err(|source| io_error(path, source))?;

    info!(path = %path.display(), markers = markers.len(), "Wrote signal markers CSV");
    Ok(())
}

/// Write the performance summary as pretty JSON, undefined values as `null`.
///
/// # Errors
///
/// Returns [`ExportError`] if the file cannot be created or written.
pub fn write_summary_json(
    path: impl AsRef<Path>,
    summary: &PerformanceSummary,
) -> Result<(), ExportError> {
    let path = path.as_ref();
    write_json(path, summary)?;
    info!(path = %path.display(), "Wrote summary JSON");
    Ok(())
}

/// Write the Sharpe grid and its best cell as pretty JSON.
///
/// # Errors
///
/// Returns [`ExportError`] if the file cannot be created or written.
pub fn write_sweep_json(path: impl AsRef<Path>, result: &SweepResult) -> Result<(), ExportError> {
    let path = path.as_ref();
    let export = SweepExport {
        windows: &result.grid.windows,
        thresholds: &result.grid.thresholds,
        sharpe: &result.grid.sharpe,
        best: result.best(),
        undefined_cells: result.undefined_cells(),
        total_time_ms: result.total_time_ms,
    };
    write_json(path, &export)?;
    info!(path = %path.display(), cells = result.cells.len(), "Wrote sweep JSON");
    Ok(())
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), ExportError> {
    let mut writer = BufWriter::new(create(path)?);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.flush().map_err(|source| io_error(path, source))
}

fn create(path: &Path) -> Result<File, ExportError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|source| io_error(path, source))?;
    }
    File::create(path).map_err(|source| io_error(path, source))
}

fn io_error(path: &Path, source: std::io::Error) -> ExportError {
    ExportError::Io {
        path: path.display().to_string(),
        source,
    }
}
