//! CSV export of the retained history.
//!
//! One row per reading in window order. pH, temperature and TDS are written
//! calibrated (the window only ever holds normalized readings). Unavailable
//! values are empty cells; `risk_score` is the resolved score of that row.

use crate::error::{MonitorError, Result};
use crate::history::HistoryWindow;
use crate::reading::SensorReading;
use crate::risk;
use chrono::SecondsFormat;
use std::io::Write;

pub const HEADER: [&str; 9] = [
    "created_at",
    "ph",
    "temp",
    "humidity",
    "flow",
    "turbidity",
    "tds",
    "risk_score",
    "status",
];

fn cell(v: Option<f64>) -> String {
    v.map(|x| x.to_string()).unwrap_or_default()
}

fn row(r: &SensorReading) -> [String; 9] {
    [
        r.timestamp().to_rfc3339_opts(SecondsFormat::Secs, true),
        cell(r.ph()),
        cell(r.temperature()),
        cell(r.humidity()),
        cell(r.flow()),
        cell(r.turbidity()),
        cell(r.tds()),
        risk::resolve(r).score.to_string(),
        r.status_code().map(|s| s.to_string()).unwrap_or_default(),
    ]
}

/// Write the header and every retained reading. Returns the number of data rows.
pub fn write_csv<W: Write>(window: &HistoryWindow, out: W) -> Result<usize> {
    let mut wtr = csv::Writer::from_writer(out);
    wtr.write_record(HEADER)
        .map_err(|e| MonitorError::Export(e.to_string()))?;
    let mut n = 0usize;
    for r in window.all() {
        wtr.write_record(row(r))
            .map_err(|e| MonitorError::Export(e.to_string()))?;
        n += 1;
    }
    wtr.flush().map_err(|e| MonitorError::Io(e.to_string()))?;
    Ok(n)
}

/// Write the CSV to `path`, replacing any existing file.
pub fn export_to_path(window: &HistoryWindow, path: &std::path::Path) -> Result<usize> {
    let file = std::fs::File::create(path)
        .map_err(|e| MonitorError::Io(format!("create {}: {e}", path.display())))?;
    let n = write_csv(window, std::io::BufWriter::new(file))?;
    tracing::info!(rows = n, path = %path.display(), "history exported");
    Ok(n)
}
