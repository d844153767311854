//! Report export: one CSV per table plus the full report as JSON.
//!
//! Files written under the target directory:
//! - `advance_decline.csv`
//! - `industry_participation.csv`
//! - `breakouts.csv`
//! - `industry_breakouts.csv`
//! - `index_breadth.csv`
//! - `report.json`

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;

use crate::report::BreadthReport;

/// Serialize the report to pretty JSON.
pub fn export_json(report: &BreadthReport) -> Result<String> {
    serde_json::to_string_pretty(report).context("failed to serialize BreadthReport to JSON")
}

pub const ADVANCE_DECLINE_HEADER: &[&str] = &["date", "advancers", "decliners", "ratio"];
pub const INDUSTRY_PARTICIPATION_HEADER: &[&str] = &[
    "industry",
    "total",
    "above_short",
    "above_long",
    "pct_above_short",
    "pct_above_long",
];
pub const BREAKOUTS_HEADER: &[&str] = &["symbol", "industry", "close", "change_pct"];
pub const INDUSTRY_BREAKOUTS_HEADER: &[&str] =
    &["industry", "breakouts", "industry_total", "pct_in_breakout"];
pub const INDEX_BREADTH_HEADER: &[&str] = &[
    "index",
    "total",
    "above_short",
    "pct_above_short",
    "above_long",
    "pct_above_long",
    "breakouts",
    "pct_in_breakout",
];

/// Render rows as CSV. The header is always written, even for an empty table.
///
/// `header` must list the row's fields in declaration order.
pub fn export_csv<T: Serialize>(header: &[&str], rows: &[T]) -> Result<String> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(vec![]);
    wtr.write_record(header)?;
    for row in rows {
        wtr.serialize(row)?;
    }
    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

/// Write every table and `report.json` into `dir`, creating it if needed.
///
/// Returns the written paths in the order listed in the module docs.
pub fn write_report(report: &BreadthReport, dir: &Path) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create export dir: {}", dir.display()))?;

    let files = [
        (
            "advance_decline.csv",
            export_csv(ADVANCE_DECLINE_HEADER, &report.advance_decline)?,
        ),
        (
            "industry_participation.csv",
            export_csv(INDUSTRY_PARTICIPATION_HEADER, &report.industry_participation)?,
        ),
        ("breakouts.csv", export_csv(BREAKOUTS_HEADER, &report.breakouts)?),
        (
            "industry_breakouts.csv",
            export_csv(INDUSTRY_BREAKOUTS_HEADER, &report.industry_breakouts)?,
        ),
        (
            "index_breadth.csv",
            export_csv(INDEX_BREADTH_HEADER, &report.index_breadth)?,
        ),
        ("report.json", export_json(report)?),
    ];

    let mut written = Vec::with_capacity(files.len());
    for (name, contents) in files {
        let path = dir.join(name);
        std::fs::write(&path, contents)
            .with_context(|| format!("failed to write {}", path.display()))?;
        written.push(path);
    }

    tracing::info!(dir = %dir.display(), files = written.len(), "exported report");
    Ok(written)
}
