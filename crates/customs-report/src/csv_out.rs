//! CSV report backend.

use std::io::Write;
use std::path::Path;

use crate::{ReportResult, ReportRow};

/// The report's column order; must match the field order of [`ReportRow`].
const HEADER: [&str; 7] = [
    "hour",
    "type",
    "count",
    "ave_wait",
    "max_wait",
    "ave_server_utilization",
    "num_servers",
];

/// Write the report to `path`, creating or truncating it.
pub fn write_report_csv(path: &Path, rows: &[ReportRow]) -> ReportResult<()> {
    let file = std::fs::File::create(path)?;
    write_report_writer(file, rows)
}

/// Like [`write_report_csv`] but accepts any `Write` sink.
///
/// The header row is written explicitly so that an empty report is a
/// header-only file rather than zero bytes.
pub fn write_report_writer<W: Write>(writer: W, rows: &[ReportRow]) -> ReportResult<()> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    wtr.write_record(HEADER)?;
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}
