//! CSV schedule loader and writer.
//!
//! The hour columns are looked up by name ("0" through "23") rather than by
//! position, so extra columns and reordered headers are tolerated.  Parse
//! failures name the offending row and column, which is the only diagnostic
//! a user gets before the program exits.

use std::io::{Read, Write};
use std::path::Path;
use std::str::FromStr;

use customs_core::Lane;

use crate::schedule::{LaneSchedule, ServerSchedule, HOURS};
use crate::{ScheduleError, ScheduleResult};

// ── Loading ───────────────────────────────────────────────────────────────────

/// Load a [`ServerSchedule`] from a CSV file.
pub fn load_schedule_csv(path: &Path) -> ScheduleResult<ServerSchedule> {
    let file = std::fs::File::open(path).map_err(ScheduleError::Io)?;
    load_schedule_reader(file)
}

/// Like [`load_schedule_csv`] but accepts any `Read` source.
///
/// Useful for testing (pass a `std::io::Cursor`).
pub fn load_schedule_reader<R: Read>(reader: R) -> ScheduleResult<ServerSchedule> {
    let mut csv_reader = csv::Reader::from_reader(reader);

    // ── Resolve column positions from the header row ──────────────────────
    let headers = csv_reader
        .headers()
        .map_err(|e| ScheduleError::Parse(e.to_string()))?
        .clone();
    let col = |name: &str| {
        headers
            .iter()
            .position(|h| h.trim() == name)
            .ok_or_else(|| ScheduleError::Parse(format!("missing column {name:?}")))
    };
    let subsection_col = col("subsection")?;
    let max_col = col("max")?;
    let mut hour_cols = [0usize; HOURS];
    for (hour, slot) in hour_cols.iter_mut().enumerate() {
        *slot = col(&hour.to_string())?;
    }

    // ── Parse one LaneSchedule per row ────────────────────────────────────
    let mut rows: Vec<LaneSchedule> = Vec::with_capacity(2);
    for (idx, record) in csv_reader.records().enumerate() {
        let record = record.map_err(|e| ScheduleError::Parse(e.to_string()))?;
        let field = |c: usize| record.get(c).unwrap_or("").trim();

        let lane = Lane::from_str(field(subsection_col))
            .map_err(|e| ScheduleError::Parse(format!("row {idx}: {e}")))?;
        let parse_count = |c: usize, name: &str| {
            field(c).parse::<u32>().map_err(|_| {
                ScheduleError::Parse(format!(
                    "row {idx} column {name:?}: {:?} is not a booth count",
                    field(c)
                ))
            })
        };

        let max = parse_count(max_col, "max")?;
        let mut hours = [0u32; HOURS];
        for (hour, slot) in hours.iter_mut().enumerate() {
            *slot = parse_count(hour_cols[hour], &hour.to_string())?;
        }
        rows.push(LaneSchedule { lane, max, hours });
    }

    ServerSchedule::new(rows)
}

// ── Writing ───────────────────────────────────────────────────────────────────

/// Write a schedule to a CSV file in the same shape the loader reads.
pub fn write_schedule_csv(path: &Path, schedule: &ServerSchedule) -> ScheduleResult<()> {
    let file = std::fs::File::create(path).map_err(ScheduleError::Io)?;
    write_schedule_writer(file, schedule)
}

/// Like [`write_schedule_csv`] but accepts any `Write` sink.
pub fn write_schedule_writer<W: Write>(writer: W, schedule: &ServerSchedule) -> ScheduleResult<()> {
    let mut wtr = csv::Writer::from_writer(writer);

    let mut header: Vec<String> = vec!["id".into(), "subsection".into(), "max".into()];
    header.extend((0..HOURS).map(|h| h.to_string()));
    wtr.write_record(&header)
        .map_err(|e| ScheduleError::Parse(e.to_string()))?;

    for (id, lane) in Lane::ALL.into_iter().enumerate() {
        let row = schedule.lane(lane);
        let mut record: Vec<String> =
            vec![id.to_string(), lane.as_str().into(), row.max.to_string()];
        record.extend(row.hours.iter().map(|n| n.to_string()));
        wtr.write_record(&record)
            .map_err(|e| ScheduleError::Parse(e.to_string()))?;
    }

    wtr.flush()?;
    Ok(())
}
