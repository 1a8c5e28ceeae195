//! `customs-report` — the hourly throughput report.
//!
//! Joins the store's wait aggregates with the engine's booth-utilization
//! snapshots into one row per `(hour, lane)` cell and writes them as CSV:
//!
//! ```csv
//! hour,type,count,ave_wait,max_wait,ave_server_utilization,num_servers
//! 0,domestic,412,14,32,0.9,4
//! ```
//!
//! Rows exist only for cells with at least one serviced passenger — an
//! empty roster produces an empty report.  Formatting is deterministic, so
//! identical runs emit byte-identical files.

pub mod csv_out;
pub mod error;
pub mod row;

#[cfg(test)]
mod tests;

pub use csv_out::{write_report_csv, write_report_writer};
pub use error::{ReportError, ReportResult};
pub use row::{hourly_report, ReportRow};
