//! Report rows and their assembly.

use std::collections::HashMap;

use serde::Serialize;

use customs_core::{Lane, TimeGrid};
use customs_engine::ServerStats;
use customs_store::WaitStats;

/// One `(hour, lane)` cell of the hourly report.
///
/// Waits are whole minutes, truncated.  `ave_server_utilization` is absent
/// when no booth of the lane produced a snapshot that hour (all offline at
/// the hour boundary); `num_servers` counts the booths that did.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    pub hour: u32,
    #[serde(rename = "type")]
    pub lane: Lane,
    pub count: u64,
    pub ave_wait: u32,
    pub max_wait: u32,
    pub ave_server_utilization: Option<f64>,
    pub num_servers: u32,
}

/// Join wait aggregates with utilization snapshots into report rows,
/// sorted by hour then lane.
pub fn hourly_report(
    wait:    &[WaitStats],
    servers: &[ServerStats],
    grid:    &TimeGrid,
) -> Vec<ReportRow> {
    let utilization: HashMap<(u32, Lane), (f64, u32)> = servers
        .iter()
        .map(|s| ((s.hour, s.lane), (s.mean_utilization, s.num_servers)))
        .collect();

    let mut rows: Vec<ReportRow> = wait
        .iter()
        .map(|w| {
            let (ave_util, num_servers) = match utilization.get(&(w.hour, w.lane)) {
                Some(&(u, n)) => (Some(u), n),
                None          => (None, 0),
            };
            ReportRow {
                hour: w.hour,
                lane: w.lane,
                count: w.count,
                ave_wait: grid.ticks_to_minutes(w.mean_wait_ticks),
                max_wait: grid.ticks_to_minutes(w.max_wait_ticks as f64),
                ave_server_utilization: ave_util,
                num_servers,
            }
        })
        .collect();

    rows.sort_by_key(|r| (r.hour, r.lane.index()));
    rows
}
