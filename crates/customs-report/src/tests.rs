use customs_core::{Lane, TimeGrid};
use customs_engine::ServerStats;
use customs_store::WaitStats;

use crate::{hourly_report, write_report_writer, ReportRow};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn wait(hour: u32, lane: Lane, count: u64, mean: f64, max: u32) -> WaitStats {
    WaitStats { hour, lane, count, mean_wait_ticks: mean, max_wait_ticks: max }
}

fn util(hour: u32, lane: Lane, mean: f64, servers: u32) -> ServerStats {
    ServerStats { hour, lane, mean_utilization: mean, num_servers: servers }
}

// ── Assembly ──────────────────────────────────────────────────────────────────

mod assembly_tests {
    use super::*;

    #[test]
    fn joins_wait_and_utilization_cells() {
        let grid = TimeGrid::new(1).unwrap();
        let rows = hourly_report(
            &[wait(0, Lane::Domestic, 100, 3_030.0, 6_000)],
            &[util(0, Lane::Domestic, 0.75, 1)],
            &grid,
        );
        assert_eq!(
            rows,
            vec![ReportRow {
                hour: 0,
                lane: Lane::Domestic,
                count: 100,
                ave_wait: 50, // 3030 s = 50.5 min, truncated
                max_wait: 100,
                ave_server_utilization: Some(0.75),
                num_servers: 1,
            }]
        );
    }

    #[test]
    fn wait_minutes_scale_with_the_speed_factor() {
        let grid = TimeGrid::new(10).unwrap();
        let rows = hourly_report(&[wait(2, Lane::Foreign, 5, 121.0, 182)], &[], &grid);
        assert_eq!(rows[0].ave_wait, 20); // 1210 s = 20.16 min
        assert_eq!(rows[0].max_wait, 30); // 1820 s = 30.33 min
        assert_eq!(rows[0].ave_server_utilization, None);
        assert_eq!(rows[0].num_servers, 0);
    }

    #[test]
    fn rows_exist_only_where_passengers_were_served() {
        let grid = TimeGrid::new(10).unwrap();
        // Utilization data alone (an idle staffed hall) produces no rows.
        let rows = hourly_report(&[], &[util(0, Lane::Domestic, 0.0, 3)], &grid);
        assert!(rows.is_empty());
    }

    #[test]
    fn rows_sort_by_hour_then_lane() {
        let grid = TimeGrid::new(10).unwrap();
        let rows = hourly_report(
            &[
                wait(3, Lane::Foreign, 1, 10.0, 10),
                wait(0, Lane::Foreign, 1, 10.0, 10),
                wait(0, Lane::Domestic, 1, 10.0, 10),
            ],
            &[],
            &grid,
        );
        let keys: Vec<(u32, Lane)> = rows.iter().map(|r| (r.hour, r.lane)).collect();
        assert_eq!(
            keys,
            vec![(0, Lane::Domestic), (0, Lane::Foreign), (3, Lane::Foreign)]
        );
    }
}

// ── CSV output ────────────────────────────────────────────────────────────────

mod csv_tests {
    use super::*;

    #[test]
    fn empty_report_is_header_only() {
        let mut out = Vec::new();
        write_report_writer(&mut out, &[]).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "hour,type,count,ave_wait,max_wait,ave_server_utilization,num_servers\n"
        );
    }

    #[test]
    fn rows_render_with_lowercase_lane_and_empty_missing_utilization() {
        let rows = vec![
            ReportRow {
                hour: 0,
                lane: Lane::Domestic,
                count: 12,
                ave_wait: 5,
                max_wait: 9,
                ave_server_utilization: Some(0.5),
                num_servers: 2,
            },
            ReportRow {
                hour: 1,
                lane: Lane::Foreign,
                count: 3,
                ave_wait: 0,
                max_wait: 1,
                ave_server_utilization: None,
                num_servers: 0,
            },
        ];
        let mut out = Vec::new();
        write_report_writer(&mut out, &rows).unwrap();
        let text = String::from_utf8(out).unwrap();
        let mut lines = text.lines();
        lines.next(); // header
        assert_eq!(lines.next().unwrap(), "0,domestic,12,5,9,0.5,2");
        assert_eq!(lines.next().unwrap(), "1,foreign,3,0,1,,0");
    }

    #[test]
    fn identical_rows_render_identically() {
        let rows = vec![ReportRow {
            hour: 7,
            lane: Lane::Foreign,
            count: 40,
            ave_wait: 11,
            max_wait: 25,
            ave_server_utilization: Some(1.0 / 3.0),
            num_servers: 3,
        }];
        let render = |rows: &[ReportRow]| {
            let mut out = Vec::new();
            write_report_writer(&mut out, rows).unwrap();
            out
        };
        assert_eq!(render(&rows), render(&rows));
    }
}
