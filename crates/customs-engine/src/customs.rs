//! `Customs` — the whole hall: routing, hourly staffing, and statistics.

use customs_core::{Lane, Tick, TimeGrid};
use customs_schedule::ServerSchedule;

use crate::{Passenger, Plane, Subsection};

// ── ServicedPassengers ────────────────────────────────────────────────────────

/// Append-only sink for completed passengers.
///
/// Owned by [`Customs`] and lent to every booth during the serve phase (the
/// engine is single-threaded, so a `&mut` down the call stack is the whole
/// sharing story).  The tick loop drains the pending list each tick for
/// persistence; the cumulative counter survives draining.
#[derive(Default)]
pub struct ServicedPassengers {
    pending: Vec<Passenger>,
    total:   u64,
}

impl ServicedPassengers {
    pub(crate) fn push(&mut self, passenger: Passenger) {
        self.total += 1;
        self.pending.push(passenger);
    }

    pub(crate) fn drain(&mut self) -> Vec<Passenger> {
        std::mem::take(&mut self.pending)
    }

    /// Completed passengers not yet drained for persistence.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Passengers completed since the start of the run.
    pub fn total_served(&self) -> u64 {
        self.total
    }
}

// ── Statistics rows ───────────────────────────────────────────────────────────

/// Where every loaded passenger currently is.  The engine's conservation
/// invariant: the four counts always sum to the number loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Population {
    pub in_feeders: usize,
    pub at_booths:  usize,
    pub in_service: usize,
    pub serviced:   u64,
}

impl Population {
    pub fn total(&self) -> u64 {
        self.in_feeders as u64 + self.at_booths as u64 + self.in_service as u64 + self.serviced
    }
}

/// Mean booth utilization for one (lane, hour) cell.
///
/// `num_servers` counts the booths that produced a snapshot that hour,
/// i.e. the booths online at the hour's end; fully offline booths
/// contribute neither.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerStats {
    pub lane:             Lane,
    pub hour:             u32,
    pub mean_utilization: f64,
    pub num_servers:      u32,
}

// ── Customs ───────────────────────────────────────────────────────────────────

/// The customs hall: one [`Subsection`] per lane plus the serviced sink.
pub struct Customs {
    sections: [Subsection; 2],
    outputs:  ServicedPassengers,
}

impl Customs {
    /// Build the hall for `schedule`: each lane gets `max` physical booths,
    /// all initially offline until the first `update_servers` call.
    pub fn new(schedule: &ServerSchedule, booth_queue_capacity: usize) -> Self {
        Self {
            sections: Lane::ALL
                .map(|lane| Subsection::new(lane, schedule.max(lane), booth_queue_capacity)),
            outputs: ServicedPassengers::default(),
        }
    }

    pub fn section(&self, lane: Lane) -> &Subsection {
        &self.sections[lane.index()]
    }

    pub fn outputs(&self) -> &ServicedPassengers {
        &self.outputs
    }

    // ── Tick-loop phases ──────────────────────────────────────────────────

    /// Route arriving passengers into their lanes' feeder queues.
    ///
    /// Each plane's manifest is drained from the tail; per-passenger
    /// service times are independent, so deplaning order carries no bias.
    pub fn handle_arrivals(&mut self, planes: Vec<Plane>) {
        for mut plane in planes {
            tracing::debug!(
                flight = %plane.flight_num,
                origin = %plane.origin,
                passengers = plane.passenger_count(),
                "arrivals joined the feeder queues"
            );
            while let Some(passenger) = plane.passengers.pop() {
                self.sections[passenger.nationality.index()]
                    .feeder
                    .push(passenger);
            }
        }
    }

    /// Apply the hourly staffing schedule.  No-op except at hour
    /// boundaries, and the final tick of the day opens no new hour.
    pub fn update_servers(&mut self, schedule: &ServerSchedule, now: Tick, grid: &TimeGrid) {
        if now.0 % grid.ticks_per_hour() != 0 || now == grid.end_of_day() {
            return;
        }
        let hour = grid.hour_of(now);
        for section in &mut self.sections {
            section.block.set_online_prefix(schedule.booths_at(section.lane, hour));
        }
    }

    /// Run one tick's lane work in the fixed lane order: assign passengers,
    /// serve booths, account utilization.
    pub fn process_lanes(&mut self, now: Tick, grid: &TimeGrid) {
        // Explicit field borrows so the borrow checker sees disjoint access
        // between the sections and the serviced sink.
        let Customs { sections, outputs } = self;
        for section in sections.iter_mut() {
            section.assign_passengers();
            section.block.service_passengers(now, outputs);
            section.block.record_utilization(now, grid.ticks_per_hour());
        }
    }

    pub(crate) fn drain_serviced(&mut self) -> Vec<Passenger> {
        self.outputs.drain()
    }

    // ── Statistics ────────────────────────────────────────────────────────

    /// Current headcount across the hall.
    pub fn population(&self) -> Population {
        let mut pop = Population {
            in_feeders: 0,
            at_booths:  0,
            in_service: 0,
            serviced:   self.outputs.total_served(),
        };
        for section in &self.sections {
            pop.in_feeders += section.feeder.len();
            for booth in section.block.booths() {
                let (waiting, serving) = booth.headcount();
                pop.at_booths += waiting;
                pop.in_service += serving;
            }
        }
        pop
    }

    /// Passengers waiting in the two feeder queues.
    pub fn queued_total(&self) -> usize {
        self.sections.iter().map(|s| s.feeder.len()).sum()
    }

    /// Booths currently staffed across both lanes.
    pub fn online_total(&self) -> usize {
        self.sections
            .iter()
            .map(|s| s.block.booths().iter().filter(|b| b.online).count())
            .sum()
    }

    /// Aggregate the per-booth hourly series into per-(lane, hour) rows.
    pub fn server_stats(&self) -> Vec<ServerStats> {
        let mut rows = Vec::new();
        for section in &self.sections {
            for hour in 0..24 {
                let snapshots: Vec<f64> = section
                    .block
                    .booths()
                    .iter()
                    .filter_map(|b| b.hourly_series().get(&hour).copied())
                    .collect();
                if snapshots.is_empty() {
                    continue;
                }
                rows.push(ServerStats {
                    lane: section.lane,
                    hour,
                    mean_utilization: snapshots.iter().sum::<f64>() / snapshots.len() as f64,
                    num_servers: snapshots.len() as u32,
                });
            }
        }
        rows.sort_by_key(|r| (r.hour, r.lane.index()));
        rows
    }
}
