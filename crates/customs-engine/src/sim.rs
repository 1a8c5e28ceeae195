//! The `Simulation` struct and its tick loop.

use customs_core::{Tick, TimeGrid};
use customs_schedule::ServerSchedule;

use crate::{Customs, RosterSource, SimObserver, SimResult};

// ── SimSummary ────────────────────────────────────────────────────────────────

/// Headline numbers for one completed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimSummary {
    pub planes_dispatched: u64,
    pub passengers_loaded: u64,
    pub passengers_served: u64,
    pub final_tick:        Tick,
}

// ── Simulation ────────────────────────────────────────────────────────────────

/// One simulation instance: the hall, the schedule, and a roster source.
///
/// The tick loop runs from 00:00:00 through 24:00:00 inclusive, with a
/// fixed, observable ordering inside each tick:
///
/// 1. Hourly staffing changes (hour boundaries only).
/// 2. Pull this tick's planes from the roster, in roster order.
/// 3. Route their passengers into the lane feeders.
/// 4. Per lane, in fixed order: assign, serve, account utilization.
/// 5. Hand this tick's completed passengers to the observer (persistence).
/// 6. Advance the clock.
///
/// One instance owns all of its state; the optimizer builds a fresh
/// instance per pass and relies on nothing surviving between them.
pub struct Simulation<R: RosterSource> {
    pub grid:     TimeGrid,
    pub schedule: ServerSchedule,
    pub customs:  Customs,
    pub roster:   R,

    planes_dispatched: u64,
    passengers_loaded: u64,
}

impl<R: RosterSource> Simulation<R> {
    pub fn new(
        grid:                 TimeGrid,
        schedule:             ServerSchedule,
        roster:               R,
        booth_queue_capacity: usize,
    ) -> Self {
        let customs = Customs::new(&schedule, booth_queue_capacity);
        Self {
            grid,
            schedule,
            customs,
            roster,
            planes_dispatched: 0,
            passengers_loaded: 0,
        }
    }

    /// Run the full day and return the summary.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<SimSummary> {
        let end = self.grid.end_of_day();
        let mut now = Tick::ZERO;

        loop {
            observer.on_tick_start(now);

            self.customs.update_servers(&self.schedule, now, &self.grid);

            let planes = self.roster.planes_at(now)?;
            if !planes.is_empty() {
                self.planes_dispatched += planes.len() as u64;
                self.passengers_loaded += planes
                    .iter()
                    .map(|p| p.passenger_count() as u64)
                    .sum::<u64>();
                self.customs.handle_arrivals(planes);
            }

            self.customs.process_lanes(now, &self.grid);

            let serviced = self.customs.drain_serviced();
            if !serviced.is_empty() {
                observer.on_serviced(now, &serviced);
            }
            observer.on_tick_end(now, &self.customs);

            debug_assert_eq!(
                self.customs.population().total(),
                self.passengers_loaded,
                "passenger conservation broken at {now}"
            );

            if now == end {
                break;
            }
            now = now + 1;
        }

        observer.on_sim_end(end);
        Ok(SimSummary {
            planes_dispatched: self.planes_dispatched,
            passengers_loaded: self.passengers_loaded,
            passengers_served: self.customs.outputs().total_served(),
            final_tick:        end,
        })
    }
}
