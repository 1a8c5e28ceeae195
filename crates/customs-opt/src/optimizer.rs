//! The greedy momentum search.

use customs_core::{Lane, TimeGrid};
use customs_engine::{ServerStats, Simulation};
use customs_schedule::{ServerSchedule, HOURS};
use customs_store::{CustomsDb, Roster, StoreOutcomeObserver, WaitStats};

use crate::{OptError, OptResult};

// ── Outcomes ──────────────────────────────────────────────────────────────────

/// What the search concluded for one (lane, hour) cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HourOutcome {
    /// Tuned to this booth count with the mean wait under the threshold.
    Optimized(u32),
    /// The wait stays at or above the threshold even fully staffed.
    CapacityBound,
    /// No passengers arrived this hour; the cell keeps whatever earlier
    /// hours propagated into it.
    Empty,
}

/// Result of one optimization run.
pub struct OptimizeSummary {
    outcomes: [[HourOutcome; HOURS]; 2],

    /// Full simulation passes executed, including the final reporting pass.
    pub simulations: u32,

    /// Wait aggregates of the final pass, for the report.
    pub wait: Vec<WaitStats>,

    /// Utilization aggregates of the final pass, for the report.
    pub servers: Vec<ServerStats>,
}

impl OptimizeSummary {
    pub fn outcome(&self, lane: Lane, hour: u32) -> HourOutcome {
        self.outcomes[lane.index()][hour as usize]
    }

    /// Hours the search marked capacity-bound, as `(lane, hour)` pairs.
    pub fn capacity_bound_hours(&self) -> Vec<(Lane, u32)> {
        let mut hours = Vec::new();
        for lane in Lane::ALL {
            for hour in 0..HOURS as u32 {
                if self.outcome(lane, hour) == HourOutcome::CapacityBound {
                    hours.push((lane, hour));
                }
            }
        }
        hours
    }
}

// ── Optimizer ─────────────────────────────────────────────────────────────────

/// Greedy hourly booth-count optimizer.
///
/// Lanes are searched independently — every passenger visits exactly its
/// nationality's lane, so a staffing change in one lane cannot move the
/// other lane's waits.
pub struct Optimizer {
    threshold_min:        u32,
    momentum:             u32,
    booth_queue_capacity: usize,
}

struct PassResult {
    wait:    Vec<WaitStats>,
    servers: Vec<ServerStats>,
}

impl Optimizer {
    pub fn new(threshold_min: u32, momentum: u32, booth_queue_capacity: usize) -> OptResult<Self> {
        if threshold_min == 0 {
            return Err(OptError::Config("wait threshold must be at least 1 minute".into()));
        }
        if momentum == 0 {
            return Err(OptError::Config("momentum must be at least 1".into()));
        }
        Ok(Self { threshold_min, momentum, booth_queue_capacity })
    }

    /// Run the search, mutating `schedule` into the optimized staffing.
    ///
    /// The roster must already be prepared
    /// ([`CustomsDb::assign_service_times`]) and materialised.
    pub fn optimize(
        &self,
        db:       &CustomsDb,
        roster:   &Roster,
        schedule: &mut ServerSchedule,
        grid:     &TimeGrid,
    ) -> OptResult<OptimizeSummary> {
        let threshold = self.threshold_min as f64;
        let arrivals = db.arrival_counts(grid.ticks_per_hour())?;
        let has_arrivals =
            |lane: Lane, hour: u32| arrivals.iter().any(|&(h, l, n)| h == hour && l == lane && n > 0);

        schedule.saturate();
        let mut outcomes = [[HourOutcome::Empty; HOURS]; 2];
        let mut simulations = 0u32;

        for lane in Lane::ALL {
            let max = schedule.max(lane);
            let mut prev_hour: Option<u32> = None;

            for hour in 0..HOURS as u32 {
                if !has_arrivals(lane, hour) {
                    continue;
                }
                if max == 0 {
                    // Arrivals into a lane with no booths at all.
                    outcomes[lane.index()][hour as usize] = HourOutcome::CapacityBound;
                    continue;
                }

                let mut pass = self.simulate_pass(db, roster, schedule, grid, &mut simulations)?;
                let mut wait = mean_wait_minutes(&pass.wait, lane, hour, grid);

                let outcome = loop {
                    let n_cur = schedule.booths_at(lane, hour);

                    if wait >= threshold {
                        if n_cur == max {
                            break HourOutcome::CapacityBound;
                        }
                        schedule.set_from(lane, hour, (n_cur + self.momentum).min(max));
                    } else {
                        let n_new = n_cur.saturating_sub(self.momentum).max(1);
                        if n_new == n_cur {
                            break HourOutcome::Optimized(n_cur);
                        }
                        schedule.set_from(lane, hour, n_new);
                    }

                    pass = self.simulate_pass(db, roster, schedule, grid, &mut simulations)?;
                    let new_wait = mean_wait_minutes(&pass.wait, lane, hour, grid);

                    if wait >= threshold && new_wait < threshold {
                        // Crossed downward while adding: the momentum step
                        // overshot, so tighten one booth at a time.
                        for _ in 1..self.momentum {
                            let n = schedule.booths_at(lane, hour);
                            if n <= 1 {
                                break;
                            }
                            schedule.set_from(lane, hour, n - 1);
                            pass = self.simulate_pass(db, roster, schedule, grid, &mut simulations)?;
                            if mean_wait_minutes(&pass.wait, lane, hour, grid) >= threshold {
                                schedule.set_from(lane, hour, n);
                                break;
                            }
                        }
                        break HourOutcome::Optimized(schedule.booths_at(lane, hour));
                    }

                    if wait < threshold && new_wait >= threshold {
                        // Crossed upward while reducing: undo one booth at a
                        // time until back under.
                        for _ in 0..self.momentum {
                            let n = (schedule.booths_at(lane, hour) + 1).min(max);
                            schedule.set_from(lane, hour, n);
                            pass = self.simulate_pass(db, roster, schedule, grid, &mut simulations)?;
                            if mean_wait_minutes(&pass.wait, lane, hour, grid) < threshold {
                                break;
                            }
                        }

                        // This hour's staffing also carries the spillover of
                        // the previously tuned hour; if that hour regressed,
                        // keep adding booths here until it recovers.
                        if let Some(prev) = prev_hour {
                            while mean_wait_minutes(&pass.wait, lane, prev, grid) >= threshold
                                && schedule.booths_at(lane, hour) < max
                            {
                                let n = schedule.booths_at(lane, hour) + 1;
                                schedule.set_from(lane, hour, n);
                                pass =
                                    self.simulate_pass(db, roster, schedule, grid, &mut simulations)?;
                            }
                        }
                        break HourOutcome::Optimized(schedule.booths_at(lane, hour));
                    }

                    // Same side of the threshold: keep stepping.
                    wait = new_wait;
                };

                outcomes[lane.index()][hour as usize] = outcome;
                prev_hour = Some(hour);
                tracing::info!(
                    lane = %lane,
                    hour,
                    booths = schedule.booths_at(lane, hour),
                    ?outcome,
                    "hour tuned"
                );
            }
        }

        // Final pass with the optimized schedule feeds the report.
        let final_pass = self.simulate_pass(db, roster, schedule, grid, &mut simulations)?;
        Ok(OptimizeSummary {
            outcomes,
            simulations,
            wait: final_pass.wait,
            servers: final_pass.servers,
        })
    }

    /// One full 24-hour simulation of `schedule` with outcomes persisted.
    fn simulate_pass(
        &self,
        db:          &CustomsDb,
        roster:      &Roster,
        schedule:    &ServerSchedule,
        grid:        &TimeGrid,
        simulations: &mut u32,
    ) -> OptResult<PassResult> {
        db.reset_outcomes()?;
        let mut sim = Simulation::new(
            grid.clone(),
            schedule.clone(),
            roster.dispatcher(),
            self.booth_queue_capacity,
        );
        let mut observer = StoreOutcomeObserver::new(db);
        sim.run(&mut observer)?;
        if let Some(e) = observer.take_error() {
            return Err(e.into());
        }
        *simulations += 1;
        Ok(PassResult {
            wait:    db.wait_stats(grid.ticks_per_hour())?,
            servers: sim.customs.server_stats(),
        })
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Mean wait in minutes for one (lane, arrival-hour) cell.
///
/// An hour whose arrivals saw no completions at all reads as infinite —
/// it is certainly over any threshold.
fn mean_wait_minutes(stats: &[WaitStats], lane: Lane, hour: u32, grid: &TimeGrid) -> f64 {
    stats
        .iter()
        .find(|w| w.lane == lane && w.hour == hour)
        .map(|w| w.mean_wait_ticks * grid.speed_factor as f64 / 60.0)
        .unwrap_or(f64::INFINITY)
}
