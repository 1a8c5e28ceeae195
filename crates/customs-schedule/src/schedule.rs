//! Core schedule types: `LaneSchedule` and `ServerSchedule`.

use customs_core::Lane;

use crate::{ScheduleError, ScheduleResult};

/// Hours in the scheduling horizon (one day).
pub const HOURS: usize = 24;

// ── LaneSchedule ──────────────────────────────────────────────────────────────

/// Staffing plan for one lane: an hourly booth count and a staffed ceiling.
///
/// `max` is also the number of physical booths the lane is built with; the
/// schedule turns a prefix of them online each hour.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LaneSchedule {
    pub lane:  Lane,
    pub max:   u32,
    pub hours: [u32; HOURS],
}

impl LaneSchedule {
    /// A lane staffed at a constant level all day.
    pub fn flat(lane: Lane, max: u32, level: u32) -> Self {
        Self { lane, max, hours: [level; HOURS] }
    }
}

// ── ServerSchedule ────────────────────────────────────────────────────────────

/// The full schedule: one [`LaneSchedule`] per lane, stored in
/// [`Lane::ALL`] order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerSchedule {
    lanes: [LaneSchedule; 2],
}

impl ServerSchedule {
    /// Validate and assemble a schedule from per-lane rows.
    ///
    /// Requires exactly one row per lane and every hourly count within the
    /// lane's `max`.
    pub fn new(mut rows: Vec<LaneSchedule>) -> ScheduleResult<Self> {
        rows.sort_by_key(|r| r.lane.index());
        let [a, b] = <[LaneSchedule; 2]>::try_from(rows).map_err(|rows| {
            ScheduleError::Config(format!("expected 2 lane rows, found {}", rows.len()))
        })?;
        if a.lane != Lane::Domestic || b.lane != Lane::Foreign {
            return Err(ScheduleError::Config(
                "schedule must contain exactly one domestic and one foreign row".into(),
            ));
        }
        for row in [&a, &b] {
            for (hour, &n) in row.hours.iter().enumerate() {
                if n > row.max {
                    return Err(ScheduleError::Config(format!(
                        "lane {} hour {hour}: {n} booths exceeds max {}",
                        row.lane, row.max
                    )));
                }
            }
        }
        Ok(Self { lanes: [a, b] })
    }

    pub fn lane(&self, lane: Lane) -> &LaneSchedule {
        &self.lanes[lane.index()]
    }

    /// Booths staffed in `lane` during hour `hour` (0–23).
    #[inline]
    pub fn booths_at(&self, lane: Lane, hour: u32) -> u32 {
        self.lanes[lane.index()].hours[hour as usize]
    }

    /// The staffed ceiling for `lane`.
    #[inline]
    pub fn max(&self, lane: Lane) -> u32 {
        self.lanes[lane.index()].max
    }

    /// Overwrite hours `from..24` of `lane` with `n`.
    ///
    /// This is the optimizer's future-propagating write: a step taken for
    /// hour `h` also seeds every later hour, to be overwritten when those
    /// hours are themselves optimized.
    pub fn set_from(&mut self, lane: Lane, from: u32, n: u32) {
        debug_assert!(n <= self.max(lane), "booth count above lane max");
        for h in from as usize..HOURS {
            self.lanes[lane.index()].hours[h] = n;
        }
    }

    /// Set every hour of every lane to that lane's `max` (the optimizer's
    /// starting point).
    pub fn saturate(&mut self) {
        for row in &mut self.lanes {
            row.hours = [row.max; HOURS];
        }
    }
}
