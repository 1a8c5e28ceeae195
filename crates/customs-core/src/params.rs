//! Top-level simulation parameters.
//!
//! Typically populated from CLI flags by the application crate and passed
//! down to roster preparation, the engine, and the optimizer.

use crate::{dist::Triangular, CoreError, CoreResult, Lane, TimeGrid};

/// Lower / mode / upper parameters of a service-time distribution, as
/// "HH:MM:SS" wall-clock strings (converted to ticks on a [`TimeGrid`]).
#[derive(Clone, Debug)]
pub struct WallTriple {
    pub lo:   String,
    pub mode: String,
    pub hi:   String,
}

impl WallTriple {
    pub fn new(lo: &str, mode: &str, hi: &str) -> Self {
        Self {
            lo:   lo.to_string(),
            mode: mode.to_string(),
            hi:   hi.to_string(),
        }
    }
}

/// Top-level simulation configuration.
#[derive(Clone, Debug)]
pub struct SimParams {
    /// Wall-clock seconds per tick.  Must divide 3600.  Default: 10.
    pub speed_factor: u32,

    /// Hourly mean-wait ceiling the optimizer steers under, in minutes.
    pub wait_threshold_min: u32,

    /// Step size of the optimizer's coarse search.
    pub momentum: u32,

    /// Capacity of each booth's mini-queue (passengers waiting at the booth,
    /// excluding the one in service).
    pub booth_queue_capacity: usize,

    /// Master RNG seed for roster preparation.  The same seed always
    /// produces identical service-time draws.
    pub seed: u64,

    /// Service-time distribution for the domestic lane.
    pub domestic_service: WallTriple,

    /// Service-time distribution for the foreign lane.
    pub foreign_service: WallTriple,
}

impl Default for SimParams {
    fn default() -> Self {
        Self {
            speed_factor:         10,
            wait_threshold_min:   20,
            momentum:             3,
            booth_queue_capacity: 1,
            seed:                 42,
            domestic_service:     WallTriple::new("00:00:30", "00:01:00", "00:02:00"),
            foreign_service:      WallTriple::new("00:01:00", "00:02:00", "00:04:00"),
        }
    }
}

impl SimParams {
    /// Validate the knobs and construct the [`TimeGrid`] for this run.
    pub fn grid(&self) -> CoreResult<TimeGrid> {
        if self.wait_threshold_min == 0 {
            return Err(CoreError::Config(
                "wait threshold must be at least 1 minute".into(),
            ));
        }
        if self.momentum == 0 {
            return Err(CoreError::Config("momentum must be at least 1".into()));
        }
        if self.booth_queue_capacity == 0 {
            return Err(CoreError::Config(
                "booth queue capacity must be at least 1".into(),
            ));
        }
        TimeGrid::new(self.speed_factor)
    }

    /// The service-time distribution for `lane`, in ticks on `grid`.
    pub fn service_dist(&self, lane: Lane, grid: &TimeGrid) -> CoreResult<Triangular> {
        let t = match lane {
            Lane::Domestic => &self.domestic_service,
            Lane::Foreign  => &self.foreign_service,
        };
        Triangular::from_wall(grid, &t.lo, &t.mode, &t.hi)
    }
}
