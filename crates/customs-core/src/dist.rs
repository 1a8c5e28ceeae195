//! Triangular service-time sampler.
//!
//! Booth transaction times are modelled with a triangular distribution: a
//! floor (the minimum interview), a mode (the typical case), and a long
//! upper tail (secondary questioning at the booth).  The draw happens once
//! per passenger at roster-preparation time and is persisted; the engine
//! itself never samples, which keeps a simulation run fully deterministic
//! given a prepared roster.

use rand::Rng;

use crate::{CoreError, CoreResult, PassengerRng, TimeGrid};

/// A triangular distribution over tick-valued service times.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Triangular {
    lo:   f64,
    mode: f64,
    hi:   f64,
}

impl Triangular {
    /// Build from tick parameters.  Requires `lo ≤ mode ≤ hi`.
    pub fn new(lo: u32, mode: u32, hi: u32) -> CoreResult<Self> {
        if lo > mode || mode > hi {
            return Err(CoreError::Config(format!(
                "triangular parameters must be ordered: lo={lo} mode={mode} hi={hi}"
            )));
        }
        Ok(Self {
            lo:   lo as f64,
            mode: mode as f64,
            hi:   hi as f64,
        })
    }

    /// Build from "HH:MM:SS" wall-clock parameters, converted to ticks on
    /// `grid`.
    pub fn from_wall(grid: &TimeGrid, lo: &str, mode: &str, hi: &str) -> CoreResult<Self> {
        Self::new(
            grid.to_tick(lo)?.0,
            grid.to_tick(mode)?.0,
            grid.to_tick(hi)?.0,
        )
    }

    /// Draw one service time in ticks, truncated to an integer and clamped
    /// to at least 1 (a zero-length transaction would let a booth complete
    /// and pick up in the same tick).
    pub fn sample(&self, rng: &mut PassengerRng) -> u32 {
        let width = self.hi - self.lo;
        if width <= 0.0 {
            // Degenerate (collapsed) distribution.
            return (self.lo as u32).max(1);
        }

        // Inverse-CDF transform of a uniform draw.
        let u: f64 = rng.inner().r#gen();
        let cut = (self.mode - self.lo) / width;
        let x = if u < cut {
            self.lo + (u * width * (self.mode - self.lo)).sqrt()
        } else {
            self.hi - ((1.0 - u) * width * (self.hi - self.mode)).sqrt()
        };

        (x as u32).max(1)
    }
}
