//! Simulation time model.
//!
//! # Design
//!
//! Time is represented as a monotonically increasing `Tick` counter.  One
//! tick corresponds to `speed_factor` wall-clock seconds; the mapping is
//! held in `TimeGrid`:
//!
//!   wall_secs = tick * speed_factor
//!
//! Using an integer tick as the canonical time unit means all queueing
//! arithmetic is exact (no floating-point drift) and comparisons are O(1).
//! Wall-clock strings ("HH:MM:SS") appear only at ingress (arrival times,
//! service distributions) and egress (logs); everything inside the engine
//! is ticks.
//!
//! A simulated day spans `[Tick(0), end_of_day]` inclusive, where
//! `end_of_day = 86 400 / speed_factor`.

use std::fmt;

use crate::{CoreError, CoreResult};

// ── Tick ─────────────────────────────────────────────────────────────────────

/// An absolute simulation tick counter.
///
/// Stored as `u32`: a full day at `speed_factor = 1` is 86 400 ticks, five
/// orders of magnitude below the limit.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u32);

impl Tick {
    pub const ZERO: Tick = Tick(0);

    /// Ticks elapsed from `earlier` to `self`.
    ///
    /// # Panics
    /// Panics in debug mode if `earlier > self`.
    #[inline]
    pub fn since(self, earlier: Tick) -> u32 {
        self.0 - earlier.0
    }
}

impl std::ops::Add<u32> for Tick {
    type Output = Tick;
    #[inline]
    fn add(self, rhs: u32) -> Tick {
        Tick(self.0 + rhs)
    }
}

impl std::ops::Sub for Tick {
    type Output = u32;
    #[inline]
    fn sub(self, rhs: Tick) -> u32 {
        self.0 - rhs.0
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

// ── TimeGrid ──────────────────────────────────────────────────────────────────

/// Converts between "HH:MM:SS" wall-clock strings and tick counts.
///
/// `TimeGrid` is cheap to copy and intentionally holds no heap data.
#[derive(Clone, Debug)]
pub struct TimeGrid {
    /// How many wall-clock seconds one tick represents.  Default: 10.
    pub speed_factor: u32,
}

impl TimeGrid {
    /// Create a grid with the given resolution.
    ///
    /// `speed_factor` must be non-zero and divide 3 600 so that hour
    /// boundaries land exactly on ticks.
    pub fn new(speed_factor: u32) -> CoreResult<Self> {
        if speed_factor == 0 || 3_600 % speed_factor != 0 {
            return Err(CoreError::Config(format!(
                "speed factor {speed_factor} must be a non-zero divisor of 3600"
            )));
        }
        Ok(Self { speed_factor })
    }

    /// Parse a "HH:MM:SS" string into a tick (integer division by the
    /// speed factor).
    ///
    /// Round-trips with [`to_wall`][Self::to_wall] exactly when the wall
    /// string is a multiple of `speed_factor` seconds.
    pub fn to_tick(&self, wall: &str) -> CoreResult<Tick> {
        let mut parts = wall.splitn(3, ':');
        let (h, m, s) = match (parts.next(), parts.next(), parts.next()) {
            (Some(h), Some(m), Some(s)) => (h, m, s),
            _ => return Err(CoreError::Time(wall.to_string())),
        };
        let parse = |p: &str| {
            p.parse::<u32>()
                .map_err(|_| CoreError::Time(wall.to_string()))
        };
        let (h, m, s) = (parse(h)?, parse(m)?, parse(s)?);
        if m >= 60 || s >= 60 {
            return Err(CoreError::Time(wall.to_string()));
        }
        Ok(Tick((h * 3_600 + m * 60 + s) / self.speed_factor))
    }

    /// Format a tick as a "HH:MM:SS" string.
    pub fn to_wall(&self, tick: Tick) -> String {
        let secs = tick.0 * self.speed_factor;
        format!(
            "{:02}:{:02}:{:02}",
            secs / 3_600,
            (secs % 3_600) / 60,
            secs % 60
        )
    }

    // ── Tick-count helpers ────────────────────────────────────────────────

    /// Ticks per simulated hour.
    #[inline]
    pub fn ticks_per_hour(&self) -> u32 {
        3_600 / self.speed_factor
    }

    /// The final tick of the simulated day (24:00:00, inclusive).
    #[inline]
    pub fn end_of_day(&self) -> Tick {
        Tick(86_400 / self.speed_factor)
    }

    /// The hour-of-day (0–23) a tick falls in; `end_of_day` maps to 24.
    #[inline]
    pub fn hour_of(&self, tick: Tick) -> u32 {
        tick.0 / self.ticks_per_hour()
    }

    /// Convert a (possibly fractional) tick count into whole minutes,
    /// truncating.  Used for report columns.
    #[inline]
    pub fn ticks_to_minutes(&self, ticks: f64) -> u32 {
        (ticks * self.speed_factor as f64 / 60.0) as u32
    }
}
