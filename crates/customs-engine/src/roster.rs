//! The roster-source contract and an in-memory implementation.

use std::collections::BTreeMap;

use customs_core::Tick;

use crate::{Plane, SimResult};

/// Supplies the day's arrivals to the tick loop.
///
/// `planes_at` is called exactly once per tick, in ascending tick order,
/// and returns the planes whose arrival time maps to that tick (usually
/// none).  Implementations own whatever id bookkeeping they need; the
/// engine treats the roster as opaque.
pub trait RosterSource {
    fn planes_at(&mut self, now: Tick) -> SimResult<Vec<Plane>>;
}

/// A roster held entirely in memory, bucketed by arrival tick.
///
/// Used by tests and demos; production rosters are materialised from the
/// persistent store.
pub struct MemoryRoster {
    by_tick: BTreeMap<Tick, Vec<Plane>>,
}

impl MemoryRoster {
    pub fn new(planes: Vec<Plane>) -> Self {
        let mut by_tick: BTreeMap<Tick, Vec<Plane>> = BTreeMap::new();
        for plane in planes {
            by_tick.entry(plane.arrival_time).or_default().push(plane);
        }
        Self { by_tick }
    }
}

impl RosterSource for MemoryRoster {
    fn planes_at(&mut self, now: Tick) -> SimResult<Vec<Plane>> {
        Ok(self.by_tick.remove(&now).unwrap_or_default())
    }
}
