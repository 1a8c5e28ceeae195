//! The day's roster, materialised in memory.
//!
//! `Roster::load` runs the international-arrivals selection once, pulls
//! every manifest, and buckets the resulting planes by arrival tick.
//! Simulation runs then borrow it through a [`PlaneDispatcher`], which
//! clones planes out on demand — so repeated optimizer passes replay the
//! identical day without touching the connection from inside the tick
//! loop.

use std::collections::BTreeMap;
use std::str::FromStr;

use customs_core::{Lane, PassengerId, PlaneId, Tick, TimeGrid};
use customs_engine::{Passenger, Plane, RosterSource, SimResult};

use crate::{CustomsDb, StoreError, StoreResult};

// ── Roster ────────────────────────────────────────────────────────────────────

/// All roster planes for one day, keyed by arrival tick.
#[derive(Debug)]
pub struct Roster {
    by_tick:         BTreeMap<Tick, Vec<Plane>>,
    plane_count:     u64,
    passenger_count: u64,
}

impl Roster {
    /// Materialise the roster.  Requires a prior
    /// [`assign_service_times`][CustomsDb::assign_service_times] pass —
    /// a roster passenger without a service time is an inconsistency.
    pub fn load(db: &CustomsDb, grid: &TimeGrid) -> StoreResult<Self> {
        let mut by_tick: BTreeMap<Tick, Vec<Plane>> = BTreeMap::new();
        let mut plane_count = 0u64;
        let mut passenger_count = 0u64;

        for flight in db.roster_flights()? {
            let arrival = grid.to_tick(&flight.arrival_time).map_err(|e| {
                StoreError::RosterInconsistency(format!("flight {}: {e}", flight.flight_num))
            })?;

            let mut passengers = Vec::new();
            for (id, nationality, service_time) in db.manifest(&flight.flight_num)? {
                let lane = Lane::from_str(&nationality).map_err(|e| {
                    StoreError::RosterInconsistency(format!("passenger {id}: {e}"))
                })?;
                let service_time = service_time.ok_or_else(|| {
                    StoreError::RosterInconsistency(format!(
                        "passenger {id} has no service time; run roster preparation first"
                    ))
                })?;
                passengers.push(Passenger::new(
                    PassengerId(id),
                    flight.flight_num.as_str(),
                    lane,
                    arrival,
                    service_time,
                ));
            }

            plane_count += 1;
            passenger_count += passengers.len() as u64;
            by_tick.entry(arrival).or_default().push(Plane::new(
                PlaneId(flight.id),
                flight.flight_num,
                flight.origin,
                arrival,
                passengers,
            ));
        }

        tracing::debug!(planes = plane_count, passengers = passenger_count, "roster loaded");
        Ok(Self { by_tick, plane_count, passenger_count })
    }

    pub fn plane_count(&self) -> u64 {
        self.plane_count
    }

    pub fn passenger_count(&self) -> u64 {
        self.passenger_count
    }

    /// A fresh dispatcher over this roster for one simulation run.
    pub fn dispatcher(&self) -> PlaneDispatcher<'_> {
        PlaneDispatcher { roster: self, dispatched_planes: 0, dispatched_passengers: 0 }
    }
}

// ── PlaneDispatcher ───────────────────────────────────────────────────────────

/// Per-run roster cursor; hands the tick loop clones of the materialised
/// planes and counts what it dispatched.
pub struct PlaneDispatcher<'a> {
    roster:                &'a Roster,
    dispatched_planes:     u64,
    dispatched_passengers: u64,
}

impl PlaneDispatcher<'_> {
    pub fn dispatched_planes(&self) -> u64 {
        self.dispatched_planes
    }

    pub fn dispatched_passengers(&self) -> u64 {
        self.dispatched_passengers
    }
}

impl RosterSource for PlaneDispatcher<'_> {
    fn planes_at(&mut self, now: Tick) -> SimResult<Vec<Plane>> {
        let planes = match self.roster.by_tick.get(&now) {
            None         => Vec::new(),
            Some(planes) => planes.clone(),
        };
        self.dispatched_planes += planes.len() as u64;
        self.dispatched_passengers += planes
            .iter()
            .map(|p| p.passenger_count() as u64)
            .sum::<u64>();
        Ok(planes)
    }
}
