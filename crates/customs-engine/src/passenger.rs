//! Passenger and plane value records.
//!
//! Both are plain data: a plane is created at its dispatch tick, drained
//! into the lane feeders the same tick, and discarded.  Passengers migrate
//! by move from plane to feeder to booth to the serviced sink — they are
//! never shared.

use customs_core::{Lane, PassengerId, PlaneId, Tick};

// ── Passenger ─────────────────────────────────────────────────────────────────

/// One traveller moving through the hall.
///
/// All time fields are ticks; wall-clock strings exist only in the store.
/// `departure_time` is `None` until a booth picks the passenger up, then
/// fixed to `pickup + service_time`.  It is retained after completion —
/// the wait statistics are derived from it.
#[derive(Clone, Debug)]
pub struct Passenger {
    pub id:          PassengerId,
    pub flight_num:  String,
    pub nationality: Lane,

    /// Tick the passenger joined its lane's feeder queue (= flight arrival).
    pub enqueue_time: Tick,

    /// Pre-sampled booth transaction length.  Always ≥ 1 tick.
    pub service_time: u32,

    /// Completion tick, fixed at booth pickup.
    pub departure_time: Option<Tick>,

    /// Set when the booth transaction completes.
    pub processed: bool,
}

impl Passenger {
    pub fn new(
        id:           PassengerId,
        flight_num:   impl Into<String>,
        nationality:  Lane,
        enqueue_time: Tick,
        service_time: u32,
    ) -> Self {
        debug_assert!(service_time >= 1, "service time must be at least one tick");
        Self {
            id,
            flight_num: flight_num.into(),
            nationality,
            enqueue_time,
            service_time,
            departure_time: None,
            processed: false,
        }
    }

    /// Ticks from feeder entry to (scheduled) completion, once a booth has
    /// picked the passenger up.
    pub fn wait_ticks(&self) -> Option<u32> {
        self.departure_time.map(|d| d - self.enqueue_time)
    }
}

// ── Plane ─────────────────────────────────────────────────────────────────────

/// One arriving flight and its manifest.
#[derive(Clone, Debug)]
pub struct Plane {
    pub id:           PlaneId,
    pub flight_num:   String,
    pub origin:       String,
    pub arrival_time: Tick,
    pub passengers:   Vec<Passenger>,
}

impl Plane {
    pub fn new(
        id:           PlaneId,
        flight_num:   impl Into<String>,
        origin:       impl Into<String>,
        arrival_time: Tick,
        passengers:   Vec<Passenger>,
    ) -> Self {
        Self {
            id,
            flight_num: flight_num.into(),
            origin: origin.into(),
            arrival_time,
            passengers,
        }
    }

    pub fn passenger_count(&self) -> usize {
        self.passengers.len()
    }

    /// How many of this plane's passengers route to `lane`.
    pub fn count_for(&self, lane: Lane) -> usize {
        self.passengers.iter().filter(|p| p.nationality == lane).count()
    }
}
