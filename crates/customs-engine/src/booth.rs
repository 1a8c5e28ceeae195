//! `ServiceAgent` — a single inspection booth.
//!
//! # State machine
//!
//! A booth is in one of three states each tick: offline (dark), idle, or
//! serving.  `serve` evaluates the transitions at most once per tick:
//!
//! 1. Offline, nobody in service, empty mini-queue → nothing to do.
//! 2. Mid-transaction (`departure_time > now`) → keep serving.
//! 3. Transaction completes exactly at `now` → finish the passenger and
//!    stop.  The next pickup happens on a later tick — a booth never
//!    completes and starts anew within one tick, so successive completions
//!    are always more than `service_time` ticks apart.
//! 4. Online, not serving, with a non-empty mini-queue → pick up the head
//!    and fix its departure to `now + service_time`.
//! 5. Otherwise idle.
//!
//! Going offline never preempts the transaction in progress, but a dark
//! booth starts nothing new: passengers already in its mini-queue stay put
//! until the booth is staffed again, and the lane dispatcher stops sending
//! it more.

use std::collections::{BTreeMap, VecDeque};

use customs_core::{BoothId, Lane, Tick};

use crate::customs::ServicedPassengers;
use crate::Passenger;

/// One booth: an online flag, a bounded mini-queue, and at most one
/// passenger in service.
pub struct ServiceAgent {
    pub id:   BoothId,
    pub lane: Lane,

    /// Whether the hourly schedule currently staffs this booth.
    pub online: bool,

    queue:    VecDeque<Passenger>,
    capacity: usize,
    current:  Option<Passenger>,

    // ── Utilization accounting (see `record_utilization`) ─────────────────
    utilization:        f64,
    utilization_anchor: Tick,
    hourly:             BTreeMap<u32, f64>,
}

impl ServiceAgent {
    pub(crate) fn new(id: BoothId, lane: Lane, capacity: usize) -> Self {
        debug_assert!(capacity >= 1);
        Self {
            id,
            lane,
            online: false,
            queue: VecDeque::with_capacity(capacity),
            capacity,
            current: None,
            utilization: 0.0,
            utilization_anchor: Tick::ZERO,
            hourly: BTreeMap::new(),
        }
    }

    // ── Introspection ─────────────────────────────────────────────────────

    #[inline]
    pub fn is_serving(&self) -> bool {
        self.current.is_some()
    }

    #[inline]
    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    /// Room for another passenger in the mini-queue?
    #[inline]
    pub fn has_space(&self) -> bool {
        self.queue.len() < self.capacity
    }

    pub fn current(&self) -> Option<&Passenger> {
        self.current.as_ref()
    }

    /// Utilization snapshots by hour of day.  Hours the booth spent fully
    /// offline have no entry.
    pub fn hourly_series(&self) -> &BTreeMap<u32, f64> {
        &self.hourly
    }

    // ── Mutation ──────────────────────────────────────────────────────────

    pub(crate) fn enqueue(&mut self, passenger: Passenger) {
        debug_assert!(self.has_space(), "dispatch into a full booth queue");
        self.queue.push_back(passenger);
    }

    /// Advance the booth's state machine by one tick.
    pub(crate) fn serve(&mut self, now: Tick, sink: &mut ServicedPassengers) {
        if !self.online && self.current.is_none() && self.queue.is_empty() {
            return;
        }

        if let Some(current) = self.current.as_ref() {
            if current.departure_time.is_some_and(|dep| dep == now) {
                if let Some(mut done) = self.current.take() {
                    done.processed = true;
                    sink.push(done);
                }
            }
            // Either mid-transaction or just completed; in both cases the
            // next pickup waits for a later tick.
            return;
        }

        // A dark booth starts no new transactions; anyone queued behind it
        // stays put until the booth is staffed again.
        if !self.online {
            return;
        }
        if let Some(mut next) = self.queue.pop_front() {
            next.departure_time = Some(now + next.service_time);
            self.current = Some(next);
        }
    }

    /// Per-tick utilization update, plus the hourly snapshot at the last
    /// tick of each hour.
    ///
    /// The running value is an incremental mean of a busy/idle indicator
    /// over the window since `utilization_anchor`; the snapshot is thus the
    /// time-weighted fraction of the past hour the booth was busy or had
    /// waiters.  While a booth is offline, idle, and has never been used
    /// this window (`utilization == 0`), the anchor follows `now` so dead
    /// time before first use is excluded.
    pub(crate) fn record_utilization(&mut self, now: Tick, ticks_per_hour: u32) {
        let busy = self.current.is_some() || !self.queue.is_empty();

        if !busy && !self.online && self.utilization == 0.0 {
            self.utilization_anchor = now;
        } else {
            let target = if busy { 1.0 } else { 0.0 };
            let span = now - self.utilization_anchor;
            if span == 0 {
                self.utilization = target;
            } else {
                self.utilization += (target - self.utilization) / span as f64;
            }
        }

        if (now.0 + 1) % ticks_per_hour == 0 && self.online {
            let hour = (now.0 + 1) / ticks_per_hour - 1;
            self.hourly.insert(hour, self.utilization);
            self.utilization = 0.0;
            self.utilization_anchor = now + 1;
        }
    }

    // ── Accounting ────────────────────────────────────────────────────────

    /// `(waiting, in_service)` headcount at this booth.
    pub(crate) fn headcount(&self) -> (usize, usize) {
        (self.queue.len(), usize::from(self.current.is_some()))
    }
}
