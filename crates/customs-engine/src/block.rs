//! `ParallelServer` — one lane's block of booths.

use customs_core::{BoothId, Lane, Tick};

use crate::customs::ServicedPassengers;
use crate::{Passenger, ServiceAgent};

/// An ordered block of [`ServiceAgent`]s with cached dispatch state.
///
/// `update_state` recomputes the cache in one O(n) scan and must run after
/// every dispatch into the block — the assignment loop in
/// [`Subsection::assign_passengers`][crate::Subsection::assign_passengers]
/// does exactly that — and at least once per tick so `online_count` stays
/// current for status reporting.
pub struct ParallelServer {
    booths: Vec<ServiceAgent>,

    /// Index of the online, non-full booth with the shortest mini-queue;
    /// ties break to the lowest index.
    min_queue: Option<usize>,

    /// Any online booth with queue space?
    has_space: bool,

    /// Total passengers waiting in booth mini-queues.
    queue_size: usize,

    online_count: usize,
}

impl ParallelServer {
    pub(crate) fn new(lane: Lane, booth_count: u32, capacity: usize) -> Self {
        let booths = (0..booth_count)
            .map(|i| ServiceAgent::new(BoothId(i), lane, capacity))
            .collect();
        let mut block = Self {
            booths,
            min_queue: None,
            has_space: false,
            queue_size: 0,
            online_count: 0,
        };
        block.update_state();
        block
    }

    // ── Cached dispatch state ─────────────────────────────────────────────

    pub fn update_state(&mut self) {
        let mut min_queue: Option<usize> = None;
        let mut queue_size = 0;
        let mut online_count = 0;

        for (idx, booth) in self.booths.iter().enumerate() {
            queue_size += booth.queue_len();
            if !booth.online {
                continue;
            }
            online_count += 1;
            if !booth.has_space() {
                continue;
            }
            let better = match min_queue {
                None => true,
                Some(cur) => booth.queue_len() < self.booths[cur].queue_len(),
            };
            if better {
                min_queue = Some(idx);
            }
        }

        self.min_queue = min_queue;
        self.has_space = min_queue.is_some();
        self.queue_size = queue_size;
        self.online_count = online_count;
    }

    #[inline]
    pub fn has_space(&self) -> bool {
        self.has_space
    }

    #[inline]
    pub fn min_queue(&self) -> Option<usize> {
        self.min_queue
    }

    #[inline]
    pub fn queue_size(&self) -> usize {
        self.queue_size
    }

    #[inline]
    pub fn online_count(&self) -> usize {
        self.online_count
    }

    pub fn booths(&self) -> &[ServiceAgent] {
        &self.booths
    }

    #[cfg(test)]
    pub(crate) fn booths_mut(&mut self) -> &mut [ServiceAgent] {
        &mut self.booths
    }

    // ── Per-tick processing ───────────────────────────────────────────────

    pub(crate) fn enqueue_at(&mut self, idx: usize, passenger: Passenger) {
        self.booths[idx].enqueue(passenger);
    }

    /// Run every booth's state machine, in list order.
    pub(crate) fn service_passengers(&mut self, now: Tick, sink: &mut ServicedPassengers) {
        for booth in &mut self.booths {
            booth.serve(now, sink);
        }
    }

    pub(crate) fn record_utilization(&mut self, now: Tick, ticks_per_hour: u32) {
        for booth in &mut self.booths {
            booth.record_utilization(now, ticks_per_hour);
        }
    }

    /// Staff the first `n` booths, in list order, and unstaff the rest.
    ///
    /// Deterministic and stable across hours: the online set at any hour is
    /// always a prefix of the block.
    pub(crate) fn set_online_prefix(&mut self, n: u32) {
        for (idx, booth) in self.booths.iter_mut().enumerate() {
            booth.online = (idx as u32) < n;
        }
    }
}
