//! `Subsection` — one lane: a feeder queue bound to a booth block.

use customs_core::Lane;

use crate::{AssignmentAgent, ParallelServer};

/// One processing lane of the hall.
pub struct Subsection {
    pub lane:   Lane,
    pub feeder: AssignmentAgent,
    pub block:  ParallelServer,
}

impl Subsection {
    pub(crate) fn new(lane: Lane, booth_count: u32, capacity: usize) -> Self {
        Self {
            lane,
            feeder: AssignmentAgent::new(),
            block: ParallelServer::new(lane, booth_count, capacity),
        }
    }

    /// Drain the feeder into the block while any online booth has space.
    ///
    /// The block state is recomputed after every move, so `min_queue` is
    /// always the current shortest online, non-full booth.  Once a
    /// passenger joins a booth's mini-queue it stays there — there is no
    /// rebalancing between booths.
    pub fn assign_passengers(&mut self) {
        loop {
            self.block.update_state();
            if !self.block.has_space() || self.feeder.is_empty() {
                break;
            }
            let Some(idx) = self.block.min_queue() else {
                break;
            };
            if let Some(passenger) = self.feeder.pop() {
                self.block.enqueue_at(idx, passenger);
            }
        }
    }
}
