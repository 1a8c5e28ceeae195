//! `StoreOutcomeObserver` — bridges the engine's observer hooks to the
//! store's batched outcome writes.

use customs_core::{PassengerId, Tick};
use customs_engine::{Passenger, SimObserver};

use crate::{CustomsDb, StoreError};

/// Buffered rows are flushed once this many accumulate, and again at end
/// of day.
pub const FLUSH_THRESHOLD: usize = 1_000;

/// One completion outcome, ready to be written back to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutcomeRow {
    pub id:             PassengerId,
    pub departure_time: Tick,
}

/// A [`SimObserver`] that persists per-passenger outcomes.
///
/// Observer methods have no return value, so write errors are stored
/// internally — only the first one, later failures are usually cascade
/// noise.  After `sim.run()` returns, check with
/// [`take_error`][Self::take_error].
pub struct StoreOutcomeObserver<'a> {
    db:         &'a CustomsDb,
    buffer:     Vec<OutcomeRow>,
    written:    u64,
    last_error: Option<StoreError>,
}

impl<'a> StoreOutcomeObserver<'a> {
    pub fn new(db: &'a CustomsDb) -> Self {
        Self {
            db,
            buffer: Vec::with_capacity(FLUSH_THRESHOLD),
            written: 0,
            last_error: None,
        }
    }

    /// Take the stored write error (if any) after the run.
    pub fn take_error(&mut self) -> Option<StoreError> {
        self.last_error.take()
    }

    /// Outcome rows written to the store so far.
    pub fn written(&self) -> u64 {
        self.written
    }

    fn flush(&mut self) {
        if self.buffer.is_empty() {
            return;
        }
        match self.db.write_outcomes(&self.buffer) {
            Ok(()) => {
                self.written += self.buffer.len() as u64;
                tracing::debug!(rows = self.buffer.len(), total = self.written, "outcome flush");
                self.buffer.clear();
            }
            Err(e) => {
                if self.last_error.is_none() {
                    self.last_error = Some(e);
                }
                self.buffer.clear();
            }
        }
    }
}

impl SimObserver for StoreOutcomeObserver<'_> {
    fn on_serviced(&mut self, _now: Tick, serviced: &[Passenger]) {
        for passenger in serviced {
            // A serviced passenger always carries a departure time.
            if let Some(departure_time) = passenger.departure_time {
                self.buffer.push(OutcomeRow { id: passenger.id, departure_time });
            }
        }
        if self.buffer.len() >= FLUSH_THRESHOLD {
            self.flush();
        }
    }

    fn on_sim_end(&mut self, _final_tick: Tick) {
        self.flush();
    }
}
