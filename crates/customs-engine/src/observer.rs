//! Simulation observer trait for progress reporting and persistence.

use customs_core::Tick;

use crate::{Customs, Passenger};

/// Callbacks invoked by [`Simulation::run`][crate::Simulation::run] at key
/// points in the tick loop.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.  Observer methods return nothing; an
/// observer that can fail (e.g. a store writer) should hold its first error
/// internally and expose it after the run.
pub trait SimObserver {
    /// Called at the very start of each tick, before any processing.
    fn on_tick_start(&mut self, _now: Tick) {}

    /// Called whenever passengers completed service this tick, after the
    /// serve phase.  The slice is this tick's batch, in completion order.
    fn on_serviced(&mut self, _now: Tick, _serviced: &[Passenger]) {}

    /// Called at the end of each tick with read access to the hall, for
    /// status reporting.
    fn on_tick_end(&mut self, _now: Tick, _customs: &Customs) {}

    /// Called once after the final tick completes.
    fn on_sim_end(&mut self, _final_tick: Tick) {}
}

/// A [`SimObserver`] that does nothing.  Use when you need to call `run`
/// but don't want callbacks.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
