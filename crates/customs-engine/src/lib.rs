//! `customs-engine` — the discrete-event customs-hall engine.
//!
//! The hall is two parallel lanes (domestic and foreign nationals).  Each
//! lane is a single unbounded feeder queue draining into a block of booths
//! by a shortest-queue rule; each booth holds a bounded mini-queue and at
//! most one passenger in service.  A fixed-order tick loop drives the whole
//! thing from 00:00:00 to 24:00:00 inclusive.
//!
//! | Module        | Contents                                            |
//! |---------------|-----------------------------------------------------|
//! | [`passenger`] | `Passenger`, `Plane` value records                  |
//! | [`booth`]     | `ServiceAgent` — one booth's state machine          |
//! | [`block`]     | `ParallelServer` — a lane's booth block             |
//! | [`feeder`]    | `AssignmentAgent` — the per-lane feeder queue       |
//! | [`section`]   | `Subsection` — one lane (feeder + block)            |
//! | [`customs`]   | `Customs` — routing, staffing, statistics           |
//! | [`sim`]       | `Simulation` — the tick loop                        |
//! | [`roster`]    | `RosterSource` trait, `MemoryRoster`                |
//! | [`observer`]  | `SimObserver` callbacks                             |
//!
//! The engine is single-threaded and deterministic: given the same roster,
//! schedule, and time grid, two runs produce identical outcomes.

pub mod block;
pub mod booth;
pub mod customs;
pub mod error;
pub mod feeder;
pub mod observer;
pub mod passenger;
pub mod roster;
pub mod section;
pub mod sim;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use block::ParallelServer;
pub use booth::ServiceAgent;
pub use customs::{Customs, Population, ServerStats, ServicedPassengers};
pub use error::{SimError, SimResult};
pub use feeder::AssignmentAgent;
pub use observer::{NoopObserver, SimObserver};
pub use passenger::{Passenger, Plane};
pub use roster::{MemoryRoster, RosterSource};
pub use section::Subsection;
pub use sim::{SimSummary, Simulation};
