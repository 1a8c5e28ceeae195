//! `customs-core` — foundational types for the customs-sim workspace.
//!
//! This crate is a dependency of every other `customs-*` crate.  It
//! intentionally has no `customs-*` dependencies and minimal external ones
//! (only `rand` and `thiserror`).
//!
//! # What lives here
//!
//! | Module     | Contents                                                |
//! |------------|---------------------------------------------------------|
//! | [`ids`]    | `PassengerId`, `PlaneId`, `BoothId`                     |
//! | [`lane`]   | `Lane` enum (domestic / foreign)                        |
//! | [`time`]   | `Tick`, `TimeGrid`                                      |
//! | [`rng`]    | `PassengerRng` (per-passenger deterministic RNG)        |
//! | [`dist`]   | `Triangular` service-time sampler                       |
//! | [`params`] | `SimParams`, `WallTriple`                               |
//! | [`error`]  | `CoreError`, `CoreResult`                               |

pub mod dist;
pub mod error;
pub mod ids;
pub mod lane;
pub mod params;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use dist::Triangular;
pub use error::{CoreError, CoreResult};
pub use ids::{BoothId, PassengerId, PlaneId};
pub use lane::Lane;
pub use params::{SimParams, WallTriple};
pub use rng::PassengerRng;
pub use time::{Tick, TimeGrid};
