//! `customs-store` — the persistent side of customs-sim.
//!
//! A single SQLite file holds the scraped day: `arrivals`, `airports`,
//! `planes`, and `passengers`.  This crate wraps it three ways:
//!
//! - [`CustomsDb`] — connection handle, schema management, roster-prep
//!   sampling pass, batched outcome writes, and the hourly wait
//!   aggregation the report and optimizer read.
//! - [`Roster`] / [`PlaneDispatcher`] — the day's arrivals materialised in
//!   memory, bucketed by tick, serving the engine's
//!   [`RosterSource`][customs_engine::RosterSource] contract.  The tick
//!   loop never touches the connection.
//! - [`StoreOutcomeObserver`] — a [`SimObserver`][customs_engine::SimObserver]
//!   that buffers per-passenger outcomes and flushes them in 1 000-row
//!   transactions.

pub mod db;
pub mod error;
pub mod observer;
pub mod roster;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use db::{CustomsDb, WaitStats};
pub use error::{StoreError, StoreResult};
pub use observer::{OutcomeRow, StoreOutcomeObserver, FLUSH_THRESHOLD};
pub use roster::{PlaneDispatcher, Roster};
