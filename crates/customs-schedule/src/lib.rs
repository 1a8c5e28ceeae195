//! `customs-schedule` — the per-lane hourly booth schedule.
//!
//! A schedule names, for each lane and each hour of the day, how many
//! inspection booths are staffed, plus a per-lane ceiling (`max`) on how
//! many can be staffed at once.  The engine applies it at hour boundaries;
//! the optimizer rewrites it between simulation passes.
//!
//! # CSV format
//!
//! One row per lane:
//!
//! ```csv
//! id,subsection,max,0,1,2, … ,23
//! 0,domestic,10,4,4,3, … ,2
//! 1,foreign,14,6,6,5, … ,3
//! ```

pub mod error;
pub mod loader;
pub mod schedule;


pub use error::{ScheduleError, ScheduleResult};
pub use loader::{load_schedule_csv, load_schedule_reader, write_schedule_csv, write_schedule_writer};
pub use schedule::{LaneSchedule, ServerSchedule, HOURS};
