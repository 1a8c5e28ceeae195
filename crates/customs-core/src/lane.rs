//! Processing-lane enum shared across all customs-sim crates.
//!
//! An international-arrivals hall splits passengers into two channels:
//! nationals of the destination country and everyone else.  Every passenger
//! visits exactly the lane matching its nationality; a nationality outside
//! this set is a fatal roster error at load time, never a runtime branch.

use std::str::FromStr;

use crate::{CoreError, CoreResult};

/// One of the two processing channels of the customs hall.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Lane {
    /// Nationals of the destination country.
    Domestic,
    /// Foreign nationals.
    Foreign,
}

impl Lane {
    /// Both lanes, in the fixed processing order of the tick loop.
    pub const ALL: [Lane; 2] = [Lane::Domestic, Lane::Foreign];

    /// Human-readable label, matching the store's `nationality` column and
    /// the schedule CSV's `subsection` column.
    pub fn as_str(self) -> &'static str {
        match self {
            Lane::Domestic => "domestic",
            Lane::Foreign  => "foreign",
        }
    }

    /// Position of this lane in [`Lane::ALL`], for indexing per-lane arrays.
    #[inline(always)]
    pub fn index(self) -> usize {
        match self {
            Lane::Domestic => 0,
            Lane::Foreign  => 1,
        }
    }
}

impl FromStr for Lane {
    type Err = CoreError;

    fn from_str(s: &str) -> CoreResult<Lane> {
        match s {
            "domestic" => Ok(Lane::Domestic),
            "foreign"  => Ok(Lane::Foreign),
            other      => Err(CoreError::UnknownLane(other.to_string())),
        }
    }
}

impl std::fmt::Display for Lane {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
