//! Deterministic per-passenger RNG.
//!
//! # Determinism strategy
//!
//! Each passenger gets its own independent `SmallRng` seeded by:
//!
//!   seed = global_seed XOR (passenger_id * MIXING_CONSTANT)
//!
//! The mixing constant is the 64-bit fractional part of the golden ratio,
//! which spreads consecutive passenger ids uniformly across the seed space.
//! This means:
//!
//! - A passenger's service-time draw does not depend on the order in which
//!   the roster is iterated.
//! - Re-running roster preparation with the same global seed reproduces the
//!   same draws exactly, which the optimizer relies on across its repeated
//!   simulation passes.

use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::PassengerId;

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

/// Per-passenger deterministic RNG.
pub struct PassengerRng(SmallRng);

impl PassengerRng {
    /// Seed deterministically from the run's global seed and a passenger id.
    pub fn new(global_seed: u64, passenger: PassengerId) -> Self {
        let seed = global_seed ^ (passenger.0 as u64).wrapping_mul(MIXING_CONSTANT);
        PassengerRng(SmallRng::seed_from_u64(seed))
    }

    /// Expose the inner `SmallRng` for use with sampler types.
    #[inline]
    pub fn inner(&mut self) -> &mut SmallRng {
        &mut self.0
    }
}
