//! Deterministic per-passenger RNG.
//!
//! # Determinism strategy
//!
//! Each passenger draws its randomized traits from its own `SmallRng` seeded
//! by:
//!
//!   seed = global_seed XOR (passenger_id * MIXING_CONSTANT)
//!
//! The mixing constant is the 64-bit fractional part of the golden ratio,
//! which spreads consecutive IDs uniformly across the seed space.  Adding
//! passengers to the end of a descriptor file therefore never changes the
//! traits of the passengers before them.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::PassengerId;

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

/// Per-passenger deterministic RNG.
pub struct PassengerRng(SmallRng);

impl PassengerRng {
    /// Seed deterministically from the run's global seed and a passenger ID.
    pub fn new(global_seed: u64, passenger: PassengerId) -> Self {
        let seed = global_seed ^ (passenger.0 as u64).wrapping_mul(MIXING_CONSTANT);
        PassengerRng(SmallRng::seed_from_u64(seed))
    }

    #[inline]
    pub fn inner(&mut self) -> &mut SmallRng {
        &mut self.0
    }

    /// Sample a uniformly distributed value of any `Standard`-distributed type.
    #[inline]
    pub fn random<T>(&mut self) -> T
    where
        rand::distributions::Standard: rand::distributions::Distribution<T>,
    {
        self.0.r#gen()
    }

    /// Generate a value uniformly in `range`.
    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }

    /// `true` with probability `p` (clamped to [0, 1]).
    #[inline]
    pub fn gen_bool(&mut self, p: f64) -> bool {
        self.0.gen_bool(p.clamp(0.0, 1.0))
    }
}
