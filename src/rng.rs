//! Seedable random source owned by each world.
//!
//! Every [World](crate::World) holds its own generator, so worlds stepped on
//! different threads never share state and a seed fully determines placement.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

/// A deterministic random number generator for vehicle spawning.
#[derive(Clone, Debug)]
pub struct TrafficRng(SmallRng);

impl TrafficRng {
    /// Creates a generator from a seed.
    pub fn new(seed: u64) -> Self {
        TrafficRng(SmallRng::seed_from_u64(seed))
    }

    /// Derives an independent generator, e.g. one per parallel rollout.
    pub fn child(&mut self, offset: u64) -> TrafficRng {
        let seed = self.0.gen::<u64>() ^ offset.wrapping_mul(MIXING_CONSTANT);
        TrafficRng(SmallRng::seed_from_u64(seed))
    }

    /// Exposes the inner generator for use with `rand` distributions.
    #[inline]
    pub fn inner(&mut self) -> &mut SmallRng {
        &mut self.0
    }

    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }

    /// Shuffles a slice in place.
    #[inline]
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        use rand::seq::SliceRandom;
        slice.shuffle(&mut self.0);
    }
}
