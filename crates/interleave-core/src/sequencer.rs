//! Uniform random draw and shuffle primitive shared by every component.
//!
//! Unseeded in normal operation. Tests and reproducible runs construct it
//! with [`RandomSequencer::seeded`] and get the same sequence every time.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// Source of randomness for pattern generation, quiz shuffling and card
/// sampling.
#[derive(Debug, Clone)]
pub struct RandomSequencer {
    rng: StdRng,
}

impl RandomSequencer {
    /// A sequencer seeded from operating-system entropy.
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// A deterministic sequencer.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Uniform index in `0..upper`. Returns 0 when `upper` is 0.
    pub fn draw(&mut self, upper: usize) -> usize {
        if upper == 0 {
            return 0;
        }
        self.rng.gen_range(0..upper)
    }

    /// Uniformly chosen element, or `None` for an empty slice.
    pub fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        items.choose(&mut self.rng)
    }

    /// In-place Fisher-Yates shuffle.
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        items.shuffle(&mut self.rng);
    }
}

impl Default for RandomSequencer {
    fn default() -> Self {
        Self::new()
    }
}
