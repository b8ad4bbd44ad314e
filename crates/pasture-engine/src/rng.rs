//! Per-agent random streams.
//!
//! The model owns one `ChaCha8Rng` (the shared stream). Every agent gets
//! its own [`AgentRng`] seeded by a `u64` drawn from whoever created it:
//! the shared stream for agents placed at initialisation, the parent's
//! stream for newborns. Behaviours only ever draw from the acting agent's
//! stream, so a run is reproducible from the config seed alone.

use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// An agent's private pseudo-random stream.
#[derive(Clone, Debug)]
pub struct AgentRng(ChaCha8Rng);

impl AgentRng {
    /// A stream seeded directly from `seed`.
    pub fn seed_from_u64(seed: u64) -> Self {
        Self(ChaCha8Rng::seed_from_u64(seed))
    }

    /// A stream whose seed is drawn from `parent`.
    pub fn derive_from<R: Rng>(parent: &mut R) -> Self {
        Self::seed_from_u64(parent.random())
    }

    /// Draw a seed for a child stream.
    pub fn next_seed(&mut self) -> u64 {
        self.0.random()
    }

    /// Uniform draw in `[0, 1)`.
    pub fn unit(&mut self) -> f64 {
        self.0.random()
    }

    /// Uniformly chosen element of `items`, `None` if empty.
    pub fn pick<T: Copy>(&mut self, items: &[T]) -> Option<T> {
        items.choose(&mut self.0).copied()
    }
}
