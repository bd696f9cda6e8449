//! Seed-sequence spawning.
//!
//! Every trial gets its own child seed derived from `(entropy, trial index)`.
//! The derivation depends only on the trial index, never on which worker runs
//! the trial, so any worker count reproduces the sequential run.
//!
//! ## Streams
//!
//! A child seed drives two ChaCha streams:
//! - [`stream::MODEL`]: game and player draws
//! - [`stream::SHOCK`]: correlated shock normals
//!
//! Keeping shocks on their own stream means toggling correlations leaves the
//! independent draws untouched.

use fxhash::FxHasher;
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::hash::{Hash, Hasher};

/// Stream ids passed to [`ChaCha8Rng::set_stream`].
pub mod stream {
    pub const MODEL: u64 = 0;
    pub const SHOCK: u64 = 1;
}

/// Domain separator for trial seeds.
const TRIAL_DOMAIN: u32 = 0x5EED_0001;

/// SplitMix64 finalizer. Spreads FxHash output over all 64 bits.
#[inline]
fn mix64(mut z: u64) -> u64 {
    z = z.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Root of a run's seed tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedSequence {
    entropy: u64,
}

impl SeedSequence {
    pub fn new(entropy: u64) -> Self {
        Self { entropy }
    }

    /// Fresh OS-seeded entropy for unseeded runs.
    pub fn from_entropy() -> Self {
        Self::new(rand::thread_rng().next_u64())
    }

    pub fn entropy(&self) -> u64 {
        self.entropy
    }

    /// Child seed for trial `index`.
    #[inline]
    pub fn spawn(&self, index: u64) -> u64 {
        let mut hasher = FxHasher::default();
        self.entropy.hash(&mut hasher);
        TRIAL_DOMAIN.hash(&mut hasher);
        index.hash(&mut hasher);
        mix64(hasher.finish() ^ mix64(index))
    }

    /// `(model, shock)` generators for trial `index`.
    pub fn trial_rngs(&self, index: u64) -> (u64, ChaCha8Rng, ChaCha8Rng) {
        let seed = self.spawn(index);
        let (model, shock) = rngs_for_seed(seed);
        (seed, model, shock)
    }
}

/// Both trial streams for an already spawned child seed.
pub fn rngs_for_seed(seed: u64) -> (ChaCha8Rng, ChaCha8Rng) {
    let mut model = ChaCha8Rng::seed_from_u64(seed);
    model.set_stream(stream::MODEL);
    let mut shock = ChaCha8Rng::seed_from_u64(seed);
    shock.set_stream(stream::SHOCK);
    (model, shock)
}
