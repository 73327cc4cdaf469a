//! Deterministic random number generation.
//!
//! All randomness in a battle (deck shuffles, weighted enemy policies) flows
//! from a single seed in `BattleConfig`. Independent consumers derive their
//! own stream with `for_context`, so the order in which enemies plan never
//! perturbs the deck shuffle and vice versa.
//!
//! ```
//! use ccg_battle::core::BattleRng;
//!
//! let rng = BattleRng::new(42);
//! let mut deck = rng.for_context("deck");
//! let mut again = BattleRng::new(42).for_context("deck");
//!
//! assert_eq!(deck.gen_range(0..100), again.gen_range(0..100));
//! ```

use std::hash::{Hash, Hasher};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rustc_hash::FxHasher;
use serde::{Deserialize, Serialize};

/// Deterministic RNG for one battle.
///
/// Uses ChaCha8 for speed; cloning the battle clones the stream position, so
/// a scratch battle that is thrown away never advances the committed RNG.
#[derive(Clone, Debug)]
pub struct BattleRng {
    inner: ChaCha8Rng,
    seed: u64,
}

impl BattleRng {
    /// Create a new RNG with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// The seed this stream started from.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Create an independent stream for a specific context.
    ///
    /// The same context always produces the same stream from the same seed.
    /// `FxHasher` is used instead of the std hasher so streams are stable
    /// across toolchains.
    #[must_use]
    pub fn for_context(&self, context: &str) -> Self {
        let mut hasher = FxHasher::default();
        self.seed.hash(&mut hasher);
        context.hash(&mut hasher);
        Self::new(hasher.finish())
    }

    /// Generate a random integer in the given range.
    pub fn gen_range(&mut self, range: std::ops::Range<u32>) -> u32 {
        self.inner.gen_range(range)
    }

    /// Shuffle a slice in place.
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        use rand::seq::SliceRandom;
        slice.shuffle(&mut self.inner);
    }

    /// Choose an index with weighted probability.
    ///
    /// Returns `None` if weights are empty or all zero.
    pub fn choose_weighted(&mut self, weights: &[u32]) -> Option<usize> {
        let total: u64 = weights.iter().map(|&w| u64::from(w)).sum();
        if total == 0 {
            return None;
        }

        let mut threshold = self.inner.gen_range(0..total);
        for (i, &weight) in weights.iter().enumerate() {
            let weight = u64::from(weight);
            if threshold < weight {
                return Some(i);
            }
            threshold -= weight;
        }

        // Unreachable while threshold < total.
        None
    }

    /// Get the current state for checkpointing.
    #[must_use]
    pub fn state(&self) -> BattleRngState {
        BattleRngState {
            seed: self.seed,
            word_pos: self.inner.get_word_pos(),
        }
    }

    /// Restore from a saved state.
    #[must_use]
    pub fn from_state(state: &BattleRngState) -> Self {
        let mut inner = ChaCha8Rng::seed_from_u64(state.seed);
        inner.set_word_pos(state.word_pos);
        Self {
            inner,
            seed: state.seed,
        }
    }
}

/// Serializable RNG position.
///
/// Two battles whose RNGs report equal states will draw identical sequences;
/// replay tests use this to check that nothing consumed randomness out of
/// order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleRngState {
    /// Stream seed.
    pub seed: u64,
    /// ChaCha8 word position (128-bit counter).
    pub word_pos: u128,
}
