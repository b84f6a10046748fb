//! Randomness oracle boundary.
//!
//! Spinning the wheel issues a request keyed by [`RoundKey`] and returns at
//! once. The oracle answers later by calling
//! [`Roulette::deliver_randomness`](crate::Roulette::deliver_randomness), at
//! most once per request. Nothing in the engine waits for an answer.

use alloc::collections::VecDeque;
use core::fmt;

use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::id::GameId;
use crate::sync::Mutex;

/// Identifies one randomness request: a game and one of its rounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoundKey {
    /// The game.
    pub game: GameId,
    /// Round number (1-based).
    pub round: u32,
}

impl RoundKey {
    /// Creates a round key.
    #[must_use]
    pub const fn new(game: GameId, round: u32) -> Self {
        Self { game, round }
    }
}

impl fmt::Display for RoundKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.game, self.round)
    }
}

/// Words asked of the oracle per spin.
pub const WORDS_PER_REQUEST: u32 = 1;

/// A source of randomness that answers asynchronously.
pub trait RandomnessOracle {
    /// Records a request for `num_words` random words for `key`.
    ///
    /// Must not block; the answer arrives through a separate delivery.
    fn request_randomness(&self, key: RoundKey, num_words: u32);
}

/// A local oracle backed by a seeded `ChaCha8` generator.
///
/// Requests queue up until [`ChaChaOracle::fulfill_next`] is called, which
/// hands back the key and word to deliver. Useful for development and tests
/// where no external oracle is available.
pub struct ChaChaOracle {
    rng: Mutex<ChaCha8Rng>,
    queue: Mutex<VecDeque<RoundKey>>,
}

impl ChaChaOracle {
    /// Creates an oracle with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(ChaCha8Rng::seed_from_u64(seed)),
            queue: Mutex::new(VecDeque::new()),
        }
    }

    /// Returns the number of requests awaiting fulfilment.
    pub fn pending(&self) -> usize {
        self.queue.with(|queue| queue.len())
    }

    /// Returns the oldest request together with a fresh random word.
    pub fn fulfill_next(&self) -> Option<(RoundKey, u64)> {
        let key = self.queue.with(VecDeque::pop_front)?;
        let word = self.rng.with(RngCore::next_u64);
        Some((key, word))
    }
}

impl RandomnessOracle for ChaChaOracle {
    fn request_randomness(&self, key: RoundKey, num_words: u32) {
        tracing::debug!(%key, num_words, "randomness requested from local oracle");
        self.queue.with(|queue| queue.push_back(key));
    }
}

impl<O: RandomnessOracle + ?Sized> RandomnessOracle for &O {
    fn request_randomness(&self, key: RoundKey, num_words: u32) {
        (**self).request_randomness(key, num_words);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fulfils_in_request_order() {
        let oracle = ChaChaOracle::new(3);
        oracle.request_randomness(RoundKey::new(GameId(1), 1), WORDS_PER_REQUEST);
        oracle.request_randomness(RoundKey::new(GameId(2), 4), WORDS_PER_REQUEST);
        assert_eq!(oracle.pending(), 2);

        let (first, _) = oracle.fulfill_next().unwrap();
        let (second, _) = oracle.fulfill_next().unwrap();
        assert_eq!(first, RoundKey::new(GameId(1), 1));
        assert_eq!(second, RoundKey::new(GameId(2), 4));
        assert!(oracle.fulfill_next().is_none());
    }

    #[test]
    fn same_seed_same_words() {
        let a = ChaChaOracle::new(42);
        let b = ChaChaOracle::new(42);
        for round in 1..=3 {
            a.request_randomness(RoundKey::new(GameId(0), round), 1);
            b.request_randomness(RoundKey::new(GameId(0), round), 1);
        }
        for _ in 0..3 {
            assert_eq!(a.fulfill_next(), b.fulfill_next());
        }
    }
}
