//! Injectable randomness for the graph simulator.
//!
//! The simulator never reaches for a global RNG. It asks a [`RandomSource`]
//! for the two primitives it needs: a uniform integer in an inclusive range
//! and a biased coin flip. Production code uses [`RngSource::thread`];
//! tests use [`RngSource::seeded`] for reproducible runs or
//! [`ScriptedRandom`] to force specific decisions.

use std::collections::VecDeque;

use rand::rngs::{StdRng, ThreadRng};
use rand::{Rng, SeedableRng};

/// A source of the random decisions made during a batch.
pub trait RandomSource {
    /// Return a uniformly distributed integer in `low..=high`.
    ///
    /// If `high < low` the range is treated as the single value `low`.
    fn int_in_range(&mut self, low: usize, high: usize) -> usize;

    /// Return `true` with the given probability.
    ///
    /// Probabilities outside `[0.0, 1.0]` are clamped.
    fn chance(&mut self, probability: f64) -> bool;
}

impl<T: RandomSource + ?Sized> RandomSource for &mut T {
    fn int_in_range(&mut self, low: usize, high: usize) -> usize {
        (**self).int_in_range(low, high)
    }

    fn chance(&mut self, probability: f64) -> bool {
        (**self).chance(probability)
    }
}

// ---------------------------------------------------------------------------
// rand-backed source
// ---------------------------------------------------------------------------

/// A [`RandomSource`] backed by any [`rand::Rng`].
#[derive(Debug, Clone)]
pub struct RngSource<R> {
    rng: R,
}

/// The default source: the thread-local, OS-seeded generator.
pub type ThreadRandom = RngSource<ThreadRng>;

/// A reproducible source seeded from a `u64`.
pub type SeededRandom = RngSource<StdRng>;

impl<R: Rng> RngSource<R> {
    /// Wrap an existing generator.
    pub const fn from_rng(rng: R) -> Self {
        Self { rng }
    }
}

impl RngSource<ThreadRng> {
    /// Use the thread-local generator.
    pub fn thread() -> Self {
        Self { rng: rand::rng() }
    }
}

impl Default for RngSource<ThreadRng> {
    fn default() -> Self {
        Self::thread()
    }
}

impl RngSource<StdRng> {
    /// Use a deterministic generator. The same seed always produces the same
    /// sequence of decisions.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl<R: Rng> RandomSource for RngSource<R> {
    fn int_in_range(&mut self, low: usize, high: usize) -> usize {
        if high <= low {
            return low;
        }
        self.rng.random_range(low..=high)
    }

    fn chance(&mut self, probability: f64) -> bool {
        if probability.is_nan() {
            return false;
        }
        self.rng.random_bool(probability.clamp(0.0, 1.0))
    }
}

// ---------------------------------------------------------------------------
// Scripted source
// ---------------------------------------------------------------------------

/// A [`RandomSource`] that replays queued answers.
///
/// Coin flips are taken from the chance queue, falling back to
/// `default_chance` once it is empty. Integers are taken from the integer
/// queue and clamped into the requested range; an empty queue yields the low
/// end of the range.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRandom {
    chances: VecDeque<bool>,
    ints: VecDeque<usize>,
    default_chance: bool,
}

impl ScriptedRandom {
    /// A source that answers every coin flip with `answer`.
    pub fn always(answer: bool) -> Self {
        Self {
            default_chance: answer,
            ..Self::default()
        }
    }

    /// Queue coin-flip answers.
    #[must_use]
    pub fn with_chances(mut self, answers: impl IntoIterator<Item = bool>) -> Self {
        self.chances.extend(answers);
        self
    }

    /// Queue integer answers.
    #[must_use]
    pub fn with_ints(mut self, answers: impl IntoIterator<Item = usize>) -> Self {
        self.ints.extend(answers);
        self
    }
}

impl RandomSource for ScriptedRandom {
    fn int_in_range(&mut self, low: usize, high: usize) -> usize {
        let upper = high.max(low);
        self.ints
            .pop_front()
            .map_or(low, |value| value.clamp(low, upper))
    }

    fn chance(&mut self, _probability: f64) -> bool {
        self.chances.pop_front().unwrap_or(self.default_chance)
    }
}
