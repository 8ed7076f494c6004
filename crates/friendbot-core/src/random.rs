//! Injectable randomness for reply selection.

use rand::Rng;

/// Source of uniform indices.
///
/// Reply selection goes through this trait so tests can pin the choice.
pub trait RandomSource: Send + Sync {
    /// Uniform index in `0..len`. Returns 0 when `len` is 0.
    fn pick(&self, len: usize) -> usize;
}

/// Thread-local RNG from `rand`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn pick(&self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        rand::thread_rng().gen_range(0..len)
    }
}

/// Always picks the same index (wrapped to the set size).
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedIndex(pub usize);

impl RandomSource for FixedIndex {
    fn pick(&self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        self.0 % len
    }
}
