//! Randomized traversal order
//!
//! Registry listings come back ranked; shuffling every level of the walk keeps
//! repeated runs from converging on the same handful of packages.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of uniform randomness for the traversal
pub trait Randomizer {
    /// Uniform integer from the inclusive range `[min, max]`
    fn random_int(&mut self, min: usize, max: usize) -> usize;

    /// Fisher-Yates shuffle: for `i` from last to first, swap `i` with a
    /// uniformly chosen index `j <= i`.
    fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = self.random_int(0, i);
            items.swap(i, j);
        }
    }
}

/// Randomizer backed by `StdRng`, optionally seeded for reproducible runs
#[derive(Debug, Clone)]
pub struct StdRandomizer {
    rng: StdRng,
}

impl StdRandomizer {
    /// Seeded from the operating system
    pub fn from_os() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Deterministic sequence for a given seed
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn new(seed: Option<u64>) -> Self {
        seed.map_or_else(Self::from_os, Self::seeded)
    }
}

impl Randomizer for StdRandomizer {
    fn random_int(&mut self, min: usize, max: usize) -> usize {
        let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
        self.rng.random_range(lo..=hi)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_shuffle_preserves_elements() {
        let mut rng = StdRandomizer::seeded(7);
        let original: Vec<u32> = (0..50).collect();
        let mut shuffled = original.clone();
        rng.shuffle(&mut shuffled);

        let mut sorted = shuffled.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, original);
    }

    #[test]
    fn test_shuffle_short_sequences_unchanged() {
        let mut rng = StdRandomizer::seeded(1);

        let mut empty: Vec<&str> = Vec::new();
        rng.shuffle(&mut empty);
        assert!(empty.is_empty());

        let mut single = vec!["only"];
        rng.shuffle(&mut single);
        assert_eq!(single, vec!["only"]);
    }

    #[test]
    fn test_shuffle_reaches_every_permutation() {
        let mut rng = StdRandomizer::seeded(42);
        let mut seen = HashSet::new();
        for _ in 0..600 {
            let mut items = [1, 2, 3];
            rng.shuffle(&mut items);
            seen.insert(items);
        }
        assert_eq!(seen.len(), 6);
    }

    #[test]
    fn test_random_int_within_bounds() {
        let mut rng = StdRandomizer::seeded(3);
        for _ in 0..1000 {
            let value = rng.random_int(5, 9);
            assert!((5..=9).contains(&value));
        }
    }

    #[test]
    fn test_random_int_degenerate_range() {
        let mut rng = StdRandomizer::from_os();
        for _ in 0..100 {
            assert_eq!(rng.random_int(4, 4), 4);
        }
    }

    #[test]
    fn test_random_int_swapped_bounds() {
        let mut rng = StdRandomizer::seeded(11);
        for _ in 0..100 {
            let value = rng.random_int(9, 2);
            assert!((2..=9).contains(&value));
        }
    }

    #[test]
    fn test_seeded_is_reproducible() {
        let mut a = StdRandomizer::seeded(99);
        let mut b = StdRandomizer::seeded(99);
        let mut left: Vec<u8> = (0..20).collect();
        let mut right = left.clone();
        a.shuffle(&mut left);
        b.shuffle(&mut right);
        assert_eq!(left, right);
    }
}
