//! RNG module - seeded randomness for board generation
//!
//! Wraps `ChaCha8Rng` so that the same seed produces the same deck order,
//! layout and shuffle on every platform. The Fisher-Yates shuffle is vendored
//! rather than taken from `rand::seq` so its output cannot drift across
//! `rand` releases.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Deterministic game RNG
#[derive(Debug, Clone)]
pub struct GameRng {
    seed: u64,
    inner: ChaCha8Rng,
}

impl GameRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            inner: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Create an RNG seeded from the thread-local entropy source
    pub fn from_entropy() -> Self {
        Self::new(rand::random::<u64>())
    }

    /// Seed this RNG was created with (for reproducing a session)
    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn next_u64(&mut self) -> u64 {
        self.inner.random::<u64>()
    }

    /// Uniform value in [0, max). `max` must be non-zero.
    pub fn next_range(&mut self, max: usize) -> usize {
        self.inner.random_range(0..max)
    }

    /// Uniform value in [0, 1)
    pub fn next_f64(&mut self) -> f64 {
        self.inner.random::<f64>()
    }

    /// True with probability `p`
    pub fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    /// Shuffle a slice using Fisher-Yates
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let j = self.inner.random_range(0..=i);
            slice.swap(i, j);
        }
    }

    /// Pick a random element
    pub fn choose<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T> {
        if slice.is_empty() {
            return None;
        }
        slice.get(self.next_range(slice.len()))
    }
}

impl Default for GameRng {
    fn default() -> Self {
        Self::new(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rng_deterministic() {
        let mut rng1 = GameRng::new(12345);
        let mut rng2 = GameRng::new(12345);

        for _ in 0..100 {
            assert_eq!(rng1.next_u64(), rng2.next_u64());
        }
    }

    #[test]
    fn test_rng_different_seeds() {
        let mut rng1 = GameRng::new(12345);
        let mut rng2 = GameRng::new(54321);

        assert_ne!(rng1.next_u64(), rng2.next_u64());
    }

    #[test]
    fn test_next_range_bounds() {
        let mut rng = GameRng::new(7);
        for _ in 0..1000 {
            assert!(rng.next_range(4) < 4);
            let f = rng.next_f64();
            assert!((0.0..1.0).contains(&f));
        }
    }

    #[test]
    fn test_shuffle_is_permutation() {
        let mut rng = GameRng::new(99);
        let mut values: Vec<u32> = (0..50).collect();
        rng.shuffle(&mut values);

        let mut sorted = values.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..50).collect::<Vec<_>>());
    }

    #[test]
    fn test_shuffle_reproducible() {
        let mut a: Vec<u32> = (0..20).collect();
        let mut b = a.clone();
        GameRng::new(5).shuffle(&mut a);
        GameRng::new(5).shuffle(&mut b);
        assert_eq!(a, b);
    }

    #[test]
    fn test_choose_empty() {
        let mut rng = GameRng::new(1);
        let empty: [u8; 0] = [];
        assert!(rng.choose(&empty).is_none());
        assert_eq!(rng.choose(&[9]), Some(&9));
    }

    #[test]
    fn test_seed_recorded() {
        assert_eq!(GameRng::new(77).seed(), 77);
    }
}
