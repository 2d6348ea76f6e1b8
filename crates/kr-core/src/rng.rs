//! Random number generation for the simulation
//!
//! Uses a seeded ChaCha RNG so that a whole fight can be replayed from its seed.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Simulation random number generator
///
/// Wraps ChaCha8Rng for reproducible random number generation.
/// Note: RNG state is not serialized - a restored world reseeds from the original seed.
#[derive(Debug, Clone)]
pub struct GameRng {
    rng: ChaCha8Rng,
    seed: u64,
}

// Only the seed is serialized, the stream is recreated on deserialize
impl Serialize for GameRng {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.seed.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for GameRng {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let seed = u64::deserialize(deserializer)?;
        Ok(GameRng::new(seed))
    }
}

impl GameRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Create a new RNG with a random seed
    pub fn from_entropy() -> Self {
        let seed = rand::random();
        Self::new(seed)
    }

    /// Get the seed used to create this RNG
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Returns 0..n-1, or 0 if n is 0.
    pub fn rn2(&mut self, n: u32) -> u32 {
        if n == 0 {
            return 0;
        }
        self.rng.gen_range(0..n)
    }

    /// Uniform integer in `lo..=hi`. Returns `lo` when the range is empty.
    pub fn range_inclusive(&mut self, lo: i32, hi: i32) -> i32 {
        if hi <= lo {
            return lo;
        }
        self.rng.gen_range(lo..=hi)
    }

    /// Returns true with probability 1/n
    pub fn one_in(&mut self, n: u32) -> bool {
        self.rn2(n) == 0
    }

    /// Returns true with probability `p` (clamped to 0..=1)
    pub fn chance(&mut self, p: f64) -> bool {
        if p <= 0.0 {
            return false;
        }
        if p >= 1.0 {
            return true;
        }
        self.rng.r#gen::<f64>() < p
    }

    /// Choose a random element from a slice
    pub fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            None
        } else {
            Some(&items[self.rn2(items.len() as u32) as usize])
        }
    }

    /// Choose an element with probability proportional to its weight.
    ///
    /// Returns `None` if the slices are empty, of different lengths, or all
    /// weights are zero.
    pub fn choose_weighted<T: Copy>(&mut self, items: &[T], weights: &[u32]) -> Option<T> {
        if items.is_empty() || items.len() != weights.len() {
            return None;
        }
        let total: u32 = weights.iter().sum();
        if total == 0 {
            return None;
        }
        let mut roll = self.rn2(total);
        for (item, &w) in items.iter().zip(weights) {
            if roll < w {
                return Some(*item);
            }
            roll -= w;
        }
        None
    }
}

impl Default for GameRng {
    fn default() -> Self {
        Self::from_entropy()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rn2_bounds() {
        let mut rng = GameRng::new(42);
        for _ in 0..1000 {
            let n = rng.rn2(10);
            assert!(n < 10);
        }
    }

    #[test]
    fn test_range_inclusive_bounds() {
        let mut rng = GameRng::new(42);
        let mut seen_lo = false;
        let mut seen_hi = false;
        for _ in 0..1000 {
            let n = rng.range_inclusive(-3, 3);
            assert!((-3..=3).contains(&n));
            seen_lo |= n == -3;
            seen_hi |= n == 3;
        }
        assert!(seen_lo && seen_hi);
        assert_eq!(rng.range_inclusive(5, 5), 5);
    }

    #[test]
    fn test_reproducibility() {
        let mut rng1 = GameRng::new(42);
        let mut rng2 = GameRng::new(42);

        for _ in 0..100 {
            assert_eq!(rng1.rn2(100), rng2.rn2(100));
        }
    }

    #[test]
    fn test_choose_weighted_skips_zero_weight() {
        let mut rng = GameRng::new(7);
        for _ in 0..200 {
            let v = rng.choose_weighted(&['a', 'b', 'c'], &[0, 1, 0]);
            assert_eq!(v, Some('b'));
        }
        assert_eq!(rng.choose_weighted::<char>(&[], &[]), None);
        assert_eq!(rng.choose_weighted(&['a'], &[0]), None);
    }

    #[test]
    fn test_chance_extremes() {
        let mut rng = GameRng::new(1);
        assert!(!rng.chance(0.0));
        assert!(rng.chance(1.0));
    }

    #[test]
    fn test_serde_keeps_seed() {
        let rng = GameRng::new(99);
        let json = serde_json::to_string(&rng).unwrap();
        let back: GameRng = serde_json::from_str(&json).unwrap();
        assert_eq!(back.seed(), 99);
    }
}
