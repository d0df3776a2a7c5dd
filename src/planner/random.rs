//! Random choices used by the generator, behind a trait so tests can script them

use rand::Rng;
use rand::rngs::ThreadRng;
use rand::seq::SliceRandom;

pub trait Randomness {
    /// Uniform index in `0..len`; `len` is never zero
    fn index(&mut self, len: usize) -> usize;

    /// Uniform integer in `min..=max`
    fn between(&mut self, min: u32, max: u32) -> u32;

    /// Uniform permutation in place
    fn shuffle<T>(&mut self, items: &mut [T]);
}

/// Any `rand` generator as a randomness source
pub struct RngSource<R>(pub R);

impl RngSource<ThreadRng> {
    pub fn thread() -> Self {
        Self(rand::thread_rng())
    }
}

impl<R: Rng> Randomness for RngSource<R> {
    fn index(&mut self, len: usize) -> usize {
        self.0.gen_range(0..len)
    }

    fn between(&mut self, min: u32, max: u32) -> u32 {
        self.0.gen_range(min..=max)
    }

    fn shuffle<T>(&mut self, items: &mut [T]) {
        items.shuffle(&mut self.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_index_in_bounds() {
        let mut rng = RngSource(StdRng::seed_from_u64(1));
        for len in 1..20 {
            assert!(rng.index(len) < len);
        }
    }

    #[test]
    fn test_between_inclusive() {
        let mut rng = RngSource(StdRng::seed_from_u64(2));
        let mut seen = [false; 4];
        for _ in 0..500 {
            let v = rng.between(5, 8);
            assert!((5..=8).contains(&v));
            seen[(v - 5) as usize] = true;
        }
        assert!(seen.iter().all(|s| *s), "both ends must be reachable");
        assert_eq!(rng.between(7, 7), 7);
    }

    #[test]
    fn test_shuffle_is_permutation() {
        let mut rng = RngSource(StdRng::seed_from_u64(3));
        let mut items: Vec<u32> = (0..10).collect();
        rng.shuffle(&mut items);
        items.sort();
        assert_eq!(items, (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn test_seeded_sources_repeat() {
        let mut a = RngSource(StdRng::seed_from_u64(42));
        let mut b = RngSource(StdRng::seed_from_u64(42));
        let xs: Vec<_> = (0..10).map(|_| a.index(100)).collect();
        let ys: Vec<_> = (0..10).map(|_| b.index(100)).collect();
        assert_eq!(xs, ys);
    }
}
