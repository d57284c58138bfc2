//! Deterministic simulation RNG wrapper.
//!
//! # Determinism strategy
//!
//! One `SimRng` is owned by each session and threaded by `&mut` through every
//! randomised step (base volume, jitter, centrality source sampling).  The
//! same seed and the same sequence of operations produce identical traffic
//! maps within one build.  With the `parallel` centrality feature the
//! floating-point summation is grouped differently from the sequential path,
//! so the two builds may disagree in the last bit; each is stable on its own.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Simulation-level RNG.
///
/// Used only in single-threaded or explicitly synchronised contexts.  The
/// parallel centrality path draws its source sample before fanning out.
pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(seed))
    }

    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }

    #[inline]
    pub fn gen_bool(&mut self, p: f64) -> bool {
        self.0.gen_bool(p.clamp(0.0, 1.0))
    }

    /// Choose `amount` distinct indices from `0..length`, sorted ascending.
    ///
    /// If `amount >= length` every index is returned.
    pub fn sample_indices(&mut self, length: usize, amount: usize) -> Vec<usize> {
        if amount >= length {
            return (0..length).collect();
        }
        let mut picked = rand::seq::index::sample(&mut self.0, length, amount).into_vec();
        picked.sort_unstable();
        picked
    }
}

impl std::fmt::Debug for SimRng {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SimRng { .. }")
    }
}
