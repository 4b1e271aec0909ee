//! Deterministic RNG wrapper using PCG32.
//!
//! Generators that need more than one random value per lattice cell (cellular
//! feature points, gaussian samples) seed one of these from the cell hash.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// Wrapper around PCG32 for deterministic random number generation.
#[derive(Clone)]
pub struct DeterministicRng {
    inner: Pcg32,
}

impl DeterministicRng {
    /// Create a new RNG from a 64-bit seed.
    pub fn new(seed: u64) -> Self {
        Self {
            inner: Pcg32::seed_from_u64(seed),
        }
    }

    /// Generate a random f64 in the range [0.0, 1.0).
    #[inline]
    pub fn gen_f64(&mut self) -> f64 {
        self.inner.gen::<f64>()
    }

    /// Generate a random f64 in the range (0.0, 1.0].
    #[inline]
    pub fn gen_f64_open(&mut self) -> f64 {
        1.0 - self.gen_f64()
    }

    /// Generate a random value in the given range.
    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.inner.gen_range(range)
    }

    /// Generate a standard normal sample (Box-Muller).
    pub fn gen_gaussian(&mut self) -> f64 {
        let u1 = self.gen_f64_open();
        let u2 = self.gen_f64();
        (-2.0 * u1.ln()).sqrt() * (std::f64::consts::TAU * u2).cos()
    }
}

/// Derive a seed for a labelled node using BLAKE3.
///
/// ```text
/// node_seed = truncate_u64(BLAKE3(base_seed_le || label))
/// ```
pub fn derive_node_seed(base_seed: u64, label: &str) -> u64 {
    let mut hasher = blake3::Hasher::new();
    hasher.update(&base_seed.to_le_bytes());
    hasher.update(label.as_bytes());
    let hash = hasher.finalize();
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&hash.as_bytes()[0..8]);
    u64::from_le_bytes(bytes)
}
