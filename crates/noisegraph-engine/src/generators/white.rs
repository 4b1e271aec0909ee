//! Per-cell random noise.

use crate::error::{NoiseError, NoiseResult};
use crate::hash::{hash_lattice, hash_to_signed};
use crate::math::lattice_floor;
use crate::rng::DeterministicRng;
use crate::source::{Dimension, MAX_DIMENSION};

#[inline]
fn cell_hash(coords: &[f64], seed: u64) -> u64 {
    let mut cell = [0i64; MAX_DIMENSION];
    for (c, &x) in cell.iter_mut().zip(coords) {
        *c = lattice_floor(x);
    }
    hash_lattice(seed, &cell[..coords.len()])
}

/// Uniform white noise: one value in `[-1, 1)` per unit lattice cell.
#[derive(Debug, Clone)]
pub struct WhiteNoise {
    seed: u64,
    dimension: Dimension,
}

impl WhiteNoise {
    pub fn new(seed: u64, dimension: Dimension) -> Self {
        Self { seed, dimension }
    }

    fn sample(&self, coords: &[f64], seed: u64) -> f64 {
        hash_to_signed(cell_hash(coords, seed))
    }
}

seeded_generator!(WhiteNoise);

/// Gaussian white noise: one normally distributed value per unit lattice cell.
#[derive(Debug, Clone)]
pub struct GaussianWhiteNoise {
    seed: u64,
    dimension: Dimension,
    mean: f64,
    stddev: f64,
}

impl GaussianWhiteNoise {
    /// Create a standard normal (mean 0, stddev 1) generator.
    pub fn new(seed: u64, dimension: Dimension) -> Self {
        Self {
            seed,
            dimension,
            mean: 0.0,
            stddev: 1.0,
        }
    }

    /// Set the distribution parameters.
    pub fn with_distribution(mut self, mean: f64, stddev: f64) -> NoiseResult<Self> {
        if !mean.is_finite() {
            return Err(NoiseError::config(format!("mean must be finite, got {}", mean)));
        }
        if !(stddev.is_finite() && stddev > 0.0) {
            return Err(NoiseError::config(format!(
                "stddev must be > 0, got {}",
                stddev
            )));
        }
        self.mean = mean;
        self.stddev = stddev;
        Ok(self)
    }

    fn sample(&self, coords: &[f64], seed: u64) -> f64 {
        let mut rng = DeterministicRng::new(cell_hash(coords, seed));
        self.mean + self.stddev * rng.gen_gaussian()
    }
}

seeded_generator!(GaussianWhiteNoise);
