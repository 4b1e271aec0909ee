//! Lattice value noise.

use super::CellPoint;
use crate::hash::{hash_lattice, hash_to_signed};
use crate::math::{FadeFunction, Interpolation};
use crate::source::Dimension;

/// Value noise: random values at lattice corners, blended by the fade curve.
///
/// Output lies in `[-1, 1]`.
#[derive(Debug, Clone)]
pub struct ValueNoise {
    seed: u64,
    dimension: Dimension,
    fade: FadeFunction,
    interpolation: Interpolation,
}

impl ValueNoise {
    /// Create a new value noise generator with the quintic fade curve.
    pub fn new(seed: u64, dimension: Dimension) -> Self {
        Self {
            seed,
            dimension,
            fade: FadeFunction::default(),
            interpolation: Interpolation::default(),
        }
    }

    /// Set the fade curve.
    pub fn with_fade(mut self, fade: FadeFunction) -> Self {
        self.fade = fade;
        self
    }

    /// Set the easing applied to the faded offsets.
    pub fn with_interpolation(mut self, interpolation: Interpolation) -> Self {
        self.interpolation = interpolation;
        self
    }

    fn sample(&self, coords: &[f64], seed: u64) -> f64 {
        let p = CellPoint::locate(coords);
        let n = p.len;

        let mut weights = [0.0; 4];
        for (w, &t) in weights.iter_mut().zip(&p.offset).take(n) {
            *w = self.interpolation.ease(self.fade.apply(t));
        }

        let mut total = 0.0;
        for mask in 0..(1usize << n) {
            let mut weight = 1.0;
            for (axis, &w) in weights.iter().enumerate().take(n) {
                weight *= if mask & (1 << axis) != 0 { w } else { 1.0 - w };
            }
            if weight == 0.0 {
                continue;
            }
            let corner = p.corner(mask);
            total += weight * hash_to_signed(hash_lattice(seed, &corner[..n]));
        }
        total
    }
}

seeded_generator!(ValueNoise);
