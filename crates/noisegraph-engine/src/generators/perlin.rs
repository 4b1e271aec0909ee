//! Perlin gradient noise.
//!
//! Gradients come from fixed per-dimension tables (see
//! [`crate::math::gradients`]) selected by the lattice hash.

use super::CellPoint;
use crate::hash::hash_lattice;
use crate::math::{gradients, FadeFunction, Interpolation};
use crate::source::Dimension;

/// Output scale per dimension.
///
/// The raw worst case is 0.5 (1D), 1.0 (2D), 1.036 (3D) and 1.537 (4D); the
/// factors below keep every dimension inside `[-1, 1]`.
const SCALE: [f64; 4] = [2.0, 1.0, 1.0 / 1.04, 1.0 / 1.55];

/// Perlin gradient noise generator.
///
/// Output lies in `[-1, 1]` and is exactly zero on integer lattice points.
#[derive(Debug, Clone)]
pub struct PerlinNoise {
    seed: u64,
    dimension: Dimension,
    fade: FadeFunction,
    interpolation: Interpolation,
}

impl PerlinNoise {
    /// Create a new Perlin noise generator with the quintic fade curve.
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
        let mut local = [0.0; 4];
        for mask in 0..(1usize << n) {
            let mut weight = 1.0;
            for axis in 0..n {
                let bit = mask & (1 << axis) != 0;
                weight *= if bit { weights[axis] } else { 1.0 - weights[axis] };
                local[axis] = if bit { p.offset[axis] - 1.0 } else { p.offset[axis] };
            }
            if weight == 0.0 {
                continue;
            }
            let corner = p.corner(mask);
            let h = hash_lattice(seed, &corner[..n]);
            total += weight * gradients::dot(h, &local[..n]);
        }

        // Asymmetric easings can lean past the bound the scale assumes.
        (total * SCALE[n - 1]).clamp(-1.0, 1.0)
    }
}

seeded_generator!(PerlinNoise);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::NoiseSource;

    #[test]
    fn test_zero_on_lattice_points() {
        for dim in Dimension::ALL {
            let noise = PerlinNoise::new(77, dim);
            for i in -3..3 {
                let coords = vec![i as f64; dim.len()];
                assert_eq!(noise.eval(&coords), 0.0, "{} lattice point {}", dim, i);
            }
        }
    }

    #[test]
    fn test_not_constant() {
        let noise = PerlinNoise::new(1, Dimension::Two);
        let a = noise.eval(&[0.3, 0.7]);
        let b = noise.eval(&[1.6, 2.2]);
        assert_ne!(a, b);
    }

    #[test]
    fn test_seed_changes_output() {
        let a = PerlinNoise::new(1, Dimension::Three);
        let b = PerlinNoise::new(2, Dimension::Three);
        let differs = (0..20).any(|i| {
            let c = [i as f64 * 0.37 + 0.1, 0.5, 0.25];
            a.eval(&c) != b.eval(&c)
        });
        assert!(differs);
    }

    #[test]
    fn test_interpolation_reshapes_cells() {
        let linear = PerlinNoise::new(9, Dimension::Two);
        let quartic = PerlinNoise::new(9, Dimension::Two).with_interpolation(Interpolation::Quartic);
        assert_eq!(quartic.eval(&[2.0, -3.0]), 0.0);
        let mut differing = 0;
        for i in 0..400 {
            let p = [i as f64 * 0.173 + 0.05, (i % 17) as f64 * 0.41 + 0.02];
            let v = quartic.eval(&p);
            assert!((-1.0..=1.0).contains(&v), "value {} out of range", v);
            if v != linear.eval(&p) {
                differing += 1;
            }
        }
        assert!(differing > 300, "only {} of 400 samples changed", differing);
    }
}
