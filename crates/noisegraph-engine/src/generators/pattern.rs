//! Deterministic, seedless pattern generators.

use crate::error::{NoiseError, NoiseResult};
use crate::math::lattice_floor;
use crate::source::{Dimension, NoiseSource};

/// Returns the same value everywhere.
#[derive(Debug, Clone)]
pub struct Constant {
    value: f64,
    dimension: Dimension,
}

impl Constant {
    pub fn new(value: f64, dimension: Dimension) -> NoiseResult<Self> {
        if !value.is_finite() {
            return Err(NoiseError::config(format!(
                "constant value must be finite, got {}",
                value
            )));
        }
        Ok(Self { value, dimension })
    }
}

impl NoiseSource for Constant {
    fn dimension(&self) -> Dimension {
        self.dimension
    }

    fn eval(&self, _coords: &[f64]) -> f64 {
        self.value
    }
}

/// Unit cells alternating between 1.0 (even parity) and 0.0 (odd parity).
#[derive(Debug, Clone)]
pub struct Checkerboard {
    dimension: Dimension,
}

impl Checkerboard {
    pub fn new(dimension: Dimension) -> Self {
        Self { dimension }
    }
}

impl NoiseSource for Checkerboard {
    fn dimension(&self) -> Dimension {
        self.dimension
    }

    fn eval(&self, coords: &[f64]) -> f64 {
        let parity = coords
            .iter()
            .fold(0i64, |acc, &x| acc ^ (lattice_floor(x) & 1));
        if parity == 0 {
            1.0
        } else {
            0.0
        }
    }
}

/// Euclidean length without squaring the coordinates, so it stays finite
/// wherever the result is representable.
#[inline]
fn radius(coords: &[f64]) -> f64 {
    coords.iter().fold(0.0, |r: f64, &x| r.hypot(x))
}

/// 1.0 on integer radii, falling linearly to 0.0 halfway between them.
#[inline]
fn shell(radius: f64) -> f64 {
    // Every float past 2^53 is an integer, and an infinite radius is past all of them.
    if !radius.is_finite() {
        return 1.0;
    }
    let inner = radius - radius.floor();
    1.0 - 2.0 * inner.min(1.0 - inner)
}

/// Concentric spherical shells around the origin.
#[derive(Debug, Clone)]
pub struct Spheres {
    dimension: Dimension,
}

impl Spheres {
    pub fn new(dimension: Dimension) -> Self {
        Self { dimension }
    }
}

impl NoiseSource for Spheres {
    fn dimension(&self) -> Dimension {
        self.dimension
    }

    fn eval(&self, coords: &[f64]) -> f64 {
        shell(radius(coords))
    }
}

/// Concentric cylindrical shells around the last axis.
///
/// The radius ignores the last coordinate, so the pattern extends unchanged
/// along it. Needs at least two dimensions.
#[derive(Debug, Clone)]
pub struct Cylinders {
    dimension: Dimension,
}

impl Cylinders {
    pub fn new(dimension: Dimension) -> NoiseResult<Self> {
        if dimension == Dimension::One {
            return Err(NoiseError::config("cylinders need at least 2 dimensions"));
        }
        Ok(Self { dimension })
    }
}

impl NoiseSource for Cylinders {
    fn dimension(&self) -> Dimension {
        self.dimension
    }

    fn eval(&self, coords: &[f64]) -> f64 {
        let radial = &coords[..coords.len().saturating_sub(1)];
        shell(radius(radial))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant() {
        let c = Constant::new(0.25, Dimension::Three).unwrap();
        assert_eq!(c.eval(&[1.0, -5.0, 1e9]), 0.25);
        assert!(Constant::new(f64::INFINITY, Dimension::One).is_err());
    }

    #[test]
    fn test_checkerboard_parity() {
        let board = Checkerboard::new(Dimension::Two);
        assert_eq!(board.eval(&[0.5, 0.5]), 1.0);
        assert_eq!(board.eval(&[1.5, 0.5]), 0.0);
        assert_eq!(board.eval(&[1.5, 1.5]), 1.0);
        assert_eq!(board.eval(&[-0.5, 0.5]), 0.0);
    }

    #[test]
    fn test_spheres_shells() {
        let spheres = Spheres::new(Dimension::Two);
        assert_eq!(spheres.eval(&[3.0, 4.0]), 1.0);
        assert_eq!(spheres.eval(&[0.0, 2.5]), 0.0);
        assert!((spheres.eval(&[0.0, 2.25]) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_cylinders_ignore_last_axis() {
        let cyl = Cylinders::new(Dimension::Three).unwrap();
        assert_eq!(cyl.eval(&[3.0, 4.0, 0.0]), cyl.eval(&[3.0, 4.0, 123.4]));
        assert_eq!(cyl.eval(&[3.0, 4.0, 0.7]), 1.0);
        assert!(Cylinders::new(Dimension::One).is_err());
    }

    #[test]
    fn test_shells_finite_far_from_origin() {
        let spheres = Spheres::new(Dimension::Three);
        let cyl = Cylinders::new(Dimension::Three).unwrap();
        for x in [1e17, 1e200, -1e300, f64::MAX] {
            let p = [x, x, x];
            for v in [spheres.eval(&p), cyl.eval(&p)] {
                assert!((0.0..=1.0).contains(&v), "at {} gave {}", x, v);
            }
        }
        assert!((radius(&[3e300, 4e300]) / 5e300 - 1.0).abs() < 1e-15);
        assert_eq!(radius(&[f64::MAX, f64::MAX]), f64::INFINITY);
        assert_eq!(shell(f64::INFINITY), 1.0);
    }
}
