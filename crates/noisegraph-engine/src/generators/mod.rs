//! Leaf nodes: pure functions of seed and coordinates.
//!
//! Every generator supports 1 to 4 dimensions and draws its randomness from
//! [`crate::hash::hash_lattice`], so the same seed and coordinates always
//! produce bit-identical output.

/// Implements [`NoiseSource`](crate::NoiseSource) and
/// [`SeededNoise`](crate::SeededNoise) for a generator with `seed`,
/// `dimension` fields and a `sample(&self, coords, seed)` method.
macro_rules! seeded_generator {
    ($ty:ty) => {
        impl $crate::source::NoiseSource for $ty {
            fn dimension(&self) -> $crate::source::Dimension {
                self.dimension
            }

            #[inline]
            fn eval(&self, coords: &[f64]) -> f64 {
                self.sample(coords, self.seed)
            }
        }

        impl $crate::source::SeededNoise for $ty {
            fn seed(&self) -> u64 {
                self.seed
            }

            #[inline]
            fn eval_seeded(&self, coords: &[f64], seed: u64) -> f64 {
                self.sample(coords, seed)
            }

            fn as_source(self: std::sync::Arc<Self>) -> $crate::source::SharedSource {
                self
            }
        }
    };
}

mod pattern;
mod perlin;
mod simplex;
mod value;
mod white;
mod worley;

pub use pattern::{Checkerboard, Constant, Cylinders, Spheres};
pub use perlin::PerlinNoise;
pub use simplex::{SimplexNoise, SimplexVariant, SuperSimplexNoise};
pub use value::ValueNoise;
pub use white::{GaussianWhiteNoise, WhiteNoise};
pub use worley::{DistanceFunction, WorleyFeature, WorleyNoise, WorleyReturn};

use crate::math::split_cell;
use crate::source::MAX_DIMENSION;

/// Lattice cell and in-cell offsets of a query point.
#[derive(Debug, Clone, Copy)]
pub(crate) struct CellPoint {
    pub cell: [i64; MAX_DIMENSION],
    pub offset: [f64; MAX_DIMENSION],
    pub len: usize,
}

impl CellPoint {
    #[inline]
    pub fn locate(coords: &[f64]) -> Self {
        let mut cell = [0i64; MAX_DIMENSION];
        let mut offset = [0.0; MAX_DIMENSION];
        for (axis, &x) in coords.iter().enumerate() {
            let (c, t) = split_cell(x);
            cell[axis] = c;
            offset[axis] = t;
        }
        Self {
            cell,
            offset,
            len: coords.len(),
        }
    }

    /// Lattice corner selected by the bits of `mask`.
    #[inline]
    pub fn corner(&self, mask: usize) -> [i64; MAX_DIMENSION] {
        let mut corner = self.cell;
        for (axis, c) in corner.iter_mut().enumerate().take(self.len) {
            if mask & (1 << axis) != 0 {
                *c = c.wrapping_add(1);
            }
        }
        corner
    }
}
