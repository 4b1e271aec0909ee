//! Simplex-lattice gradient noise for 1 to 4 dimensions.
//!
//! One generic routine covers every dimension: skew the input onto the
//! simplex lattice, walk the N+1 corners of the containing simplex in order
//! of decreasing offset, and sum radially attenuated gradient contributions.
//!
//! [`SuperSimplexNoise`] uses the same lattice with a kernel as wide as a
//! lattice edge, which smooths the output at the cost of visiting 4^N
//! lattice points per query. Both generators accept a [`SimplexVariant`]
//! that rotates the input before it reaches the lattice.

use std::f64::consts::FRAC_1_SQRT_2;

use crate::error::{NoiseError, NoiseResult};
use crate::hash::hash_lattice;
use crate::math::{gradients, lattice_floor};
use crate::source::{Dimension, MAX_DIMENSION};

/// Squared kernel radius per dimension.
const RADIUS_SQ: [f64; 4] = [1.0, 0.5, 0.6, 0.6];

/// Output scale per dimension, keeping the result inside `[-1, 1]`.
const SCALE: [f64; 4] = [3.125, 70.0, 32.0, 27.0];

/// Squared kernel radius of the wide kernel: the squared lattice edge length.
const SUPER_RADIUS_SQ: [f64; 4] = [1.0, 2.0 / 3.0, 0.75, 0.8];

/// Output scale of the wide kernel, from its worst-case gradient alignment.
const SUPER_SCALE: [f64; 4] = [3.125, 13.5, 9.0, 5.5];

/// `1 / sqrt(3)`
const FRAC_1_SQRT_3: f64 = 0.577_350_269_189_625_8;

/// Off-diagonal term of the 3D rotation that points one axis up the lattice
/// diagonal.
const ORTHOGONALIZER_3D: f64 = -0.211_324_865_405_187_1;

type Rotation = [[f64; MAX_DIMENSION]; MAX_DIMENSION];

/// Skew and unskew factors for an N-dimensional simplex lattice.
fn skew_factors(n: usize) -> (f64, f64) {
    if n == 1 {
        return (0.0, 0.0);
    }
    let root = ((n + 1) as f64).sqrt();
    let n = n as f64;
    ((root - 1.0) / n, (1.0 - 1.0 / root) / n)
}

/// Lattice orientation of a simplex generator.
///
/// Every variant except `Classic` is an orthonormal rotation of the input
/// that lines up some axes with the lattice's main diagonal, which hides the
/// lattice's directional bias in the remaining axes. A variant only applies
/// to the dimension named in its description.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SimplexVariant {
    /// Input is used as given. Valid for every dimension.
    #[default]
    Classic,
    /// 2D: Y runs along the lattice diagonal.
    ImproveX,
    /// 3D: Z runs along the lattice diagonal, leaving (X, Y) isotropic.
    ImproveXy,
    /// 3D: Y runs along the lattice diagonal, leaving (X, Z) isotropic.
    ImproveXz,
    /// 4D: the (Z, W) plane holds the lattice diagonal, (X, Y) is orthogonal to it.
    ImproveXyImproveZw,
    /// 4D: W runs along the lattice diagonal, XYZ is oriented like `ImproveXy`.
    ImproveXyzImproveXy,
    /// 4D: W runs along the lattice diagonal, XYZ is oriented like `ImproveXz`.
    ImproveXyzImproveXz,
    /// 4D: W runs along the lattice diagonal.
    ImproveXyz,
}

impl SimplexVariant {
    /// Whether the variant is defined for `dimension`.
    pub fn supports(self, dimension: Dimension) -> bool {
        match self {
            SimplexVariant::Classic => true,
            SimplexVariant::ImproveX => dimension == Dimension::Two,
            SimplexVariant::ImproveXy | SimplexVariant::ImproveXz => dimension == Dimension::Three,
            SimplexVariant::ImproveXyImproveZw
            | SimplexVariant::ImproveXyzImproveXy
            | SimplexVariant::ImproveXyzImproveXz
            | SimplexVariant::ImproveXyz => dimension == Dimension::Four,
        }
    }

    /// Row-major input rotation, `None` for `Classic`.
    fn rotation(self) -> Option<Rotation> {
        let h = FRAC_1_SQRT_2;
        let (a, c) = (ORTHOGONALIZER_3D, FRAC_1_SQRT_3);
        let improve_xy = [
            [1.0 + a, a, c, 0.0],
            [a, 1.0 + a, c, 0.0],
            [-c, -c, c, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ];
        let improve_xz = [
            [1.0 + a, c, a, 0.0],
            [-c, c, -c, 0.0],
            [a, c, 1.0 + a, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ];
        // Householder reflection taking W onto (1, 1, 1, 1) / 2.
        let w_diagonal = [
            [0.5, -0.5, -0.5, 0.5],
            [-0.5, 0.5, -0.5, 0.5],
            [-0.5, -0.5, 0.5, 0.5],
            [0.5, 0.5, 0.5, 0.5],
        ];

        match self {
            SimplexVariant::Classic => None,
            SimplexVariant::ImproveX => Some([
                [h, h, 0.0, 0.0],
                [-h, h, 0.0, 0.0],
                [0.0, 0.0, 1.0, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ]),
            SimplexVariant::ImproveXy => Some(improve_xy),
            SimplexVariant::ImproveXz => Some(improve_xz),
            SimplexVariant::ImproveXyImproveZw => Some([
                [0.5, 0.5, 0.5, 0.5],
                [-0.5, -0.5, 0.5, 0.5],
                [0.5, -0.5, -0.5, 0.5],
                [-0.5, 0.5, -0.5, 0.5],
            ]),
            SimplexVariant::ImproveXyzImproveXy => Some(compose(&w_diagonal, &improve_xy)),
            SimplexVariant::ImproveXyzImproveXz => Some(compose(&w_diagonal, &improve_xz)),
            SimplexVariant::ImproveXyz => Some(w_diagonal),
        }
    }
}

/// `outer * inner`
fn compose(outer: &Rotation, inner: &Rotation) -> Rotation {
    let mut out = [[0.0; MAX_DIMENSION]; MAX_DIMENSION];
    for (row, out_row) in out.iter_mut().enumerate() {
        for (col, cell) in out_row.iter_mut().enumerate() {
            *cell = (0..MAX_DIMENSION).map(|k| outer[row][k] * inner[k][col]).sum();
        }
    }
    out
}

/// Skewed lattice shared by both simplex generators.
#[derive(Debug, Clone)]
struct Lattice {
    skew: f64,
    unskew: f64,
    variant: SimplexVariant,
    rotation: Option<Rotation>,
}

impl Lattice {
    fn new(dimension: Dimension) -> Self {
        let (skew, unskew) = skew_factors(dimension.len());
        Self {
            skew,
            unskew,
            variant: SimplexVariant::Classic,
            rotation: None,
        }
    }

    fn with_variant(mut self, dimension: Dimension, variant: SimplexVariant) -> NoiseResult<Self> {
        if !variant.supports(dimension) {
            return Err(NoiseError::config(format!(
                "simplex variant {:?} does not apply to {} input",
                variant, dimension
            )));
        }
        self.variant = variant;
        self.rotation = variant.rotation();
        Ok(self)
    }

    /// Input after the variant's rotation.
    #[inline]
    fn orient(&self, coords: &[f64]) -> [f64; MAX_DIMENSION] {
        let n = coords.len();
        let mut out = [0.0; MAX_DIMENSION];
        match &self.rotation {
            None => out[..n].copy_from_slice(coords),
            Some(rotation) => {
                for (o, row) in out.iter_mut().zip(rotation).take(n) {
                    *o = row[..n].iter().zip(coords).map(|(m, x)| m * x).sum();
                }
            }
        }
        out
    }

    /// Skewed cell containing `x` and the offset of `x` from its origin
    /// corner in unskewed space.
    #[inline]
    fn locate(&self, x: &[f64]) -> ([i64; MAX_DIMENSION], [f64; MAX_DIMENSION]) {
        let n = x.len();
        let s = x.iter().sum::<f64>() * self.skew;
        let mut cell = [0i64; MAX_DIMENSION];
        for (c, &v) in cell.iter_mut().zip(x) {
            *c = lattice_floor(v + s);
        }
        let t = cell[..n].iter().map(|&c| c as f64).sum::<f64>() * self.unskew;

        let mut origin = [0.0; MAX_DIMENSION];
        for axis in 0..n {
            origin[axis] = x[axis] - (cell[axis] as f64 - t);
        }
        (cell, origin)
    }
}

/// Simplex noise generator.
///
/// Output lies in `[-1, 1]`.
#[derive(Debug, Clone)]
pub struct SimplexNoise {
    seed: u64,
    dimension: Dimension,
    lattice: Lattice,
}

impl SimplexNoise {
    /// Create a new simplex noise generator.
    pub fn new(seed: u64, dimension: Dimension) -> Self {
        Self {
            seed,
            dimension,
            lattice: Lattice::new(dimension),
        }
    }

    /// Set the lattice orientation. Fails for a variant of another dimension.
    pub fn with_variant(mut self, variant: SimplexVariant) -> NoiseResult<Self> {
        self.lattice = self.lattice.with_variant(self.dimension, variant)?;
        Ok(self)
    }

    pub fn variant(&self) -> SimplexVariant {
        self.lattice.variant
    }

    fn sample(&self, coords: &[f64], seed: u64) -> f64 {
        let n = coords.len();
        let x = self.lattice.orient(coords);
        let (cell, origin) = self.lattice.locate(&x[..n]);

        // Corners are visited by stepping along axes in decreasing offset order.
        let mut order = [0usize, 1, 2, 3];
        order[..n].sort_by(|&a, &b| origin[b].total_cmp(&origin[a]));

        let mut step = [0i64; MAX_DIMENSION];
        let mut local = [0.0; MAX_DIMENSION];
        let mut corner = [0i64; MAX_DIMENSION];
        let mut total = 0.0;

        for k in 0..=n {
            if k > 0 {
                step[order[k - 1]] = 1;
            }
            let shift = k as f64 * self.lattice.unskew;
            let mut dist_sq = 0.0;
            for axis in 0..n {
                local[axis] = origin[axis] - step[axis] as f64 + shift;
                dist_sq += local[axis] * local[axis];
            }

            let falloff = RADIUS_SQ[n - 1] - dist_sq;
            if falloff <= 0.0 {
                continue;
            }
            for axis in 0..n {
                corner[axis] = cell[axis].wrapping_add(step[axis]);
            }
            let h = hash_lattice(seed, &corner[..n]);
            let f2 = falloff * falloff;
            total += f2 * f2 * gradients::dot(h, &local[..n]);
        }

        total * SCALE[n - 1]
    }
}

seeded_generator!(SimplexNoise);

/// Wide-kernel simplex noise.
///
/// Every lattice point within one edge length contributes, so the output
/// has no visible simplex facets. Output lies in `[-1, 1]`. In one
/// dimension it coincides with [`SimplexNoise`].
#[derive(Debug, Clone)]
pub struct SuperSimplexNoise {
    seed: u64,
    dimension: Dimension,
    lattice: Lattice,
}

impl SuperSimplexNoise {
    pub fn new(seed: u64, dimension: Dimension) -> Self {
        Self {
            seed,
            dimension,
            lattice: Lattice::new(dimension),
        }
    }

    /// Set the lattice orientation. Fails for a variant of another dimension.
    pub fn with_variant(mut self, variant: SimplexVariant) -> NoiseResult<Self> {
        self.lattice = self.lattice.with_variant(self.dimension, variant)?;
        Ok(self)
    }

    pub fn variant(&self) -> SimplexVariant {
        self.lattice.variant
    }

    fn sample(&self, coords: &[f64], seed: u64) -> f64 {
        let n = coords.len();
        let x = self.lattice.orient(coords);
        let (cell, origin) = self.lattice.locate(&x[..n]);

        // Points past one skewed step in any axis lie outside the kernel.
        let mut step = [0i64; MAX_DIMENSION];
        let mut local = [0.0; MAX_DIMENSION];
        let mut corner = [0i64; MAX_DIMENSION];
        let mut total = 0.0;

        for index in 0..4usize.pow(n as u32) {
            let mut rest = index;
            for s in step.iter_mut().take(n) {
                *s = (rest % 4) as i64 - 1;
                rest /= 4;
            }
            let shift = step[..n].iter().sum::<i64>() as f64 * self.lattice.unskew;
            let mut dist_sq = 0.0;
            for axis in 0..n {
                local[axis] = origin[axis] - step[axis] as f64 + shift;
                dist_sq += local[axis] * local[axis];
            }

            let falloff = SUPER_RADIUS_SQ[n - 1] - dist_sq;
            if falloff <= 0.0 {
                continue;
            }
            for axis in 0..n {
                corner[axis] = cell[axis].wrapping_add(step[axis]);
            }
            let h = hash_lattice(seed, &corner[..n]);
            let f2 = falloff * falloff;
            total += f2 * f2 * gradients::dot(h, &local[..n]);
        }

        (total * SUPER_SCALE[n - 1]).clamp(-1.0, 1.0)
    }
}

seeded_generator!(SuperSimplexNoise);
