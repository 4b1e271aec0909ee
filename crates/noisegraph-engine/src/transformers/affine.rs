//! Affine coordinate transforms: `T(p) = M·p + t`.

use crate::error::{NoiseError, NoiseResult};
use crate::source::{expect_dimension, Dimension, NoiseSource, SharedSource, MAX_DIMENSION};

type Matrix = [[f64; MAX_DIMENSION]; MAX_DIMENSION];

/// An affine map on N-dimensional coordinates.
///
/// Axes outside the affected subset keep the identity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Affine {
    dimension: Dimension,
    matrix: Matrix,
    offset: [f64; MAX_DIMENSION],
}

fn identity_matrix() -> Matrix {
    let mut m = [[0.0; MAX_DIMENSION]; MAX_DIMENSION];
    for (i, row) in m.iter_mut().enumerate() {
        row[i] = 1.0;
    }
    m
}

fn check_finite(what: &str, values: &[f64]) -> NoiseResult<()> {
    match values.iter().find(|v| !v.is_finite()) {
        Some(bad) => Err(NoiseError::config(format!(
            "{} must be finite, got {}",
            what, bad
        ))),
        None => Ok(()),
    }
}

impl Affine {
    /// The identity map.
    pub fn identity(dimension: Dimension) -> Self {
        Self {
            dimension,
            matrix: identity_matrix(),
            offset: [0.0; MAX_DIMENSION],
        }
    }

    /// Translation by one offset per axis.
    pub fn translate(offset: &[f64]) -> NoiseResult<Self> {
        let dimension = Dimension::from_len(offset.len())?;
        check_finite("translation offset", offset)?;
        let mut affine = Self::identity(dimension);
        affine.offset[..offset.len()].copy_from_slice(offset);
        Ok(affine)
    }

    /// Per-axis scaling. Factors must be finite and non-zero.
    pub fn scale(factors: &[f64]) -> NoiseResult<Self> {
        let dimension = Dimension::from_len(factors.len())?;
        check_finite("scale factor", factors)?;
        if factors.iter().any(|f| *f == 0.0) {
            return Err(NoiseError::config("scale factors must be non-zero"));
        }
        let mut affine = Self::identity(dimension);
        for (axis, &f) in factors.iter().enumerate() {
            affine.matrix[axis][axis] = f;
        }
        Ok(affine)
    }

    /// The same scale factor on every axis.
    pub fn uniform_scale(dimension: Dimension, factor: f64) -> NoiseResult<Self> {
        Self::scale(&vec![factor; dimension.len()])
    }

    /// Rotation of 2D coordinates by `angle` radians.
    pub fn rotate_2d(angle: f64) -> NoiseResult<Self> {
        Self::rotate_plane(Dimension::Two, 0, 1, angle)
    }

    /// Rotation by `angle` radians in the plane spanned by axes `a` and `b`.
    pub fn rotate_plane(dimension: Dimension, a: usize, b: usize, angle: f64) -> NoiseResult<Self> {
        let n = dimension.len();
        if a == b || a >= n || b >= n {
            return Err(NoiseError::config(format!(
                "rotation plane ({}, {}) is invalid for {}",
                a, b, dimension
            )));
        }
        check_finite("rotation angle", &[angle])?;
        let (sin, cos) = angle.sin_cos();
        let mut affine = Self::identity(dimension);
        affine.matrix[a][a] = cos;
        affine.matrix[a][b] = -sin;
        affine.matrix[b][a] = sin;
        affine.matrix[b][b] = cos;
        Ok(affine)
    }

    /// Composition: apply `self` first, then `next`.
    pub fn then(&self, next: &Affine) -> NoiseResult<Self> {
        if self.dimension != next.dimension {
            return Err(NoiseError::config(format!(
                "cannot compose {} and {} transforms",
                self.dimension, next.dimension
            )));
        }
        let n = self.dimension.len();
        let mut out = Self::identity(self.dimension);
        for i in 0..n {
            for j in 0..n {
                out.matrix[i][j] = (0..n).map(|k| next.matrix[i][k] * self.matrix[k][j]).sum();
            }
            out.offset[i] = (0..n)
                .map(|k| next.matrix[i][k] * self.offset[k])
                .sum::<f64>()
                + next.offset[i];
        }
        Ok(out)
    }

    pub fn dimension(&self) -> Dimension {
        self.dimension
    }

    /// Maps `input` into `output`; both must hold `dimension().len()` values.
    #[inline]
    pub fn apply(&self, input: &[f64], output: &mut [f64]) {
        let n = input.len();
        for (i, out) in output.iter_mut().enumerate().take(n) {
            let row = &self.matrix[i];
            let mut acc = self.offset[i];
            for (j, &x) in input.iter().enumerate() {
                acc += row[j] * x;
            }
            *out = acc;
        }
    }
}

/// Evaluates a child at affinely transformed coordinates.
#[derive(Debug, Clone)]
pub struct AffineTransform {
    child: SharedSource,
    affine: Affine,
}

impl AffineTransform {
    pub fn new(child: SharedSource, affine: Affine) -> NoiseResult<Self> {
        expect_dimension(child.as_ref(), affine.dimension(), "transform input")?;
        Ok(Self { child, affine })
    }

    pub fn affine(&self) -> &Affine {
        &self.affine
    }
}

impl NoiseSource for AffineTransform {
    fn dimension(&self) -> Dimension {
        self.affine.dimension
    }

    #[inline]
    fn eval(&self, coords: &[f64]) -> f64 {
        let mut mapped = [0.0; MAX_DIMENSION];
        let n = coords.len();
        self.affine.apply(coords, &mut mapped[..n]);
        self.child.eval(&mapped[..n])
    }
}
