//! Dimension-changing transformers.
//!
//! These are the only nodes whose dimension differs from their child's.

use crate::error::{NoiseError, NoiseResult};
use crate::source::{Dimension, NoiseSource, SharedSource, MAX_DIMENSION};

fn check_axes(axes: &[usize], bound: usize, what: &str) -> NoiseResult<()> {
    for (i, &axis) in axes.iter().enumerate() {
        if axis >= bound {
            return Err(NoiseError::config(format!(
                "{} axis {} is out of range for {} axes",
                what, axis, bound
            )));
        }
        if axes[..i].contains(&axis) {
            return Err(NoiseError::config(format!(
                "{} axis {} is listed twice",
                what, axis
            )));
        }
    }
    Ok(())
}

/// Samples a higher-dimensional child on an axis-aligned slice.
///
/// Query axis `i` feeds child axis `axes[i]`; every other child axis is held
/// at its `origin` value. A 2D slice of 3D noise at `z = c` uses
/// `axes = [0, 1]` and `origin = [0, 0, c]`.
#[derive(Debug, Clone)]
pub struct Slice {
    child: SharedSource,
    dimension: Dimension,
    axes: [usize; MAX_DIMENSION],
    origin: [f64; MAX_DIMENSION],
}

impl Slice {
    pub fn new(child: SharedSource, axes: &[usize], origin: &[f64]) -> NoiseResult<Self> {
        let child_len = child.dimension().len();
        if origin.len() != child_len {
            return Err(NoiseError::config(format!(
                "slice origin has {} values but the child is {}",
                origin.len(),
                child.dimension()
            )));
        }
        if axes.is_empty() || axes.len() >= child_len {
            return Err(NoiseError::config(format!(
                "a slice of {} must map between 1 and {} axes, got {}",
                child.dimension(),
                child_len - 1,
                axes.len()
            )));
        }
        check_axes(axes, child_len, "slice")?;
        if let Some(bad) = origin.iter().find(|v| !v.is_finite()) {
            return Err(NoiseError::config(format!(
                "slice origin must be finite, got {}",
                bad
            )));
        }

        let mut axis_map = [0usize; MAX_DIMENSION];
        axis_map[..axes.len()].copy_from_slice(axes);
        let mut fixed = [0.0; MAX_DIMENSION];
        fixed[..child_len].copy_from_slice(origin);

        Ok(Self {
            dimension: Dimension::from_len(axes.len())?,
            child,
            axes: axis_map,
            origin: fixed,
        })
    }
}

impl NoiseSource for Slice {
    fn dimension(&self) -> Dimension {
        self.dimension
    }

    #[inline]
    fn eval(&self, coords: &[f64]) -> f64 {
        let mut full = self.origin;
        for (i, &x) in coords.iter().enumerate() {
            full[self.axes[i]] = x;
        }
        self.child.eval(&full[..self.child.dimension().len()])
    }
}

/// Samples a lower-dimensional child on a subset of the query axes.
///
/// Child axis `j` reads query axis `axes[j]`; the remaining query axes are
/// ignored.
#[derive(Debug, Clone)]
pub struct Project {
    child: SharedSource,
    dimension: Dimension,
    axes: [usize; MAX_DIMENSION],
}

impl Project {
    pub fn new(child: SharedSource, dimension: Dimension, axes: &[usize]) -> NoiseResult<Self> {
        let child_len = child.dimension().len();
        if axes.len() != child_len {
            return Err(NoiseError::config(format!(
                "projection lists {} axes but the child is {}",
                axes.len(),
                child.dimension()
            )));
        }
        if child_len >= dimension.len() {
            return Err(NoiseError::config(format!(
                "projection from {} needs a child of lower dimension, got {}",
                dimension,
                child.dimension()
            )));
        }
        check_axes(axes, dimension.len(), "projection")?;

        let mut axis_map = [0usize; MAX_DIMENSION];
        axis_map[..axes.len()].copy_from_slice(axes);
        Ok(Self {
            child,
            dimension,
            axes: axis_map,
        })
    }
}

impl NoiseSource for Project {
    fn dimension(&self) -> Dimension {
        self.dimension
    }

    #[inline]
    fn eval(&self, coords: &[f64]) -> f64 {
        let n = self.child.dimension().len();
        let mut picked = [0.0; MAX_DIMENSION];
        for (j, p) in picked.iter_mut().enumerate().take(n) {
            *p = coords[self.axes[j]];
        }
        self.child.eval(&picked[..n])
    }
}
