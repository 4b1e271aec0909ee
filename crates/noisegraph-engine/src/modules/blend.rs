//! Blending modules: fixed weights or a control source.

use super::combine::common_dimension;
use crate::error::{NoiseError, NoiseResult};
use crate::math::Interpolation;
use crate::source::{expect_dimension, Dimension, NoiseSource, SharedSource};

/// `Σ w_i * child_i`.
///
/// Weights are used as given; they need not sum to 1.
#[derive(Debug, Clone)]
pub struct WeightedBlend {
    children: Vec<SharedSource>,
    weights: Vec<f64>,
    dimension: Dimension,
}

impl WeightedBlend {
    pub fn new(children: Vec<SharedSource>, weights: Vec<f64>) -> NoiseResult<Self> {
        let dimension = common_dimension(&children)?;
        if weights.len() != children.len() {
            return Err(NoiseError::config(format!(
                "expected {} weights (one per child), got {}",
                children.len(),
                weights.len()
            )));
        }
        if let Some(bad) = weights.iter().find(|w| !w.is_finite()) {
            return Err(NoiseError::config(format!(
                "blend weights must be finite, got {}",
                bad
            )));
        }
        Ok(Self {
            children,
            weights,
            dimension,
        })
    }

    /// Rescales the weights to sum to 1. A zero sum leaves them unchanged.
    pub fn normalized(mut self) -> Self {
        let sum: f64 = self.weights.iter().sum();
        if sum != 0.0 {
            for w in &mut self.weights {
                *w /= sum;
            }
        }
        self
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }
}

impl NoiseSource for WeightedBlend {
    fn dimension(&self) -> Dimension {
        self.dimension
    }

    #[inline]
    fn eval(&self, coords: &[f64]) -> f64 {
        self.children
            .iter()
            .zip(&self.weights)
            .map(|(child, w)| w * child.eval(coords))
            .sum()
    }
}

fn check_triple(a: &SharedSource, b: &SharedSource, control: &SharedSource) -> NoiseResult<Dimension> {
    let dimension = a.dimension();
    expect_dimension(b.as_ref(), dimension, "second input")?;
    expect_dimension(control.as_ref(), dimension, "control")?;
    Ok(dimension)
}

/// Interpolates from `a` to `b` using the raw value of `control` as `t`.
#[derive(Debug, Clone)]
pub struct Lerp {
    a: SharedSource,
    b: SharedSource,
    control: SharedSource,
    interpolation: Interpolation,
    dimension: Dimension,
}

impl Lerp {
    pub fn new(a: SharedSource, b: SharedSource, control: SharedSource) -> NoiseResult<Self> {
        let dimension = check_triple(&a, &b, &control)?;
        Ok(Self {
            a,
            b,
            control,
            interpolation: Interpolation::default(),
            dimension,
        })
    }

    pub fn with_interpolation(mut self, interpolation: Interpolation) -> Self {
        self.interpolation = interpolation;
        self
    }
}

impl NoiseSource for Lerp {
    fn dimension(&self) -> Dimension {
        self.dimension
    }

    #[inline]
    fn eval(&self, coords: &[f64]) -> f64 {
        let t = self.control.eval(coords);
        self.interpolation
            .interpolate(self.a.eval(coords), self.b.eval(coords), t)
    }
}

/// `control >= boundary ? a : b`.
#[derive(Debug, Clone)]
pub struct Select {
    a: SharedSource,
    b: SharedSource,
    control: SharedSource,
    boundary: f64,
    dimension: Dimension,
}

impl Select {
    pub fn new(
        a: SharedSource,
        b: SharedSource,
        control: SharedSource,
        boundary: f64,
    ) -> NoiseResult<Self> {
        let dimension = check_triple(&a, &b, &control)?;
        if !boundary.is_finite() {
            return Err(NoiseError::config(format!(
                "select boundary must be finite, got {}",
                boundary
            )));
        }
        Ok(Self {
            a,
            b,
            control,
            boundary,
            dimension,
        })
    }
}

impl NoiseSource for Select {
    fn dimension(&self) -> Dimension {
        self.dimension
    }

    #[inline]
    fn eval(&self, coords: &[f64]) -> f64 {
        // Only the chosen branch is evaluated.
        if self.control.eval(coords) >= self.boundary {
            self.a.eval(coords)
        } else {
            self.b.eval(coords)
        }
    }
}
