//! Output-side nodes: a pure function applied to one child's value.

use crate::error::{NoiseError, NoiseResult};
use crate::source::{Dimension, NoiseSource, SharedSource};

/// A value-to-value mapping applied after evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Modifier {
    /// `|x|`
    Abs,
    /// `-x`
    Invert,
    /// Clamp to `[low, high]`.
    Clamp { low: f64, high: f64 },
    /// `sign(x) * |x|^exponent`, with zero mapped to zero for any exponent.
    Power { exponent: f64 },
    /// `x * scale + bias`
    ScaleBias { scale: f64, bias: f64 },
    /// `2|x| - 1`
    Billow,
    /// `1 - |x|`
    Ridged,
}

impl Modifier {
    /// Checks parameter domains.
    pub fn validate(&self) -> NoiseResult<()> {
        match *self {
            Modifier::Clamp { low, high } => {
                if !low.is_finite() || !high.is_finite() {
                    return Err(NoiseError::config(format!(
                        "clamp bounds must be finite, got [{}, {}]",
                        low, high
                    )));
                }
                if low > high {
                    return Err(NoiseError::config(format!(
                        "clamp low ({}) must be <= high ({})",
                        low, high
                    )));
                }
            }
            Modifier::Power { exponent } if !exponent.is_finite() => {
                return Err(NoiseError::config(format!(
                    "power exponent must be finite, got {}",
                    exponent
                )));
            }
            Modifier::ScaleBias { scale, bias } if !scale.is_finite() || !bias.is_finite() => {
                return Err(NoiseError::config(format!(
                    "scale and bias must be finite, got scale {} bias {}",
                    scale, bias
                )));
            }
            _ => {}
        }
        Ok(())
    }

    /// Applies the modifier to a value.
    #[inline]
    pub fn apply(&self, x: f64) -> f64 {
        match *self {
            Modifier::Abs => x.abs(),
            Modifier::Invert => -x,
            Modifier::Clamp { low, high } => x.clamp(low, high),
            Modifier::Power { .. } if x == 0.0 => 0.0,
            Modifier::Power { exponent } => x.signum() * x.abs().powf(exponent),
            Modifier::ScaleBias { scale, bias } => x * scale + bias,
            Modifier::Billow => 2.0 * x.abs() - 1.0,
            Modifier::Ridged => 1.0 - x.abs(),
        }
    }
}

/// A child node with a [`Modifier`] applied to its output.
#[derive(Debug, Clone)]
pub struct Modified {
    child: SharedSource,
    modifier: Modifier,
}

impl Modified {
    pub fn new(child: SharedSource, modifier: Modifier) -> NoiseResult<Self> {
        modifier.validate()?;
        Ok(Self { child, modifier })
    }

    pub fn modifier(&self) -> Modifier {
        self.modifier
    }
}

impl NoiseSource for Modified {
    fn dimension(&self) -> Dimension {
        self.child.dimension()
    }

    #[inline]
    fn eval(&self, coords: &[f64]) -> f64 {
        self.modifier.apply(self.child.eval(coords))
    }
}
