//! The contract shared by every node in a noise pipeline.

use std::fmt;
use std::sync::Arc;

use crate::error::{NoiseError, NoiseResult};

/// Maximum number of coordinates a node accepts.
pub const MAX_DIMENSION: usize = 4;

/// Dimensionality of a noise node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Dimension {
    One,
    Two,
    Three,
    Four,
}

impl Dimension {
    /// All dimensions in ascending order.
    pub const ALL: [Dimension; 4] = [
        Dimension::One,
        Dimension::Two,
        Dimension::Three,
        Dimension::Four,
    ];

    /// Number of coordinates a query must carry.
    #[inline]
    pub const fn len(self) -> usize {
        match self {
            Dimension::One => 1,
            Dimension::Two => 2,
            Dimension::Three => 3,
            Dimension::Four => 4,
        }
    }

    /// Dimension with the given coordinate count.
    pub fn from_len(len: usize) -> NoiseResult<Self> {
        match len {
            1 => Ok(Dimension::One),
            2 => Ok(Dimension::Two),
            3 => Ok(Dimension::Three),
            4 => Ok(Dimension::Four),
            other => Err(NoiseError::config(format!(
                "dimension must be in 1..={}, got {}",
                MAX_DIMENSION, other
            ))),
        }
    }
}

impl TryFrom<u8> for Dimension {
    type Error = NoiseError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Dimension::from_len(usize::from(value))
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}D", self.len())
    }
}

/// A deterministic scalar field over 1 to 4 dimensional coordinates.
///
/// Implementations are immutable after construction and safe to evaluate
/// from many threads at once.
pub trait NoiseSource: Send + Sync + fmt::Debug {
    /// Dimensionality this node accepts.
    fn dimension(&self) -> Dimension;

    /// Evaluates the field without checking the coordinate count.
    ///
    /// Callers must pass exactly `dimension().len()` coordinates. Composite
    /// nodes use this after their own check so a query is validated once.
    fn eval(&self, coords: &[f64]) -> f64;

    /// Evaluates the field, rejecting queries of the wrong dimension.
    fn evaluate(&self, coords: &[f64]) -> NoiseResult<f64> {
        check_coords(self.dimension(), coords)?;
        Ok(self.eval(coords))
    }
}

/// A node shared between any number of parents.
pub type SharedSource = Arc<dyn NoiseSource>;

/// A generator whose output depends on a seed.
///
/// Fractal summation uses [`SeededNoise::eval_seeded`] to give each octave
/// its own seed without building one generator per octave.
pub trait SeededNoise: NoiseSource {
    /// The seed used by [`NoiseSource::eval`].
    fn seed(&self) -> u64;

    /// Evaluates with an explicit seed in place of the configured one.
    fn eval_seeded(&self, coords: &[f64], seed: u64) -> f64;

    /// Converts to a plain shared source.
    fn as_source(self: Arc<Self>) -> SharedSource;
}

/// Fails with `DimensionMismatch` unless `coords` fits `dimension`.
#[inline]
pub fn check_coords(dimension: Dimension, coords: &[f64]) -> NoiseResult<()> {
    if coords.len() != dimension.len() {
        return Err(NoiseError::DimensionMismatch {
            expected: dimension.len(),
            actual: coords.len(),
        });
    }
    Ok(())
}

/// Fails with `Configuration` unless `child` has the expected dimension.
pub fn expect_dimension(child: &dyn NoiseSource, expected: Dimension, role: &str) -> NoiseResult<()> {
    if child.dimension() != expected {
        return Err(NoiseError::config(format!(
            "{} is {} but {} is required",
            role,
            child.dimension(),
            expected
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Sum2;

    impl NoiseSource for Sum2 {
        fn dimension(&self) -> Dimension {
            Dimension::Two
        }

        fn eval(&self, coords: &[f64]) -> f64 {
            coords[0] + coords[1]
        }
    }

    #[test]
    fn test_dimension_conversions() {
        assert_eq!(Dimension::try_from(3u8).unwrap(), Dimension::Three);
        assert!(Dimension::try_from(0u8).is_err());
        assert!(Dimension::try_from(5u8).is_err());
        for dim in Dimension::ALL {
            assert_eq!(Dimension::from_len(dim.len()).unwrap(), dim);
        }
        assert_eq!(Dimension::Four.to_string(), "4D");
    }

    #[test]
    fn test_evaluate_checks_length() {
        let source = Sum2;
        assert_eq!(source.evaluate(&[1.0, 2.0]), Ok(3.0));
        assert_eq!(
            source.evaluate(&[1.0]),
            Err(NoiseError::DimensionMismatch {
                expected: 2,
                actual: 1
            })
        );
        assert!(source.evaluate(&[1.0, 2.0, 3.0]).is_err());
    }

    #[test]
    fn test_expect_dimension() {
        let source = Sum2;
        assert!(expect_dimension(&source, Dimension::Two, "input").is_ok());
        let err = expect_dimension(&source, Dimension::Three, "input").unwrap_err();
        assert_eq!(
            err.to_string(),
            "configuration error: input is 2D but 3D is required"
        );
    }
}
