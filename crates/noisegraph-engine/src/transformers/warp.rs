//! Domain warping: perturb coordinates by auxiliary noise before sampling.

use crate::error::{NoiseError, NoiseResult};
use crate::source::{expect_dimension, Dimension, NoiseSource, SharedSource, MAX_DIMENSION};

/// Sample offsets used when one warp source drives every axis.
///
/// Axis 0 samples the source in place; axis `i` samples it shifted by row `i`.
const AXIS_OFFSETS: [[f64; MAX_DIMENSION]; MAX_DIMENSION] = [
    [0.0, 0.0, 0.0, 0.0],
    [5.2, 1.3, 9.2, 2.4],
    [1.7, 8.3, 2.8, 4.3],
    [1.9, 6.2, 4.1, 8.9],
];

#[derive(Debug, Clone)]
enum WarpSources {
    PerAxis(Vec<SharedSource>),
    Offset(SharedSource),
}

/// `T(p)_i = p_i + amplitude_i * warp_i(p)`, all warps evaluated at the
/// original `p`.
#[derive(Debug, Clone)]
pub struct DomainWarp {
    child: SharedSource,
    warps: WarpSources,
    amplitude: [f64; MAX_DIMENSION],
}

/// Expands one amplitude to every axis or checks a per-axis list.
fn expand_amplitude(dimension: Dimension, amplitude: &[f64]) -> NoiseResult<[f64; MAX_DIMENSION]> {
    let n = dimension.len();
    if amplitude.len() != 1 && amplitude.len() != n {
        return Err(NoiseError::config(format!(
            "expected 1 or {} warp amplitudes, got {}",
            n,
            amplitude.len()
        )));
    }
    if let Some(bad) = amplitude.iter().find(|a| !a.is_finite()) {
        return Err(NoiseError::config(format!(
            "warp amplitude must be finite, got {}",
            bad
        )));
    }
    let mut out = [0.0; MAX_DIMENSION];
    for (axis, a) in out.iter_mut().enumerate().take(n) {
        *a = if amplitude.len() == 1 {
            amplitude[0]
        } else {
            amplitude[axis]
        };
    }
    Ok(out)
}

impl DomainWarp {
    /// One warp source per axis.
    pub fn new(child: SharedSource, warps: Vec<SharedSource>, amplitude: &[f64]) -> NoiseResult<Self> {
        let dimension = child.dimension();
        if warps.len() != dimension.len() {
            return Err(NoiseError::config(format!(
                "expected {} warp sources (one per axis), got {}",
                dimension.len(),
                warps.len()
            )));
        }
        for warp in &warps {
            expect_dimension(warp.as_ref(), dimension, "warp source")?;
        }
        let amplitude = expand_amplitude(dimension, amplitude)?;
        Ok(Self {
            child,
            warps: WarpSources::PerAxis(warps),
            amplitude,
        })
    }

    /// A single warp source sampled at a fixed offset per axis.
    pub fn with_offsets(child: SharedSource, warp: SharedSource, amplitude: &[f64]) -> NoiseResult<Self> {
        let dimension = child.dimension();
        expect_dimension(warp.as_ref(), dimension, "warp source")?;
        let amplitude = expand_amplitude(dimension, amplitude)?;
        Ok(Self {
            child,
            warps: WarpSources::Offset(warp),
            amplitude,
        })
    }

    #[inline]
    fn displacement(&self, axis: usize, coords: &[f64]) -> f64 {
        match &self.warps {
            WarpSources::PerAxis(warps) => warps[axis].eval(coords),
            WarpSources::Offset(warp) => {
                let n = coords.len();
                let mut shifted = [0.0; MAX_DIMENSION];
                for (i, s) in shifted.iter_mut().enumerate().take(n) {
                    *s = coords[i] + AXIS_OFFSETS[axis][i];
                }
                warp.eval(&shifted[..n])
            }
        }
    }
}

impl NoiseSource for DomainWarp {
    fn dimension(&self) -> Dimension {
        self.child.dimension()
    }

    #[inline]
    fn eval(&self, coords: &[f64]) -> f64 {
        let n = coords.len();
        let mut warped = [0.0; MAX_DIMENSION];
        for axis in 0..n {
            warped[axis] = coords[axis] + self.amplitude[axis] * self.displacement(axis, coords);
        }
        self.child.eval(&warped[..n])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::Constant;
    use std::sync::Arc;

    /// Returns the first coordinate.
    #[derive(Debug)]
    struct FirstAxis(Dimension);

    impl NoiseSource for FirstAxis {
        fn dimension(&self) -> Dimension {
            self.0
        }

        fn eval(&self, coords: &[f64]) -> f64 {
            coords[0]
        }
    }

    fn constant(v: f64, dim: Dimension) -> SharedSource {
        Arc::new(Constant::new(v, dim).unwrap())
    }

    #[test]
    fn test_per_axis_warp() {
        let child: SharedSource = Arc::new(FirstAxis(Dimension::Two));
        let warp = DomainWarp::new(
            child,
            vec![constant(1.0, Dimension::Two), constant(-1.0, Dimension::Two)],
            &[0.5, 2.0],
        )
        .unwrap();
        assert_eq!(warp.eval(&[1.0, 1.0]), 1.5);
    }

    #[test]
    fn test_offset_warp_shifts_later_axes() {
        let child: SharedSource = Arc::new(FirstAxis(Dimension::Two));
        let source: SharedSource = Arc::new(FirstAxis(Dimension::Two));
        let warp = DomainWarp::with_offsets(child, source, &[1.0]).unwrap();
        // axis 0 samples the warp source at p, so x' = x + x.
        assert_eq!(warp.eval(&[2.0, 0.0]), 4.0);
    }

    #[test]
    fn test_rejects_mismatched_wiring() {
        let child: SharedSource = Arc::new(FirstAxis(Dimension::Two));
        assert!(DomainWarp::new(child.clone(), vec![constant(1.0, Dimension::Two)], &[1.0]).is_err());
        assert!(DomainWarp::with_offsets(child.clone(), constant(1.0, Dimension::Three), &[1.0]).is_err());
        assert!(DomainWarp::with_offsets(child, constant(1.0, Dimension::Two), &[1.0, 2.0, 3.0]).is_err());
    }
}
