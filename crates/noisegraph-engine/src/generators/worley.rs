//! Worley (cellular) noise.
//!
//! Each lattice cell holds between one and `max_feature_points` feature
//! points whose count and positions come from a PCG32 seeded by the cell
//! hash. A query scans its own cell and the 3^N - 1 neighbours and tracks the
//! two nearest feature points.

use super::CellPoint;
use crate::error::{NoiseError, NoiseResult};
use crate::hash::hash_lattice;
use crate::rng::DeterministicRng;
use crate::source::{Dimension, MAX_DIMENSION};

/// Largest supported number of feature points per cell.
pub const MAX_FEATURE_POINTS: u32 = 16;

/// Distance metric between a query point and a feature point.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DistanceFunction {
    /// sqrt(Σ d²)
    #[default]
    Euclidean,
    /// Σ d²
    EuclideanSquared,
    /// Σ |d|
    Manhattan,
    /// max |d|
    Chebyshev,
    /// (Σ |d|^p)^(1/p)
    Minkowski(f64),
}

impl DistanceFunction {
    /// Distance for a coordinate delta.
    #[inline]
    pub fn measure(self, delta: &[f64]) -> f64 {
        match self {
            DistanceFunction::Euclidean => delta.iter().map(|d| d * d).sum::<f64>().sqrt(),
            DistanceFunction::EuclideanSquared => delta.iter().map(|d| d * d).sum(),
            DistanceFunction::Manhattan => delta.iter().map(|d| d.abs()).sum(),
            DistanceFunction::Chebyshev => delta.iter().fold(0.0, |m, d| d.abs().max(m)),
            DistanceFunction::Minkowski(p) => delta
                .iter()
                .map(|d| d.abs().powf(p))
                .sum::<f64>()
                .powf(1.0 / p),
        }
    }
}

/// Which combination of the two nearest distances to return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WorleyReturn {
    /// Distance to the nearest feature point.
    #[default]
    F1,
    /// Distance to the second nearest feature point.
    F2,
    /// F1 + F2.
    F1PlusF2,
    /// F2 - F1 (cell edges).
    F2MinusF1,
    /// F1 * F2.
    F1TimesF2,
}

impl WorleyReturn {
    #[inline]
    fn combine(self, f1: f64, f2: f64) -> f64 {
        match self {
            WorleyReturn::F1 => f1,
            WorleyReturn::F2 => f2,
            WorleyReturn::F1PlusF2 => f1 + f2,
            WorleyReturn::F2MinusF1 => f2 - f1,
            WorleyReturn::F1TimesF2 => f1 * f2,
        }
    }
}

/// The nearest feature point to a query.
#[derive(Debug, Clone, PartialEq)]
pub struct WorleyFeature {
    /// Distance under the configured metric.
    pub distance: f64,
    /// Absolute position of the feature point.
    pub point: Vec<f64>,
}

/// Worley (cellular) noise generator.
///
/// Returns raw distances under the configured metric; the value is not
/// remapped to `[-1, 1]`.
#[derive(Debug, Clone)]
pub struct WorleyNoise {
    seed: u64,
    dimension: Dimension,
    distance: DistanceFunction,
    return_type: WorleyReturn,
    jitter: f64,
    max_feature_points: u32,
}

impl WorleyNoise {
    /// Create a new Worley noise generator with default settings
    /// (Euclidean F1, full jitter, one feature point per cell).
    pub fn new(seed: u64, dimension: Dimension) -> Self {
        Self {
            seed,
            dimension,
            distance: DistanceFunction::default(),
            return_type: WorleyReturn::default(),
            jitter: 1.0,
            max_feature_points: 1,
        }
    }

    /// Set the distance function.
    pub fn with_distance(mut self, distance: DistanceFunction) -> NoiseResult<Self> {
        if let DistanceFunction::Minkowski(p) = distance {
            if !(p.is_finite() && p > 0.0) {
                return Err(NoiseError::config(format!(
                    "minkowski order must be > 0, got {}",
                    p
                )));
            }
        }
        self.distance = distance;
        Ok(self)
    }

    /// Set the return type.
    pub fn with_return_type(mut self, return_type: WorleyReturn) -> Self {
        self.return_type = return_type;
        self
    }

    /// Set the jitter amount (0.0 = regular grid, 1.0 = full jitter).
    pub fn with_jitter(mut self, jitter: f64) -> NoiseResult<Self> {
        if !(0.0..=1.0).contains(&jitter) {
            return Err(NoiseError::config(format!(
                "jitter must be in [0, 1], got {}",
                jitter
            )));
        }
        self.jitter = jitter;
        Ok(self)
    }

    /// Set the maximum number of feature points per cell.
    pub fn with_max_feature_points(mut self, max: u32) -> NoiseResult<Self> {
        if max == 0 || max > MAX_FEATURE_POINTS {
            return Err(NoiseError::config(format!(
                "max_feature_points must be in 1..={}, got {}",
                MAX_FEATURE_POINTS, max
            )));
        }
        self.max_feature_points = max;
        Ok(self)
    }

    /// Seeds the feature-point RNG for a cell and returns it with the point count.
    fn cell_rng(&self, cell: &[i64], seed: u64) -> (DeterministicRng, u32) {
        let mut rng = DeterministicRng::new(hash_lattice(seed, cell));
        let count = if self.max_feature_points == 1 {
            1
        } else {
            rng.gen_range(1..=self.max_feature_points)
        };
        (rng, count)
    }

    /// Next feature point as an offset from the corner of its cell.
    #[inline]
    fn next_offset(&self, rng: &mut DeterministicRng, offset: &mut [f64]) {
        for o in offset.iter_mut() {
            *o = 0.5 + (rng.gen_f64() - 0.5) * self.jitter;
        }
    }

    /// Feature points of a lattice cell, in generation order.
    pub fn cell_feature_points(&self, cell: &[i64]) -> Vec<Vec<f64>> {
        let n = cell.len();
        let (mut rng, count) = self.cell_rng(cell, self.seed);
        let mut offset = [0.0; MAX_DIMENSION];
        (0..count)
            .map(|_| {
                self.next_offset(&mut rng, &mut offset[..n]);
                cell.iter().zip(&offset[..n]).map(|(&c, o)| c as f64 + o).collect()
            })
            .collect()
    }

    /// Nearest feature point to `coords`.
    pub fn nearest(&self, coords: &[f64]) -> NoiseResult<WorleyFeature> {
        crate::source::check_coords(self.dimension, coords)?;
        let n = coords.len();
        let mut best = WorleyFeature {
            distance: f64::INFINITY,
            point: vec![0.0; n],
        };
        self.scan(coords, self.seed, |distance, cell, offset| {
            if distance < best.distance {
                best.distance = distance;
                for (p, (&c, o)) in best.point.iter_mut().zip(cell.iter().zip(offset)) {
                    *p = c as f64 + o;
                }
            }
        });
        Ok(best)
    }

    /// Calls `visit(distance, cell, offset)` for every feature point in the
    /// 3^N neighbourhood of `coords`.
    ///
    /// Deltas are taken between offsets inside the home cell's frame, so
    /// their size never depends on how far the query is from the origin.
    fn scan(&self, coords: &[f64], seed: u64, mut visit: impl FnMut(f64, &[i64], &[f64])) {
        let home = CellPoint::locate(coords);
        let n = home.len;

        let mut cell = [0i64; MAX_DIMENSION];
        let mut offset = [0.0; MAX_DIMENSION];
        let mut delta = [0.0; MAX_DIMENSION];
        let mut steps = [0i64; MAX_DIMENSION];
        let neighbours = 3usize.pow(n as u32);

        for index in 0..neighbours {
            let mut rest = index;
            for axis in 0..n {
                steps[axis] = (rest % 3) as i64 - 1;
                rest /= 3;
                cell[axis] = home.cell[axis].wrapping_add(steps[axis]);
            }

            let (mut rng, count) = self.cell_rng(&cell[..n], seed);
            for _ in 0..count {
                self.next_offset(&mut rng, &mut offset[..n]);
                for axis in 0..n {
                    delta[axis] = steps[axis] as f64 + offset[axis] - home.offset[axis];
                }
                visit(self.distance.measure(&delta[..n]), &cell[..n], &offset[..n]);
            }
        }
    }

    fn sample(&self, coords: &[f64], seed: u64) -> f64 {
        let mut f1 = f64::INFINITY;
        let mut f2 = f64::INFINITY;
        self.scan(coords, seed, |d, _, _| {
            if d < f1 {
                f2 = f1;
                f1 = d;
            } else if d < f2 {
                f2 = d;
            }
        });
        self.return_type.combine(f1, f2)
    }
}

seeded_generator!(WorleyNoise);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::NoiseSource;

    #[test]
    fn test_distance_functions() {
        let d = [3.0, -4.0];
        assert_eq!(DistanceFunction::Euclidean.measure(&d), 5.0);
        assert_eq!(DistanceFunction::EuclideanSquared.measure(&d), 25.0);
        assert_eq!(DistanceFunction::Manhattan.measure(&d), 7.0);
        assert_eq!(DistanceFunction::Chebyshev.measure(&d), 4.0);
        assert!((DistanceFunction::Minkowski(2.0).measure(&d) - 5.0).abs() < 1e-12);
        assert!((DistanceFunction::Minkowski(1.0).measure(&d) - 7.0).abs() < 1e-12);
    }

    #[test]
    fn test_invalid_parameters_rejected() {
        let base = WorleyNoise::new(1, Dimension::Two);
        assert!(base.clone().with_jitter(1.5).is_err());
        assert!(base.clone().with_jitter(-0.1).is_err());
        assert!(base.clone().with_max_feature_points(0).is_err());
        assert!(base.clone().with_max_feature_points(17).is_err());
        assert!(base.clone().with_distance(DistanceFunction::Minkowski(0.0)).is_err());
        assert!(base.with_distance(DistanceFunction::Minkowski(3.0)).is_ok());
    }

    #[test]
    fn test_zero_jitter_places_points_at_cell_centres() {
        let noise = WorleyNoise::new(8, Dimension::Two).with_jitter(0.0).unwrap();
        let points = noise.cell_feature_points(&[2, -3]);
        assert_eq!(points, vec![vec![2.5, -2.5]]);
        assert!((noise.eval(&[2.5, -2.5])).abs() < 1e-12);
        assert!((noise.eval(&[2.0, -2.5]) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_feature_points_stay_in_cell() {
        let noise = WorleyNoise::new(3, Dimension::Three)
            .with_max_feature_points(4)
            .unwrap();
        for x in -2..2 {
            let cell = [x, 1, -1];
            let points = noise.cell_feature_points(&cell);
            assert!((1..=4).contains(&points.len()));
            for p in points {
                for (axis, &c) in cell.iter().enumerate() {
                    assert!(p[axis] >= c as f64 && p[axis] <= c as f64 + 1.0);
                }
            }
        }
    }

    #[test]
    fn test_return_types_are_consistent() {
        let coords = [0.37, 1.91];
        let make = |r| WorleyNoise::new(21, Dimension::Two).with_return_type(r);
        let f1 = make(WorleyReturn::F1).eval(&coords);
        let f2 = make(WorleyReturn::F2).eval(&coords);
        assert!(f1 <= f2);
        assert_eq!(make(WorleyReturn::F1PlusF2).eval(&coords), f1 + f2);
        assert_eq!(make(WorleyReturn::F2MinusF1).eval(&coords), f2 - f1);
        assert_eq!(make(WorleyReturn::F1TimesF2).eval(&coords), f1 * f2);
    }

    #[test]
    fn test_nearest_matches_f1() {
        let noise = WorleyNoise::new(5, Dimension::Two);
        let coords = [4.2, -7.7];
        let nearest = noise.nearest(&coords).unwrap();
        assert_eq!(nearest.distance, noise.eval(&coords));
        let recomputed = DistanceFunction::Euclidean
            .measure(&[nearest.point[0] - coords[0], nearest.point[1] - coords[1]]);
        assert!((recomputed - nearest.distance).abs() < 1e-12);
        assert!(noise.nearest(&[1.0]).is_err());
    }

    #[test]
    fn test_distances_stay_bounded_far_from_origin() {
        // Two feature-point cells apart at most, whatever the metric.
        let bound = 2.0 * 2f64.sqrt();
        for distance in [DistanceFunction::Euclidean, DistanceFunction::Manhattan] {
            let noise = WorleyNoise::new(17, Dimension::Two)
                .with_distance(distance)
                .unwrap()
                .with_return_type(WorleyReturn::F2);
            for x in [1e17, -1e17, 1e200, 1e300, -1e300, f64::MAX] {
                let v = noise.eval(&[x, 0.5 * x]);
                assert!(v.is_finite() && v >= 0.0, "{:?} at {} gave {}", distance, x, v);
                assert!(v <= 2.0 * bound, "{:?} at {} gave {}", distance, x, v);
            }
        }
    }

    #[test]
    fn test_far_queries_keep_cell_resolution() {
        // Just below 2^53 coordinates are still distinct integers.
        let noise = WorleyNoise::new(2, Dimension::One).with_jitter(0.0).unwrap();
        let x = 4.5e15;
        assert_eq!(noise.eval(&[x]), 0.5);
        assert!(noise.eval(&[x + 0.5]).abs() < 1e-12);
    }
}
