//! Shared numeric helpers for lattice noise.

/// Largest magnitude that still maps to a distinct lattice cell.
const LATTICE_LIMIT: f64 = 9.007_199_254_740_992e15; // 2^53

/// Floor to a lattice index.
///
/// Coordinates beyond ±2^53 saturate; they no longer carry a fractional
/// part so every such point sits on a lattice boundary anyway. NaN maps to 0.
#[inline]
pub fn lattice_floor(x: f64) -> i64 {
    let f = x.floor();
    if f >= LATTICE_LIMIT {
        LATTICE_LIMIT as i64
    } else if f <= -LATTICE_LIMIT {
        -(LATTICE_LIMIT as i64)
    } else {
        // `as` saturates and maps NaN to 0.
        f as i64
    }
}

/// Splits a coordinate into its lattice cell and the offset inside it.
#[inline]
pub fn split_cell(x: f64) -> (i64, f64) {
    let cell = lattice_floor(x);
    let offset = x - cell as f64;
    // Saturated cells can leave offsets outside [0, 1).
    (cell, offset.clamp(0.0, 1.0))
}

/// Linear interpolation.
#[inline]
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + t * (b - a)
}

/// Smooth interpolation (smoothstep).
#[inline]
pub fn smoothstep(t: f64) -> f64 {
    t * t * (3.0 - 2.0 * t)
}

/// Quintic interpolation (smoother than smoothstep).
#[inline]
pub fn quintic(t: f64) -> f64 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

/// Curve applied to cell offsets before interpolating between lattice corners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FadeFunction {
    Linear,
    Smoothstep,
    /// `6t^5 - 15t^4 + 10t^3`, C2 continuous.
    #[default]
    Quintic,
}

impl FadeFunction {
    #[inline]
    pub fn apply(self, t: f64) -> f64 {
        match self {
            FadeFunction::Linear => t,
            FadeFunction::Smoothstep => smoothstep(t),
            FadeFunction::Quintic => quintic(t),
        }
    }
}

/// Easing applied to an interpolation weight in `[0, 1]`.
///
/// Lattice generators apply it on top of their fade curve, and [`Lerp`]
/// applies it to the control value.
///
/// [`Lerp`]: crate::modules::Lerp
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Interpolation {
    #[default]
    Linear,
    /// `(1 - cos(pi t)) / 2` easing.
    Cosine,
    /// `t^2`
    Quadratic,
    /// `t^3`
    Cubic,
    /// `t^4`
    Quartic,
}

impl Interpolation {
    /// Eased weight for `t`. Fixes 0 and 1.
    #[inline]
    pub fn ease(self, t: f64) -> f64 {
        match self {
            Interpolation::Linear => t,
            Interpolation::Cosine => (1.0 - (t * std::f64::consts::PI).cos()) * 0.5,
            Interpolation::Quadratic => t * t,
            Interpolation::Cubic => t * t * t,
            Interpolation::Quartic => {
                let t2 = t * t;
                t2 * t2
            }
        }
    }

    #[inline]
    pub fn interpolate(self, a: f64, b: f64, t: f64) -> f64 {
        lerp(a, b, self.ease(t))
    }
}

/// Gradient directions for gradient noise, indexed by `hash % len`.
pub mod gradients {
    pub const GRAD_1D: [[f64; 1]; 2] = [[1.0], [-1.0]];

    pub const GRAD_2D: [[f64; 2]; 8] = [
        [1.0, 1.0],
        [-1.0, 1.0],
        [1.0, -1.0],
        [-1.0, -1.0],
        [1.0, 0.0],
        [-1.0, 0.0],
        [0.0, 1.0],
        [0.0, -1.0],
    ];

    /// Edge midpoints of the cube.
    pub const GRAD_3D: [[f64; 3]; 12] = [
        [1.0, 1.0, 0.0],
        [-1.0, 1.0, 0.0],
        [1.0, -1.0, 0.0],
        [-1.0, -1.0, 0.0],
        [1.0, 0.0, 1.0],
        [-1.0, 0.0, 1.0],
        [1.0, 0.0, -1.0],
        [-1.0, 0.0, -1.0],
        [0.0, 1.0, 1.0],
        [0.0, -1.0, 1.0],
        [0.0, 1.0, -1.0],
        [0.0, -1.0, -1.0],
    ];

    /// Edge midpoints of the tesseract.
    pub const GRAD_4D: [[f64; 4]; 32] = [
        [0.0, 1.0, 1.0, 1.0],
        [0.0, 1.0, 1.0, -1.0],
        [0.0, 1.0, -1.0, 1.0],
        [0.0, 1.0, -1.0, -1.0],
        [0.0, -1.0, 1.0, 1.0],
        [0.0, -1.0, 1.0, -1.0],
        [0.0, -1.0, -1.0, 1.0],
        [0.0, -1.0, -1.0, -1.0],
        [1.0, 0.0, 1.0, 1.0],
        [1.0, 0.0, 1.0, -1.0],
        [1.0, 0.0, -1.0, 1.0],
        [1.0, 0.0, -1.0, -1.0],
        [-1.0, 0.0, 1.0, 1.0],
        [-1.0, 0.0, 1.0, -1.0],
        [-1.0, 0.0, -1.0, 1.0],
        [-1.0, 0.0, -1.0, -1.0],
        [1.0, 1.0, 0.0, 1.0],
        [1.0, 1.0, 0.0, -1.0],
        [1.0, -1.0, 0.0, 1.0],
        [1.0, -1.0, 0.0, -1.0],
        [-1.0, 1.0, 0.0, 1.0],
        [-1.0, 1.0, 0.0, -1.0],
        [-1.0, -1.0, 0.0, 1.0],
        [-1.0, -1.0, 0.0, -1.0],
        [1.0, 1.0, 1.0, 0.0],
        [1.0, 1.0, -1.0, 0.0],
        [1.0, -1.0, 1.0, 0.0],
        [1.0, -1.0, -1.0, 0.0],
        [-1.0, 1.0, 1.0, 0.0],
        [-1.0, 1.0, -1.0, 0.0],
        [-1.0, -1.0, 1.0, 0.0],
        [-1.0, -1.0, -1.0, 0.0],
    ];

    /// Dot product of the hashed gradient with `offset`.
    #[inline]
    pub fn dot(hash: u64, offset: &[f64]) -> f64 {
        fn pick<const N: usize>(table: &[[f64; N]], hash: u64) -> &[f64; N] {
            &table[(hash % table.len() as u64) as usize]
        }

        match offset.len() {
            1 => pick(&GRAD_1D, hash)[0] * offset[0],
            2 => {
                let g = pick(&GRAD_2D, hash);
                g[0] * offset[0] + g[1] * offset[1]
            }
            3 => {
                let g = pick(&GRAD_3D, hash);
                g[0] * offset[0] + g[1] * offset[1] + g[2] * offset[2]
            }
            _ => {
                let g = pick(&GRAD_4D, hash);
                g[0] * offset[0] + g[1] * offset[1] + g[2] * offset[2] + g[3] * offset[3]
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lattice_floor() {
        assert_eq!(lattice_floor(1.5), 1);
        assert_eq!(lattice_floor(-0.5), -1);
        assert_eq!(lattice_floor(-1.0), -1);
        assert_eq!(lattice_floor(f64::NAN), 0);
        assert_eq!(lattice_floor(1e300), LATTICE_LIMIT as i64);
        assert_eq!(lattice_floor(-1e300), -(LATTICE_LIMIT as i64));
    }

    #[test]
    fn test_split_cell_offsets_in_unit_range() {
        for x in [-3.25, -0.0001, 0.0, 0.75, 1e12 + 0.5, -1e12 - 0.5] {
            let (cell, t) = split_cell(x);
            assert!((0.0..=1.0).contains(&t), "offset {} out of range for {}", t, x);
            assert!(((cell as f64 + t) - x).abs() < 1e-3);
        }
    }

    #[test]
    fn test_fade_endpoints() {
        for fade in [
            FadeFunction::Linear,
            FadeFunction::Smoothstep,
            FadeFunction::Quintic,
        ] {
            assert_eq!(fade.apply(0.0), 0.0);
            assert_eq!(fade.apply(1.0), 1.0);
            assert!((fade.apply(0.5) - 0.5).abs() < 1e-12);
        }
    }

    #[test]
    fn test_cosine_interpolation_endpoints() {
        let i = Interpolation::Cosine;
        assert!((i.interpolate(2.0, 4.0, 0.0) - 2.0).abs() < 1e-12);
        assert!((i.interpolate(2.0, 4.0, 1.0) - 4.0).abs() < 1e-12);
        assert!((i.interpolate(2.0, 4.0, 0.5) - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_power_easings() {
        assert_eq!(Interpolation::Quadratic.interpolate(1.0, 3.0, 0.5), 1.5);
        assert_eq!(Interpolation::Cubic.interpolate(1.0, 3.0, 0.5), 1.25);
        assert_eq!(Interpolation::Quartic.interpolate(1.0, 3.0, 0.5), 1.125);
        for i in [
            Interpolation::Linear,
            Interpolation::Cosine,
            Interpolation::Quadratic,
            Interpolation::Cubic,
            Interpolation::Quartic,
        ] {
            assert!(i.ease(0.0).abs() < 1e-15, "{:?}", i);
            assert!((i.ease(1.0) - 1.0).abs() < 1e-15, "{:?}", i);
        }
    }

    #[test]
    fn test_gradient_tables_have_unit_components() {
        for g in gradients::GRAD_4D.iter() {
            let zeros = g.iter().filter(|c| **c == 0.0).count();
            assert_eq!(zeros, 1, "4D gradients are tesseract edges");
        }
        for g in gradients::GRAD_3D.iter() {
            let zeros = g.iter().filter(|c| **c == 0.0).count();
            assert_eq!(zeros, 1, "3D gradients are cube edges");
        }
    }
}
