//! Fractal octave summation.
//!
//! ```text
//! fractal(p) = Σ_{i<octaves} a^i · f(source(p · l^i)) / Σ_{i<octaves} a^i
//! ```
//!
//! with persistence `a`, lacunarity `l` and shaping function `f`. Dividing by
//! the amplitude sum keeps the result inside the source's `[-1, 1]` bound.

use std::sync::Arc;

use crate::error::{NoiseError, NoiseResult};
use crate::source::{Dimension, NoiseSource, SeededNoise, SharedSource, MAX_DIMENSION};

/// Upper bound on octaves.
pub const MAX_OCTAVES: u32 = 32;

/// Per-octave shaping function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FractalFunction {
    /// Plain fractal Brownian motion.
    #[default]
    Fbm,
    /// `2|x| - 1`
    Billow,
    /// `1 - |x|`
    Ridged,
}

impl FractalFunction {
    #[inline]
    fn apply(self, x: f64) -> f64 {
        match self {
            FractalFunction::Fbm => x,
            FractalFunction::Billow => 2.0 * x.abs() - 1.0,
            FractalFunction::Ridged => 1.0 - x.abs(),
        }
    }
}

/// Fractal parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FractalParams {
    /// Number of octaves (>= 1).
    pub octaves: u32,
    /// Frequency multiplier per octave (> 0).
    pub lacunarity: f64,
    /// Amplitude multiplier per octave (> 0).
    pub persistence: f64,
    pub function: FractalFunction,
}

impl Default for FractalParams {
    fn default() -> Self {
        Self {
            octaves: 4,
            lacunarity: 2.0,
            persistence: 0.5,
            function: FractalFunction::Fbm,
        }
    }
}

impl FractalParams {
    pub fn validate(&self) -> NoiseResult<()> {
        if self.octaves == 0 || self.octaves > MAX_OCTAVES {
            return Err(NoiseError::config(format!(
                "octaves must be in 1..={}, got {}",
                MAX_OCTAVES, self.octaves
            )));
        }
        if !(self.lacunarity.is_finite() && self.lacunarity > 0.0) {
            return Err(NoiseError::config(format!(
                "lacunarity must be > 0, got {}",
                self.lacunarity
            )));
        }
        if !(self.persistence.is_finite() && self.persistence > 0.0) {
            return Err(NoiseError::config(format!(
                "persistence must be > 0, got {}",
                self.persistence
            )));
        }
        let (norm, amplitude, frequency) = self.scales();
        if !(norm.is_finite() && amplitude.is_finite()) {
            return Err(NoiseError::config(format!(
                "persistence {} overflows over {} octaves",
                self.persistence, self.octaves
            )));
        }
        if !frequency.is_finite() {
            return Err(NoiseError::config(format!(
                "lacunarity {} overflows over {} octaves",
                self.lacunarity, self.octaves
            )));
        }
        Ok(())
    }

    /// Amplitude sum, and the amplitude and frequency of the last octave.
    fn scales(&self) -> (f64, f64, f64) {
        let mut norm = 0.0;
        let mut amplitude = 1.0;
        let mut frequency = 1.0;
        for octave in 0..self.octaves {
            if octave > 0 {
                amplitude *= self.persistence;
                frequency *= self.lacunarity;
            }
            norm += amplitude;
        }
        (norm, amplitude, frequency)
    }
}

#[derive(Debug, Clone)]
enum OctaveSource {
    Shared(SharedSource),
    /// Octave `i` is evaluated with `seed + i`.
    SeedIncrement(Arc<dyn SeededNoise>),
}

/// Fractal summation over a single source.
#[derive(Debug, Clone)]
pub struct Fractal {
    source: OctaveSource,
    params: FractalParams,
    norm: f64,
    dimension: Dimension,
}

impl Fractal {
    /// Every octave samples the same source.
    pub fn new(source: SharedSource, params: FractalParams) -> NoiseResult<Self> {
        let dimension = source.dimension();
        Self::build(OctaveSource::Shared(source), dimension, params)
    }

    /// Octave `i` samples the generator with its seed plus `i`.
    pub fn with_seed_increment(
        source: Arc<dyn SeededNoise>,
        params: FractalParams,
    ) -> NoiseResult<Self> {
        let dimension = source.dimension();
        Self::build(OctaveSource::SeedIncrement(source), dimension, params)
    }

    fn build(source: OctaveSource, dimension: Dimension, params: FractalParams) -> NoiseResult<Self> {
        params.validate()?;
        let (norm, _, _) = params.scales();
        Ok(Self {
            source,
            params,
            norm,
            dimension,
        })
    }

    pub fn params(&self) -> &FractalParams {
        &self.params
    }

    pub fn increments_seed(&self) -> bool {
        matches!(self.source, OctaveSource::SeedIncrement(_))
    }
}

impl NoiseSource for Fractal {
    fn dimension(&self) -> Dimension {
        self.dimension
    }

    fn eval(&self, coords: &[f64]) -> f64 {
        let n = coords.len();
        let mut scaled = [0.0; MAX_DIMENSION];
        let mut total = 0.0;
        let mut amplitude = 1.0;
        let mut frequency = 1.0;

        for octave in 0..self.params.octaves {
            for (s, &x) in scaled.iter_mut().zip(coords) {
                *s = x * frequency;
            }
            let value = match &self.source {
                OctaveSource::Shared(source) => source.eval(&scaled[..n]),
                OctaveSource::SeedIncrement(source) => source
                    .eval_seeded(&scaled[..n], source.seed().wrapping_add(u64::from(octave))),
            };
            total += amplitude * self.params.function.apply(value);
            amplitude *= self.params.persistence;
            frequency *= self.params.lacunarity;
        }

        total / self.norm
    }
}
