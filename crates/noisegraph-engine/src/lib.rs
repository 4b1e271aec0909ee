//! Deterministic procedural noise engine.
//!
//! Produces seed-reproducible scalar fields over 1 to 4 dimensional
//! coordinates. Nodes implement [`NoiseSource`] and fall into four groups:
//!
//! - [`generators`]: leaves (value, Perlin, simplex, super simplex, Worley,
//!   white, patterns)
//! - [`modifiers`]: map a child's output value
//! - [`transformers`]: map a child's input coordinates
//! - [`modules`]: combine or layer several children
//!
//! Nodes are immutable and `Send + Sync`; children are shared through
//! [`SharedSource`] handles. A [`Pipeline`] wraps a root node with a name,
//! version and seed, and is assembled either with [`PipelineBuilder`] or by
//! compiling a `noisegraph_spec::GraphSpec` with [`compile_graph`].
//!
//! # Example
//!
//! ```
//! use noisegraph_engine::{Dimension, NoiseSource, SimplexNoise};
//!
//! let noise = SimplexNoise::new(42, Dimension::Three);
//! let v = noise.evaluate(&[0.5, 1.5, -2.0]).unwrap();
//! assert!((-1.0..=1.0).contains(&v));
//! assert!(noise.evaluate(&[0.5, 1.5]).is_err());
//! ```

pub mod error;
pub mod generators;
pub mod hash;
pub mod math;
pub mod modifiers;
pub mod modules;
pub mod pipeline;
pub mod rng;
pub mod source;
pub mod transformers;

pub use error::{NoiseError, NoiseResult};
pub use generators::{
    Checkerboard, Constant, Cylinders, DistanceFunction, GaussianWhiteNoise, PerlinNoise,
    SimplexNoise, SimplexVariant, Spheres, SuperSimplexNoise, ValueNoise, WhiteNoise,
    WorleyFeature, WorleyNoise, WorleyReturn,
};
pub use math::{FadeFunction, Interpolation};
pub use modifiers::{Modified, Modifier};
pub use modules::{Combine, Combiner, Fractal, FractalFunction, FractalParams, Lerp, Select, WeightedBlend};
pub use pipeline::{compile_graph, Pipeline, PipelineBuilder, MAX_GRAPH_DEPTH};
pub use rng::{derive_node_seed, DeterministicRng};
pub use source::{Dimension, NoiseSource, SeededNoise, SharedSource, MAX_DIMENSION};
pub use transformers::{Affine, AffineTransform, DomainWarp, Project, Slice};
