//! Nodes that combine or layer other nodes.

mod blend;
mod combine;
mod fractal;

pub use blend::{Lerp, Select, WeightedBlend};
pub use combine::{Combine, Combiner};
pub use fractal::{Fractal, FractalFunction, FractalParams, MAX_OCTAVES};
