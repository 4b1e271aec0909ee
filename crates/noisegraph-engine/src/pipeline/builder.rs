//! Fluent pipeline construction.

use std::sync::Arc;

use super::Pipeline;
use crate::error::{NoiseError, NoiseResult};
use crate::modifiers::{Modified, Modifier};
use crate::modules::{Combine, Combiner, Fractal, FractalParams};
use crate::rng::derive_node_seed;
use crate::source::{NoiseSource, SharedSource};
use crate::transformers::{Affine, AffineTransform, DomainWarp};

/// Builds a [`Pipeline`] step by step.
///
/// Transform steps wrap the current root on its input side, modifier steps
/// on its output side. The first failing step is reported by
/// [`PipelineBuilder::build`].
///
/// # Example
/// ```
/// use noisegraph_engine::{Dimension, Modifier, PerlinNoise, PipelineBuilder};
/// use noisegraph_engine::modules::FractalParams;
///
/// let pipeline = PipelineBuilder::new("hills")
///     .seed(7)
///     .generator("base", |seed| PerlinNoise::new(seed, Dimension::Two))
///     .scale(&[0.05, 0.05])
///     .octavate(FractalParams::default())
///     .modify(Modifier::Clamp { low: -0.5, high: 0.5 })
///     .build()
///     .unwrap();
///
/// let v = pipeline.evaluate(&[10.0, 20.0]).unwrap();
/// assert!((-0.5..=0.5).contains(&v));
/// ```
#[derive(Debug)]
pub struct PipelineBuilder {
    name: String,
    version: String,
    seed: u64,
    root: Option<SharedSource>,
    nodes: usize,
    error: Option<NoiseError>,
}

impl PipelineBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: "0.1.0".to_string(),
            seed: 0,
            root: None,
            nodes: 0,
            error: None,
        }
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Sets the pipeline seed.
    ///
    /// Generators added afterwards with [`Self::generator`] derive their
    /// seeds from it. Nodes passed to [`Self::source`] keep their own.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Sets the root node, replacing any previous one.
    pub fn source(mut self, source: SharedSource) -> Self {
        self.root = Some(source);
        self.nodes += 1;
        self
    }

    /// Sets the root to a generator seeded from the pipeline seed and `label`.
    ///
    /// Seeds are derived the way graph compilation derives them from node
    /// ids, so `generator("base", ..)` matches a graph node with id `base`.
    pub fn generator<T, F>(self, label: &str, make: F) -> Self
    where
        T: NoiseSource + 'static,
        F: FnOnce(u64) -> T,
    {
        let seed = derive_node_seed(self.seed, label);
        self.source(Arc::new(make(seed)))
    }

    /// Wraps the current root with `wrap`, keeping the first error.
    fn wrap<F>(mut self, step: &str, wrap: F) -> Self
    where
        F: FnOnce(SharedSource) -> NoiseResult<SharedSource>,
    {
        if self.error.is_some() {
            return self;
        }
        match self.root.take() {
            Some(root) => match wrap(root) {
                Ok(node) => {
                    self.root = Some(node);
                    self.nodes += 1;
                }
                Err(e) => self.error = Some(e),
            },
            None => {
                self.error = Some(NoiseError::config(format!(
                    "'{}' needs a source to wrap",
                    step
                )))
            }
        }
        self
    }

    /// Applies an arbitrary affine map to the input coordinates.
    pub fn transform(self, affine: Affine) -> Self {
        self.wrap("transform", |root| {
            Ok(Arc::new(AffineTransform::new(root, affine)?) as SharedSource)
        })
    }

    pub fn translate(self, offset: &[f64]) -> Self {
        self.wrap("translate", |root| {
            let affine = Affine::translate(offset)?;
            Ok(Arc::new(AffineTransform::new(root, affine)?) as SharedSource)
        })
    }

    /// Per-axis scale; a single factor scales every axis.
    pub fn scale(self, factors: &[f64]) -> Self {
        self.wrap("scale", |root| {
            let affine = if factors.len() == 1 {
                Affine::uniform_scale(root.dimension(), factors[0])?
            } else {
                Affine::scale(factors)?
            };
            Ok(Arc::new(AffineTransform::new(root, affine)?) as SharedSource)
        })
    }

    /// Rotation by `angle` radians in the plane of axes `a` and `b`.
    pub fn rotate_plane(self, a: usize, b: usize, angle: f64) -> Self {
        self.wrap("rotate", |root| {
            let affine = Affine::rotate_plane(root.dimension(), a, b, angle)?;
            Ok(Arc::new(AffineTransform::new(root, affine)?) as SharedSource)
        })
    }

    /// Domain warp with one source per axis, or one source for all axes.
    pub fn warp(self, warps: Vec<SharedSource>, amplitude: &[f64]) -> Self {
        self.wrap("warp", |root| {
            let node = if warps.len() == 1 {
                DomainWarp::with_offsets(root, warps[0].clone(), amplitude)?
            } else {
                DomainWarp::new(root, warps, amplitude)?
            };
            Ok(Arc::new(node) as SharedSource)
        })
    }

    pub fn modify(self, modifier: Modifier) -> Self {
        self.wrap("modify", |root| {
            Ok(Arc::new(Modified::new(root, modifier)?) as SharedSource)
        })
    }

    /// Layers octaves of the current root.
    pub fn octavate(self, params: FractalParams) -> Self {
        self.wrap("octavate", |root| {
            Ok(Arc::new(Fractal::new(root, params)?) as SharedSource)
        })
    }

    /// Combines the current root with another node.
    pub fn combine(self, op: Combiner, other: SharedSource) -> Self {
        self.wrap("combine", |root| {
            Ok(Arc::new(Combine::new(op, vec![root, other])?) as SharedSource)
        })
    }

    pub fn build(self) -> NoiseResult<Pipeline> {
        if let Some(e) = self.error {
            return Err(e);
        }
        let root = self.root.ok_or_else(|| {
            NoiseError::config(format!("pipeline '{}' has no source", self.name))
        })?;

        log::debug!(
            "built pipeline '{}' v{} ({}, {} steps)",
            self.name,
            self.version,
            root.dimension(),
            self.nodes
        );

        Ok(Pipeline {
            name: self.name,
            version: self.version,
            seed: self.seed,
            root,
            node_count: self.nodes,
            fingerprint: None,
            graph: None,
        })
    }
}
