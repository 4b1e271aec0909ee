//! Graph document compiler.
//!
//! Compiles a [`GraphSpec`] into a [`Pipeline`]:
//! 1. structural validation (`noisegraph_spec::validate_graph`);
//! 2. cycle detection over every node, reachable or not;
//! 3. dimension assignment walking down from the root;
//! 4. construction in dependency order, each node built once and shared.
//!
//! No step recurses over the graph, so deep chains fail with an error
//! instead of exhausting the stack.

use std::collections::HashMap;
use std::sync::Arc;

use noisegraph_spec::{
    canonical_graph_hash, reachable_nodes, validate_graph, DistanceSpec, FadeKind, FractalKind,
    GraphSpec, InterpolationKind, NodeOp, NodeSpec, SimplexVariantKind, WorleyReturnKind,
};

use super::Pipeline;
use crate::error::{NoiseError, NoiseResult};
use crate::generators::{
    Checkerboard, Constant, Cylinders, DistanceFunction, GaussianWhiteNoise, PerlinNoise,
    SimplexNoise, SimplexVariant, Spheres, SuperSimplexNoise, ValueNoise, WhiteNoise, WorleyNoise,
    WorleyReturn,
};
use crate::math::{FadeFunction, Interpolation};
use crate::modifiers::{Modified, Modifier};
use crate::modules::{
    Combine, Combiner, Fractal, FractalFunction, FractalParams, Lerp, Select, WeightedBlend,
};
use crate::rng::derive_node_seed;
use crate::source::{Dimension, SeededNoise, SharedSource};
use crate::transformers::{Affine, AffineTransform, DomainWarp, Project, Slice};

/// Longest allowed chain of nodes from a generator to the root.
///
/// Evaluation descends one call per level, so this bounds its stack use.
pub const MAX_GRAPH_DEPTH: usize = 256;

/// Compiles a graph document into a pipeline.
///
/// # Example
/// ```
/// use noisegraph_engine::compile_graph;
/// use noisegraph_spec::GraphSpec;
///
/// let graph = GraphSpec::from_json(r#"{
///     "spec_version": 1, "name": "terrain", "seed": 42, "dimension": 2, "root": "fbm",
///     "nodes": [
///         { "id": "base", "type": "perlin" },
///         { "id": "fbm", "type": "fractal", "source": "base", "octaves": 5 }
///     ]
/// }"#).unwrap();
///
/// let pipeline = compile_graph(&graph).unwrap();
/// let v = pipeline.evaluate(&[0.3, 0.7]).unwrap();
/// assert!((-1.0..=1.0).contains(&v));
/// ```
pub fn compile_graph(graph: &GraphSpec) -> NoiseResult<Pipeline> {
    let validation = validate_graph(graph);
    if !validation.is_ok() {
        let messages: Vec<String> = validation.errors.iter().map(|e| e.to_string()).collect();
        return Err(NoiseError::config(format!(
            "graph '{}' failed validation: {}",
            graph.name,
            messages.join("; ")
        )));
    }

    let dimension = Dimension::try_from(graph.dimension)?;
    let nodes: HashMap<&str, &NodeSpec> = graph.nodes.iter().map(|n| (n.id.as_str(), n)).collect();

    let order = topological_order(graph, &nodes)?;
    let dimensions = assign_dimensions(&nodes, &graph.root, dimension)?;

    let mut compiler = Compiler {
        nodes,
        seed: graph.seed,
        cache: HashMap::new(),
    };

    // Children first, so every build finds its inputs already cached.
    let mut depth: HashMap<&str, usize> = HashMap::new();
    for &id in &order {
        let Some(&node_dim) = dimensions.get(id) else {
            continue;
        };
        let inputs = compiler.nodes.get(id).copied().map(|n| n.op.inputs()).unwrap_or_default();
        let node_depth = 1 + inputs.iter().filter_map(|i| depth.get(i)).max().unwrap_or(&0);
        if node_depth > MAX_GRAPH_DEPTH {
            return Err(NoiseError::node_config(
                id,
                format!(
                    "node '{}' sits {} levels deep, the limit is {}",
                    id, node_depth, MAX_GRAPH_DEPTH
                ),
            ));
        }
        depth.insert(id, node_depth);
        compiler.build(id, node_dim)?;
    }
    let root = compiler.build(&graph.root, dimension)?.source;

    let fingerprint = canonical_graph_hash(graph)
        .map_err(|e| NoiseError::config(format!("cannot fingerprint graph: {}", e)))?;

    let node_count = compiler.cache.len();
    log::debug!(
        "compiled graph '{}' v{} ({}, {} of {} nodes built, seed {}, fingerprint {})",
        graph.name,
        graph.version,
        dimension,
        node_count,
        graph.nodes.len(),
        graph.seed,
        fingerprint
    );
    let unreachable = graph.nodes.len() - reachable_nodes(graph).len();
    if unreachable > 0 {
        log::debug!("graph '{}': {} unreachable node(s) skipped", graph.name, unreachable);
    }

    Ok(Pipeline {
        name: graph.name.clone(),
        version: graph.version.clone(),
        seed: graph.seed,
        root,
        node_count,
        fingerprint: Some(fingerprint),
        graph: Some(Arc::new(graph.clone())),
    })
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Visit {
    InProgress,
    Done,
}

struct Frame<'a> {
    id: &'a str,
    inputs: Vec<&'a str>,
    next: usize,
}

impl<'a> Frame<'a> {
    fn new(id: &'a str, nodes: &HashMap<&'a str, &'a NodeSpec>) -> Self {
        Self {
            id,
            inputs: nodes.get(id).copied().map(|n| n.op.inputs()).unwrap_or_default(),
            next: 0,
        }
    }
}

/// Orders every node after its inputs, rejecting any cycle, including one
/// among nodes the root never reads.
fn topological_order<'a>(
    graph: &'a GraphSpec,
    nodes: &HashMap<&'a str, &'a NodeSpec>,
) -> NoiseResult<Vec<&'a str>> {
    let mut order = Vec::with_capacity(graph.nodes.len());
    let mut state: HashMap<&str, Visit> = HashMap::with_capacity(graph.nodes.len());

    for node in &graph.nodes {
        let start = node.id.as_str();
        if state.contains_key(start) {
            continue;
        }
        state.insert(start, Visit::InProgress);
        let mut stack = vec![Frame::new(start, nodes)];

        while let Some(frame) = stack.last_mut() {
            let next = frame.inputs.get(frame.next).copied();
            frame.next += 1;
            match next {
                Some(input) => match state.get(input) {
                    Some(Visit::Done) => {}
                    Some(Visit::InProgress) => {
                        return Err(NoiseError::node_config(
                            input,
                            format!("cycle detected while evaluating node '{}'", input),
                        ));
                    }
                    None => {
                        state.insert(input, Visit::InProgress);
                        stack.push(Frame::new(input, nodes));
                    }
                },
                None => {
                    let id = frame.id;
                    stack.pop();
                    state.insert(id, Visit::Done);
                    order.push(id);
                }
            }
        }
    }
    Ok(order)
}

/// Dimension each reachable node is evaluated at, walking down from the root.
fn assign_dimensions<'a>(
    nodes: &HashMap<&'a str, &'a NodeSpec>,
    root: &'a str,
    dimension: Dimension,
) -> NoiseResult<HashMap<&'a str, Dimension>> {
    let mut assigned: HashMap<&str, Dimension> = HashMap::new();
    let mut stack = vec![(root, dimension)];
    while let Some((id, dim)) = stack.pop() {
        if let Some(&existing) = assigned.get(id) {
            if existing != dim {
                return Err(NoiseError::node_config(
                    id,
                    format!("node '{}' is used as both {} and {}", id, existing, dim),
                ));
            }
            continue;
        }
        assigned.insert(id, dim);
        if let Some(node) = nodes.get(id).copied() {
            let inputs = input_dimensions(&node.op, dim).map_err(|e| e.in_node(id))?;
            stack.extend(inputs);
        }
    }
    Ok(assigned)
}

/// Inputs of `op` paired with the dimension they are read at.
fn input_dimensions(op: &NodeOp, dim: Dimension) -> NoiseResult<Vec<(&str, Dimension)>> {
    match op {
        NodeOp::Slice { input, origin, .. } => {
            Ok(vec![(input.as_str(), Dimension::from_len(origin.len())?)])
        }
        NodeOp::Project { input, axes } => {
            Ok(vec![(input.as_str(), Dimension::from_len(axes.len())?)])
        }
        _ => Ok(op.inputs().into_iter().map(|id| (id, dim)).collect()),
    }
}

/// A built node, plus its seeded view when it is a seeded generator.
#[derive(Clone)]
struct Compiled {
    source: SharedSource,
    seeded: Option<Arc<dyn SeededNoise>>,
}

impl Compiled {
    fn plain<T: crate::source::NoiseSource + 'static>(node: T) -> Self {
        Self {
            source: Arc::new(node),
            seeded: None,
        }
    }

    fn seeded<T: SeededNoise + 'static>(node: T) -> Self {
        let node = Arc::new(node);
        Self {
            source: node.clone(),
            seeded: Some(node),
        }
    }
}

struct Compiler<'a> {
    nodes: HashMap<&'a str, &'a NodeSpec>,
    seed: u64,
    cache: HashMap<String, (Compiled, Dimension)>,
}

impl<'a> Compiler<'a> {
    /// Builds node `id` at `dimension`, reusing an earlier build when possible.
    fn build(&mut self, id: &str, dimension: Dimension) -> NoiseResult<Compiled> {
        if let Some((compiled, built_at)) = self.cache.get(id) {
            if *built_at != dimension {
                return Err(NoiseError::node_config(
                    id,
                    format!(
                        "node '{}' is used as both {} and {}",
                        id, built_at, dimension
                    ),
                ));
            }
            return Ok(compiled.clone());
        }

        let node = *self
            .nodes
            .get(id)
            .ok_or_else(|| NoiseError::config(format!("unknown node '{}'", id)))?;
        let compiled = self
            .build_op(&node.id, &node.op, dimension)
            .map_err(|e| e.in_node(id))?;
        self.cache
            .insert(id.to_string(), (compiled.clone(), dimension));
        Ok(compiled)
    }

    fn input(&mut self, id: &str, dimension: Dimension) -> NoiseResult<SharedSource> {
        Ok(self.build(id, dimension)?.source)
    }

    fn inputs(&mut self, ids: &[String], dimension: Dimension) -> NoiseResult<Vec<SharedSource>> {
        ids.iter().map(|id| self.input(id, dimension)).collect()
    }

    fn node_seed(&self, id: &str, pinned: Option<u64>) -> u64 {
        pinned.unwrap_or_else(|| derive_node_seed(self.seed, id))
    }

    fn build_op(&mut self, id: &str, op: &NodeOp, dim: Dimension) -> NoiseResult<Compiled> {
        let seed = self.node_seed(id, op.pinned_seed());

        let compiled = match op {
            // Generators
            NodeOp::Value {
                fade,
                interpolation,
                ..
            } => Compiled::seeded(
                ValueNoise::new(seed, dim)
                    .with_fade(fade_function(*fade))
                    .with_interpolation(interpolation_kind(*interpolation)),
            ),
            NodeOp::Perlin {
                fade,
                interpolation,
                ..
            } => Compiled::seeded(
                PerlinNoise::new(seed, dim)
                    .with_fade(fade_function(*fade))
                    .with_interpolation(interpolation_kind(*interpolation)),
            ),
            NodeOp::Simplex { variant, .. } => Compiled::seeded(
                SimplexNoise::new(seed, dim).with_variant(simplex_variant(*variant))?,
            ),
            NodeOp::SuperSimplex { variant, .. } => Compiled::seeded(
                SuperSimplexNoise::new(seed, dim).with_variant(simplex_variant(*variant))?,
            ),
            NodeOp::Worley {
                distance,
                return_type,
                jitter,
                max_feature_points,
                ..
            } => Compiled::seeded(
                WorleyNoise::new(seed, dim)
                    .with_distance(distance_function(*distance))?
                    .with_return_type(worley_return(*return_type))
                    .with_jitter(*jitter)?
                    .with_max_feature_points(*max_feature_points)?,
            ),
            NodeOp::White { .. } => Compiled::seeded(WhiteNoise::new(seed, dim)),
            NodeOp::GaussianWhite { mean, stddev, .. } => Compiled::seeded(
                GaussianWhiteNoise::new(seed, dim).with_distribution(*mean, *stddev)?,
            ),
            NodeOp::Constant { value } => Compiled::plain(Constant::new(*value, dim)?),
            NodeOp::Checkerboard => Compiled::plain(Checkerboard::new(dim)),
            NodeOp::Spheres => Compiled::plain(Spheres::new(dim)),
            NodeOp::Cylinders => Compiled::plain(Cylinders::new(dim)?),

            // Modifiers
            NodeOp::Abs { input } => self.modified(input, dim, Modifier::Abs)?,
            NodeOp::Invert { input } => self.modified(input, dim, Modifier::Invert)?,
            NodeOp::Clamp { input, low, high } => self.modified(
                input,
                dim,
                Modifier::Clamp {
                    low: *low,
                    high: *high,
                },
            )?,
            NodeOp::Power { input, exponent } => self.modified(
                input,
                dim,
                Modifier::Power {
                    exponent: *exponent,
                },
            )?,
            NodeOp::ScaleBias { input, scale, bias } => self.modified(
                input,
                dim,
                Modifier::ScaleBias {
                    scale: *scale,
                    bias: *bias,
                },
            )?,
            NodeOp::Billow { input } => self.modified(input, dim, Modifier::Billow)?,
            NodeOp::Ridged { input } => self.modified(input, dim, Modifier::Ridged)?,

            // Transformers
            NodeOp::Translate { input, offset } => {
                expect_len("offset", offset.len(), dim)?;
                self.affine(input, dim, Affine::translate(offset)?)?
            }
            NodeOp::Scale { input, factors } => {
                let affine = if factors.len() == 1 {
                    Affine::uniform_scale(dim, factors[0])?
                } else {
                    expect_len("factors", factors.len(), dim)?;
                    Affine::scale(factors)?
                };
                self.affine(input, dim, affine)?
            }
            NodeOp::Rotate { input, axes, angle } => {
                let affine = Affine::rotate_plane(dim, axes[0], axes[1], *angle)?;
                self.affine(input, dim, affine)?
            }
            NodeOp::DomainWarp {
                input,
                warp,
                amplitude,
            } => {
                let child = self.input(input, dim)?;
                let mut warps = self.inputs(warp, dim)?;
                let node = if warps.len() == 1 {
                    DomainWarp::with_offsets(child, warps.remove(0), amplitude)?
                } else {
                    DomainWarp::new(child, warps, amplitude)?
                };
                Compiled::plain(node)
            }
            NodeOp::Slice {
                input,
                axes,
                origin,
            } => {
                expect_len("axes", axes.len(), dim)?;
                let child_dim = Dimension::from_len(origin.len())?;
                let child = self.input(input, child_dim)?;
                Compiled::plain(Slice::new(child, axes, origin)?)
            }
            NodeOp::Project { input, axes } => {
                let child_dim = Dimension::from_len(axes.len())?;
                let child = self.input(input, child_dim)?;
                Compiled::plain(Project::new(child, dim, axes)?)
            }

            // Modules
            NodeOp::Sum { inputs } => self.combine(Combiner::Sum, inputs, dim)?,
            NodeOp::Product { inputs } => self.combine(Combiner::Product, inputs, dim)?,
            NodeOp::Min { inputs } => self.combine(Combiner::Min, inputs, dim)?,
            NodeOp::Max { inputs } => self.combine(Combiner::Max, inputs, dim)?,
            NodeOp::Pow { inputs } => self.combine(Combiner::Pow, inputs, dim)?,
            NodeOp::WeightedBlend { inputs, weights } => {
                let children = self.inputs(inputs, dim)?;
                Compiled::plain(WeightedBlend::new(children, weights.clone())?)
            }
            NodeOp::Fractal {
                source,
                octaves,
                lacunarity,
                persistence,
                function,
                increment_seed,
            } => {
                let params = FractalParams {
                    octaves: *octaves,
                    lacunarity: *lacunarity,
                    persistence: *persistence,
                    function: fractal_function(*function),
                };
                let base = self.build(source, dim)?;
                if *increment_seed {
                    let seeded = base.seeded.ok_or_else(|| {
                        NoiseError::config(format!(
                            "increment_seed needs a seeded generator as source, '{}' is not one",
                            source
                        ))
                    })?;
                    Compiled::plain(Fractal::with_seed_increment(seeded, params)?)
                } else {
                    Compiled::plain(Fractal::new(base.source, params)?)
                }
            }
            NodeOp::Lerp {
                a,
                b,
                control,
                interpolation,
            } => {
                let (a, b, control) = (
                    self.input(a, dim)?,
                    self.input(b, dim)?,
                    self.input(control, dim)?,
                );
                Compiled::plain(
                    Lerp::new(a, b, control)?.with_interpolation(interpolation_kind(*interpolation)),
                )
            }
            NodeOp::Select {
                a,
                b,
                control,
                boundary,
            } => {
                let (a, b, control) = (
                    self.input(a, dim)?,
                    self.input(b, dim)?,
                    self.input(control, dim)?,
                );
                Compiled::plain(Select::new(a, b, control, *boundary)?)
            }
        };

        Ok(compiled)
    }

    fn modified(&mut self, input: &str, dim: Dimension, modifier: Modifier) -> NoiseResult<Compiled> {
        let child = self.input(input, dim)?;
        Ok(Compiled::plain(Modified::new(child, modifier)?))
    }

    fn affine(&mut self, input: &str, dim: Dimension, affine: Affine) -> NoiseResult<Compiled> {
        let child = self.input(input, dim)?;
        Ok(Compiled::plain(AffineTransform::new(child, affine)?))
    }

    fn combine(&mut self, op: Combiner, inputs: &[String], dim: Dimension) -> NoiseResult<Compiled> {
        let children = self.inputs(inputs, dim)?;
        Ok(Compiled::plain(Combine::new(op, children)?))
    }
}

fn expect_len(field: &str, len: usize, dim: Dimension) -> NoiseResult<()> {
    if len != dim.len() {
        return Err(NoiseError::config(format!(
            "{} has {} entries but the node is {}",
            field, len, dim
        )));
    }
    Ok(())
}

fn fade_function(kind: FadeKind) -> FadeFunction {
    match kind {
        FadeKind::Linear => FadeFunction::Linear,
        FadeKind::Smoothstep => FadeFunction::Smoothstep,
        FadeKind::Quintic => FadeFunction::Quintic,
    }
}

fn interpolation_kind(kind: InterpolationKind) -> Interpolation {
    match kind {
        InterpolationKind::Linear => Interpolation::Linear,
        InterpolationKind::Cosine => Interpolation::Cosine,
        InterpolationKind::Quadratic => Interpolation::Quadratic,
        InterpolationKind::Cubic => Interpolation::Cubic,
        InterpolationKind::Quartic => Interpolation::Quartic,
    }
}

fn simplex_variant(kind: SimplexVariantKind) -> SimplexVariant {
    match kind {
        SimplexVariantKind::Classic => SimplexVariant::Classic,
        SimplexVariantKind::ImproveX => SimplexVariant::ImproveX,
        SimplexVariantKind::ImproveXy => SimplexVariant::ImproveXy,
        SimplexVariantKind::ImproveXz => SimplexVariant::ImproveXz,
        SimplexVariantKind::ImproveXyImproveZw => SimplexVariant::ImproveXyImproveZw,
        SimplexVariantKind::ImproveXyzImproveXy => SimplexVariant::ImproveXyzImproveXy,
        SimplexVariantKind::ImproveXyzImproveXz => SimplexVariant::ImproveXyzImproveXz,
        SimplexVariantKind::ImproveXyz => SimplexVariant::ImproveXyz,
    }
}

fn distance_function(spec: DistanceSpec) -> DistanceFunction {
    match spec {
        DistanceSpec::Euclidean => DistanceFunction::Euclidean,
        DistanceSpec::EuclideanSquared => DistanceFunction::EuclideanSquared,
        DistanceSpec::Manhattan => DistanceFunction::Manhattan,
        DistanceSpec::Chebyshev => DistanceFunction::Chebyshev,
        DistanceSpec::Minkowski { p } => DistanceFunction::Minkowski(p),
    }
}

fn worley_return(kind: WorleyReturnKind) -> WorleyReturn {
    match kind {
        WorleyReturnKind::F1 => WorleyReturn::F1,
        WorleyReturnKind::F2 => WorleyReturn::F2,
        WorleyReturnKind::F1PlusF2 => WorleyReturn::F1PlusF2,
        WorleyReturnKind::F2MinusF1 => WorleyReturn::F2MinusF1,
        WorleyReturnKind::F1TimesF2 => WorleyReturn::F1TimesF2,
    }
}

fn fractal_function(kind: FractalKind) -> FractalFunction {
    match kind {
        FractalKind::Fbm => FractalFunction::Fbm,
        FractalKind::Billow => FractalFunction::Billow,
        FractalKind::Ridged => FractalFunction::Ridged,
    }
}
