//! Noise graph document types.
//!
//! A graph document is a deterministic DAG of named nodes. Each node has a
//! stable id that other nodes reference by name; `root` selects the node the
//! compiled pipeline evaluates.

use serde::{Deserialize, Serialize};

/// Current graph document version.
pub const SPEC_VERSION: u32 = 1;

/// A complete noise graph document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GraphSpec {
    /// Document format version (must equal [`SPEC_VERSION`]).
    pub spec_version: u32,
    /// Human-readable pipeline name.
    pub name: String,
    /// Free-form pipeline version string.
    #[serde(default = "default_version")]
    pub version: String,
    /// Pipeline seed; per-node seeds are derived from it.
    pub seed: u64,
    /// Dimensionality of the root (1..=4).
    pub dimension: u8,
    /// Id of the node the pipeline evaluates.
    pub root: String,
    /// Graph nodes (a DAG).
    pub nodes: Vec<NodeSpec>,
}

fn default_version() -> String {
    "0.1.0".to_string()
}

impl GraphSpec {
    /// Creates a new graph builder.
    pub fn builder(name: impl Into<String>, dimension: u8) -> GraphSpecBuilder {
        GraphSpecBuilder::new(name, dimension)
    }

    /// Parses a graph from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Parses a graph from a JSON value.
    pub fn from_value(value: serde_json::Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }

    /// Serializes the graph to a JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serializes the graph to a pretty-printed JSON string.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Converts the graph to a JSON value.
    pub fn to_value(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(self)
    }

    /// Looks up a node by id.
    pub fn node(&self, id: &str) -> Option<&NodeSpec> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Returns a copy of this graph with a different seed.
    pub fn with_seed(&self, seed: u64) -> Self {
        Self {
            seed,
            ..self.clone()
        }
    }
}

/// Builder for [`GraphSpec`].
#[derive(Debug, Clone)]
pub struct GraphSpecBuilder {
    name: String,
    version: String,
    seed: u64,
    dimension: u8,
    root: Option<String>,
    nodes: Vec<NodeSpec>,
}

impl GraphSpecBuilder {
    /// Creates a new builder.
    pub fn new(name: impl Into<String>, dimension: u8) -> Self {
        Self {
            name: name.into(),
            version: default_version(),
            seed: 0,
            dimension,
            root: None,
            nodes: Vec::new(),
        }
    }

    /// Sets the version string.
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Sets the seed.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Adds a node.
    pub fn node(mut self, id: impl Into<String>, op: NodeOp) -> Self {
        self.nodes.push(NodeSpec { id: id.into(), op });
        self
    }

    /// Sets the root node id (defaults to the last node added).
    pub fn root(mut self, id: impl Into<String>) -> Self {
        self.root = Some(id.into());
        self
    }

    /// Builds the graph.
    pub fn build(self) -> GraphSpec {
        let root = self
            .root
            .or_else(|| self.nodes.last().map(|n| n.id.clone()))
            .unwrap_or_default();
        GraphSpec {
            spec_version: SPEC_VERSION,
            name: self.name,
            version: self.version,
            seed: self.seed,
            dimension: self.dimension,
            root,
            nodes: self.nodes,
        }
    }
}

/// A named graph node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeSpec {
    /// Stable node id.
    pub id: String,
    /// The node operation.
    #[serde(flatten)]
    pub op: NodeOp,
}

/// Fade curve applied to lattice-cell offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FadeKind {
    Linear,
    Smoothstep,
    #[default]
    Quintic,
}

/// Easing used by control-driven blending and between lattice corners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterpolationKind {
    #[default]
    Linear,
    Cosine,
    Quadratic,
    Cubic,
    Quartic,
}

/// Lattice orientation of simplex generators. Each non-classic variant
/// applies to one dimension only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimplexVariantKind {
    #[default]
    Classic,
    /// 2D
    ImproveX,
    /// 3D
    ImproveXy,
    /// 3D
    ImproveXz,
    /// 4D
    ImproveXyImproveZw,
    /// 4D
    ImproveXyzImproveXy,
    /// 4D
    ImproveXyzImproveXz,
    /// 4D
    ImproveXyz,
}

/// Distance metric for cellular noise.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceSpec {
    #[default]
    Euclidean,
    EuclideanSquared,
    Manhattan,
    Chebyshev,
    /// Minkowski distance of order `p` (p > 0).
    Minkowski { p: f64 },
}

/// Value returned by cellular noise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorleyReturnKind {
    /// Distance to the nearest feature point.
    #[default]
    F1,
    /// Distance to the second nearest feature point.
    F2,
    F1PlusF2,
    F2MinusF1,
    F1TimesF2,
}

/// Per-octave shaping function for fractal summation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FractalKind {
    #[default]
    Fbm,
    Billow,
    Ridged,
}

fn default_one() -> f64 {
    1.0
}

fn default_octaves() -> u32 {
    4
}

fn default_lacunarity() -> f64 {
    2.0
}

fn default_persistence() -> f64 {
    0.5
}

fn default_jitter() -> f64 {
    1.0
}

fn default_feature_points() -> u32 {
    1
}

fn is_false(value: &bool) -> bool {
    !*value
}

fn is_default<T: Default + PartialEq>(value: &T) -> bool {
    *value == T::default()
}

/// Graph node operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", deny_unknown_fields)]
pub enum NodeOp {
    // ---------------------------------------------------------------------
    // Generators
    // ---------------------------------------------------------------------
    /// Lattice value noise.
    Value {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        seed: Option<u64>,
        #[serde(default)]
        fade: FadeKind,
        /// Easing applied after the fade curve.
        #[serde(default, skip_serializing_if = "is_default")]
        interpolation: InterpolationKind,
    },

    /// Gradient (Perlin) noise.
    Perlin {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        seed: Option<u64>,
        #[serde(default)]
        fade: FadeKind,
        /// Easing applied after the fade curve.
        #[serde(default, skip_serializing_if = "is_default")]
        interpolation: InterpolationKind,
    },

    /// Simplex-lattice gradient noise.
    Simplex {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        seed: Option<u64>,
        #[serde(default, skip_serializing_if = "is_default")]
        variant: SimplexVariantKind,
    },

    /// Simplex-lattice noise with a kernel one lattice edge wide.
    SuperSimplex {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        seed: Option<u64>,
        #[serde(default, skip_serializing_if = "is_default")]
        variant: SimplexVariantKind,
    },

    /// Cellular (Worley) noise.
    Worley {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        seed: Option<u64>,
        #[serde(default)]
        distance: DistanceSpec,
        #[serde(default)]
        return_type: WorleyReturnKind,
        #[serde(default = "default_jitter")]
        jitter: f64,
        #[serde(default = "default_feature_points")]
        max_feature_points: u32,
    },

    /// Per-cell uniform white noise.
    White {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        seed: Option<u64>,
    },

    /// Per-cell gaussian white noise.
    GaussianWhite {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        seed: Option<u64>,
        #[serde(default)]
        mean: f64,
        #[serde(default = "default_one")]
        stddev: f64,
    },

    /// A constant value.
    Constant { value: f64 },

    /// Unit-cell checkerboard in {0, 1}.
    Checkerboard,

    /// Concentric shells around the origin.
    Spheres,

    /// Concentric shells around the last axis.
    Cylinders,

    // ---------------------------------------------------------------------
    // Modifiers
    // ---------------------------------------------------------------------
    /// `|x|`.
    Abs { input: String },

    /// `-x`.
    Invert { input: String },

    /// Clamp to `[low, high]`.
    Clamp { input: String, low: f64, high: f64 },

    /// Sign-preserving power: `sign(x) * |x|^exponent`.
    Power { input: String, exponent: f64 },

    /// `x * scale + bias`.
    ScaleBias {
        input: String,
        #[serde(default = "default_one")]
        scale: f64,
        #[serde(default)]
        bias: f64,
    },

    /// `2|x| - 1`.
    Billow { input: String },

    /// `1 - |x|`.
    Ridged { input: String },

    // ---------------------------------------------------------------------
    // Transformers
    // ---------------------------------------------------------------------
    /// Translate input coordinates (one offset per axis).
    Translate { input: String, offset: Vec<f64> },

    /// Scale input coordinates (one factor per axis, or a single uniform factor).
    Scale { input: String, factors: Vec<f64> },

    /// Rotate input coordinates in the plane of two axes (angle in radians).
    Rotate {
        input: String,
        axes: [usize; 2],
        angle: f64,
    },

    /// Perturb each axis by an auxiliary source evaluated at the original point.
    ///
    /// With a single warp source, each axis samples it at a fixed offset.
    DomainWarp {
        input: String,
        warp: Vec<String>,
        amplitude: Vec<f64>,
    },

    /// Evaluate a higher-dimensional child on a slice: query axis `i` feeds
    /// child axis `axes[i]`, all other child axes take their `origin` value.
    Slice {
        input: String,
        axes: Vec<usize>,
        origin: Vec<f64>,
    },

    /// Evaluate a lower-dimensional child on a subset of the query axes.
    Project { input: String, axes: Vec<usize> },

    // ---------------------------------------------------------------------
    // Modules
    // ---------------------------------------------------------------------
    /// Sum of all inputs.
    Sum { inputs: Vec<String> },

    /// Product of all inputs.
    Product { inputs: Vec<String> },

    /// Minimum of all inputs.
    Min { inputs: Vec<String> },

    /// Maximum of all inputs.
    Max { inputs: Vec<String> },

    /// Sign-preserving power folded left: `inputs[0]^inputs[1]^...`.
    Pow { inputs: Vec<String> },

    /// `Σ weights[i] * inputs[i]` (weights are not normalized).
    WeightedBlend {
        inputs: Vec<String>,
        weights: Vec<f64>,
    },

    /// Octave summation over a single source.
    Fractal {
        source: String,
        #[serde(default = "default_octaves")]
        octaves: u32,
        #[serde(default = "default_lacunarity")]
        lacunarity: f64,
        #[serde(default = "default_persistence")]
        persistence: f64,
        #[serde(default)]
        function: FractalKind,
        #[serde(default, skip_serializing_if = "is_false")]
        increment_seed: bool,
    },

    /// Interpolate from `a` to `b` by the value of `control`.
    Lerp {
        a: String,
        b: String,
        control: String,
        #[serde(default)]
        interpolation: InterpolationKind,
    },

    /// `control >= boundary ? a : b`.
    Select {
        a: String,
        b: String,
        control: String,
        #[serde(default)]
        boundary: f64,
    },
}

impl NodeOp {
    /// Short type name as it appears in the `type` tag.
    pub fn type_name(&self) -> &'static str {
        match self {
            NodeOp::Value { .. } => "value",
            NodeOp::Perlin { .. } => "perlin",
            NodeOp::Simplex { .. } => "simplex",
            NodeOp::SuperSimplex { .. } => "super_simplex",
            NodeOp::Worley { .. } => "worley",
            NodeOp::White { .. } => "white",
            NodeOp::GaussianWhite { .. } => "gaussian_white",
            NodeOp::Constant { .. } => "constant",
            NodeOp::Checkerboard => "checkerboard",
            NodeOp::Spheres => "spheres",
            NodeOp::Cylinders => "cylinders",
            NodeOp::Abs { .. } => "abs",
            NodeOp::Invert { .. } => "invert",
            NodeOp::Clamp { .. } => "clamp",
            NodeOp::Power { .. } => "power",
            NodeOp::ScaleBias { .. } => "scale_bias",
            NodeOp::Billow { .. } => "billow",
            NodeOp::Ridged { .. } => "ridged",
            NodeOp::Translate { .. } => "translate",
            NodeOp::Scale { .. } => "scale",
            NodeOp::Rotate { .. } => "rotate",
            NodeOp::DomainWarp { .. } => "domain_warp",
            NodeOp::Slice { .. } => "slice",
            NodeOp::Project { .. } => "project",
            NodeOp::Sum { .. } => "sum",
            NodeOp::Product { .. } => "product",
            NodeOp::Min { .. } => "min",
            NodeOp::Max { .. } => "max",
            NodeOp::Pow { .. } => "pow",
            NodeOp::WeightedBlend { .. } => "weighted_blend",
            NodeOp::Fractal { .. } => "fractal",
            NodeOp::Lerp { .. } => "lerp",
            NodeOp::Select { .. } => "select",
        }
    }

    /// Returns true for leaf nodes (generators).
    pub fn is_generator(&self) -> bool {
        self.inputs().is_empty()
    }

    /// Returns the explicit seed of a seeded generator, if one is pinned.
    pub fn pinned_seed(&self) -> Option<u64> {
        match self {
            NodeOp::Value { seed, .. }
            | NodeOp::Perlin { seed, .. }
            | NodeOp::Simplex { seed, .. }
            | NodeOp::SuperSimplex { seed, .. }
            | NodeOp::Worley { seed, .. }
            | NodeOp::White { seed }
            | NodeOp::GaussianWhite { seed, .. } => *seed,
            _ => None,
        }
    }

    /// Ids of all nodes this node reads from, in declaration order.
    pub fn inputs(&self) -> Vec<&str> {
        match self {
            NodeOp::Value { .. }
            | NodeOp::Perlin { .. }
            | NodeOp::Simplex { .. }
            | NodeOp::SuperSimplex { .. }
            | NodeOp::Worley { .. }
            | NodeOp::White { .. }
            | NodeOp::GaussianWhite { .. }
            | NodeOp::Constant { .. }
            | NodeOp::Checkerboard
            | NodeOp::Spheres
            | NodeOp::Cylinders => Vec::new(),

            NodeOp::Abs { input }
            | NodeOp::Invert { input }
            | NodeOp::Clamp { input, .. }
            | NodeOp::Power { input, .. }
            | NodeOp::ScaleBias { input, .. }
            | NodeOp::Billow { input }
            | NodeOp::Ridged { input }
            | NodeOp::Translate { input, .. }
            | NodeOp::Scale { input, .. }
            | NodeOp::Rotate { input, .. }
            | NodeOp::Slice { input, .. }
            | NodeOp::Project { input, .. } => vec![input.as_str()],

            NodeOp::DomainWarp { input, warp, .. } => std::iter::once(input.as_str())
                .chain(warp.iter().map(String::as_str))
                .collect(),

            NodeOp::Sum { inputs }
            | NodeOp::Product { inputs }
            | NodeOp::Min { inputs }
            | NodeOp::Max { inputs }
            | NodeOp::Pow { inputs }
            | NodeOp::WeightedBlend { inputs, .. } => inputs.iter().map(String::as_str).collect(),

            NodeOp::Fractal { source, .. } => vec![source.as_str()],

            NodeOp::Lerp { a, b, control, .. } | NodeOp::Select { a, b, control, .. } => {
                vec![a.as_str(), b.as_str(), control.as_str()]
            }
        }
    }
}
