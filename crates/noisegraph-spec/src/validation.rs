//! Structural graph validation.
//!
//! These checks only need the document itself. Cycle detection and dimension
//! flow depend on node semantics and are done by the engine's graph compiler.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::OnceLock;

use regex::Regex;

use crate::error::{ErrorCode, ValidationError, ValidationResult, ValidationWarning, WarningCode};
use crate::graph::{DistanceSpec, GraphSpec, NodeOp, SPEC_VERSION};

/// Regex pattern for valid node ids.
/// Format: starts with a lowercase letter, followed by up to 63 lowercase letters, digits, underscores, or hyphens.
const NODE_ID_PATTERN: &str = r"^[a-z][a-z0-9_-]{0,63}$";

/// Largest supported graph dimension.
pub const MAX_DIMENSION: u8 = 4;

/// Upper bound on cellular feature points per cell.
pub const MAX_FEATURE_POINTS: u32 = 16;

/// Upper bound on fractal octaves.
pub const MAX_OCTAVES: u32 = 32;

static NODE_ID_REGEX: OnceLock<Regex> = OnceLock::new();

fn node_id_regex() -> &'static Regex {
    NODE_ID_REGEX.get_or_init(|| Regex::new(NODE_ID_PATTERN).expect("invalid regex pattern"))
}

/// Returns true if `id` is a valid node id.
pub fn is_valid_node_id(id: &str) -> bool {
    node_id_regex().is_match(id)
}

/// Validates a graph document and returns a validation result.
///
/// # Example
/// ```
/// use noisegraph_spec::{GraphSpec, NodeOp};
/// use noisegraph_spec::validation::validate_graph;
///
/// let graph = GraphSpec::builder("plain", 2)
///     .node("base", NodeOp::Simplex { seed: None, variant: Default::default() })
///     .build();
///
/// assert!(validate_graph(&graph).is_ok());
/// ```
pub fn validate_graph(graph: &GraphSpec) -> ValidationResult {
    let mut result = ValidationResult::default();

    validate_spec_version(graph, &mut result);
    validate_dimension(graph, &mut result);
    validate_node_ids(graph, &mut result);
    validate_references(graph, &mut result);
    validate_root(graph, &mut result);
    for (i, node) in graph.nodes.iter().enumerate() {
        validate_params(&node.op, i, &mut result);
    }

    check_warnings(graph, &mut result);

    result
}

fn validate_spec_version(graph: &GraphSpec, result: &mut ValidationResult) {
    if graph.spec_version != SPEC_VERSION {
        result.add_error(ValidationError::with_path(
            ErrorCode::UnsupportedSpecVersion,
            format!(
                "spec_version must be {}, got {}",
                SPEC_VERSION, graph.spec_version
            ),
            "spec_version",
        ));
    }
}

fn validate_dimension(graph: &GraphSpec, result: &mut ValidationResult) {
    if graph.dimension == 0 || graph.dimension > MAX_DIMENSION {
        result.add_error(ValidationError::with_path(
            ErrorCode::InvalidDimension,
            format!(
                "dimension must be in 1..={}, got {}",
                MAX_DIMENSION, graph.dimension
            ),
            "dimension",
        ));
    }
}

fn validate_node_ids(graph: &GraphSpec, result: &mut ValidationResult) {
    let mut seen: HashSet<&str> = HashSet::new();
    for (i, node) in graph.nodes.iter().enumerate() {
        if !is_valid_node_id(&node.id) {
            result.add_error(ValidationError::with_path(
                ErrorCode::InvalidNodeId,
                format!(
                    "node id must match pattern '{}', got '{}'",
                    NODE_ID_PATTERN, node.id
                ),
                format!("nodes[{}].id", i),
            ));
        }
        if !seen.insert(node.id.as_str()) {
            result.add_error(ValidationError::with_path(
                ErrorCode::DuplicateNodeId,
                format!("duplicate node id: '{}'", node.id),
                format!("nodes[{}].id", i),
            ));
        }
    }
}

fn validate_references(graph: &GraphSpec, result: &mut ValidationResult) {
    let ids: HashSet<&str> = graph.nodes.iter().map(|n| n.id.as_str()).collect();
    for (i, node) in graph.nodes.iter().enumerate() {
        for input in node.op.inputs() {
            if !ids.contains(input) {
                result.add_error(ValidationError::with_path(
                    ErrorCode::UnknownNodeReference,
                    format!("node '{}' references unknown node '{}'", node.id, input),
                    format!("nodes[{}]", i),
                ));
            }
        }
    }
}

fn validate_root(graph: &GraphSpec, result: &mut ValidationResult) {
    if graph.node(&graph.root).is_none() {
        result.add_error(ValidationError::with_path(
            ErrorCode::MissingRoot,
            format!("root '{}' does not name a node", graph.root),
            "root",
        ));
    }
}

/// Accumulates parameter errors for one node.
struct ParamCheck<'a> {
    index: usize,
    result: &'a mut ValidationResult,
}

impl ParamCheck<'_> {
    fn fail(&mut self, field: &str, message: impl Into<String>) {
        self.result.add_error(ValidationError::with_path(
            ErrorCode::ParameterOutOfRange,
            message,
            format!("nodes[{}].{}", self.index, field),
        ));
    }

    fn empty(&mut self, field: &str, message: impl Into<String>) {
        self.result.add_error(ValidationError::with_path(
            ErrorCode::EmptyChildren,
            message,
            format!("nodes[{}].{}", self.index, field),
        ));
    }

    fn finite(&mut self, field: &str, value: f64) {
        if !value.is_finite() {
            self.fail(field, format!("{} must be finite, got {}", field, value));
        }
    }

    fn all_finite(&mut self, field: &str, values: &[f64]) {
        if let Some(bad) = values.iter().find(|v| !v.is_finite()) {
            self.fail(field, format!("{} must be finite, got {}", field, bad));
        }
    }

    fn positive(&mut self, field: &str, value: f64) {
        if !(value.is_finite() && value > 0.0) {
            self.fail(field, format!("{} must be > 0, got {}", field, value));
        }
    }

    fn distinct_axes(&mut self, field: &str, axes: &[usize]) {
        let unique: HashSet<usize> = axes.iter().copied().collect();
        if unique.len() != axes.len() {
            self.fail(field, format!("{} must not repeat an axis", field));
        }
    }
}

fn validate_params(op: &NodeOp, index: usize, result: &mut ValidationResult) {
    let mut check = ParamCheck { index, result };

    match op {
        NodeOp::Value { .. }
        | NodeOp::Perlin { .. }
        | NodeOp::Simplex { .. }
        | NodeOp::SuperSimplex { .. }
        | NodeOp::White { .. }
        | NodeOp::Checkerboard
        | NodeOp::Spheres
        | NodeOp::Cylinders
        | NodeOp::Abs { .. }
        | NodeOp::Invert { .. }
        | NodeOp::Billow { .. }
        | NodeOp::Ridged { .. } => {}

        NodeOp::Worley {
            distance,
            jitter,
            max_feature_points,
            ..
        } => {
            if let DistanceSpec::Minkowski { p } = distance {
                check.positive("distance.p", *p);
            }
            if !(0.0..=1.0).contains(jitter) {
                check.fail("jitter", format!("jitter must be in [0, 1], got {}", jitter));
            }
            if *max_feature_points == 0 || *max_feature_points > MAX_FEATURE_POINTS {
                check.fail(
                    "max_feature_points",
                    format!(
                        "max_feature_points must be in 1..={}, got {}",
                        MAX_FEATURE_POINTS, max_feature_points
                    ),
                );
            }
        }

        NodeOp::GaussianWhite { mean, stddev, .. } => {
            check.finite("mean", *mean);
            check.positive("stddev", *stddev);
        }

        NodeOp::Constant { value } => check.finite("value", *value),

        NodeOp::Clamp { low, high, .. } => {
            check.finite("low", *low);
            check.finite("high", *high);
            if low > high {
                check.fail("low", format!("low ({}) must be <= high ({})", low, high));
            }
        }

        NodeOp::Power { exponent, .. } => check.finite("exponent", *exponent),

        NodeOp::ScaleBias { scale, bias, .. } => {
            check.finite("scale", *scale);
            check.finite("bias", *bias);
        }

        NodeOp::Translate { offset, .. } => {
            if offset.is_empty() {
                check.fail("offset", "offset must have one entry per axis");
            }
            check.all_finite("offset", offset);
        }

        NodeOp::Scale { factors, .. } => {
            if factors.is_empty() {
                check.fail("factors", "factors must not be empty");
            }
            if let Some(bad) = factors.iter().find(|f| !f.is_finite() || **f == 0.0) {
                check.fail(
                    "factors",
                    format!("scale factors must be finite and non-zero, got {}", bad),
                );
            }
        }

        NodeOp::Rotate { axes, angle, .. } => {
            check.finite("angle", *angle);
            if axes[0] == axes[1] {
                check.fail("axes", "rotation axes must differ");
            }
            if axes.iter().any(|a| *a >= usize::from(MAX_DIMENSION)) {
                check.fail("axes", format!("rotation axes must be < {}", MAX_DIMENSION));
            }
        }

        NodeOp::DomainWarp {
            warp, amplitude, ..
        } => {
            if warp.is_empty() {
                check.empty("warp", "domain_warp needs at least one warp source");
            }
            if amplitude.is_empty() {
                check.fail("amplitude", "amplitude must not be empty");
            }
            check.all_finite("amplitude", amplitude);
        }

        NodeOp::Slice { axes, origin, .. } => {
            if origin.is_empty() || origin.len() > usize::from(MAX_DIMENSION) {
                check.fail(
                    "origin",
                    format!(
                        "origin length sets the child dimension and must be in 1..={}",
                        MAX_DIMENSION
                    ),
                );
            }
            check.all_finite("origin", origin);
            if axes.is_empty() || axes.len() >= origin.len() {
                check.fail(
                    "axes",
                    format!(
                        "slice must map fewer axes than the child has ({} axes, child dimension {})",
                        axes.len(),
                        origin.len()
                    ),
                );
            }
            if axes.iter().any(|a| *a >= origin.len()) {
                check.fail("axes", "slice axes must index into origin");
            }
            check.distinct_axes("axes", axes);
        }

        NodeOp::Project { axes, .. } => {
            if axes.is_empty() || axes.len() > usize::from(MAX_DIMENSION) {
                check.fail(
                    "axes",
                    format!("project axes length must be in 1..={}", MAX_DIMENSION),
                );
            }
            check.distinct_axes("axes", axes);
        }

        NodeOp::Sum { inputs }
        | NodeOp::Product { inputs }
        | NodeOp::Min { inputs }
        | NodeOp::Max { inputs }
        | NodeOp::Pow { inputs } => {
            if inputs.is_empty() {
                check.empty("inputs", "inputs must have at least one entry");
            }
        }

        NodeOp::WeightedBlend { inputs, weights } => {
            if inputs.is_empty() {
                check.empty("inputs", "inputs must have at least one entry");
            }
            if weights.len() != inputs.len() {
                check.fail(
                    "weights",
                    format!(
                        "expected {} weights (one per input), got {}",
                        inputs.len(),
                        weights.len()
                    ),
                );
            }
            check.all_finite("weights", weights);
        }

        NodeOp::Fractal {
            octaves,
            lacunarity,
            persistence,
            ..
        } => {
            if *octaves == 0 || *octaves > MAX_OCTAVES {
                check.fail(
                    "octaves",
                    format!("octaves must be in 1..={}, got {}", MAX_OCTAVES, octaves),
                );
            }
            check.positive("lacunarity", *lacunarity);
            check.positive("persistence", *persistence);
            if (1..=MAX_OCTAVES).contains(octaves) {
                let (norm, amplitude, frequency) = octave_scales(*octaves, *lacunarity, *persistence);
                if persistence.is_finite() && !(norm.is_finite() && amplitude.is_finite()) {
                    check.fail(
                        "persistence",
                        format!("persistence {} overflows over {} octaves", persistence, octaves),
                    );
                }
                if lacunarity.is_finite() && !frequency.is_finite() {
                    check.fail(
                        "lacunarity",
                        format!("lacunarity {} overflows over {} octaves", lacunarity, octaves),
                    );
                }
            }
        }

        NodeOp::Lerp { .. } => {}

        NodeOp::Select { boundary, .. } => check.finite("boundary", *boundary),
    }
}

/// Amplitude sum, and the amplitude and frequency of the last octave.
fn octave_scales(octaves: u32, lacunarity: f64, persistence: f64) -> (f64, f64, f64) {
    let mut norm = 0.0;
    let mut amplitude = 1.0;
    let mut frequency = 1.0;
    for octave in 0..octaves {
        if octave > 0 {
            amplitude *= persistence;
            frequency *= lacunarity;
        }
        norm += amplitude;
    }
    (norm, amplitude, frequency)
}

/// Returns the ids of nodes reachable from the root (including the root).
pub fn reachable_nodes(graph: &GraphSpec) -> HashSet<&str> {
    let by_id: HashMap<&str, &NodeOp> = graph
        .nodes
        .iter()
        .map(|n| (n.id.as_str(), &n.op))
        .collect();

    let mut reached = HashSet::new();
    let mut queue = VecDeque::new();
    if by_id.contains_key(graph.root.as_str()) {
        queue.push_back(graph.root.as_str());
    }
    while let Some(id) = queue.pop_front() {
        if !reached.insert(id) {
            continue;
        }
        if let Some(op) = by_id.get(id) {
            queue.extend(op.inputs().into_iter().filter(|i| by_id.contains_key(i)));
        }
    }
    reached
}

fn check_warnings(graph: &GraphSpec, result: &mut ValidationResult) {
    // W001: nodes the root never reads
    if graph.node(&graph.root).is_some() {
        let reached = reachable_nodes(graph);
        for (i, node) in graph.nodes.iter().enumerate() {
            if !reached.contains(node.id.as_str()) {
                result.add_warning(ValidationWarning::with_path(
                    WarningCode::UnreachableNode,
                    format!("node '{}' is not reachable from root '{}'", node.id, graph.root),
                    format!("nodes[{}]", i),
                ));
            }
        }
    }

    // W002: empty name
    if graph.name.trim().is_empty() {
        result.add_warning(ValidationWarning::with_path(
            WarningCode::EmptyName,
            "name field is empty",
            "name",
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{FadeKind, FractalKind, InterpolationKind};

    fn perlin() -> NodeOp {
        NodeOp::Perlin {
            seed: None,
            fade: FadeKind::Quintic,
            interpolation: InterpolationKind::Linear,
        }
    }

    #[test]
    fn test_node_id_pattern() {
        assert!(is_valid_node_id("a"));
        assert!(is_valid_node_id("base_noise-2"));
        assert!(!is_valid_node_id("Base"));
        assert!(!is_valid_node_id("1st"));
        assert!(!is_valid_node_id(""));
        assert!(!is_valid_node_id(&"a".repeat(65)));
    }

    #[test]
    fn test_minimal_graph_is_valid() {
        let graph = GraphSpec::builder("plain", 3).node("p", perlin()).build();
        let result = validate_graph(&graph);
        assert!(result.is_ok(), "{:?}", result.errors);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_fractal_params_checked() {
        let graph = GraphSpec::builder("fbm", 2)
            .node("p", perlin())
            .node(
                "f",
                NodeOp::Fractal {
                    source: "p".to_string(),
                    octaves: 0,
                    lacunarity: -1.0,
                    persistence: 0.5,
                    function: FractalKind::Fbm,
                    increment_seed: false,
                },
            )
            .build();
        let result = validate_graph(&graph);
        let paths: Vec<_> = result
            .errors
            .iter()
            .filter_map(|e| e.path.as_deref())
            .collect();
        assert_eq!(paths, vec!["nodes[1].octaves", "nodes[1].lacunarity"]);
    }

    #[test]
    fn test_fractal_overflow_rejected() {
        let fractal = |lacunarity, persistence| {
            let graph = GraphSpec::builder("loud", 2)
                .node("p", perlin())
                .node(
                    "f",
                    NodeOp::Fractal {
                        source: "p".to_string(),
                        octaves: MAX_OCTAVES,
                        lacunarity,
                        persistence,
                        function: FractalKind::Fbm,
                        increment_seed: false,
                    },
                )
                .build();
            validate_graph(&graph)
        };

        let result = fractal(2.0, 1e12);
        assert_eq!(result.errors.len(), 1, "{:?}", result.errors);
        assert_eq!(result.errors[0].code, ErrorCode::ParameterOutOfRange);
        assert_eq!(result.errors[0].path.as_deref(), Some("nodes[1].persistence"));

        let result = fractal(1e12, 0.5);
        assert_eq!(result.errors.len(), 1, "{:?}", result.errors);
        assert_eq!(result.errors[0].path.as_deref(), Some("nodes[1].lacunarity"));

        assert!(fractal(3.0, 2.0).is_ok());
    }

    #[test]
    fn test_reachable_nodes_follows_inputs() {
        let graph = GraphSpec::builder("reach", 2)
            .node("p", perlin())
            .node("lonely", NodeOp::Checkerboard)
            .node(
                "out",
                NodeOp::Abs {
                    input: "p".to_string(),
                },
            )
            .build();
        let reached = reachable_nodes(&graph);
        assert!(reached.contains("out"));
        assert!(reached.contains("p"));
        assert!(!reached.contains("lonely"));
    }
}
