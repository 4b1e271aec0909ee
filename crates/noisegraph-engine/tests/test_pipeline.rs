//! Pipeline tests: graph compilation, reseeding, batch evaluation and
//! concurrent use.

use std::sync::Arc;
use std::thread;

use noisegraph_engine::{
    compile_graph, derive_node_seed, Dimension, FractalParams, Modifier, NoiseError, NoiseSource,
    PerlinNoise, Pipeline, PipelineBuilder, SimplexVariant, SuperSimplexNoise, MAX_GRAPH_DEPTH,
};
use noisegraph_spec::{GraphSpec, NodeOp};

const TERRAIN: &str = r#"{
    "spec_version": 1,
    "name": "terrain",
    "version": "1.2.0",
    "seed": 42,
    "dimension": 2,
    "root": "shaped",
    "nodes": [
        { "id": "base", "type": "perlin" },
        { "id": "fbm", "type": "fractal", "source": "base", "octaves": 5 },
        { "id": "warp_x", "type": "simplex" },
        { "id": "warp_y", "type": "simplex", "seed": 7 },
        { "id": "warped", "type": "domain_warp", "input": "fbm",
          "warp": ["warp_x", "warp_y"], "amplitude": [0.5] },
        { "id": "cells", "type": "worley", "distance": "manhattan", "return_type": "f2_minus_f1" },
        { "id": "mask", "type": "scale", "input": "cells", "factors": [0.25] },
        { "id": "mixed", "type": "weighted_blend", "inputs": ["warped", "mask"], "weights": [0.7, 0.3] },
        { "id": "shaped", "type": "clamp", "input": "mixed", "low": -1.0, "high": 1.0 }
    ]
}"#;

fn terrain() -> Pipeline {
    let graph = GraphSpec::from_json(TERRAIN).expect("terrain graph should parse");
    compile_graph(&graph).expect("terrain graph should compile")
}

fn grid(step: f64, count: usize) -> Vec<f64> {
    let mut points = Vec::with_capacity(count * count * 2);
    for i in 0..count {
        for j in 0..count {
            points.push(i as f64 * step - 3.0);
            points.push(j as f64 * step + 1.5);
        }
    }
    points
}

// ============================================================================
// Compilation Tests
// ============================================================================

/// A mixed graph compiles with its metadata carried over.
#[test]
fn test_compile_terrain_graph() {
    let pipeline = terrain();
    assert_eq!(pipeline.name(), "terrain");
    assert_eq!(pipeline.version(), "1.2.0");
    assert_eq!(pipeline.seed(), 42);
    assert_eq!(pipeline.dimension(), Dimension::Two);
    assert_eq!(pipeline.node_count(), 9);
    assert!(pipeline.fingerprint().is_some());
    assert!(pipeline.graph().is_some());

    let v = pipeline.evaluate(&[0.25, -4.5]).unwrap();
    assert!((-1.0..=1.0).contains(&v), "clamped root produced {}", v);
}

/// Compiling the same document twice gives identical pipelines.
#[test]
fn test_compilation_is_deterministic() {
    let a = terrain();
    let b = terrain();
    assert_eq!(a.fingerprint(), b.fingerprint());
    let points = grid(0.37, 16);
    for p in points.chunks_exact(2) {
        assert_eq!(a.eval(p).to_bits(), b.eval(p).to_bits(), "differs at {:?}", p);
    }
}

/// Generator seeds derive from the graph seed and the node id.
#[test]
fn test_node_seed_derivation() {
    let graph = GraphSpec::from_json(
        r#"{ "spec_version": 1, "name": "plain", "seed": 42, "dimension": 2,
             "root": "base", "nodes": [ { "id": "base", "type": "perlin" } ] }"#,
    )
    .unwrap();
    let compiled = compile_graph(&graph).unwrap();
    let direct = PerlinNoise::new(derive_node_seed(42, "base"), Dimension::Two);
    for p in grid(0.41, 10).chunks_exact(2) {
        assert_eq!(compiled.eval(p), direct.eval(p));
    }
}

/// Wrong coordinate counts are rejected.
#[test]
fn test_pipeline_dimension_mismatch() {
    let pipeline = terrain();
    assert_eq!(
        pipeline.evaluate(&[1.0, 2.0, 3.0]),
        Err(NoiseError::DimensionMismatch {
            expected: 2,
            actual: 3
        })
    );
}

/// A document that fails validation does not compile.
#[test]
fn test_invalid_graph_rejected() {
    let graph = GraphSpec::from_json(
        r#"{ "spec_version": 1, "name": "broken", "seed": 1, "dimension": 2,
             "root": "out", "nodes": [ { "id": "out", "type": "abs", "input": "missing" } ] }"#,
    )
    .unwrap();
    let err = compile_graph(&graph).unwrap_err();
    assert!(err.to_string().contains("missing"), "unexpected error: {}", err);
}

/// Cycles are rejected before any node is built.
#[test]
fn test_cycle_rejected() {
    let graph = GraphSpec::from_json(
        r#"{ "spec_version": 1, "name": "loop", "seed": 1, "dimension": 1, "root": "a",
             "nodes": [
                 { "id": "a", "type": "abs", "input": "b" },
                 { "id": "b", "type": "invert", "input": "a" }
             ] }"#,
    )
    .unwrap();
    assert!(compile_graph(&graph).is_err(), "cyclic graph should not compile");
}

fn abs_chain(links: usize) -> GraphSpec {
    let mut builder = GraphSpec::builder("chain", 2).node("n0", NodeOp::Constant { value: -0.25 });
    for i in 1..=links {
        builder = builder.node(
            format!("n{}", i),
            NodeOp::Abs {
                input: format!("n{}", i - 1),
            },
        );
    }
    builder.build()
}

/// A long but allowed chain compiles and evaluates.
#[test]
fn test_deep_chain_compiles() {
    let graph = abs_chain(MAX_GRAPH_DEPTH - 1);
    let pipeline = compile_graph(&graph).expect("chain at the depth limit should compile");
    assert_eq!(pipeline.node_count(), MAX_GRAPH_DEPTH);
    assert_eq!(pipeline.evaluate(&[0.3, 0.7]), Ok(0.25));
}

/// Chains past the depth limit fail with an error instead of overflowing the stack.
#[test]
fn test_too_deep_chain_rejected() {
    for links in [MAX_GRAPH_DEPTH, 2_000, 10_000] {
        match compile_graph(&abs_chain(links)) {
            Err(NoiseError::Configuration { node, message }) => {
                assert!(node.is_some(), "depth error should name a node");
                assert!(message.contains("deep"), "{}", message);
            }
            other => panic!(
                "{} links: expected a depth error, got {:?}",
                links,
                other.map(|p| p.node_count())
            ),
        }
    }
}

/// A long cycle is still detected without recursion.
#[test]
fn test_long_cycle_rejected() {
    let mut graph = abs_chain(5_000);
    graph.nodes[0].op = NodeOp::Abs {
        input: "n5000".into(),
    };
    let err = compile_graph(&graph).unwrap_err();
    assert!(err.to_string().contains("cycle"), "{}", err);
}

/// Parameters out of range surface as configuration errors naming the node.
#[test]
fn test_parameter_error_names_node() {
    let graph = GraphSpec::from_json(
        r#"{ "spec_version": 1, "name": "cyl", "seed": 1, "dimension": 1, "root": "tube",
             "nodes": [ { "id": "tube", "type": "cylinders" } ] }"#,
    )
    .unwrap();
    match compile_graph(&graph) {
        Err(NoiseError::Configuration { node, .. }) => assert_eq!(node.as_deref(), Some("tube")),
        other => panic!("expected a configuration error, got {:?}", other),
    }
}

/// Lattice options, simplex variants and the pow combiner map onto engine nodes.
#[test]
fn test_compile_lattice_options() {
    let graph = GraphSpec::from_json(
        r#"{ "spec_version": 1, "name": "options", "seed": 5, "dimension": 3, "root": "out",
             "nodes": [
                 { "id": "smooth", "type": "super_simplex", "variant": "improve_xy" },
                 { "id": "sharp", "type": "simplex", "variant": "improve_xz" },
                 { "id": "steps", "type": "perlin", "interpolation": "cubic" },
                 { "id": "two", "type": "constant", "value": 2.0 },
                 { "id": "out", "type": "pow", "inputs": ["smooth", "two"] }
             ] }"#,
    )
    .unwrap();
    let pipeline = compile_graph(&graph).unwrap();
    assert_eq!(pipeline.node_count(), 3);

    let smooth = SuperSimplexNoise::new(derive_node_seed(5, "smooth"), Dimension::Three)
        .with_variant(SimplexVariant::ImproveXy)
        .unwrap();
    for i in 0..20 {
        let p = [i as f64 * 0.31, 0.4, -1.2];
        let s = smooth.eval(&p);
        assert_eq!(pipeline.eval(&p), Modifier::Power { exponent: 2.0 }.apply(s));
    }

    // Unreachable option nodes still have to compile on their own.
    for (id, expected) in [("sharp", "simplex"), ("steps", "perlin")] {
        let single = GraphSpec {
            root: id.into(),
            ..graph.clone()
        };
        let pipeline = compile_graph(&single).unwrap();
        assert_eq!(pipeline.graph().map(|g| g.node(id).unwrap().op.type_name()), Some(expected));
        assert!(pipeline.evaluate(&[0.25, 0.5, 0.75]).unwrap().is_finite());
    }
}

/// A simplex variant of another dimension fails to compile, naming the node.
#[test]
fn test_simplex_variant_dimension_checked() {
    let graph = GraphSpec::from_json(
        r#"{ "spec_version": 1, "name": "flat", "seed": 5, "dimension": 2, "root": "s",
             "nodes": [ { "id": "s", "type": "simplex", "variant": "improve_xy" } ] }"#,
    )
    .unwrap();
    match compile_graph(&graph) {
        Err(NoiseError::Configuration { node, message }) => {
            assert_eq!(node.as_deref(), Some("s"));
            assert!(message.contains("variant"), "{}", message);
        }
        other => panic!("expected a configuration error, got {:?}", other.map(|p| p.node_count())),
    }
}

// ============================================================================
// Reseed Tests
// ============================================================================

/// Reseeding changes the field but keeps pinned seeds.
#[test]
fn test_reseed() {
    let original = terrain();
    let reseeded = original.reseed(1000).unwrap();
    assert_eq!(reseeded.seed(), 1000);
    assert_eq!(reseeded.name(), original.name());
    assert_eq!(reseeded.node_count(), original.node_count());
    assert_ne!(reseeded.fingerprint(), original.fingerprint());

    let points = grid(0.53, 12);
    let differing = points
        .chunks_exact(2)
        .filter(|p| original.eval(p) != reseeded.eval(p))
        .count();
    assert!(differing > 100, "only {} of 144 samples changed", differing);

    let back = reseeded.reseed(42).unwrap();
    assert_eq!(back.fingerprint(), original.fingerprint());
    for p in points.chunks_exact(2) {
        assert_eq!(back.eval(p), original.eval(p));
    }
}

/// Pinned generator seeds survive a reseed.
#[test]
fn test_reseed_keeps_pinned_seed() {
    let graph = GraphSpec::from_json(
        r#"{ "spec_version": 1, "name": "pinned", "seed": 3, "dimension": 3, "root": "p",
             "nodes": [ { "id": "p", "type": "simplex", "seed": 99 } ] }"#,
    )
    .unwrap();
    let pipeline = compile_graph(&graph).unwrap();
    let reseeded = pipeline.reseed(4).unwrap();
    for i in 0..20 {
        let p = [i as f64 * 0.3, 1.0, -0.5];
        assert_eq!(pipeline.eval(&p), reseeded.eval(&p));
    }
}

/// Builder pipelines have no graph to recompile.
#[test]
fn test_builder_pipeline_reseed_fails() {
    let pipeline = PipelineBuilder::new("typed")
        .source(Arc::new(PerlinNoise::new(1, Dimension::Two)))
        .octavate(FractalParams::default())
        .build()
        .unwrap();
    assert!(matches!(
        pipeline.reseed(2),
        Err(NoiseError::Configuration { .. })
    ));
}

// ============================================================================
// Batch Evaluation
// ============================================================================

/// Batch results match point-wise evaluation.
#[test]
fn test_evaluate_batch_matches_single() {
    let pipeline = terrain();
    let points = grid(0.29, 20);
    let mut out = vec![0.0; points.len() / 2];
    pipeline.evaluate_batch(&points, &mut out).unwrap();
    for (value, p) in out.iter().zip(points.chunks_exact(2)) {
        assert_eq!(*value, pipeline.evaluate(p).unwrap());
    }
}

/// Batch buffers must agree on the point count.
#[test]
fn test_evaluate_batch_length_mismatch() {
    let pipeline = terrain();
    let mut out = vec![0.0; 3];
    let err = pipeline.evaluate_batch(&[0.0; 5], &mut out).unwrap_err();
    assert_eq!(
        err,
        NoiseError::DimensionMismatch {
            expected: 6,
            actual: 5
        }
    );
}

// ============================================================================
// Concurrency
// ============================================================================

/// A shared pipeline gives the same answers from many threads.
#[test]
fn test_concurrent_evaluation() {
    let pipeline = Arc::new(terrain());
    let points = grid(0.61, 12);
    let mut expected = vec![0.0; points.len() / 2];
    pipeline.evaluate_batch(&points, &mut expected).unwrap();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let pipeline = Arc::clone(&pipeline);
            let points = points.clone();
            thread::spawn(move || {
                points
                    .chunks_exact(2)
                    .map(|p| pipeline.evaluate(p).unwrap())
                    .collect::<Vec<f64>>()
            })
        })
        .collect();

    for handle in handles {
        let values = handle.join().expect("worker thread panicked");
        assert_eq!(values, expected);
    }
}

/// Cloned pipelines share nodes and stay interchangeable.
#[test]
fn test_clone_shares_graph() {
    let pipeline = terrain();
    let clone = pipeline.clone();
    assert!(Arc::ptr_eq(pipeline.root(), clone.root()));
    assert_eq!(clone.eval(&[1.0, 1.0]), pipeline.eval(&[1.0, 1.0]));
}
