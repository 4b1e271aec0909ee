//! End-to-end tests for the noisegraph binary
//!
//! Each test writes a graph file into a temporary directory, runs the real
//! binary and checks its exit code and (for `--json`) its report.
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p noisegraph-cli --test cli_commands
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use pretty_assertions::assert_eq;
use serde_json::Value;
use tempfile::TempDir;

const TERRAIN: &str = r#"{
    "spec_version": 1,
    "name": "terrain",
    "version": "1.2.0",
    "seed": 42,
    "dimension": 2,
    "root": "shaped",
    "nodes": [
        { "id": "base", "type": "perlin" },
        { "id": "hills", "type": "fractal", "source": "base", "octaves": 4 },
        { "id": "shaped", "type": "clamp", "input": "hills", "low": -0.8, "high": 0.8 },
        { "id": "spare", "type": "simplex" }
    ]
}"#;

const CHECKER: &str = r#"{
    "spec_version": 1,
    "name": "checker",
    "seed": 1,
    "dimension": 2,
    "root": "k",
    "nodes": [ { "id": "k", "type": "checkerboard" } ]
}"#;

const LOOP: &str = r#"{
    "spec_version": 1,
    "name": "loop",
    "seed": 1,
    "dimension": 2,
    "root": "a",
    "nodes": [
        { "id": "a", "type": "abs", "input": "b" },
        { "id": "b", "type": "abs", "input": "a" }
    ]
}"#;

const DANGLING: &str = r#"{
    "spec_version": 1,
    "name": "dangling",
    "seed": 1,
    "dimension": 2,
    "root": "a",
    "nodes": [ { "id": "a", "type": "abs", "input": "ghost" } ]
}"#;

struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("create temp dir"),
        }
    }

    fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        fs::write(&path, content).expect("write graph");
        path
    }
}

fn noisegraph(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_noisegraph"))
        .args(args)
        .env("NO_COLOR", "1")
        .output()
        .expect("run noisegraph")
}

fn graph_arg(path: &Path) -> &str {
    path.to_str().expect("utf-8 temp path")
}

fn json_report(output: &Output) -> Value {
    serde_json::from_slice(&output.stdout).unwrap_or_else(|e| {
        panic!(
            "stdout is not JSON ({}): {}",
            e,
            String::from_utf8_lossy(&output.stdout)
        )
    })
}

// ============================================================================
// validate
// ============================================================================

/// A well-formed graph validates with exit code 0 and an unreachable-node warning.
#[test]
fn test_validate_valid_graph() {
    let ws = Workspace::new();
    let graph = ws.write("terrain.json", TERRAIN);

    let out = noisegraph(&["validate", "--graph", graph_arg(&graph)]);
    assert!(out.status.success(), "validate failed: {:?}", out);
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("SUCCESS"), "stdout: {}", stdout);
    assert!(stdout.contains("W001"), "expected unreachable warning: {}", stdout);

    let out = noisegraph(&["validate", "--graph", graph_arg(&graph), "--json"]);
    assert!(out.status.success());
    let report = json_report(&out);
    assert_eq!(report["success"], true);
    assert_eq!(report["result"]["name"], "terrain");
    assert_eq!(report["result"]["version"], "1.2.0");
    assert_eq!(report["result"]["node_count"], 4);
    assert_eq!(report["warnings"][0]["code"], "W001");
}

/// Structural errors are reported with their validation codes.
#[test]
fn test_validate_reports_unknown_reference() {
    let ws = Workspace::new();
    let graph = ws.write("dangling.json", DANGLING);

    let out = noisegraph(&["validate", "-g", graph_arg(&graph), "--json"]);
    assert_eq!(out.status.code(), Some(1));
    let report = json_report(&out);
    assert_eq!(report["success"], false);
    assert_eq!(report["errors"][0]["code"], "E004");
    assert!(report.get("result").is_none(), "failed report carries no result");
}

/// Cycles pass structural validation but fail compilation.
#[test]
fn test_validate_reports_cycle_as_compile_error() {
    let ws = Workspace::new();
    let graph = ws.write("loop.json", LOOP);

    let out = noisegraph(&["validate", "-g", graph_arg(&graph), "--json"]);
    assert_eq!(out.status.code(), Some(1));
    let report = json_report(&out);
    assert_eq!(report["errors"][0]["code"], "CLI_003");

    let out = noisegraph(&["validate", "-g", graph_arg(&graph)]);
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stdout).contains("FAILED"));
}

/// Malformed JSON is reported with its location.
#[test]
fn test_validate_reports_parse_error_location() {
    let ws = Workspace::new();
    let graph = ws.write("broken.json", "{\n  \"spec_version\": 1,\n  oops\n}");

    let out = noisegraph(&["validate", "-g", graph_arg(&graph), "--json"]);
    assert_eq!(out.status.code(), Some(1));
    let report = json_report(&out);
    assert_eq!(report["errors"][0]["code"], "CLI_002");
    assert_eq!(report["errors"][0]["line"], 3);
}

/// A missing file is a hard error in human mode and a report in JSON mode.
#[test]
fn test_validate_missing_file() {
    let ws = Workspace::new();
    let missing = ws.dir.path().join("nope.json");

    let out = noisegraph(&["validate", "-g", graph_arg(&missing)]);
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("error"));

    let out = noisegraph(&["validate", "-g", graph_arg(&missing), "--json"]);
    assert_eq!(out.status.code(), Some(1));
    assert_eq!(json_report(&out)["errors"][0]["code"], "CLI_001");
}

// ============================================================================
// info
// ============================================================================

/// Info lists every node with its reachability and the compiled node count.
#[test]
fn test_info_lists_nodes() {
    let ws = Workspace::new();
    let graph = ws.write("terrain.json", TERRAIN);

    let out = noisegraph(&["info", "-g", graph_arg(&graph), "--json"]);
    assert!(out.status.success());
    let report = json_report(&out);
    let result = &report["result"];
    assert_eq!(result["root"], "shaped");
    assert_eq!(result["dimension"], 2);
    assert_eq!(result["built_nodes"], 3);

    let nodes = result["nodes"].as_array().expect("nodes array");
    assert_eq!(nodes.len(), 4);
    assert_eq!(nodes[1]["type"], "fractal");
    assert_eq!(nodes[1]["inputs"][0], "base");
    assert_eq!(nodes[3]["reachable"], false);

    let out = noisegraph(&["info", "-g", graph_arg(&graph)]);
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("terrain v1.2.0"), "stdout: {}", stdout);
    assert!(stdout.contains("Compiles:"), "stdout: {}", stdout);
}

/// Info still succeeds for graphs that do not compile.
#[test]
fn test_info_on_uncompilable_graph() {
    let ws = Workspace::new();
    let graph = ws.write("loop.json", LOOP);

    let out = noisegraph(&["info", "-g", graph_arg(&graph), "--json"]);
    assert!(out.status.success());
    let result = &json_report(&out)["result"];
    assert!(result.get("built_nodes").is_none());
    assert!(result["compile_error"].is_string());
}

/// The fingerprint ignores formatting but tracks content.
#[test]
fn test_info_fingerprint_ignores_formatting() {
    let ws = Workspace::new();
    let pretty = ws.write("pretty.json", CHECKER);
    let compact: Value = serde_json::from_str(CHECKER).unwrap();
    let compact = ws.write("compact.json", &compact.to_string());

    let a = json_report(&noisegraph(&["info", "-g", graph_arg(&pretty), "--json"]));
    let b = json_report(&noisegraph(&["info", "-g", graph_arg(&compact), "--json"]));
    assert_eq!(a["result"]["fingerprint"], b["result"]["fingerprint"]);
    assert_ne!(
        a["result"]["source_hash"], b["result"]["source_hash"],
        "source hash covers raw bytes"
    );
}

// ============================================================================
// sample
// ============================================================================

/// Samples are deterministic across runs and track the seed override.
#[test]
fn test_sample_is_deterministic() {
    let ws = Workspace::new();
    let graph = ws.write("terrain.json", TERRAIN);
    let args = [
        "sample",
        "-g",
        graph_arg(&graph),
        "--at",
        "0.3,0.7",
        "--at",
        "-12.5,4.25",
        "--json",
    ];

    let first = json_report(&noisegraph(&args));
    let second = json_report(&noisegraph(&args));
    assert_eq!(first, second);
    assert_eq!(first["result"]["seed"], 42);
    let samples = first["result"]["samples"].as_array().expect("samples");
    assert_eq!(samples.len(), 2);
    for s in samples {
        let v = s["value"].as_f64().expect("numeric value");
        assert!((-0.8..=0.8).contains(&v), "clamped value out of range: {}", v);
    }

    let mut reseeded = args.to_vec();
    reseeded.extend(["--seed", "7"]);
    let other = json_report(&noisegraph(&reseeded));
    assert_eq!(other["result"]["seed"], 7);
    assert_ne!(
        first["result"]["samples"], other["result"]["samples"],
        "a different seed should move the field"
    );
}

/// Checkerboard samples match the unit-cell pattern.
#[test]
fn test_sample_checkerboard_values() {
    let ws = Workspace::new();
    let graph = ws.write("checker.json", CHECKER);

    let out = noisegraph(&[
        "sample", "-g", graph_arg(&graph), "--at", "0.5,0.5", "--at", "1.5,0.5", "--json",
    ]);
    assert!(out.status.success());
    let report = json_report(&out);
    assert_eq!(report["result"]["samples"][0]["value"], 1.0);
    assert_eq!(report["result"]["samples"][1]["value"], 0.0);
}

/// Points with the wrong number of coordinates are rejected.
#[test]
fn test_sample_wrong_arity() {
    let ws = Workspace::new();
    let graph = ws.write("checker.json", CHECKER);

    let out = noisegraph(&["sample", "-g", graph_arg(&graph), "--at", "1,2,3", "--json"]);
    assert_eq!(out.status.code(), Some(1));
    assert_eq!(json_report(&out)["errors"][0]["code"], "CLI_005");

    let out = noisegraph(&["sample", "-g", graph_arg(&graph), "--at", "1,abc", "--json"]);
    assert_eq!(out.status.code(), Some(1));
    assert_eq!(json_report(&out)["errors"][0]["code"], "CLI_004");

    let out = noisegraph(&["sample", "-g", graph_arg(&graph), "--at", "1"]);
    assert_eq!(out.status.code(), Some(1));
}

// ============================================================================
// grid
// ============================================================================

/// A grid report has `steps` rows of `steps` values plus statistics.
#[test]
fn test_grid_checkerboard() {
    let ws = Workspace::new();
    let graph = ws.write("checker.json", CHECKER);

    let out = noisegraph(&[
        "grid",
        "-g",
        graph_arg(&graph),
        "--min",
        "0.5,0.5",
        "--max",
        "3.5,3.5",
        "--steps",
        "4",
        "--json",
    ]);
    assert!(out.status.success(), "grid failed: {:?}", out);
    let result = &json_report(&out)["result"];
    assert_eq!(result["steps"], 4);
    assert_eq!(
        result["rows"],
        serde_json::json!([
            [1.0, 0.0, 1.0, 0.0],
            [0.0, 1.0, 0.0, 1.0],
            [1.0, 0.0, 1.0, 0.0],
            [0.0, 1.0, 0.0, 1.0]
        ])
    );
    assert_eq!(result["stats"]["mean"], 0.5);
}

/// Negative corners and human output both work.
#[test]
fn test_grid_human_output() {
    let ws = Workspace::new();
    let graph = ws.write("terrain.json", TERRAIN);

    let out = noisegraph(&[
        "grid", "-g", graph_arg(&graph), "--min", "-2,-2", "--max", "2,2", "--steps", "3",
    ]);
    assert!(out.status.success(), "grid failed: {:?}", out);
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("Stats:"), "stdout: {}", stdout);
}

/// Out-of-range step counts and mismatched corners are argument errors.
#[test]
fn test_grid_rejects_bad_arguments() {
    let ws = Workspace::new();
    let graph = ws.write("checker.json", CHECKER);

    let out = noisegraph(&[
        "grid", "-g", graph_arg(&graph), "--min", "0,0", "--max", "1,1", "--steps", "0", "--json",
    ]);
    assert_eq!(out.status.code(), Some(1));
    assert_eq!(json_report(&out)["errors"][0]["code"], "CLI_004");

    let out = noisegraph(&[
        "grid", "-g", graph_arg(&graph), "--min", "0", "--max", "1,1", "--json",
    ]);
    assert_eq!(out.status.code(), Some(1));
    assert_eq!(json_report(&out)["errors"][0]["code"], "CLI_004");
}
