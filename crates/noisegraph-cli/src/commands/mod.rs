//! CLI command implementations

pub mod grid;
pub mod info;
pub mod json_output;
pub mod sample;
pub mod validate;

use anyhow::{bail, Context, Result};
use noisegraph_engine::{compile_graph, Pipeline};
use noisegraph_spec::{canonical_graph_hash, validate_graph, GraphSpec};
use std::path::Path;

use crate::input::load_graph;
use json_output::{
    error_codes, input_error_to_json, noise_error_to_json, validation_error_to_json, GraphSummary,
    JsonError,
};

/// Parses a comma-separated coordinate list such as `1.5,-2,0`.
pub fn parse_coords(text: &str) -> Result<Vec<f64>> {
    let coords = text
        .split(',')
        .map(|part| {
            let part = part.trim();
            part.parse::<f64>()
                .with_context(|| format!("invalid coordinate '{}' in '{}'", part, text))
        })
        .collect::<Result<Vec<f64>>>()?;
    if let Some(bad) = coords.iter().find(|c| !c.is_finite()) {
        bail!("coordinates must be finite, got {} in '{}'", bad, text);
    }
    Ok(coords)
}

/// Loads, compiles and optionally reseeds the graph at `path`.
pub(crate) fn load_pipeline(path: &str, seed: Option<u64>) -> Result<Pipeline> {
    let loaded = load_graph(Path::new(path))
        .with_context(|| format!("Failed to load graph file: {}", path))?;
    let pipeline = compile_graph(&loaded.graph)
        .with_context(|| format!("Failed to compile graph '{}'", loaded.graph.name))?;
    match seed {
        Some(seed) => pipeline
            .reseed(seed)
            .with_context(|| format!("Failed to reseed graph with {}", seed)),
        None => Ok(pipeline),
    }
}

/// Like [`load_pipeline`], reporting every failure as JSON errors.
pub(crate) fn load_pipeline_json(
    path: &str,
    seed: Option<u64>,
) -> std::result::Result<Pipeline, Vec<JsonError>> {
    let loaded = load_graph(Path::new(path)).map_err(|e| vec![input_error_to_json(&e, path)])?;

    let validation = validate_graph(&loaded.graph);
    if !validation.is_ok() {
        return Err(validation.errors.iter().map(validation_error_to_json).collect());
    }

    let pipeline = compile_graph(&loaded.graph)
        .map_err(|e| vec![noise_error_to_json(error_codes::COMPILE, &e)])?;
    match seed {
        Some(seed) => pipeline
            .reseed(seed)
            .map_err(|e| vec![noise_error_to_json(error_codes::RESEED, &e)]),
        None => Ok(pipeline),
    }
}

/// Summarizes a graph document for reports.
pub(crate) fn graph_summary(graph: &GraphSpec, source_hash: &str) -> GraphSummary {
    GraphSummary {
        name: graph.name.clone(),
        version: graph.version.clone(),
        seed: graph.seed,
        dimension: graph.dimension,
        root: graph.root.clone(),
        node_count: graph.nodes.len(),
        fingerprint: canonical_graph_hash(graph).unwrap_or_else(|_| "unknown".to_string()),
        source_hash: source_hash.to_string(),
    }
}
