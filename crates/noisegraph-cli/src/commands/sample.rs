//! Sample command implementation
//!
//! Evaluates a graph at explicit points.

use anyhow::{Context, Result};
use colored::Colorize;
use noisegraph_engine::Pipeline;
use serde::{Deserialize, Serialize};
use std::process::ExitCode;

use super::json_output::{error_codes, noise_error_to_json, CommandOutput, JsonError};
use super::{load_pipeline, load_pipeline_json, parse_coords};

/// One evaluated point.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Sample {
    pub coords: Vec<f64>,
    pub value: f64,
}

/// JSON result of the sample command.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SampleResult {
    /// Pipeline name
    pub name: String,
    /// Seed the pipeline was evaluated with
    pub seed: u64,
    /// Root dimensionality
    pub dimension: usize,
    pub samples: Vec<Sample>,
}

/// Evaluates `pipeline` at every point.
pub fn sample_points(pipeline: &Pipeline, points: &[Vec<f64>]) -> Result<Vec<Sample>> {
    points
        .iter()
        .map(|coords| {
            let value = pipeline.evaluate(coords).with_context(|| {
                format!("cannot evaluate '{}' at {:?}", pipeline.name(), coords)
            })?;
            Ok(Sample {
                coords: coords.clone(),
                value,
            })
        })
        .collect()
}

/// Run the sample command
///
/// # Arguments
/// * `graph_path` - Path to the graph file
/// * `at` - Comma-separated points
/// * `seed` - Optional seed override
/// * `json_output` - Whether to output machine-readable JSON
pub fn run(graph_path: &str, at: &[String], seed: Option<u64>, json_output: bool) -> Result<ExitCode> {
    if json_output {
        return run_json(graph_path, at, seed);
    }

    let points = at
        .iter()
        .map(|p| parse_coords(p))
        .collect::<Result<Vec<_>>>()?;
    let pipeline = load_pipeline(graph_path, seed)?;
    let samples = sample_points(&pipeline, &points)?;

    println!(
        "{} {} ({}, seed {})",
        "Sampling:".cyan().bold(),
        pipeline.name(),
        pipeline.dimension(),
        pipeline.seed()
    );
    for sample in &samples {
        let coords: Vec<String> = sample.coords.iter().map(|c| c.to_string()).collect();
        println!("  ({}) {} {:.6}", coords.join(", "), "=>".dimmed(), sample.value);
    }
    Ok(ExitCode::SUCCESS)
}

fn run_json(graph_path: &str, at: &[String], seed: Option<u64>) -> Result<ExitCode> {
    let mut points = Vec::with_capacity(at.len());
    for text in at {
        match parse_coords(text) {
            Ok(p) => points.push(p),
            Err(e) => {
                let error = JsonError::new(error_codes::INVALID_ARGUMENT, format!("{:#}", e));
                CommandOutput::<SampleResult>::failure(vec![error], vec![]).print()?;
                return Ok(ExitCode::from(1));
            }
        }
    }

    let pipeline = match load_pipeline_json(graph_path, seed) {
        Ok(pipeline) => pipeline,
        Err(errors) => {
            CommandOutput::<SampleResult>::failure(errors, vec![]).print()?;
            return Ok(ExitCode::from(1));
        }
    };

    let mut samples = Vec::with_capacity(points.len());
    for coords in points {
        match pipeline.evaluate(&coords) {
            Ok(value) => samples.push(Sample { coords, value }),
            Err(e) => {
                let error = noise_error_to_json(error_codes::EVALUATE, &e);
                CommandOutput::<SampleResult>::failure(vec![error], vec![]).print()?;
                return Ok(ExitCode::from(1));
            }
        }
    }

    let result = SampleResult {
        name: pipeline.name().to_string(),
        seed: pipeline.seed(),
        dimension: pipeline.dimension().len(),
        samples,
    };
    CommandOutput::success(result, vec![]).print()?;
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use noisegraph_engine::compile_graph;
    use noisegraph_spec::GraphSpec;

    fn constant_pipeline() -> Pipeline {
        let graph = GraphSpec::from_json(
            r#"{ "spec_version": 1, "name": "c", "seed": 1, "dimension": 2, "root": "k",
                 "nodes": [ { "id": "k", "type": "constant", "value": 0.5 } ] }"#,
        )
        .unwrap();
        compile_graph(&graph).unwrap()
    }

    #[test]
    fn test_sample_points() {
        let samples =
            sample_points(&constant_pipeline(), &[vec![0.0, 1.0], vec![-3.0, 2.5]]).unwrap();
        assert_eq!(samples.len(), 2);
        assert!(samples.iter().all(|s| s.value == 0.5));
        assert_eq!(samples[1].coords, vec![-3.0, 2.5]);
    }

    #[test]
    fn test_sample_wrong_arity_fails() {
        let err = sample_points(&constant_pipeline(), &[vec![1.0]]).unwrap_err();
        assert!(format!("{:#}", err).contains("dimension"), "{:#}", err);
    }
}
