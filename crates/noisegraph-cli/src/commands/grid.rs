//! Grid command implementation
//!
//! Evaluates a graph over a regular grid and prints the values with summary
//! statistics. The grid spans axis 0 (columns) and axis 1 (rows); any further
//! axes stay at their `--min` value. 1D graphs produce a single row.

use anyhow::{bail, Result};
use colored::Colorize;
use noisegraph_engine::Pipeline;
use serde::{Deserialize, Serialize};
use std::process::ExitCode;

use super::json_output::{error_codes, CommandOutput, JsonError};
use super::{load_pipeline, load_pipeline_json, parse_coords};

/// Largest accepted `--steps` value.
pub const MAX_GRID_STEPS: usize = 1024;

/// Summary statistics over every grid value.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct GridStats {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
}

/// Evaluated grid values, one inner vector per row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Grid {
    pub rows: Vec<Vec<f64>>,
    pub stats: GridStats,
}

/// JSON result of the grid command.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GridResult {
    /// Pipeline name
    pub name: String,
    /// Seed the pipeline was evaluated with
    pub seed: u64,
    /// Root dimensionality
    pub dimension: usize,
    pub min: Vec<f64>,
    pub max: Vec<f64>,
    pub steps: usize,
    #[serde(flatten)]
    pub grid: Grid,
}

#[inline]
fn axis_value(min: f64, max: f64, index: usize, steps: usize) -> f64 {
    if steps == 1 {
        min
    } else {
        min + (max - min) * index as f64 / (steps - 1) as f64
    }
}

/// Evaluates `pipeline` on a `steps`-per-axis grid between `min` and `max`.
pub fn sample_grid(pipeline: &Pipeline, min: &[f64], max: &[f64], steps: usize) -> Result<Grid> {
    let n = pipeline.dimension().len();
    if min.len() != n || max.len() != n {
        bail!(
            "--min and --max need {} value(s) each for a {} graph, got {} and {}",
            n,
            pipeline.dimension(),
            min.len(),
            max.len()
        );
    }
    if steps == 0 || steps > MAX_GRID_STEPS {
        bail!("--steps must be in 1..={}, got {}", MAX_GRID_STEPS, steps);
    }

    let row_count = if n == 1 { 1 } else { steps };
    let mut rows = Vec::with_capacity(row_count);
    let mut points = vec![0.0; steps * n];
    for row in 0..row_count {
        for col in 0..steps {
            let point = &mut points[col * n..(col + 1) * n];
            point.copy_from_slice(min);
            point[0] = axis_value(min[0], max[0], col, steps);
            if n > 1 {
                point[1] = axis_value(min[1], max[1], row, steps);
            }
        }
        let mut values = vec![0.0; steps];
        pipeline.evaluate_batch(&points, &mut values)?;
        rows.push(values);
    }

    let count = (row_count * steps) as f64;
    let mut stats = GridStats {
        min: f64::INFINITY,
        max: f64::NEG_INFINITY,
        mean: 0.0,
    };
    for &v in rows.iter().flatten() {
        stats.min = stats.min.min(v);
        stats.max = stats.max.max(v);
        stats.mean += v / count;
    }

    Ok(Grid { rows, stats })
}

/// Run the grid command
///
/// # Arguments
/// * `graph_path` - Path to the graph file
/// * `min` / `max` - Comma-separated grid corners
/// * `steps` - Samples per grid axis
/// * `seed` - Optional seed override
/// * `json_output` - Whether to output machine-readable JSON
pub fn run(
    graph_path: &str,
    min: &str,
    max: &str,
    steps: usize,
    seed: Option<u64>,
    json_output: bool,
) -> Result<ExitCode> {
    if json_output {
        return run_json(graph_path, min, max, steps, seed);
    }

    let (min, max) = (parse_coords(min)?, parse_coords(max)?);
    let pipeline = load_pipeline(graph_path, seed)?;
    let grid = sample_grid(&pipeline, &min, &max, steps)?;

    println!(
        "{} {} ({}, seed {}, {} step(s))",
        "Grid:".cyan().bold(),
        pipeline.name(),
        pipeline.dimension(),
        pipeline.seed(),
        steps
    );
    for row in &grid.rows {
        let cells: Vec<String> = row.iter().map(|v| format!("{:>8.4}", v)).collect();
        println!("{}", cells.join(" "));
    }
    println!(
        "\n{} min {:.6}  max {:.6}  mean {:.6}",
        "Stats:".dimmed(),
        grid.stats.min,
        grid.stats.max,
        grid.stats.mean
    );
    Ok(ExitCode::SUCCESS)
}

fn run_json(
    graph_path: &str,
    min: &str,
    max: &str,
    steps: usize,
    seed: Option<u64>,
) -> Result<ExitCode> {
    let fail = |errors: Vec<JsonError>| -> Result<ExitCode> {
        CommandOutput::<GridResult>::failure(errors, vec![]).print()?;
        Ok(ExitCode::from(1))
    };
    let invalid = |e: anyhow::Error| JsonError::new(error_codes::INVALID_ARGUMENT, format!("{:#}", e));

    let (min, max) = match (parse_coords(min), parse_coords(max)) {
        (Ok(min), Ok(max)) => (min, max),
        (Err(e), _) | (_, Err(e)) => return fail(vec![invalid(e)]),
    };
    let pipeline = match load_pipeline_json(graph_path, seed) {
        Ok(pipeline) => pipeline,
        Err(errors) => return fail(errors),
    };
    let grid = match sample_grid(&pipeline, &min, &max, steps) {
        Ok(grid) => grid,
        Err(e) => return fail(vec![invalid(e)]),
    };

    let result = GridResult {
        name: pipeline.name().to_string(),
        seed: pipeline.seed(),
        dimension: pipeline.dimension().len(),
        min,
        max,
        steps,
        grid,
    };
    CommandOutput::success(result, vec![]).print()?;
    Ok(ExitCode::SUCCESS)
}
