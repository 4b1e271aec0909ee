//! Validate command implementation
//!
//! Runs structural validation on a graph file, then compiles it to catch
//! cycles, dimension conflicts and parameter domain errors.

use anyhow::{Context, Result};
use colored::Colorize;
use noisegraph_engine::{compile_graph, NoiseError};
use noisegraph_spec::{validate_graph, ValidationResult};
use std::path::Path;
use std::process::ExitCode;
use std::time::Instant;

use super::graph_summary;
use super::json_output::{
    error_codes, input_error_to_json, noise_error_to_json, validation_error_to_json,
    validation_warning_to_json, CommandOutput, GraphSummary,
};
use crate::input::{load_graph, LoadResult};

/// Run the validate command
///
/// # Arguments
/// * `graph_path` - Path to the graph file
/// * `json_output` - Whether to output machine-readable JSON diagnostics
///
/// # Returns
/// Exit code: 0 if valid, 1 if invalid
pub fn run(graph_path: &str, json_output: bool) -> Result<ExitCode> {
    if json_output {
        run_json(graph_path)
    } else {
        run_human(graph_path)
    }
}

/// Run validate with human-readable (colored) output
fn run_human(graph_path: &str) -> Result<ExitCode> {
    let start = Instant::now();

    println!("{} {}", "Validating:".cyan().bold(), graph_path);

    let LoadResult { graph, source_hash } = load_graph(Path::new(graph_path))
        .with_context(|| format!("Failed to load graph file: {}", graph_path))?;

    println!(
        "{} {} v{} ({})",
        "Graph:".dimmed(),
        graph.name,
        graph.version,
        &source_hash[..16]
    );

    let validation = validate_graph(&graph);
    let compile_error = if validation.is_ok() {
        compile_graph(&graph).err()
    } else {
        None
    };

    let duration_ms = start.elapsed().as_millis() as u64;

    print_validation_results(&validation, compile_error.as_ref());

    if validation.is_ok() && compile_error.is_none() {
        println!(
            "\n{} Graph is valid: {} node(s), {}D ({}ms)",
            "SUCCESS".green().bold(),
            graph.nodes.len(),
            graph.dimension,
            duration_ms
        );
        Ok(ExitCode::SUCCESS)
    } else {
        let count = validation.errors.len() + usize::from(compile_error.is_some());
        println!(
            "\n{} Graph has {} error(s) ({}ms)",
            "FAILED".red().bold(),
            count,
            duration_ms
        );
        Ok(ExitCode::from(1))
    }
}

/// Run validate with machine-readable JSON output
fn run_json(graph_path: &str) -> Result<ExitCode> {
    let LoadResult { graph, source_hash } = match load_graph(Path::new(graph_path)) {
        Ok(loaded) => loaded,
        Err(e) => {
            CommandOutput::<GraphSummary>::failure(
                vec![input_error_to_json(&e, graph_path)],
                vec![],
            )
            .print()?;
            return Ok(ExitCode::from(1));
        }
    };

    let validation = validate_graph(&graph);
    let warnings = validation
        .warnings
        .iter()
        .map(validation_warning_to_json)
        .collect();

    let mut errors: Vec<_> = validation
        .errors
        .iter()
        .map(validation_error_to_json)
        .collect();
    if validation.is_ok() {
        if let Err(e) = compile_graph(&graph) {
            errors.push(noise_error_to_json(error_codes::COMPILE, &e));
        }
    }

    if errors.is_empty() {
        CommandOutput::success(graph_summary(&graph, &source_hash), warnings).print()?;
        Ok(ExitCode::SUCCESS)
    } else {
        CommandOutput::<GraphSummary>::failure(errors, warnings).print()?;
        Ok(ExitCode::from(1))
    }
}

fn print_validation_results(result: &ValidationResult, compile_error: Option<&NoiseError>) {
    if !result.errors.is_empty() || compile_error.is_some() {
        println!("\n{}", "Errors:".red().bold());
        for error in &result.errors {
            let path_info = error
                .path
                .as_ref()
                .map(|p| format!(" at {}", p))
                .unwrap_or_default();
            println!(
                "  {} [{}]{}: {}",
                "x".red(),
                error.code.to_string().red(),
                path_info.dimmed(),
                error.message
            );
        }
        if let Some(error) = compile_error {
            println!(
                "  {} [{}]: {}",
                "x".red(),
                error_codes::COMPILE.red(),
                error
            );
        }
    }

    if !result.warnings.is_empty() {
        println!("\n{}", "Warnings:".yellow().bold());
        for warning in &result.warnings {
            let path_info = warning
                .path
                .as_ref()
                .map(|p| format!(" at {}", p))
                .unwrap_or_default();
            println!(
                "  {} [{}]{}: {}",
                "!".yellow(),
                warning.code.to_string().yellow(),
                path_info.dimmed(),
                warning.message
            );
        }
    }
}
