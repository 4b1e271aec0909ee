//! Info command implementation
//!
//! Prints a graph's metadata and node table.

use anyhow::{Context, Result};
use colored::Colorize;
use noisegraph_engine::compile_graph;
use noisegraph_spec::{reachable_nodes, GraphSpec};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::process::ExitCode;

use super::graph_summary;
use super::json_output::{input_error_to_json, CommandOutput, GraphSummary};
use crate::input::{load_graph, LoadResult};

/// One row of the node table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NodeInfo {
    /// Node id
    pub id: String,
    /// Node type tag
    #[serde(rename = "type")]
    pub node_type: String,
    /// Ids this node reads
    pub inputs: Vec<String>,
    /// Whether the root depends on this node
    pub reachable: bool,
}

/// JSON result of the info command.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InfoResult {
    #[serde(flatten)]
    pub summary: GraphSummary,
    /// Nodes in document order
    pub nodes: Vec<NodeInfo>,
    /// Distinct nodes built by compilation, if the graph compiles
    #[serde(skip_serializing_if = "Option::is_none")]
    pub built_nodes: Option<usize>,
    /// Compilation error, if the graph does not compile
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compile_error: Option<String>,
}

/// Builds the node table for a graph.
pub fn node_table(graph: &GraphSpec) -> Vec<NodeInfo> {
    let reachable = reachable_nodes(graph);
    graph
        .nodes
        .iter()
        .map(|node| NodeInfo {
            id: node.id.clone(),
            node_type: node.op.type_name().to_string(),
            inputs: node.op.inputs().iter().map(|s| s.to_string()).collect(),
            reachable: reachable.contains(node.id.as_str()),
        })
        .collect()
}

fn describe(graph: &GraphSpec, source_hash: &str) -> InfoResult {
    let (built_nodes, compile_error) = match compile_graph(graph) {
        Ok(pipeline) => (Some(pipeline.node_count()), None),
        Err(e) => (None, Some(e.to_string())),
    };
    InfoResult {
        summary: graph_summary(graph, source_hash),
        nodes: node_table(graph),
        built_nodes,
        compile_error,
    }
}

/// Run the info command
///
/// # Arguments
/// * `graph_path` - Path to the graph file
/// * `json_output` - Whether to output machine-readable JSON
pub fn run(graph_path: &str, json_output: bool) -> Result<ExitCode> {
    if json_output {
        let LoadResult { graph, source_hash } = match load_graph(Path::new(graph_path)) {
            Ok(loaded) => loaded,
            Err(e) => {
                CommandOutput::<InfoResult>::failure(
                    vec![input_error_to_json(&e, graph_path)],
                    vec![],
                )
                .print()?;
                return Ok(ExitCode::from(1));
            }
        };
        CommandOutput::success(describe(&graph, &source_hash), vec![]).print()?;
        return Ok(ExitCode::SUCCESS);
    }

    let LoadResult { graph, source_hash } = load_graph(Path::new(graph_path))
        .with_context(|| format!("Failed to load graph file: {}", graph_path))?;
    let info = describe(&graph, &source_hash);
    let summary = &info.summary;

    println!("{} {} v{}", "Graph:".cyan().bold(), summary.name, summary.version);
    println!("  {} {}D", "dimension:".dimmed(), summary.dimension);
    println!("  {} {}", "seed:".dimmed(), summary.seed);
    println!("  {} {}", "root:".dimmed(), summary.root);
    println!("  {} {}", "fingerprint:".dimmed(), summary.fingerprint);
    println!("  {} {}", "source:".dimmed(), &summary.source_hash[..16]);

    let width = info.nodes.iter().map(|n| n.id.len()).max().unwrap_or(0);
    println!("\n{} ({})", "Nodes:".cyan().bold(), info.nodes.len());
    for node in &info.nodes {
        let marker = if node.reachable {
            "*".green()
        } else {
            "-".dimmed()
        };
        let inputs = if node.inputs.is_empty() {
            String::new()
        } else {
            format!(" <- {}", node.inputs.join(", "))
        };
        println!(
            "  {} {:width$}  {}{}",
            marker,
            node.id,
            node.node_type.yellow(),
            inputs.dimmed(),
            width = width
        );
    }

    match (&info.built_nodes, &info.compile_error) {
        (Some(built), _) => println!("\n{} {} node(s) built", "Compiles:".green().bold(), built),
        (None, Some(error)) => println!("\n{} {}", "Does not compile:".red().bold(), error),
        (None, None) => {}
    }

    Ok(ExitCode::SUCCESS)
}
