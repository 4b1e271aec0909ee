//! CLI argument definitions for the noisegraph command-line interface.
//!
//! All `#[derive(Parser)]` and `#[derive(Subcommand)]` types are defined here,
//! keeping `main.rs` focused on dispatch logic.

use clap::{ArgAction, Parser, Subcommand};

/// noisegraph - Deterministic procedural noise graphs
#[derive(Parser)]
#[command(name = "noisegraph")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub(crate) struct Cli {
    /// Enable debug logging to stderr (repeat for trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Validate a graph file and check that it compiles
    Validate {
        /// Path to the graph file (JSON)
        #[arg(short, long)]
        graph: String,

        /// Output machine-readable JSON diagnostics (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Print a summary of a graph file and its nodes
    Info {
        /// Path to the graph file (JSON)
        #[arg(short, long)]
        graph: String,

        /// Output machine-readable JSON (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Evaluate a graph at one or more points
    Sample {
        /// Path to the graph file (JSON)
        #[arg(short, long)]
        graph: String,

        /// Comma-separated coordinates, one value per axis (repeatable)
        #[arg(long = "at", required = true, allow_hyphen_values = true)]
        at: Vec<String>,

        /// Override the graph seed
        #[arg(long)]
        seed: Option<u64>,

        /// Output machine-readable JSON (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Evaluate a graph over a regular grid spanning the first two axes
    Grid {
        /// Path to the graph file (JSON)
        #[arg(short, long)]
        graph: String,

        /// Comma-separated lower corner, one value per axis
        #[arg(long, allow_hyphen_values = true)]
        min: String,

        /// Comma-separated upper corner, one value per axis
        #[arg(long, allow_hyphen_values = true)]
        max: String,

        /// Samples per grid axis
        #[arg(long, default_value_t = 16)]
        steps: usize,

        /// Override the graph seed
        #[arg(long)]
        seed: Option<u64>,

        /// Output machine-readable JSON (no colored output)
        #[arg(long)]
        json: bool,
    },
}
