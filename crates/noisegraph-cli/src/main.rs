//! noisegraph CLI - Command-line interface for noise graphs
//!
//! This binary validates, inspects and samples noise graph files.

mod cli_args;

use clap::Parser;
use colored::Colorize;
use std::process::ExitCode;

use cli_args::{Cli, Commands};
use noisegraph_cli::{commands, logger};

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = logger::init(cli.verbose) {
        eprintln!("{}: failed to install logger: {}", "warning".yellow(), e);
    }

    let result = match cli.command {
        Commands::Validate { graph, json } => commands::validate::run(&graph, json),
        Commands::Info { graph, json } => commands::info::run(&graph, json),
        Commands::Sample {
            graph,
            at,
            seed,
            json,
        } => commands::sample::run(&graph, &at, seed, json),
        Commands::Grid {
            graph,
            min,
            max,
            steps,
            seed,
            json,
        } => commands::grid::run(&graph, &min, &max, steps, seed, json),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", "error".red(), e);
            ExitCode::from(1)
        }
    }
}
