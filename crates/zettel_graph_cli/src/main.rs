//! `zettel-graph` command-line entry point.
//!
//! # Responsibility
//! - Parse arguments, start optional file logging, dispatch one command.
//! - Turn core errors into a stderr message and exit status 1.

mod commands;
mod config;
mod render;

use clap::Parser;
use commands::{Context, Outcome};
use config::Cli;
use std::io;
use std::process::ExitCode;
use zettel_graph_core::{default_log_level, init_logging};

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Some(log_dir) = cli.log_dir.as_deref() {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        if let Err(err) = init_logging(level, log_dir) {
            eprintln!("Warning: logging disabled: {err}");
        }
    }

    let ctx = Context::new(cli.graph);
    let mut stdout = io::stdout().lock();
    match commands::run(cli.command, &ctx, &mut stdout) {
        Ok(Outcome::Success) => ExitCode::SUCCESS,
        Ok(Outcome::Failure) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
