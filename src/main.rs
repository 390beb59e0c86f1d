use anyhow::{anyhow, Result};
use clap::Parser;
use std::process::ExitCode;

mod cli;
mod commands;
mod edit;
mod error;
mod parse;
mod prompt;
mod records;

use cli::RootArgs;

/// Environment variable holding a `tracing` filter directive, e.g. `debug`.
const LOG_ENV: &str = "MISCORE_LOG";

fn main() -> Result<ExitCode> {
    let args = RootArgs::parse();
    init_tracing(args.command.verbose())?;
    commands::run(args.command)
}

/// Log to stderr so stdout only carries command reports.
fn init_tracing(verbose: bool) -> Result<()> {
    let level = if verbose { "debug" } else { "warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| anyhow!("failed to initialize tracing subscriber: {err}"))
}
