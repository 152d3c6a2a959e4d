use anyhow::{anyhow, Result};
use clap::Parser;

mod auth;
mod chat;
mod cli;
mod commands;
mod config;
mod document;
mod export;
mod lm;
mod lm_log;
mod normalize;
mod prompts;
mod render;
mod store;
mod util;
mod workflow;

fn main() -> Result<()> {
    let args = cli::RootArgs::parse();
    init_tracing(args.global.verbose)?;
    commands::dispatch(args)
}

/// Diagnostics go to stderr so stdout stays clean for `--json` output.
fn init_tracing(verbose: bool) -> Result<()> {
    let level = if verbose { "info" } else { "warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|error| anyhow!("failed to initialize tracing subscriber: {error}"))
}
