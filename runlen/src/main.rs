mod application;
mod presentation;

use std::process::ExitCode;

use clap::Parser;
use runlen_core::Result;
use tracing_subscriber::EnvFilter;

use presentation::cli::Cli;

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let default_level = if cli.quiet { "warn" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    application::run(cli)
}
