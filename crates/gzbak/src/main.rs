//! gzbak CLI - timestamped project backups
//!
//! This is the main entry point for the gzbak command-line interface.

mod cli;
mod commands;
mod output;
mod version;

use anyhow::{Context, Result};
use clap::Parser;
use gzbak_core::GzbakConfig;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose, cli.quiet);

    // Version output must not depend on a readable config file
    let config = || {
        GzbakConfig::load(cli.config.as_deref()).context("Failed to load configuration")
    };

    match cli.command {
        Commands::Version(args) => commands::version::run(args),
        Commands::Backup(args) => commands::backup::run(args, &config()?),
        Commands::Restore(args) => commands::restore::run(args, &config()?),
        Commands::List(args) => commands::list::run(args, &config()?),
        Commands::Compress(args) => commands::archive::compress(args, &config()?),
        Commands::Uncompress(args) => commands::archive::uncompress(args),
    }
}

/// Initialize tracing with appropriate verbosity
fn init_tracing(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("info"),
            1 => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}
