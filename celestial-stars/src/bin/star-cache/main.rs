//! star-cache: build and inspect binary star caches
//!
//! Runs the same cache-first ingestion the renderer uses, so a cache can be
//! prepared ahead of time and checked without starting the host application.

mod build;
mod cli;
mod info;
mod stats;

use clap::Parser;
use cli::{Cli, Commands};
use tracing::Level;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt().with_max_level(level).init();

    match &cli.command {
        Commands::Build(args) => build::run(args),
        Commands::Info(args) => info::run(args),
        Commands::Stats(args) => stats::run(args),
    }
}
