//! CLI command definitions and handlers.

use anyhow::Result;
use clap::{Parser, Subcommand};
use sieve_core::Config;

pub mod check;
pub mod serve;

/// Sieve - flag inappropriate web content with an LLM
#[derive(Parser)]
#[command(name = "sieve")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the analysis server
    Serve(serve::ServeArgs),

    /// Analyze URLs through a running server (or in-process with --local)
    Check(check::CheckArgs),
}

impl Cli {
    pub async fn execute(self, config: Config) -> Result<()> {
        match self.command {
            Commands::Serve(args) => serve::execute(args, config).await,
            Commands::Check(args) => check::execute(args, &config).await,
        }
    }
}
