//! Sieve CLI - URL content appropriateness checker
//!
//! Runs the analysis server, or sends URLs to it from the command line.

use anyhow::{Context, Result};
use clap::Parser;
use sieve_core::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod output;

use commands::{Cli, Commands};

/// Default filter when `RUST_LOG` is unset.
fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "sieve=debug,sieve_core=debug,sieve_web=debug,tower_http=debug"
    } else {
        "sieve=info,sieve_core=info,sieve_web=info"
    }
}

/// Initialize tracing with optional file logging.
///
/// When `stderr_only` is true, all tracing output goes to stderr with ANSI
/// disabled so machine-readable output on stdout stays clean.
fn init_tracing(log_file: Option<&std::path::Path>, stderr_only: bool, verbose: bool) -> Result<()> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter(verbose).into());

    if let Some(path) = log_file {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create log directory {}", parent.display()))?;
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("Failed to open log file {}", path.display()))?;

        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::sync::Mutex::new(file))
                    .with_ansi(false),
            )
            .init();
    } else if stderr_only {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_ansi(false),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env().context("Failed to load configuration")?;

    let log_file = match &cli.command {
        Commands::Serve(args) => args.log_file.clone(),
        _ => None,
    };
    let stderr_only = matches!(&cli.command, Commands::Check(args) if args.json);
    let verbose = cli.verbose || config.mode.is_development();

    init_tracing(log_file.as_deref(), stderr_only, verbose)?;

    cli.execute(config).await
}
