//! Web server command.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use sieve_core::Config;
use std::path::PathBuf;

#[derive(Args)]
pub struct ServeArgs {
    /// Port to listen on (overrides PORT)
    #[arg(long)]
    pub port: Option<u16>,

    /// Host to bind to (overrides SIEVE_HOST)
    #[arg(long)]
    pub host: Option<String>,

    /// Also write logs to this file
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

pub async fn execute(args: ServeArgs, mut config: Config) -> Result<()> {
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(host) = args.host {
        config.host = host;
    }

    let mode = if config.mode.is_development() {
        "development".yellow()
    } else {
        "production".green()
    };

    println!();
    println!("  {} {}", "Sieve".cyan().bold(), "Analysis Server".bold());
    println!();
    println!(
        "  {}  POST {}/analyze_urls",
        "Endpoint".green(),
        config.server_url()
    );
    println!("  {}      {}", "Model".green(), config.classifier.model);
    println!("  {}       {}", "Mode".green(), mode);
    println!();
    println!("  {}", "Ctrl+C to stop".dimmed());
    println!();

    sieve_web::run_server(&config).await?;

    Ok(())
}
