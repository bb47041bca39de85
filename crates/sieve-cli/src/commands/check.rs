//! Check command: analyze URLs from the command line.

use anyhow::{bail, Context, Result};
use clap::Args;
use colored::Colorize;
use sieve_core::{AnalysisRequest, AnalysisResult, Analyzer, Config};
use tracing::debug;

use crate::output;

#[derive(Args)]
pub struct CheckArgs {
    /// URLs to analyze
    #[arg(required = true)]
    pub urls: Vec<String>,

    /// Base URL of the running server (defaults to http://SIEVE_HOST:PORT)
    #[arg(long, conflicts_with = "local")]
    pub server: Option<String>,

    /// Run the analysis in-process instead of calling a server
    #[arg(long)]
    pub local: bool,

    /// Print the raw JSON response
    #[arg(long)]
    pub json: bool,
}

pub async fn execute(args: CheckArgs, config: &Config) -> Result<()> {
    let results = if args.local {
        debug!(urls = args.urls.len(), "Running analysis in-process");
        let analyzer = Analyzer::from_config(config)?;
        analyzer.analyze_all(&args.urls).await
    } else {
        let server = args.server.clone().unwrap_or_else(|| config.server_url());
        request_analysis(&server, args.urls).await?
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        println!("{}", "Analysis Results:".green().bold());
        println!();
        output::print_results(&results);
    }

    Ok(())
}

/// POST the URLs to a running server and return its per-URL results.
async fn request_analysis(server: &str, urls: Vec<String>) -> Result<Vec<AnalysisResult>> {
    let endpoint = format!("{}/analyze_urls", server.trim_end_matches('/'));
    debug!(%endpoint, urls = urls.len(), "Running analysis via server");

    let response = reqwest::Client::new()
        .post(&endpoint)
        .json(&AnalysisRequest { urls })
        .send()
        .await
        .with_context(|| format!("Failed to reach {}. Is `sieve serve` running?", endpoint))?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        bail!("Server error ({}): {}", status, body);
    }

    response
        .json()
        .await
        .context("Failed to parse analysis results")
}
