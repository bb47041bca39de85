//! Per-URL fetch-and-classify pipeline.

pub mod model;

use std::sync::Arc;

use futures::stream::{self, StreamExt};
use tracing::{debug, warn};

use crate::classifier::{ContentClassifier, OpenAiClassifier};
use crate::config::Config;
use crate::error::SieveResult;
use crate::fetcher::{HttpFetcher, PageFetcher};

use model::AnalysisResult;

/// Runs fetch-then-classify pipelines with a bounded fan-out.
#[derive(Clone)]
pub struct Analyzer {
    fetcher: Arc<dyn PageFetcher>,
    classifier: Arc<dyn ContentClassifier>,
    max_concurrency: usize,
}

impl Analyzer {
    /// Create an analyzer. A concurrency of zero is treated as one.
    pub fn new(
        fetcher: Arc<dyn PageFetcher>,
        classifier: Arc<dyn ContentClassifier>,
        max_concurrency: usize,
    ) -> Self {
        Self {
            fetcher,
            classifier,
            max_concurrency: max_concurrency.max(1),
        }
    }

    /// Wire the HTTP fetcher and the OpenAI classifier from configuration.
    pub fn from_config(config: &Config) -> SieveResult<Self> {
        if config.classifier.api_key.is_empty() {
            warn!("OPENAI_API_KEY is not set; every classification will fail closed");
        }

        let fetcher = HttpFetcher::new(&config.fetch)?;
        let classifier = OpenAiClassifier::new(&config.classifier)?;

        Ok(Self::new(
            Arc::new(fetcher),
            Arc::new(classifier),
            config.max_concurrency,
        ))
    }

    pub fn max_concurrency(&self) -> usize {
        self.max_concurrency
    }

    /// Fetch and classify one URL. Fetch failures are captured in the result.
    pub async fn analyze_url(&self, url: &str) -> AnalysisResult {
        debug!(url, "Fetching content");
        let content = match self.fetcher.fetch(url).await {
            Ok(content) => content,
            Err(e) => {
                warn!(url, error = %e, "Failed to fetch URL");
                return AnalysisResult::failed(url, e.to_string());
            }
        };

        debug!(url, "Analyzing content");
        let verdict = self.classifier.classify(&content).await;
        debug!(url, is_appropriate = verdict.is_appropriate, "Analysis complete");

        AnalysisResult::classified(url, verdict)
    }

    /// Analyze every URL, at most `max_concurrency` at a time.
    ///
    /// Results come back in input order regardless of completion order.
    pub async fn analyze_all(&self, urls: &[String]) -> Vec<AnalysisResult> {
        stream::iter(urls.iter().cloned())
            .map(|url| async move { self.analyze_url(&url).await })
            .buffered(self.max_concurrency)
            .collect()
            .await
    }
}
