//! Analysis domain models.

use serde::{Deserialize, Serialize};

/// Reason reported for every appropriate verdict.
pub const APPROPRIATE_REASON: &str = "appropriate content";

/// Reason reported when the classification call itself fails.
pub const ANALYSIS_ERROR_REASON: &str = "Error in analysis";

/// Body of `POST /analyze_urls`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub urls: Vec<String>,
}

/// Classification of one page's content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub is_appropriate: bool,
    pub reason: String,
}

impl Verdict {
    pub fn appropriate() -> Self {
        Self {
            is_appropriate: true,
            reason: APPROPRIATE_REASON.to_string(),
        }
    }

    pub fn inappropriate(reason: impl Into<String>) -> Self {
        Self {
            is_appropriate: false,
            reason: reason.into(),
        }
    }

    /// Fail-closed verdict used when the classifier could not be reached.
    pub fn analysis_error() -> Self {
        Self::inappropriate(ANALYSIS_ERROR_REASON)
    }
}

/// What happened to one URL's pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Classified(Verdict),
    Failed { error: String },
}

/// Result for a single input URL.
///
/// Serializes to the flat wire shape
/// `{ "url", "isAppropriate", "reason"?, "error"? }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "ResultRecord", from = "ResultRecord")]
pub struct AnalysisResult {
    pub url: String,
    pub outcome: Outcome,
}

impl AnalysisResult {
    pub fn classified(url: impl Into<String>, verdict: Verdict) -> Self {
        Self {
            url: url.into(),
            outcome: Outcome::Classified(verdict),
        }
    }

    pub fn failed(url: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            outcome: Outcome::Failed {
                error: error.into(),
            },
        }
    }

    pub fn is_appropriate(&self) -> bool {
        matches!(&self.outcome, Outcome::Classified(v) if v.is_appropriate)
    }

    pub fn reason(&self) -> Option<&str> {
        match &self.outcome {
            Outcome::Classified(v) => Some(&v.reason),
            Outcome::Failed { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.outcome {
            Outcome::Failed { error } => Some(error),
            Outcome::Classified(_) => None,
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResultRecord {
    url: String,
    is_appropriate: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl From<AnalysisResult> for ResultRecord {
    fn from(result: AnalysisResult) -> Self {
        match result.outcome {
            Outcome::Classified(verdict) => Self {
                url: result.url,
                is_appropriate: verdict.is_appropriate,
                reason: Some(verdict.reason),
                error: None,
            },
            Outcome::Failed { error } => Self {
                url: result.url,
                is_appropriate: false,
                reason: None,
                error: Some(error),
            },
        }
    }
}

impl From<ResultRecord> for AnalysisResult {
    fn from(record: ResultRecord) -> Self {
        match record.error {
            Some(error) => AnalysisResult::failed(record.url, error),
            None => AnalysisResult::classified(
                record.url,
                Verdict {
                    is_appropriate: record.is_appropriate,
                    reason: record.reason.unwrap_or_default(),
                },
            ),
        }
    }
}
