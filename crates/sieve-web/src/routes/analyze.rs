//! URL analysis route handler.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use sieve_core::{AnalysisRequest, AnalysisResult};
use tracing::{debug, info_span, warn, Instrument};
use uuid::Uuid;

use crate::state::AppState;

/// Structured body for rejected requests.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

/// `POST /analyze_urls`
///
/// Always answers 200 with one entry per URL once the body is valid;
/// per-URL failures are reported inside the entries.
pub async fn analyze_urls(
    State(state): State<AppState>,
    payload: Result<Json<AnalysisRequest>, JsonRejection>,
) -> Result<Json<Vec<AnalysisResult>>, (StatusCode, Json<ErrorBody>)> {
    let Json(request) = payload.map_err(|rejection| {
        warn!(error = %rejection.body_text(), "Rejected malformed analysis request");
        (
            rejection.status(),
            Json(ErrorBody {
                error: rejection.body_text(),
            }),
        )
    })?;

    let span = info_span!("analyze_urls", request_id = %Uuid::new_v4(), urls = request.urls.len());
    async move {
        debug!("Received request to analyze URLs");
        let results = state.analyzer.analyze_all(&request.urls).await;
        debug!("Sending response with analysis results");
        Ok(Json(results))
    }
    .instrument(span)
    .await
}
