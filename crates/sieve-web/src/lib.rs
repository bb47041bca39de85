//! Sieve Web Server
//!
//! Axum-based HTTP API for URL content analysis.

pub mod routes;
pub mod state;

use axum::{routing::post, Router};
use sieve_core::{Analyzer, Config};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/analyze_urls", post(routes::analyze::analyze_urls))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Run the web server.
pub async fn run_server(config: &Config) -> anyhow::Result<()> {
    let analyzer = Analyzer::from_config(config)?;
    let app = create_router(AppState::new(analyzer));

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(
        max_concurrency = config.max_concurrency,
        "Server is running on http://{}",
        addr
    );

    axum::serve(listener, app).await?;
    Ok(())
}
