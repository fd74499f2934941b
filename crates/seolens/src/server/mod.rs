//! HTTP API over the aggregation pipelines.

mod cli;
mod handlers;
mod response;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};

pub use cli::ServeOptions;

use crate::prelude::{eprintln, *};
use crate::providers::Providers;

/// Shared, immutable state handed to every handler.
#[derive(Debug)]
pub struct AppState {
    pub providers: Providers,
}

pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handlers::health))
        .route("/seo/serp-competitors", post(handlers::serp_competitors))
        .route("/seo/backlinks", post(handlers::backlinks))
        .route("/seo/domain-metrics", post(handlers::domain_metrics))
        .route(
            "/seo/domain-metrics-advanced",
            post(handlers::domain_metrics_advanced),
        )
        .route(
            "/seo/opportunity-finder",
            post(handlers::opportunity_finder),
        )
        .route("/seo/keyword-volume", post(handlers::keyword_volume))
        .layer(cors)
        .with_state(state)
}

pub async fn run_server(options: ServeOptions, global: crate::Global) -> Result<()> {
    let providers = Providers::from_env()?;
    let addr = format!("{}:{}", options.host, options.port);

    if global.verbose {
        eprintln!("Starting seolens API on {addr}...");
    }

    let app = router(Arc::new(AppState { providers }));

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| eyre!("Failed to bind to {}: {}", addr, e))?;

    log::info!("seolens API listening on http://{addr}");

    axum::serve(listener, app)
        .await
        .map_err(|e| eyre!("Server error: {e}"))?;

    Ok(())
}
