//! JSON HTTP API.
//!
//! Every request runs in its own task under a timeout; when the timeout
//! fires the handler future is dropped, which rolls back any transaction it
//! had open. Requests carry an `x-request-id`, generated when absent and
//! echoed on the response.

pub mod dto;
mod error;
mod handlers;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::http::StatusCode;
use axum::middleware;
use axum::routing::{get, post};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::connector::api::Container;

pub use error::ApiError;

pub struct ServerConfig {
    pub addr: SocketAddr,
    pub request_timeout: Duration,
}

/// Builds the application router over `container`.
///
/// Layers, outermost first: request id, tracing, id propagation, CORS,
/// panic recovery, timeout.
pub fn router(container: Arc<Container>, request_timeout: Duration) -> axum::Router {
    axum::Router::new()
        .route("/health", get(handlers::health))
        .route("/team/add", post(handlers::add_team))
        .route("/team/get", get(handlers::get_team))
        .route("/users/setIsActive", post(handlers::set_is_active))
        .route("/users/getReview", get(handlers::get_reviews))
        .route("/pullRequest/create", post(handlers::create_pull_request))
        .route("/pullRequest/merge", post(handlers::merge_pull_request))
        .route("/pullRequest/reassign", post(handlers::reassign_reviewer))
        .route("/stats/reviewers", get(handlers::reviewer_stats))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        ))
        .layer(middleware::map_response(error::timeout_envelope))
        .layer(CatchPanicLayer::custom(error::panic_response))
        .layer(CorsLayer::permissive())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .with_state(container)
}

/// Serves the API until Ctrl-C, then drains in-flight requests.
pub async fn serve(container: Arc<Container>, config: ServerConfig) -> Result<()> {
    let app = router(container, config.request_timeout);

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("Failed to bind to {}", config.addr))?;

    info!("HTTP server listening on http://{}", config.addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    info!("HTTP server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
