use axum::Router;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::routes::{link_routes, system_routes};
use crate::state::app::AppState;

/// Build the complete Axum application:
/// - /api      (get/set/list link records)
/// - /v        (redirects)
/// - /system   (alive + version)
///
/// The trace layer logs every request together with its latency, which is
/// the access log for the service.
pub fn build_app(state: AppState) -> Router {
    let config = state.config.clone();

    Router::new()
        // /api/*
        .nest("/api", link_routes::api_routes(state.clone()))
        // /v/*
        .nest("/v", link_routes::redirect_routes(state))
        // /system/*
        .nest("/system", system_routes::routes(config))
        // Logging middleware
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
}
