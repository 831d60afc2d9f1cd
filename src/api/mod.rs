//! REST API layer: route handlers, DTOs, OpenAPI document, and router
//! composition.
//!
//! Endpoints are mounted at the root (`/load`, `/users`, `/users/{userId}`,
//! `/health`).

pub mod docs;
pub mod dto;
pub mod handlers;

use std::time::Duration;

use axum::error_handling::HandleErrorLayer;
use axum::{BoxError, Router};
use tower::ServiceBuilder;
use tower::timeout::TimeoutLayer;
use tower::timeout::error::Elapsed;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::app_state::AppState;
use crate::error::MirrorError;

/// Builds the complete API router with all REST endpoints.
pub fn build_router() -> Router<AppState> {
    let router = Router::new()
        .merge(handlers::routes())
        .merge(handlers::system::routes());

    #[cfg(feature = "swagger-ui")]
    let router = {
        use utoipa::OpenApi;
        router.merge(
            utoipa_swagger_ui::SwaggerUi::new("/swagger-ui")
                .url("/api-docs/openapi.json", docs::ApiDoc::openapi()),
        )
    };

    router
}

/// Builds the served application: every route plus the middleware stack
/// (request timeout, tracing, permissive CORS), bound to `state`.
///
/// A request running past `request_timeout` is answered with
/// [`MirrorError::RequestTimeout`] in the usual JSON error envelope.
pub fn build_app(state: AppState, request_timeout: Duration) -> Router {
    let timeout_ms = u64::try_from(request_timeout.as_millis()).unwrap_or(u64::MAX);

    build_router()
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(move |err: BoxError| async move {
                    middleware_error(&err, timeout_ms)
                }))
                .layer(TimeoutLayer::new(request_timeout)),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn middleware_error(err: &BoxError, timeout_ms: u64) -> MirrorError {
    if err.is::<Elapsed>() {
        tracing::warn!(timeout_ms, "request timed out");
        MirrorError::RequestTimeout(timeout_ms)
    } else {
        MirrorError::Internal(format!("middleware: {err}"))
    }
}
