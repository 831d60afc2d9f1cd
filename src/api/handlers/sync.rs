//! Sync endpoint: replace the store contents from upstream.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::app_state::AppState;
use crate::error::{ErrorResponse, MirrorError};

/// `GET /load` — Reload users, posts and comments from upstream.
///
/// # Errors
///
/// Returns [`MirrorError::Upstream`] if the fetch fails (store untouched),
/// or a store error if a write fails after the collections were cleared.
#[utoipa::path(
    get,
    path = "/load",
    tag = "Sync",
    summary = "Sync from upstream",
    description = "Clears all collections, stores the first upstream users, every post with its comments embedded, and every comment.",
    responses(
        (status = 200, description = "Sync completed; empty object", body = serde_json::Value),
        (status = 500, description = "Upstream or store failure", body = ErrorResponse),
    )
)]
pub async fn load(State(state): State<AppState>) -> Result<impl IntoResponse, MirrorError> {
    state.mirror_service.sync().await?;
    Ok(Json(serde_json::json!({})))
}

/// Sync routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/load", get(load))
}
