//! REST endpoint handlers organized by resource.

pub mod sync;
pub mod system;
pub mod users;

use axum::Router;

use crate::app_state::AppState;

/// Composes the sync and user routes.
pub fn routes() -> Router<AppState> {
    Router::new().merge(sync::routes()).merge(users::routes())
}
