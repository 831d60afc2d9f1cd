//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::service::MirrorService;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Mirror service for all business logic.
    pub mirror_service: Arc<MirrorService>,
}
