//! Service layer: business logic orchestration.
//!
//! [`MirrorService`] runs the upstream sync and the user queries and
//! mutations against the [`crate::persistence::StoreGateway`].

pub mod mirror_service;

pub use mirror_service::{CascadeSummary, MirrorService, SyncSummary, embed_comments};
