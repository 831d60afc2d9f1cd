//! Upstream layer: where sync data comes from.
//!
//! [`UpstreamSource`] abstracts the placeholder API so the sync can run
//! against the real service ([`HttpUpstream`]) or a fixture.

pub mod http;

use async_trait::async_trait;

use crate::domain::{Comment, Post, User};
use crate::error::MirrorError;

pub use http::HttpUpstream;

/// One consistent read of the three upstream collections, in upstream order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpstreamSnapshot {
    /// All upstream users.
    pub users: Vec<User>,
    /// All upstream posts (without embedded comments).
    pub posts: Vec<Post>,
    /// All upstream comments.
    pub comments: Vec<Comment>,
}

/// Supplier of the data mirrored by a sync.
#[async_trait]
pub trait UpstreamSource: Send + Sync + std::fmt::Debug {
    /// Fetches users, posts and comments. Any single failure fails the call.
    ///
    /// # Errors
    ///
    /// Returns [`MirrorError::Upstream`] on transport failure, non-success
    /// status, or an unparseable body.
    async fn fetch_all(&self) -> Result<UpstreamSnapshot, MirrorError>;
}
