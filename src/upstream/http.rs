//! HTTP client for the placeholder REST API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;

use super::{UpstreamSnapshot, UpstreamSource};
use crate::domain::{Comment, Post, User};
use crate::error::MirrorError;

/// Fetches `/users`, `/posts` and `/comments` from a base URL.
#[derive(Debug, Clone)]
pub struct HttpUpstream {
    client: Client,
    base_url: String,
}

impl HttpUpstream {
    /// Creates a client for `base_url` with a per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`MirrorError::Internal`] if the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, MirrorError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("placeholder-mirror/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| MirrorError::Internal(format!("http client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Returns the normalized base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GETs `{base_url}/{resource}` and parses the body as a JSON array.
    async fn fetch_list<T: DeserializeOwned>(&self, resource: &str) -> Result<Vec<T>, MirrorError> {
        let url = format!("{}/{resource}", self.base_url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| MirrorError::Upstream(format!("GET {url}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(MirrorError::Upstream(format!("GET {url}: status {status}")));
        }

        let items: Vec<T> = response
            .json()
            .await
            .map_err(|e| MirrorError::Upstream(format!("GET {url}: invalid body: {e}")))?;

        tracing::debug!(%url, count = items.len(), "fetched upstream collection");
        Ok(items)
    }
}

#[async_trait]
impl UpstreamSource for HttpUpstream {
    async fn fetch_all(&self) -> Result<UpstreamSnapshot, MirrorError> {
        let (users, posts, comments) = tokio::try_join!(
            self.fetch_list::<User>("users"),
            self.fetch_list::<Post>("posts"),
            self.fetch_list::<Comment>("comments"),
        )?;

        Ok(UpstreamSnapshot {
            users,
            posts,
            comments,
        })
    }
}
