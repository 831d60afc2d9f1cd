//! Fixtures shared by the unit tests of several modules.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Method, Request, StatusCode, header};
use tower::ServiceExt;

use crate::app_state::AppState;
use crate::domain::{CollectionName, Comment, Document, Filter, Post, User};
use crate::error::MirrorError;
use crate::persistence::{DocumentStore, MemoryStore, StoreGateway};
use crate::service::MirrorService;
use crate::upstream::{UpstreamSnapshot, UpstreamSource};

pub(crate) fn user(id: i64, name: &str, email: &str) -> User {
    User {
        id,
        name: name.to_string(),
        email: email.to_string(),
        extra: serde_json::Map::new(),
    }
}

pub(crate) fn post(id: i64, user_id: i64) -> Post {
    Post {
        id,
        user_id,
        comments: Vec::new(),
        extra: text_fields(&[("title", &format!("post {id}")), ("body", "")]),
    }
}

pub(crate) fn comment(id: i64, post_id: i64) -> Comment {
    Comment {
        id,
        post_id,
        extra: text_fields(&[
            ("name", &format!("comment {id}")),
            ("email", "c@example.com"),
            ("body", ""),
        ]),
    }
}

fn text_fields(pairs: &[(&str, &str)]) -> serde_json::Map<String, serde_json::Value> {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), serde_json::Value::from(*v)))
        .collect()
}

/// Twelve users; users 1 and 2 own posts, user 11 (beyond the sync limit)
/// owns one too, and comment 104 points at a post that does not exist.
pub(crate) fn sample_snapshot() -> UpstreamSnapshot {
    UpstreamSnapshot {
        users: (1..=12)
            .map(|id| user(id, &format!("User {id}"), &format!("user{id}@example.com")))
            .collect(),
        posts: vec![post(10, 1), post(11, 2), post(12, 1), post(13, 11)],
        comments: vec![
            comment(100, 10),
            comment(101, 11),
            comment(102, 10),
            comment(103, 12),
            comment(104, 99),
        ],
    }
}

/// Upstream that returns a fixed snapshot, or always fails, optionally
/// after a delay.
#[derive(Debug)]
pub(crate) struct FixtureUpstream {
    snapshot: Option<UpstreamSnapshot>,
    delay: Option<Duration>,
}

impl FixtureUpstream {
    pub(crate) fn ok(snapshot: UpstreamSnapshot) -> Self {
        Self {
            snapshot: Some(snapshot),
            delay: None,
        }
    }

    pub(crate) fn failing() -> Self {
        Self {
            snapshot: None,
            delay: None,
        }
    }

    pub(crate) fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

#[async_trait]
impl UpstreamSource for FixtureUpstream {
    async fn fetch_all(&self) -> Result<UpstreamSnapshot, MirrorError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.snapshot
            .clone()
            .ok_or_else(|| MirrorError::Upstream("fixture upstream is down".to_string()))
    }
}

/// Memory store whose inserts into one collection always fail.
#[derive(Debug)]
pub(crate) struct FailingStore {
    inner: MemoryStore,
    fail_on: CollectionName,
}

impl FailingStore {
    pub(crate) fn new(fail_on: CollectionName) -> Self {
        Self {
            inner: MemoryStore::new(),
            fail_on,
        }
    }

    pub(crate) fn inner(&self) -> &MemoryStore {
        &self.inner
    }
}

#[async_trait]
impl DocumentStore for FailingStore {
    async fn insert_many(
        &self,
        collection: CollectionName,
        docs: Vec<Document>,
    ) -> Result<u64, MirrorError> {
        if collection == self.fail_on {
            return Err(MirrorError::Persistence(format!("{collection} insert refused")));
        }
        self.inner.insert_many(collection, docs).await
    }

    async fn find(
        &self,
        collection: CollectionName,
        filter: &Filter,
    ) -> Result<Vec<Document>, MirrorError> {
        self.inner.find(collection, filter).await
    }

    async fn find_one(
        &self,
        collection: CollectionName,
        filter: &Filter,
    ) -> Result<Option<Document>, MirrorError> {
        self.inner.find_one(collection, filter).await
    }

    async fn delete_one(
        &self,
        collection: CollectionName,
        filter: &Filter,
    ) -> Result<u64, MirrorError> {
        self.inner.delete_one(collection, filter).await
    }

    async fn delete_many(
        &self,
        collection: CollectionName,
        filter: &Filter,
    ) -> Result<u64, MirrorError> {
        self.inner.delete_many(collection, filter).await
    }

    async fn close(&self) {
        self.inner.close().await;
    }
}

/// Service over a fresh memory store, returning the store for inspection.
pub(crate) fn memory_service(upstream: FixtureUpstream) -> (MirrorService, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let gateway = StoreGateway::connected(Arc::clone(&store) as Arc<dyn DocumentStore>);
    let service = MirrorService::new(Arc::new(gateway), Arc::new(upstream), 10);
    (service, store)
}

/// Served application (routes and middleware) over a fresh memory store.
pub(crate) fn test_app(upstream: FixtureUpstream) -> (Router, Arc<MemoryStore>) {
    let (service, store) = memory_service(upstream);
    let app = crate::api::build_app(
        AppState {
            mirror_service: Arc::new(service),
        },
        Duration::from_secs(30),
    );
    (app, store)
}

/// Sends a request with an optional JSON body; a non-JSON response body
/// is returned as `Value::Null`.
pub(crate) async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<serde_json::Value>,
) -> (StatusCode, HeaderMap, serde_json::Value) {
    let raw = body.map(|b| b.to_string()).unwrap_or_default();
    send_raw(app, method, uri, &raw).await
}

/// Sends `raw` verbatim as an `application/json` body.
#[allow(clippy::panic)]
pub(crate) async fn send_raw(
    app: &Router,
    method: Method,
    uri: &str,
    raw: &str,
) -> (StatusCode, HeaderMap, serde_json::Value) {
    let Ok(request) = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(raw.to_string()))
    else {
        panic!("request should build");
    };
    let Ok(response) = app.clone().oneshot(request).await else {
        panic!("router is infallible");
    };

    let status = response.status();
    let headers = response.headers().clone();
    let Ok(bytes) = axum::body::to_bytes(response.into_body(), usize::MAX).await else {
        panic!("body read failed");
    };
    let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, headers, json)
}
