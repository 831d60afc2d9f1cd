//! End-to-end tests: a fixture upstream served over real sockets, the full
//! router on an in-memory store, and a `reqwest` client driving it.

#![allow(clippy::panic, clippy::indexing_slicing, missing_docs)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::routing::get;
use axum::{Json, Router};
use reqwest::StatusCode;
use serde_json::{Value, json};

use placeholder_mirror::api;
use placeholder_mirror::app_state::AppState;
use placeholder_mirror::config::StoreSettings;
use placeholder_mirror::persistence::StoreGateway;
use placeholder_mirror::service::MirrorService;
use placeholder_mirror::upstream::HttpUpstream;

fn fixture_users() -> Value {
    let users: Vec<Value> = (1..=12)
        .map(|id| {
            json!({
                "id": id,
                "name": format!("User {id}"),
                "username": format!("user{id}"),
                "email": format!("user{id}@example.com"),
                "address": { "city": "Gwenborough" }
            })
        })
        .collect();
    Value::Array(users)
}

fn fixture_posts() -> Value {
    json!([
        { "userId": 1, "id": 1, "title": "first", "body": "a" },
        { "userId": 1, "id": 2, "title": "second", "body": "b" },
        { "userId": 2, "id": 3, "title": "third", "body": "c" },
        { "userId": 11, "id": 4, "title": "beyond the limit", "body": "d" }
    ])
}

fn fixture_comments() -> Value {
    json!([
        { "postId": 1, "id": 1, "name": "c1", "email": "x@example.com", "body": "nice" },
        { "postId": 1, "id": 2, "name": "c2", "email": "y@example.com", "body": "agree" },
        { "postId": 3, "id": 3, "name": "c3", "email": "z@example.com", "body": "hm" }
    ])
}

async fn serve(router: Router) -> SocketAddr {
    let Ok(listener) = tokio::net::TcpListener::bind("127.0.0.1:0").await else {
        panic!("bind test listener");
    };
    let Ok(addr) = listener.local_addr() else {
        panic!("listener has no local address");
    };
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    addr
}

async fn spawn_upstream() -> SocketAddr {
    let router = Router::new()
        .route("/users", get(|| async { Json(fixture_users()) }))
        .route("/posts", get(|| async { Json(fixture_posts()) }))
        .route("/comments", get(|| async { Json(fixture_comments()) }));
    serve(router).await
}

/// Starts the mirror against a fresh upstream and returns its base URL.
async fn spawn_mirror() -> String {
    let upstream_addr = spawn_upstream().await;

    let store = Arc::new(StoreGateway::new(StoreSettings::memory()));
    let Ok(()) = store.connect().await else {
        panic!("memory store should always connect");
    };
    let Ok(upstream) = HttpUpstream::new(format!("http://{upstream_addr}"), Duration::from_secs(5))
    else {
        panic!("build upstream client");
    };
    let mirror_service = Arc::new(MirrorService::new(store, Arc::new(upstream), 10));

    let app = api::build_app(AppState { mirror_service }, Duration::from_secs(30));
    let addr = serve(app).await;
    format!("http://{addr}")
}

async fn json_of(response: reqwest::Response) -> Value {
    let Ok(body) = response.json::<Value>().await else {
        panic!("response body is not JSON");
    };
    body
}

async fn send(request: reqwest::RequestBuilder) -> reqwest::Response {
    let Ok(response) = request.send().await else {
        panic!("request failed");
    };
    response
}

#[tokio::test]
async fn load_then_get_user_with_posts() {
    let base = spawn_mirror().await;
    let client = reqwest::Client::new();

    let response = send(client.get(format!("{base}/load"))).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_of(response).await, json!({}));

    let response = send(client.get(format!("{base}/users/1"))).await;
    assert_eq!(response.status(), StatusCode::OK);
    let user = json_of(response).await;
    assert_eq!(user["name"], "User 1");
    assert_eq!(user["address"]["city"], "Gwenborough");

    let Some(posts) = user["posts"].as_array() else {
        panic!("posts should be an array: {user}");
    };
    assert_eq!(posts.len(), 2);
    assert_eq!(posts[0]["id"], 1);
    assert_eq!(posts[0]["comments"].as_array().map(Vec::len), Some(2));
    assert_eq!(posts[1]["comments"], json!([]));
}

#[tokio::test]
async fn load_keeps_only_the_first_ten_users() {
    let base = spawn_mirror().await;
    let client = reqwest::Client::new();

    send(client.get(format!("{base}/load"))).await;

    let response = send(client.get(format!("{base}/users/10"))).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send(client.get(format!("{base}/users/11"))).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn put_then_get_and_conflict() {
    let base = spawn_mirror().await;
    let client = reqwest::Client::new();

    let new_user = json!({ "id": 42, "name": "Ada", "email": "ada@example.com", "phone": "555" });
    let response = send(client.put(format!("{base}/users")).json(&new_user)).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let link = response
        .headers()
        .get(reqwest::header::LINK)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);
    assert_eq!(link.as_deref(), Some("</users/42>; rel=\"self\""));
    assert_eq!(json_of(response).await, new_user);

    let response = send(client.get(format!("{base}/users/42"))).await;
    assert_eq!(response.status(), StatusCode::OK);
    let user = json_of(response).await;
    assert_eq!(user["phone"], "555");
    assert_eq!(user["posts"], json!([]));

    let response = send(client.put(format!("{base}/users")).json(&new_user)).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn put_rejects_incomplete_and_malformed_bodies() {
    let base = spawn_mirror().await;
    let client = reqwest::Client::new();

    let response = send(
        client
            .put(format!("{base}/users"))
            .json(&json!({ "id": 5, "name": "No Email" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = send(
        client
            .put(format!("{base}/users"))
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body("{not json"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn delete_user_cascades_and_second_delete_is_not_found() {
    let base = spawn_mirror().await;
    let client = reqwest::Client::new();
    send(client.get(format!("{base}/load"))).await;

    let response = send(client.delete(format!("{base}/users/1"))).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        json_of(response).await,
        json!({ "message": "User deleted successfully" })
    );

    let response = send(client.get(format!("{base}/users/1"))).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = send(client.delete(format!("{base}/users/1"))).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Other users keep their posts.
    let response = send(client.get(format!("{base}/users/2"))).await;
    let user = json_of(response).await;
    assert_eq!(user["posts"].as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn delete_all_users_empties_the_store() {
    let base = spawn_mirror().await;
    let client = reqwest::Client::new();
    send(client.get(format!("{base}/load"))).await;

    let response = send(client.delete(format!("{base}/users"))).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        json_of(response).await,
        json!({ "message": "All users deleted successfully" })
    );

    let response = send(client.get(format!("{base}/users/2"))).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn non_numeric_id_is_bad_request() {
    let base = spawn_mirror().await;
    let client = reqwest::Client::new();

    let response = send(client.get(format!("{base}/users/abc"))).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_of(response).await;
    assert_eq!(body.pointer("/error/code"), Some(&json!(1002)));
}

#[tokio::test]
async fn health_reports_connected_store() {
    let base = spawn_mirror().await;
    let response = send(reqwest::Client::new().get(format!("{base}/health"))).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_of(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["store"], "connected");
}
