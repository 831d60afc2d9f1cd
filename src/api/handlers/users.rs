//! User handlers: lookup with posts, create, delete one, delete all.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use axum::routing::{delete, put};
use axum::{Json, Router};

use crate::api::dto::{MessageResponse, user_from_body};
use crate::app_state::AppState;
use crate::error::{ErrorResponse, MirrorError};

/// `DELETE /users` — Remove every user, post and comment.
///
/// # Errors
///
/// Returns [`MirrorError`] on store failure.
#[utoipa::path(
    delete,
    path = "/users",
    tag = "Users",
    summary = "Delete all users",
    description = "Empties the users, posts and comments collections.",
    responses(
        (status = 200, description = "All collections emptied", body = MessageResponse),
        (status = 500, description = "Store failure", body = ErrorResponse),
    )
)]
pub async fn delete_all_users(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, MirrorError> {
    state.mirror_service.clear_all().await?;
    Ok(Json(MessageResponse::new("All users deleted successfully")))
}

/// `DELETE /users/{userId}` — Remove a user with their posts and comments.
///
/// # Errors
///
/// Returns [`MirrorError::InvalidUserId`] for a non-integer id and
/// [`MirrorError::UserNotFound`] if the user does not exist.
#[utoipa::path(
    delete,
    path = "/users/{userId}",
    tag = "Users",
    summary = "Delete a user",
    description = "Deletes the user, every post they own, and every comment on those posts.",
    params(
        ("userId" = i64, Path, description = "User id"),
    ),
    responses(
        (status = 200, description = "User deleted", body = MessageResponse),
        (status = 400, description = "Invalid user id", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
    )
)]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<impl IntoResponse, MirrorError> {
    let user_id = parse_user_id(&raw_id)?;
    state.mirror_service.delete_user(user_id).await?;
    Ok(Json(MessageResponse::new("User deleted successfully")))
}

/// `GET /users/{userId}` — Get a user with their posts.
///
/// # Errors
///
/// Returns [`MirrorError::InvalidUserId`] for a non-integer id and
/// [`MirrorError::UserNotFound`] if the user does not exist.
#[utoipa::path(
    get,
    path = "/users/{userId}",
    tag = "Users",
    summary = "Get a user",
    description = "Returns the stored user object with a `posts` array of every post whose `userId` matches.",
    params(
        ("userId" = i64, Path, description = "User id"),
    ),
    responses(
        (status = 200, description = "User with posts", body = serde_json::Value),
        (status = 400, description = "Invalid user id", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
    )
)]
pub async fn get_user(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<impl IntoResponse, MirrorError> {
    let user_id = parse_user_id(&raw_id)?;
    let view = state.mirror_service.get_user_with_posts(user_id).await?;
    let body = view
        .to_json()
        .map_err(|e| MirrorError::Internal(format!("render user {user_id}: {e}")))?;
    Ok(Json(body))
}

/// `PUT /users` — Create a user.
///
/// # Errors
///
/// Returns [`MirrorError::InvalidRequest`] on malformed JSON or missing
/// fields, and [`MirrorError::UserConflict`] if the id is taken.
#[utoipa::path(
    put,
    path = "/users",
    tag = "Users",
    summary = "Create a user",
    description = "Inserts a user. `id`, `name` and `email` are required; any other fields are stored as given.",
    request_body = serde_json::Value,
    responses(
        (status = 201, description = "User created", body = serde_json::Value,
            headers(("Link" = String, description = "Location of the new user"))),
        (status = 400, description = "Malformed body or missing fields", body = ErrorResponse),
        (status = 409, description = "User id already exists", body = ErrorResponse),
    )
)]
pub async fn create_user(
    State(state): State<AppState>,
    payload: Result<Json<serde_json::Value>, JsonRejection>,
) -> Result<impl IntoResponse, MirrorError> {
    let Json(body) = payload.map_err(|rejection| MirrorError::InvalidRequest(rejection.body_text()))?;
    let user = user_from_body(body)?;

    let created = state.mirror_service.create_user(user).await?;
    let link = format!("</users/{}>; rel=\"self\"", created.id);

    Ok((StatusCode::CREATED, [(header::LINK, link)], Json(created)))
}

/// User routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/users", put(create_user).delete(delete_all_users))
        .route("/users/{userId}", delete(delete_user).get(get_user))
}

/// Parses a path segment as a user id.
fn parse_user_id(raw: &str) -> Result<i64, MirrorError> {
    raw.trim()
        .parse()
        .map_err(|_| MirrorError::InvalidUserId(raw.to_string()))
}
