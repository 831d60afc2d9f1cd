//! Mirror error types with HTTP status code mapping.
//!
//! [`MirrorError`] is the central error type for the service. Each variant
//! maps to a specific HTTP status code and structured JSON error response.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

/// Structured JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 2001,
///     "message": "user not found: 42"
///   }
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Numeric error code (see the code ranges on [`MirrorError`]).
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Server-side error enum with HTTP status code mapping.
///
/// # Error Code Ranges
///
/// | Range     | Category         | HTTP Status                  |
/// |-----------|------------------|------------------------------|
/// | 1000–1999 | Validation       | 400 Bad Request              |
/// | 2000–2999 | Lookup/Conflict  | 404 Not Found / 409 Conflict |
/// | 3000–3999 | Server           | 500 Internal Server Error    |
#[derive(Debug, thiserror::Error)]
pub enum MirrorError {
    /// Request body or fields failed validation.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Path parameter is not a valid user id.
    #[error("invalid user id: {0}")]
    InvalidUserId(String),

    /// User with the given id does not exist.
    #[error("user not found: {0}")]
    UserNotFound(i64),

    /// A user with the given id already exists.
    #[error("user already exists: {0}")]
    UserConflict(i64),

    /// Document store read or write failed.
    #[error("persistence error: {0}")]
    Persistence(String),

    /// Upstream API call failed or returned an unusable response.
    #[error("upstream error: {0}")]
    Upstream(String),

    /// The store gateway was used before `connect()` or after `close()`.
    #[error("store is not connected")]
    NotConnected,

    /// The document store could not be reached.
    #[error("store connection failed: {0}")]
    Connection(String),

    /// The request did not complete within the configured timeout.
    #[error("request timed out after {0} ms")]
    RequestTimeout(u64),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl MirrorError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::InvalidRequest(_) => 1001,
            Self::InvalidUserId(_) => 1002,
            Self::UserNotFound(_) => 2001,
            Self::UserConflict(_) => 2002,
            Self::Internal(_) => 3000,
            Self::Persistence(_) => 3001,
            Self::Upstream(_) => 3002,
            Self::NotConnected => 3003,
            Self::Connection(_) => 3004,
            Self::RequestTimeout(_) => 3005,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) | Self::InvalidUserId(_) => StatusCode::BAD_REQUEST,
            Self::UserNotFound(_) => StatusCode::NOT_FOUND,
            Self::UserConflict(_) => StatusCode::CONFLICT,
            Self::Persistence(_)
            | Self::Upstream(_)
            | Self::NotConnected
            | Self::Connection(_)
            | Self::RequestTimeout(_)
            | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for MirrorError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(code = self.error_code(), error = %self, "request failed");
        }
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message: self.to_string(),
                details: None,
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}
