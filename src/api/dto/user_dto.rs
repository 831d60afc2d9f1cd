//! User DTOs: create-request validation and message responses.

use serde::Serialize;
use serde_json::Value;
use utoipa::ToSchema;

use crate::domain::User;
use crate::error::MirrorError;

/// Confirmation body for delete endpoints.
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    /// Human-readable confirmation.
    pub message: String,
}

impl MessageResponse {
    /// Creates a response carrying `message`.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Validates a `PUT /users` body and turns it into a [`User`].
///
/// `id`, `name` and `email` must be present and truthy: an `id` of `0`,
/// `null` or `false` and empty strings count as missing. `id` must be a
/// whole number; `7.0` is accepted as `7`, `7.5` is rejected. Every other
/// field is kept as passthrough data.
///
/// # Errors
///
/// Returns [`MirrorError::InvalidRequest`] if the body is not an object,
/// a required field is missing, or a field has the wrong type.
pub fn user_from_body(body: Value) -> Result<User, MirrorError> {
    let Value::Object(mut fields) = body else {
        return Err(MirrorError::InvalidRequest(
            "request body must be a JSON object".to_string(),
        ));
    };

    let id = match fields.remove("id") {
        Some(Value::Number(n)) => match integral(&n) {
            Some(0) => return Err(missing_fields()),
            Some(id) => id,
            None => {
                return Err(MirrorError::InvalidRequest(format!(
                    "id must be an integer, got {n}"
                )));
            }
        },
        None | Some(Value::Null) | Some(Value::Bool(false)) => return Err(missing_fields()),
        Some(Value::String(s)) if s.is_empty() => return Err(missing_fields()),
        Some(other) => {
            return Err(MirrorError::InvalidRequest(format!(
                "id must be an integer, got {other}"
            )));
        }
    };

    let name = required_string(&mut fields, "name")?;
    let email = required_string(&mut fields, "email")?;

    Ok(User {
        id,
        name,
        email,
        extra: fields,
    })
}

/// Reads a JSON number as an `i64` if it has no fractional part.
#[allow(clippy::cast_possible_truncation)]
fn integral(n: &serde_json::Number) -> Option<i64> {
    // Beyond 2^53 a float no longer identifies a single integer.
    const MAX_EXACT: f64 = 9_007_199_254_740_992.0;
    n.as_i64().or_else(|| {
        n.as_f64()
            .filter(|f| f.fract() == 0.0 && f.abs() <= MAX_EXACT)
            .map(|f| f as i64)
    })
}

fn required_string(
    fields: &mut serde_json::Map<String, Value>,
    key: &str,
) -> Result<String, MirrorError> {
    match fields.remove(key) {
        Some(Value::String(s)) if !s.is_empty() => Ok(s),
        None | Some(Value::Null) | Some(Value::Bool(false)) | Some(Value::String(_)) => {
            Err(missing_fields())
        }
        Some(other) => Err(MirrorError::InvalidRequest(format!(
            "{key} must be a string, got {other}"
        ))),
    }
}

fn missing_fields() -> MirrorError {
    MirrorError::InvalidRequest("missing required fields: id, name, email".to_string())
}
