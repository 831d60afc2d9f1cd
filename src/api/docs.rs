//! OpenAPI document for the REST surface.

use utoipa::OpenApi;

use super::dto::MessageResponse;
use super::handlers::{sync, system, users};
use crate::error::{ErrorBody, ErrorResponse};

/// OpenAPI description of every endpoint, served by Swagger UI when the
/// `swagger-ui` feature is enabled.
#[derive(Debug, OpenApi)]
#[openapi(
    info(
        title = "placeholder-mirror",
        description = "Mirror of the placeholder API's users, posts and comments."
    ),
    paths(
        sync::load,
        users::delete_all_users,
        users::delete_user,
        users::get_user,
        users::create_user,
        system::health_handler,
    ),
    components(schemas(MessageResponse, ErrorResponse, ErrorBody)),
    tags(
        (name = "Sync", description = "Upstream synchronization"),
        (name = "Users", description = "User lookup and mutation"),
        (name = "System", description = "Service health"),
    )
)]
pub struct ApiDoc;
