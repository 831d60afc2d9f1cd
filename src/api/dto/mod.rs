//! Data Transfer Objects for REST request/response serialization.
//!
//! Stored records are served as-is; this module only holds request
//! validation and the small envelope types the endpoints add.

pub mod user_dto;

pub use user_dto::*;
