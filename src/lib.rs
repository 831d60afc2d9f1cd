//! # placeholder-mirror
//!
//! Mirrors the users, posts and comments of a placeholder REST API into a
//! document store and serves them over HTTP.
//!
//! `GET /load` replaces the store contents with a fresh upstream read
//! (first ten users, every post with its comments embedded, every comment
//! standalone). `/users` and `/users/{userId}` look up, create and delete
//! users, joining posts on read and cascading to posts and comments on
//! delete.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP)
//!     │
//!     ├── REST Handlers (api/)
//!     │
//!     ├── MirrorService (service/) ──── UpstreamSource (upstream/)
//!     │                                     └── placeholder REST API
//!     ├── StoreGateway (persistence/)
//!     │
//!     └── DocumentStore: PostgreSQL JSONB | in-memory
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod persistence;
pub mod server;
pub mod service;
pub mod upstream;

#[cfg(test)]
pub(crate) mod test_support;
