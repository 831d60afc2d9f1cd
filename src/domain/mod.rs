//! Domain layer: record types, collection names, and document filters.
//!
//! This module contains the typed model of the mirrored data (users,
//! posts with embedded comments, standalone comments) and the filter
//! vocabulary shared by every store backend.

pub mod collection;
pub mod filter;
pub mod records;

pub use collection::CollectionName;
pub use filter::{Document, Filter};
pub use records::{Comment, Post, Record, User, UserWithPosts};
