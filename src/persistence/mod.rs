//! Persistence layer: document store backends and the store gateway.
//!
//! Backends implement [`DocumentStore`], a small document-collection
//! interface (insert, find, delete by [`Filter`]). The service never talks
//! to a backend directly: it goes through [`StoreGateway`], which owns
//! the single backend handle and hands out typed [`Collection`] views.

pub mod gateway;
pub mod memory;
pub mod postgres;

use async_trait::async_trait;

use crate::domain::{CollectionName, Document, Filter};
use crate::error::MirrorError;

pub use gateway::{Collection, StoreGateway};
pub use memory::MemoryStore;
pub use postgres::PostgresStore;

/// Document collection operations shared by every backend.
///
/// Documents come back in insertion order. Delete operations return the
/// number of documents removed.
#[async_trait]
pub trait DocumentStore: Send + Sync + std::fmt::Debug {
    /// Appends documents to a collection, preserving their order.
    ///
    /// # Errors
    ///
    /// Returns [`MirrorError::Persistence`] on backend failure.
    async fn insert_many(
        &self,
        collection: CollectionName,
        docs: Vec<Document>,
    ) -> Result<u64, MirrorError>;

    /// Returns every document selected by `filter`.
    ///
    /// # Errors
    ///
    /// Returns [`MirrorError::Persistence`] on backend failure.
    async fn find(
        &self,
        collection: CollectionName,
        filter: &Filter,
    ) -> Result<Vec<Document>, MirrorError>;

    /// Returns the first document selected by `filter`.
    ///
    /// # Errors
    ///
    /// Returns [`MirrorError::Persistence`] on backend failure.
    async fn find_one(
        &self,
        collection: CollectionName,
        filter: &Filter,
    ) -> Result<Option<Document>, MirrorError>;

    /// Removes the first document selected by `filter`.
    ///
    /// # Errors
    ///
    /// Returns [`MirrorError::Persistence`] on backend failure.
    async fn delete_one(
        &self,
        collection: CollectionName,
        filter: &Filter,
    ) -> Result<u64, MirrorError>;

    /// Removes every document selected by `filter`.
    ///
    /// # Errors
    ///
    /// Returns [`MirrorError::Persistence`] on backend failure.
    async fn delete_many(
        &self,
        collection: CollectionName,
        filter: &Filter,
    ) -> Result<u64, MirrorError>;

    /// Releases backend resources. Further calls may fail.
    async fn close(&self);
}
