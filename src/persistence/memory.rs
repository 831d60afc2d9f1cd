//! In-process document store.
//!
//! [`MemoryStore`] keeps each collection as an ordered `Vec` of documents
//! behind a single [`tokio::sync::RwLock`]. Reads run concurrently,
//! writes are serialized.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::DocumentStore;
use crate::domain::{CollectionName, Document, Filter};
use crate::error::MirrorError;

/// Document store held entirely in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<CollectionName, Vec<Document>>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of documents in a collection.
    pub async fn len(&self, collection: CollectionName) -> usize {
        self.collections
            .read()
            .await
            .get(&collection)
            .map_or(0, Vec::len)
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn insert_many(
        &self,
        collection: CollectionName,
        docs: Vec<Document>,
    ) -> Result<u64, MirrorError> {
        let inserted = docs.len() as u64;
        let mut map = self.collections.write().await;
        map.entry(collection).or_default().extend(docs);
        Ok(inserted)
    }

    async fn find(
        &self,
        collection: CollectionName,
        filter: &Filter,
    ) -> Result<Vec<Document>, MirrorError> {
        let map = self.collections.read().await;
        Ok(map
            .get(&collection)
            .map(|docs| docs.iter().filter(|d| filter.matches(d)).cloned().collect())
            .unwrap_or_default())
    }

    async fn find_one(
        &self,
        collection: CollectionName,
        filter: &Filter,
    ) -> Result<Option<Document>, MirrorError> {
        let map = self.collections.read().await;
        Ok(map
            .get(&collection)
            .and_then(|docs| docs.iter().find(|d| filter.matches(d)).cloned()))
    }

    async fn delete_one(
        &self,
        collection: CollectionName,
        filter: &Filter,
    ) -> Result<u64, MirrorError> {
        let mut map = self.collections.write().await;
        let Some(docs) = map.get_mut(&collection) else {
            return Ok(0);
        };
        match docs.iter().position(|d| filter.matches(d)) {
            Some(index) => {
                docs.remove(index);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete_many(
        &self,
        collection: CollectionName,
        filter: &Filter,
    ) -> Result<u64, MirrorError> {
        let mut map = self.collections.write().await;
        let Some(docs) = map.get_mut(&collection) else {
            return Ok(0);
        };
        let before = docs.len();
        docs.retain(|d| !filter.matches(d));
        Ok((before - docs.len()) as u64)
    }

    async fn close(&self) {
        tracing::debug!("memory store closed");
    }
}
