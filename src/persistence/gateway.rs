//! Store gateway: the single owner of the document store handle.
//!
//! [`StoreGateway`] is created by the process entry point, connected once,
//! shared with handlers through [`crate::app_state::AppState`], and closed
//! on shutdown. Callers obtain typed [`Collection`] views from it; records
//! are encoded to and decoded from raw documents at this boundary.

use std::marker::PhantomData;
use std::sync::Arc;

use tokio::sync::RwLock;

use super::{DocumentStore, MemoryStore, PostgresStore};
use crate::config::{StoreBackend, StoreSettings};
use crate::domain::{CollectionName, Document, Filter, Record};
use crate::error::MirrorError;

/// Owner of the process-wide document store connection.
#[derive(Debug)]
pub struct StoreGateway {
    settings: StoreSettings,
    backend: RwLock<Option<Arc<dyn DocumentStore>>>,
}

impl StoreGateway {
    /// Creates an unconnected gateway. Call [`Self::connect`] before use.
    #[must_use]
    pub fn new(settings: StoreSettings) -> Self {
        Self {
            settings,
            backend: RwLock::new(None),
        }
    }

    /// Creates a gateway that is already connected to `store`.
    #[must_use]
    pub fn connected(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            settings: StoreSettings::memory(),
            backend: RwLock::new(Some(store)),
        }
    }

    /// Opens the configured backend.
    ///
    /// # Errors
    ///
    /// Returns [`MirrorError::Connection`] if the store is unreachable.
    pub async fn connect(&self) -> Result<(), MirrorError> {
        let store: Arc<dyn DocumentStore> = match self.settings.backend {
            StoreBackend::Postgres => Arc::new(PostgresStore::connect(&self.settings).await?),
            StoreBackend::Memory => Arc::new(MemoryStore::new()),
        };

        let mut slot = self.backend.write().await;
        if slot.is_some() {
            tracing::warn!("store gateway connected twice; replacing the previous handle");
        }
        *slot = Some(store);
        tracing::info!(backend = %self.settings.backend, "connected to document store");
        Ok(())
    }

    /// Returns `true` between a successful `connect()` and `close()`.
    pub async fn is_connected(&self) -> bool {
        self.backend.read().await.is_some()
    }

    /// Returns a typed view of the collection holding `T`.
    ///
    /// # Errors
    ///
    /// Returns [`MirrorError::NotConnected`] before `connect()` or after
    /// `close()`.
    pub async fn collection<T: Record>(&self) -> Result<Collection<T>, MirrorError> {
        let store = self
            .backend
            .read()
            .await
            .as_ref()
            .map(Arc::clone)
            .ok_or(MirrorError::NotConnected)?;
        Ok(Collection {
            store,
            _record: PhantomData,
        })
    }

    /// Releases the backend. Safe to call more than once.
    pub async fn close(&self) {
        let store = self.backend.write().await.take();
        if let Some(store) = store {
            store.close().await;
            tracing::info!("document store connection closed");
        }
    }
}

/// Typed handle on one collection.
///
/// Cheap to create; holds a shared reference to the backend that was
/// live when it was handed out.
#[derive(Debug)]
pub struct Collection<T> {
    store: Arc<dyn DocumentStore>,
    _record: PhantomData<fn() -> T>,
}

impl<T: Record> Collection<T> {
    /// Name of the underlying collection.
    #[must_use]
    pub const fn name(&self) -> CollectionName {
        T::COLLECTION
    }

    /// Inserts a single record.
    ///
    /// # Errors
    ///
    /// Returns [`MirrorError::Persistence`] on encode or backend failure.
    pub async fn insert_one(&self, record: &T) -> Result<(), MirrorError> {
        let doc = encode(record)?;
        self.store.insert_many(T::COLLECTION, vec![doc]).await?;
        Ok(())
    }

    /// Inserts records in order. Empty input is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`MirrorError::Persistence`] on encode or backend failure.
    pub async fn insert_many(&self, records: &[T]) -> Result<u64, MirrorError> {
        if records.is_empty() {
            return Ok(0);
        }
        let docs = records.iter().map(encode).collect::<Result<Vec<_>, _>>()?;
        self.store.insert_many(T::COLLECTION, docs).await
    }

    /// Returns every record selected by `filter`, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns [`MirrorError::Persistence`] if a stored document does not
    /// decode as `T` or the backend fails.
    pub async fn find(&self, filter: &Filter) -> Result<Vec<T>, MirrorError> {
        self.store
            .find(T::COLLECTION, filter)
            .await?
            .into_iter()
            .map(decode)
            .collect()
    }

    /// Returns the first record selected by `filter`.
    ///
    /// # Errors
    ///
    /// Returns [`MirrorError::Persistence`] on decode or backend failure.
    pub async fn find_one(&self, filter: &Filter) -> Result<Option<T>, MirrorError> {
        self.store
            .find_one(T::COLLECTION, filter)
            .await?
            .map(decode)
            .transpose()
    }

    /// Deletes the first record selected by `filter`.
    ///
    /// # Errors
    ///
    /// Returns [`MirrorError::Persistence`] on backend failure.
    pub async fn delete_one(&self, filter: &Filter) -> Result<u64, MirrorError> {
        self.store.delete_one(T::COLLECTION, filter).await
    }

    /// Deletes every record selected by `filter`.
    ///
    /// # Errors
    ///
    /// Returns [`MirrorError::Persistence`] on backend failure.
    pub async fn delete_many(&self, filter: &Filter) -> Result<u64, MirrorError> {
        self.store.delete_many(T::COLLECTION, filter).await
    }
}

fn encode<T: Record>(record: &T) -> Result<Document, MirrorError> {
    match serde_json::to_value(record) {
        Ok(serde_json::Value::Object(map)) => Ok(map),
        Ok(_) => Err(MirrorError::Persistence(format!(
            "{} record did not encode as an object",
            T::COLLECTION
        ))),
        Err(e) => Err(MirrorError::Persistence(e.to_string())),
    }
}

fn decode<T: Record>(doc: Document) -> Result<T, MirrorError> {
    serde_json::from_value(serde_json::Value::Object(doc))
        .map_err(|e| MirrorError::Persistence(format!("corrupt document in {}: {e}", T::COLLECTION)))
}
