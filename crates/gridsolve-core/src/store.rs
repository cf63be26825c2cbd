//! Grid Store capability
//!
//! Keyed lookup/insert of resolved grid documents. The store is
//! append-only from the core's perspective: no update, no delete, no
//! eviction (documents are deterministic and small, so the cache is
//! intentionally permanent).
//!
//! Note: Implementations are in the gridsolve-stores crate

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::document::GridDocument;

/// Store error types
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Persistent keyed collection of resolved grid documents.
///
/// `lookup` returns `Ok(None)` when the key is absent; errors mean the
/// store itself failed, which callers must treat differently from a miss.
/// `insert` is idempotent insert-if-absent: the first write for a key
/// wins and later writes are silently ignored, so concurrent misses for
/// the same key cannot clobber each other.
#[async_trait]
pub trait GridStore: Send + Sync {
    /// Look up a document by its original input key
    async fn lookup(&self, key: &str) -> Result<Option<GridDocument>, StoreError>;

    /// Persist a document under `document.key` if no document exists there
    async fn insert(&self, document: &GridDocument) -> Result<(), StoreError>;
}

#[async_trait]
impl<T: GridStore + ?Sized> GridStore for Arc<T> {
    async fn lookup(&self, key: &str) -> Result<Option<GridDocument>, StoreError> {
        (**self).lookup(key).await
    }

    async fn insert(&self, document: &GridDocument) -> Result<(), StoreError> {
        (**self).insert(document).await
    }
}
