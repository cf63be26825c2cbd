//! GridStore implementations

use async_trait::async_trait;
use redis::AsyncCommands;
use std::collections::HashMap;
use std::sync::RwLock;

use gridsolve_core::store::{GridStore, StoreError};
use gridsolve_core::GridDocument;

/// In-memory implementation for development and testing
pub struct InMemoryGridStore {
    documents: RwLock<HashMap<String, GridDocument>>,
}

impl InMemoryGridStore {
    /// Create a new in-memory store
    pub fn new() -> Self {
        Self {
            documents: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryGridStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GridStore for InMemoryGridStore {
    async fn lookup(&self, key: &str) -> Result<Option<GridDocument>, StoreError> {
        let documents = self
            .documents
            .read()
            .map_err(|e| StoreError::Internal(e.to_string()))?;
        Ok(documents.get(key).cloned())
    }

    async fn insert(&self, document: &GridDocument) -> Result<(), StoreError> {
        let mut documents = self
            .documents
            .write()
            .map_err(|e| StoreError::Internal(e.to_string()))?;
        // First write for a key wins.
        documents
            .entry(document.key.clone())
            .or_insert_with(|| document.clone());
        Ok(())
    }
}

/// Redis implementation for production persistence.
pub struct RedisGridStore {
    client: redis::Client,
    key_prefix: String,
}

impl RedisGridStore {
    /// Create a new Redis grid store from a connection URL.
    pub fn new(connection_url: &str, key_prefix: impl Into<String>) -> Result<Self, StoreError> {
        let client = redis::Client::open(connection_url)
            .map_err(|e| StoreError::Connection(e.to_string()))?;
        Ok(Self {
            client,
            key_prefix: key_prefix.into(),
        })
    }

    fn document_key(&self, key: &str) -> String {
        format!("{}:grid:{}", self.key_prefix, key)
    }

    async fn connection(&self) -> Result<redis::aio::MultiplexedConnection, StoreError> {
        self.client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))
    }

    /// Round-trip a PING, for startup health checks.
    pub async fn ping(&self) -> Result<(), StoreError> {
        let mut conn = self.connection().await?;
        redis::cmd("PING")
            .query_async::<()>(&mut conn)
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))
    }
}

#[async_trait]
impl GridStore for RedisGridStore {
    async fn lookup(&self, key: &str) -> Result<Option<GridDocument>, StoreError> {
        let mut conn = self.connection().await?;
        let payload: Option<String> = conn
            .get(self.document_key(key))
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;
        payload
            .map(|s| serde_json::from_str(&s).map_err(|e| StoreError::Serialization(e.to_string())))
            .transpose()
    }

    async fn insert(&self, document: &GridDocument) -> Result<(), StoreError> {
        let mut conn = self.connection().await?;
        let payload = serde_json::to_string(document)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        // SET NX: the first write for a key wins.
        let _created: bool = conn
            .set_nx(self.document_key(&document.key), payload)
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;
        Ok(())
    }
}
