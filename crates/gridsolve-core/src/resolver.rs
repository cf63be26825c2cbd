//! Resolver module
//!
//! The Resolver owns the cache-aside flow:
//! lookup -> hit? return : generate -> normalize -> persist -> return.
//!
//! It holds no mutable state of its own; concurrent resolutions only share
//! the store. Two concurrent misses for the same key may both invoke the
//! gateway (no single-flight); the store's insert-if-absent semantics keep
//! the persisted document stable regardless.

use std::sync::atomic::{AtomicU64, Ordering};

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::document::GridDocument;
use crate::normalizer::{NormalizeError, ResponseNormalizer};
use crate::solver::{GatewayError, SolverGateway};
use crate::store::{GridStore, StoreError};

const MAX_OUTPUT_LOG_CHARS: usize = 2_000;

/// Resolution errors, one variant per failing stage
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("Store failed: {0}")]
    Store(#[from] StoreError),

    #[error("Solver gateway failed: {0}")]
    Gateway(#[from] GatewayError),

    #[error("Solver output could not be normalized: {0}")]
    Normalize(#[from] NormalizeError),
}

/// Cache-aside resolver over an explicit gateway and store.
pub struct Resolver<G: SolverGateway, S: GridStore> {
    gateway: G,
    store: S,
    normalizer: ResponseNormalizer,
    persist_failures: AtomicU64,
}

impl<G: SolverGateway, S: GridStore> Resolver<G, S> {
    /// Create a resolver from its two capabilities
    pub fn new(gateway: G, store: S) -> Self {
        Self {
            gateway,
            store,
            normalizer: ResponseNormalizer::new(),
            persist_failures: AtomicU64::new(0),
        }
    }

    /// Number of failed write-backs since construction.
    ///
    /// Each failure means a future request for that key will invoke the
    /// solver again, so the count is worth watching.
    pub fn persist_failures(&self) -> u64 {
        self.persist_failures.load(Ordering::Relaxed)
    }

    /// Resolve an input string to its grid document.
    ///
    /// On a hit the stored document is returned unchanged. On a miss the
    /// solver output is normalized, re-keyed to the original input (never
    /// the key the solver echoed back, so lookup-by-input round-trips) and
    /// persisted. A persist failure degrades to "serve once, don't cache":
    /// it is logged but the computed document is still returned.
    pub async fn resolve(&self, input: &str) -> Result<GridDocument, ResolveError> {
        if let Some(document) = self.store.lookup(input).await? {
            debug!(key = %input, "cache hit");
            return Ok(document);
        }

        info!(key = %input, "cache miss, invoking solver");
        let output = self.gateway.generate(input).await?;
        if tracing::enabled!(tracing::Level::DEBUG) {
            debug!(
                solver_output = %truncate_for_log(&output, MAX_OUTPUT_LOG_CHARS),
                "raw solver output"
            );
        }

        let mut document = self.normalizer.normalize(&output)?;
        document.key = input.to_string();

        if let Err(e) = self.store.insert(&document).await {
            // Serve-once degradation: the next request for this key will
            // invoke the solver again.
            let failures = self.persist_failures.fetch_add(1, Ordering::Relaxed) + 1;
            warn!(
                key = %input,
                error = %e,
                persist_failures = failures,
                "failed to cache resolved document"
            );
        }

        info!(
            key = %input,
            rows = document.rows,
            columns = document.columns,
            sentinel = document.is_sentinel(),
            "resolved document"
        );
        Ok(document)
    }
}

fn truncate_for_log(input: &str, max_chars: usize) -> String {
    let char_count = input.chars().count();
    if char_count <= max_chars {
        return input.to_string();
    }
    let mut preview: String = input.chars().take(max_chars).collect();
    preview.push_str(&format!("... [truncated, total_chars={}]", char_count));
    preview
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, RwLock};

    struct MockGateway {
        response: Result<String, String>,
        calls: Arc<AtomicUsize>,
    }

    impl MockGateway {
        fn new(response: &str) -> (Self, Arc<AtomicUsize>) {
            let calls = Arc::new(AtomicUsize::new(0));
            (
                Self {
                    response: Ok(response.to_string()),
                    calls: calls.clone(),
                },
                calls,
            )
        }

        fn failing(message: &str) -> Self {
            Self {
                response: Err(message.to_string()),
                calls: Arc::new(AtomicUsize::new(0)),
            }
        }
    }

    #[async_trait]
    impl SolverGateway for MockGateway {
        async fn generate(&self, _input: &str) -> Result<String, GatewayError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.response
                .clone()
                .map_err(GatewayError::Response)
        }
    }

    #[derive(Default)]
    struct MockStore {
        documents: RwLock<HashMap<String, GridDocument>>,
        fail_lookup: bool,
        fail_insert: bool,
    }

    #[async_trait]
    impl GridStore for MockStore {
        async fn lookup(&self, key: &str) -> Result<Option<GridDocument>, StoreError> {
            if self.fail_lookup {
                return Err(StoreError::Connection("store down".to_string()));
            }
            Ok(self.documents.read().unwrap().get(key).cloned())
        }

        async fn insert(&self, document: &GridDocument) -> Result<(), StoreError> {
            if self.fail_insert {
                return Err(StoreError::Connection("store down".to_string()));
            }
            self.documents
                .write()
                .unwrap()
                .entry(document.key.clone())
                .or_insert_with(|| document.clone());
            Ok(())
        }
    }

    const FENCED_GRID: &str = r#"Here you go:
```json
{"matrixId":"2x + 3 = 7","rows":1,"columns":5,"cells":{"1x1":"2x","1x2":"+","1x3":"3","1x4":"=","1x5":"7"}}
```"#;

    #[tokio::test]
    async fn test_miss_then_hit_invokes_gateway_once() {
        let (gateway, calls) = MockGateway::new(FENCED_GRID);
        let resolver = Resolver::new(gateway, Arc::new(MockStore::default()));

        let first = resolver.resolve("2x + 3 = 7").await.unwrap();
        let second = resolver.resolve("2x + 3 = 7").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(first.columns, 5);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_document_persisted_under_input_key() {
        // The solver echoes a different matrixId than the input string.
        let response = r#"{"matrixId":"invalid_input","rows":0,"columns":0,"cells":{}}"#;
        let (gateway, _) = MockGateway::new(response);
        let store = Arc::new(MockStore::default());
        let resolver = Resolver::new(gateway, store.clone());

        let doc = resolver.resolve("hello world").await.unwrap();
        assert!(doc.is_sentinel());
        assert_eq!(doc.key, "hello world");

        let stored = store.lookup("hello world").await.unwrap();
        assert_eq!(stored, Some(doc));
    }

    #[tokio::test]
    async fn test_sentinel_is_success_not_error() {
        let response = r#"{"matrixId":"invalid_input","rows":0,"columns":0,"cells":{}}"#;
        let (gateway, _) = MockGateway::new(response);
        let resolver = Resolver::new(gateway, Arc::new(MockStore::default()));

        let doc = resolver.resolve("hello world").await.unwrap();
        assert!(doc.is_sentinel());
    }

    #[tokio::test]
    async fn test_unparseable_output_fails_and_caches_nothing() {
        let (gateway, _) = MockGateway::new("I am unable to solve that, sorry.");
        let store = Arc::new(MockStore::default());
        let resolver = Resolver::new(gateway, store.clone());

        let result = resolver.resolve("2x + 3 = 7").await;
        assert!(matches!(result, Err(ResolveError::Normalize(_))));
        assert!(store.lookup("2x + 3 = 7").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_gateway_failure_is_terminal() {
        let resolver = Resolver::new(
            MockGateway::failing("no candidates"),
            Arc::new(MockStore::default()),
        );
        let result = resolver.resolve("2x + 3 = 7").await;
        assert!(matches!(result, Err(ResolveError::Gateway(_))));
    }

    #[tokio::test]
    async fn test_lookup_failure_is_terminal() {
        let (gateway, calls) = MockGateway::new(FENCED_GRID);
        let store = MockStore {
            fail_lookup: true,
            ..Default::default()
        };
        let resolver = Resolver::new(gateway, Arc::new(store));

        let result = resolver.resolve("2x + 3 = 7").await;
        assert!(matches!(result, Err(ResolveError::Store(_))));
        // A store outage must not trigger solver calls.
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_insert_failure_still_returns_document() {
        let (gateway, _) = MockGateway::new(FENCED_GRID);
        let store = MockStore {
            fail_insert: true,
            ..Default::default()
        };
        let resolver = Resolver::new(gateway, Arc::new(store));

        let doc = resolver.resolve("2x + 3 = 7").await.unwrap();
        assert_eq!(doc.rows, 1);
        assert_eq!(resolver.persist_failures(), 1);

        resolver.resolve("x + 1 = 2").await.unwrap();
        assert_eq!(resolver.persist_failures(), 2);
    }

    #[tokio::test]
    async fn test_persist_failures_stay_zero_on_success() {
        let (gateway, _) = MockGateway::new(FENCED_GRID);
        let resolver = Resolver::new(gateway, Arc::new(MockStore::default()));

        resolver.resolve("2x + 3 = 7").await.unwrap();
        assert_eq!(resolver.persist_failures(), 0);
    }

    #[tokio::test]
    async fn test_hit_returns_stored_document_unchanged() {
        let seeded = GridDocument::sentinel("already there");
        let store = MockStore::default();
        store
            .documents
            .write()
            .unwrap()
            .insert("already there".to_string(), seeded.clone());
        let (gateway, calls) = MockGateway::new(FENCED_GRID);
        let resolver = Resolver::new(gateway, Arc::new(store));

        let doc = resolver.resolve("already there").await.unwrap();
        assert_eq!(doc, seeded);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }
}
