//! Response Normalizer module
//!
//! The normalizer is the stability core of gridsolve. The upstream solver
//! is a free-text model that, despite being instructed to emit raw JSON,
//! may wrap its answer in commentary or code fences.
//!
//! Responsibilities:
//! - Extract the JSON payload from arbitrarily-wrapped solver text
//! - Parse it into the GridDocument wire shape
//! - Validate the document invariants

use thiserror::Error;
use tracing::debug;

use crate::document::{DocumentError, GridDocument};

/// Normalization errors
#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("Solver response is not a grid document: {0}")]
    Parse(String),

    #[error("Document validation failed: {0}")]
    Document(#[from] DocumentError),
}

/// Turns raw solver text into a validated [`GridDocument`].
#[derive(Debug, Default)]
pub struct ResponseNormalizer;

impl ResponseNormalizer {
    /// Create a new normalizer
    pub fn new() -> Self {
        Self
    }

    /// Normalize raw solver output into a validated document.
    ///
    /// Parse failure is terminal for the request; the caller must not
    /// cache anything derived from it.
    pub fn normalize(&self, text: &str) -> Result<GridDocument, NormalizeError> {
        let payload = extract_payload(text);
        debug!(payload_len = payload.len(), "extracted solver payload");

        let document: GridDocument =
            serde_json::from_str(payload).map_err(|e| NormalizeError::Parse(e.to_string()))?;
        document.validate()?;
        Ok(document)
    }
}

/// Extract the JSON payload from solver text.
///
/// Stages, first match wins:
/// 1. content strictly between a `json`-tagged fence and the last fence
/// 2. content between the first and last generic fence markers
/// 3. the inclusive span from the first `{` to the last `}`
/// 4. the raw text unchanged
fn extract_payload(text: &str) -> &str {
    const JSON_FENCE: &str = "```json";
    const FENCE: &str = "```";

    if let Some(start) = text.find(JSON_FENCE) {
        let end = text.rfind(FENCE).unwrap_or(start);
        if end >= start + JSON_FENCE.len() {
            return text[start + JSON_FENCE.len()..end].trim();
        }
    }

    if let Some(start) = text.find(FENCE) {
        let end = text.rfind(FENCE).unwrap_or(start);
        if end >= start + FENCE.len() {
            return text[start + FENCE.len()..end].trim();
        }
    }

    if let (Some(start), Some(end)) = (text.find('{'), text.rfind('}')) {
        if end > start {
            return text[start..=end].trim();
        }
    }

    text
}
