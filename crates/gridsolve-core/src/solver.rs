//! Solver Gateway capability
//!
//! The external generative service is treated as a black box: one
//! text-in/text-out operation per cache miss. The instruction contract is
//! immutable state of the gateway implementation, not a per-call argument.
//!
//! Implementations are in the gridsolve-solvers crate.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

/// Gateway errors
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("http error: {0}")]
    Http(String),

    #[error("response error: {0}")]
    Response(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Capability trait for the external equation solver.
///
/// `generate` sends the input to the generative service under the fixed
/// instruction contract and returns the raw text response. Every failure
/// is surfaced once; no retries at this layer.
#[async_trait]
pub trait SolverGateway: Send + Sync {
    /// Generate raw solver text for an input string
    async fn generate(&self, input: &str) -> Result<String, GatewayError>;
}

#[async_trait]
impl<T: SolverGateway + ?Sized> SolverGateway for Arc<T> {
    async fn generate(&self, input: &str) -> Result<String, GatewayError> {
        (**self).generate(input).await
    }
}
