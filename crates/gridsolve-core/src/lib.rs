//! # Gridsolve Core
//!
//! Core abstractions and deterministic logic for gridsolve.
//!
//! This crate contains:
//! - GridDocument definition and its validity rules
//! - Normalizer for turning raw solver text into validated documents
//! - SolverGateway / GridStore capability traits
//! - The cache-aside Resolver that composes them
//!
//! This crate does NOT care about:
//! - Which LLM provider answers the solver call
//! - Where documents are persisted
//! - How requests arrive or how responses are rendered

pub mod document;
pub mod normalizer;
pub mod resolver;
pub mod solver;
pub mod store;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::document::{DocumentError, GridDocument};
    pub use crate::normalizer::{NormalizeError, ResponseNormalizer};
    pub use crate::resolver::{ResolveError, Resolver};
    pub use crate::solver::{GatewayError, SolverGateway};
    pub use crate::store::{GridStore, StoreError};
}

// Re-export key types at crate root
pub use document::{DocumentError, GridDocument};
pub use normalizer::{NormalizeError, ResponseNormalizer};
pub use resolver::{ResolveError, Resolver};
pub use solver::{GatewayError, SolverGateway};
pub use store::{GridStore, StoreError};
