//! # Gridsolve Stores
//!
//! GridStore implementations:
//! - InMemoryGridStore: development and testing
//! - RedisGridStore: production persistence
//!
//! Both honor the insert-if-absent contract of `gridsolve_core::GridStore`.

mod grid_store;

pub use grid_store::{InMemoryGridStore, RedisGridStore};
