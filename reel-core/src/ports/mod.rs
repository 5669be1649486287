//! Port definitions (hexagonal architecture)
//!
//! Ports define the interfaces for external dependencies. The stores and
//! services depend only on these traits, not on concrete implementations.

mod catalog;
mod storage;

pub use catalog::CatalogProvider;
pub use storage::KeyValueStore;
