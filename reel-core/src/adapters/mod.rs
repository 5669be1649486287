//! Adapter implementations
//!
//! Adapters implement the port traits with concrete technologies:
//! - Local files and an in-memory map for the KeyValueStore port
//! - TMDB HTTP client for CatalogProvider
//! - Offline demo catalog for CatalogProvider

pub mod demo;
pub mod file;
pub mod memory;
pub mod tmdb;

#[cfg(test)]
pub mod tmdb_mock;
