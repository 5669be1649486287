//! Key-value storage port

use crate::domain::result::Result;

/// String-keyed byte storage
///
/// The stores keep one record per key and rewrite it whole on every
/// mutation, so implementations only need last-writer-wins semantics.
pub trait KeyValueStore: Send + Sync {
    /// Read a record, `None` if the key was never written or was deleted
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Write a record, replacing any previous value
    fn set(&self, key: &str, value: &[u8]) -> Result<()>;

    /// Delete a record. Deleting a missing key is not an error.
    fn delete(&self, key: &str) -> Result<()>;
}
