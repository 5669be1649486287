//! Typed JSON records on top of a key-value store

use std::borrow::Borrow;
use std::marker::PhantomData;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::domain::result::Result;
use crate::ports::KeyValueStore;

/// Outcome of reading a record without side effects
#[derive(Debug, PartialEq)]
pub enum Loaded<T> {
    Missing,
    Present(T),
    /// Bytes were stored but didn't parse as `T`
    Corrupt,
}

/// One JSON-encoded value stored under a fixed key
pub struct PersistedRecord<T> {
    storage: Arc<dyn KeyValueStore>,
    key: &'static str,
    _marker: PhantomData<fn() -> T>,
}

impl<T> PersistedRecord<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(storage: Arc<dyn KeyValueStore>, key: &'static str) -> Self {
        Self {
            storage,
            key,
            _marker: PhantomData,
        }
    }

    pub fn key(&self) -> &'static str {
        self.key
    }

    /// Read and parse the record. A storage read failure counts as missing.
    pub fn read(&self) -> Loaded<T> {
        let bytes = match self.storage.get(self.key) {
            Ok(Some(bytes)) => bytes,
            Ok(None) => return Loaded::Missing,
            Err(e) => {
                tracing::warn!(key = self.key, error = %e, "failed to read persisted record");
                return Loaded::Missing;
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(value) => Loaded::Present(value),
            Err(e) => {
                tracing::warn!(key = self.key, error = %e, "persisted record is corrupt");
                Loaded::Corrupt
            }
        }
    }

    /// Fail-open load: a corrupt record is purged and reported as absent
    pub fn load(&self) -> Option<T> {
        match self.read() {
            Loaded::Present(value) => Some(value),
            Loaded::Missing => None,
            Loaded::Corrupt => {
                self.erase_logged();
                None
            }
        }
    }

    /// Serialize and write the record
    pub fn save<Q>(&self, value: &Q) -> Result<()>
    where
        T: Borrow<Q>,
        Q: Serialize + ?Sized,
    {
        let bytes = serde_json::to_vec(value)?;
        self.storage.set(self.key, &bytes)
    }

    /// Delete the record
    pub fn erase(&self) -> Result<()> {
        self.storage.delete(self.key)
    }

    /// Save, logging instead of returning a failure
    pub fn save_logged<Q>(&self, value: &Q)
    where
        T: Borrow<Q>,
        Q: Serialize + ?Sized,
    {
        if let Err(e) = self.save(value) {
            tracing::warn!(key = self.key, error = %e, "failed to persist record");
        }
    }

    /// Erase, logging instead of returning a failure
    pub fn erase_logged(&self) {
        if let Err(e) = self.erase() {
            tracing::warn!(key = self.key, error = %e, "failed to delete persisted record");
        }
    }
}
