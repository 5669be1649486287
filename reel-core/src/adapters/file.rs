//! File-backed key-value store
//!
//! Each key lives in `<dir>/<key>.json`. Writes go to a temp file in the
//! same directory and are renamed over the target, under an exclusive
//! advisory lock on `<dir>/.lock`; reads take a shared lock.

use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use tempfile::NamedTempFile;

use crate::domain::result::{Error, Result};
use crate::ports::KeyValueStore;

const LOCK_FILE: &str = ".lock";
const RECORD_EXTENSION: &str = "json";

/// Persistent storage rooted at a directory
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

/// Holds an advisory lock until dropped
struct LockGuard(File);

impl Drop for LockGuard {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.0);
    }
}

impl FileStore {
    /// Open (and create if needed) a store directory
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file holding `key`
    pub fn record_path(&self, key: &str) -> Result<PathBuf> {
        validate_key(key)?;
        Ok(self.dir.join(format!("{}.{}", key, RECORD_EXTENSION)))
    }

    fn lock_file(&self) -> Result<File> {
        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(false)
            .open(self.dir.join(LOCK_FILE))?;
        Ok(file)
    }

    fn lock_shared(&self) -> Result<LockGuard> {
        let file = self.lock_file()?;
        FileExt::lock_shared(&file)
            .map_err(|e| Error::storage(format!("Failed to lock {}: {}", self.dir.display(), e)))?;
        Ok(LockGuard(file))
    }

    fn lock_exclusive(&self) -> Result<LockGuard> {
        let file = self.lock_file()?;
        FileExt::lock_exclusive(&file)
            .map_err(|e| Error::storage(format!("Failed to lock {}: {}", self.dir.display(), e)))?;
        Ok(LockGuard(file))
    }
}

/// Keys become file names, so keep them to a safe alphabet
fn validate_key(key: &str) -> Result<()> {
    let valid = !key.is_empty()
        && !key.starts_with('.')
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));
    if valid {
        Ok(())
    } else {
        Err(Error::validation(format!("Invalid storage key: {:?}", key)))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let path = self.record_path(key)?;
        let _guard = self.lock_shared()?;
        match fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        let path = self.record_path(key)?;
        let _guard = self.lock_exclusive()?;

        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(value)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&path)
            .map_err(|e| Error::storage(format!("Failed to write {}: {}", path.display(), e)))?;
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<()> {
        let path = self.record_path(key)?;
        let _guard = self.lock_exclusive()?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_roundtrip_and_delete() {
        let dir = tempdir().unwrap();
        let store = FileStore::open(dir.path().join("storage")).unwrap();

        assert_eq!(store.get("movieapp_user").unwrap(), None);

        store.set("movieapp_user", br#"{"id":"1"}"#).unwrap();
        assert_eq!(
            store.get("movieapp_user").unwrap().as_deref(),
            Some(&br#"{"id":"1"}"#[..])
        );
        assert!(store.record_path("movieapp_user").unwrap().exists());

        store.delete("movieapp_user").unwrap();
        assert_eq!(store.get("movieapp_user").unwrap(), None);
        // Second delete is a no-op
        store.delete("movieapp_user").unwrap();
    }

    #[test]
    fn test_overwrite_replaces_whole_record() {
        let dir = tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();

        store.set("k", b"a much longer first value").unwrap();
        store.set("k", b"short").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some(&b"short"[..]));
    }

    #[test]
    fn test_survives_reopen() {
        let dir = tempdir().unwrap();
        FileStore::open(dir.path()).unwrap().set("k", b"v").unwrap();

        let reopened = FileStore::open(dir.path()).unwrap();
        assert_eq!(reopened.get("k").unwrap().as_deref(), Some(&b"v"[..]));
    }

    #[test]
    fn test_rejects_unsafe_keys() {
        let dir = tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();

        for key in ["", "../escape", "a/b", ".lock", "with space"] {
            let err = store.set(key, b"x").unwrap_err();
            assert!(matches!(err, Error::Validation(_)), "key {:?}", key);
        }
    }
}
