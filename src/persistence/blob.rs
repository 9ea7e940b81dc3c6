use super::files::{atomic_write, read_file};
use crate::domain::PersistenceError;
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::PathBuf;

/// Durable key-value store of text blobs
pub trait BlobStore {
    /// Read a blob; `Ok(None)` when the key was never written
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError>;
    fn set(&self, key: &str, value: &str) -> Result<(), PersistenceError>;
}

/// One `<key>.json` file per key inside a directory
#[derive(Debug, Clone)]
pub struct FileBlobStore {
    dir: PathBuf,
}

impl FileBlobStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl BlobStore for FileBlobStore {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        read_file(self.path_for(key)).map_err(|source| PersistenceError::Io {
            key: key.to_string(),
            source,
        })
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PersistenceError> {
        atomic_write(self.path_for(key), value).map_err(|source| PersistenceError::Io {
            key: key.to_string(),
            source,
        })
    }
}

/// In-memory store for tests and for running without a data directory
#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    blobs: RefCell<HashMap<String, String>>,
}

impl BlobStore for MemoryBlobStore {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        Ok(self.blobs.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PersistenceError> {
        self.blobs.borrow_mut().insert(key.to_string(), value.to_string());
        Ok(())
    }
}
