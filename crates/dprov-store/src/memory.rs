use std::collections::HashMap;
use std::io;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::error::{StorageError, StorageResult};
use crate::traits::DataStorage;

/// In-memory, HashMap-based byte storage.
///
/// Intended for tests and embedding. Payloads are held behind a `RwLock` and
/// cloned on read and write. Keys are not interpreted as paths.
pub struct InMemoryStorage {
    entries: RwLock<HashMap<String, Vec<u8>>>,
}

impl InMemoryStorage {
    /// Create a new empty storage.
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.read().expect("lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().expect("lock poisoned").is_empty()
    }

    /// Remove the entry stored under `key`.
    pub fn delete(&self, key: &str) -> StorageResult<()> {
        self.entries
            .write()
            .expect("lock poisoned")
            .remove(key)
            .map(|_| ())
            .ok_or_else(|| StorageError::Delete(not_found(key)))
    }

    /// Return a sorted list of all stored keys.
    pub fn keys(&self) -> Vec<String> {
        let map = self.entries.read().expect("lock poisoned");
        let mut keys: Vec<String> = map.keys().cloned().collect();
        keys.sort();
        keys
    }
}

impl Default for InMemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for InMemoryStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryStorage")
            .field("entries", &self.len())
            .finish()
    }
}

fn not_found(key: &str) -> io::Error {
    io::Error::new(io::ErrorKind::NotFound, format!("no entry for {key:?}"))
}

#[async_trait]
impl DataStorage for InMemoryStorage {
    type Error = StorageError;

    async fn exists(&self, key: &str) -> bool {
        self.entries.read().expect("lock poisoned").contains_key(key)
    }

    async fn read(&self, key: &str) -> StorageResult<Vec<u8>> {
        self.entries
            .read()
            .expect("lock poisoned")
            .get(key)
            .cloned()
            .ok_or_else(|| StorageError::Read(not_found(key)))
    }

    async fn write(&self, key: &str, data: &[u8]) -> StorageResult<()> {
        if key.is_empty() {
            return Err(StorageError::path_invalid(key));
        }
        self.entries
            .write()
            .expect("lock poisoned")
            .insert(key.to_string(), data.to_vec());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn write_read_exists() {
        let storage = InMemoryStorage::new();
        assert!(!storage.exists("a").await);
        storage.write("a", b"alpha").await.unwrap();
        assert!(storage.exists("a").await);
        assert_eq!(storage.read("a").await.unwrap(), b"alpha");
        assert_eq!(storage.len(), 1);
    }

    #[tokio::test]
    async fn write_replaces() {
        let storage = InMemoryStorage::new();
        storage.write("a", b"one").await.unwrap();
        storage.write("a", b"two").await.unwrap();
        assert_eq!(storage.read("a").await.unwrap(), b"two");
        assert_eq!(storage.len(), 1);
    }

    #[tokio::test]
    async fn missing_key_is_not_found() {
        let storage = InMemoryStorage::default();
        let err = storage.read("ghost").await.unwrap_err();
        assert!(matches!(err, StorageError::Read(_)));
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn empty_key_is_invalid() {
        let storage = InMemoryStorage::new();
        assert!(matches!(
            storage.write("", b"x").await,
            Err(StorageError::PathInvalid { .. })
        ));
        assert!(storage.is_empty());
    }

    #[tokio::test]
    async fn delete_and_keys() {
        let storage = InMemoryStorage::new();
        storage.write("b", b"2").await.unwrap();
        storage.write("a", b"1").await.unwrap();
        assert_eq!(storage.keys(), vec!["a".to_string(), "b".to_string()]);

        storage.delete("a").unwrap();
        assert!(!storage.exists("a").await);
        assert!(storage.delete("a").unwrap_err().is_not_found());
    }
}
