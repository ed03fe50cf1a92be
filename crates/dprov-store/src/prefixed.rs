use async_trait::async_trait;

use crate::error::StorageResult;
use crate::file::{FileAttributes, FileStorage};
use crate::traits::DataStorage;

/// Scopes every key of an inner storage under a fixed prefix.
///
/// `PrefixedStorage::new(storage, "cache")` stores `"a.bin"` as
/// `"cache/a.bin"`. Trailing slashes on the prefix are ignored and an empty
/// prefix passes keys through untouched.
#[derive(Clone, Debug)]
pub struct PrefixedStorage<S> {
    inner: S,
    prefix: String,
}

impl<S> PrefixedStorage<S> {
    pub fn new(inner: S, prefix: impl Into<String>) -> Self {
        let prefix = prefix.into().trim_end_matches('/').to_string();
        Self { inner, prefix }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// The key the inner storage sees for `key`.
    pub fn scoped_key(&self, key: &str) -> String {
        if self.prefix.is_empty() {
            key.to_string()
        } else {
            format!("{}/{}", self.prefix, key)
        }
    }
}

impl PrefixedStorage<FileStorage> {
    pub async fn delete(&self, key: &str) -> StorageResult<()> {
        self.inner.delete(&self.scoped_key(key)).await
    }

    pub async fn attributes(&self, key: &str) -> StorageResult<FileAttributes> {
        self.inner.attributes(&self.scoped_key(key)).await
    }
}

#[async_trait]
impl<S: DataStorage> DataStorage for PrefixedStorage<S> {
    type Error = S::Error;

    async fn exists(&self, key: &str) -> bool {
        self.inner.exists(&self.scoped_key(key)).await
    }

    async fn read(&self, key: &str) -> Result<Vec<u8>, S::Error> {
        self.inner.read(&self.scoped_key(key)).await
    }

    async fn write(&self, key: &str, data: &[u8]) -> Result<(), S::Error> {
        self.inner.write(&self.scoped_key(key), data).await
    }
}
