use async_trait::async_trait;

/// Key-addressed byte storage.
///
/// All implementations must satisfy these invariants:
/// - `exists` never fails: anything it cannot inspect reports `false`.
/// - `write` creates whatever containers the key implies.
/// - `write` is atomic: a concurrent `read` sees the old or the new payload,
///   never a mix. Overlapping writers to one key race; the last one wins.
/// - `read` after a successful `write` returns exactly the bytes written.
/// - No operation retries internally.
#[async_trait]
pub trait DataStorage: Send + Sync {
    /// The single error kind this storage fails with.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Check whether a payload is stored under `key`.
    async fn exists(&self, key: &str) -> bool;

    /// Load the payload stored under `key`.
    async fn read(&self, key: &str) -> Result<Vec<u8>, Self::Error>;

    /// Store `data` under `key`, replacing any previous payload.
    async fn write(&self, key: &str, data: &[u8]) -> Result<(), Self::Error>;
}

#[async_trait]
impl<S: DataStorage + ?Sized> DataStorage for std::sync::Arc<S> {
    type Error = S::Error;

    async fn exists(&self, key: &str) -> bool {
        (**self).exists(key).await
    }

    async fn read(&self, key: &str) -> Result<Vec<u8>, Self::Error> {
        (**self).read(key).await
    }

    async fn write(&self, key: &str, data: &[u8]) -> Result<(), Self::Error> {
        (**self).write(key, data).await
    }
}
