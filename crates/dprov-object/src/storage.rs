use dprov_store::DataStorage;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::codec::{Codec, JsonCodec};
use crate::error::{ObjectStorageError, ObjectStorageResult};

/// Stores serializable values in a [`DataStorage`].
///
/// Every error is attributed to the stage that produced it: encoding,
/// the storage itself, or decoding.
#[derive(Clone, Debug)]
pub struct ObjectStorage<S, C = JsonCodec> {
    storage: S,
    codec: C,
}

impl<S: DataStorage> ObjectStorage<S, JsonCodec> {
    /// JSON-encoded objects over `storage`.
    pub fn json(storage: S) -> Self {
        Self::new(storage, JsonCodec)
    }
}

impl<S: DataStorage, C: Codec> ObjectStorage<S, C> {
    pub fn new(storage: S, codec: C) -> Self {
        Self { storage, codec }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn codec(&self) -> &C {
        &self.codec
    }

    pub async fn exists(&self, key: &str) -> bool {
        self.storage.exists(key).await
    }

    /// Load and decode the value stored under `key`.
    pub async fn read<T: DeserializeOwned>(&self, key: &str) -> ObjectStorageResult<T, S::Error> {
        let bytes = self
            .storage
            .read(key)
            .await
            .map_err(ObjectStorageError::Storage)?;
        let value = self.codec.decode(&bytes).map_err(ObjectStorageError::Decode)?;
        debug!(key, bytes = bytes.len(), "object decoded");
        Ok(value)
    }

    /// Encode `value` and store it under `key`.
    ///
    /// Nothing is written when encoding fails.
    pub async fn write<T: Serialize + ?Sized + Sync>(
        &self,
        value: &T,
        key: &str,
    ) -> ObjectStorageResult<(), S::Error> {
        let bytes = self.codec.encode(value).map_err(ObjectStorageError::Encode)?;
        self.storage
            .write(key, &bytes)
            .await
            .map_err(ObjectStorageError::Storage)?;
        debug!(key, bytes = bytes.len(), "object stored");
        Ok(())
    }
}
