use crate::codec::CodecError;

/// Errors from [`ObjectStorage`](crate::ObjectStorage).
///
/// `E` is the error type of the wrapped byte storage; it is carried through
/// unchanged so callers can still match on it.
#[derive(Debug, thiserror::Error)]
pub enum ObjectStorageError<E> {
    /// The underlying storage failed.
    #[error("storage: {0}")]
    Storage(#[source] E),

    /// The value could not be serialized; nothing was written.
    #[error("encode: {0}")]
    Encode(#[source] CodecError),

    /// The stored bytes could not be deserialized into the requested type.
    #[error("decode: {0}")]
    Decode(#[source] CodecError),
}

impl<E> ObjectStorageError<E> {
    /// The wrapped storage error, if this is one.
    pub fn storage_error(&self) -> Option<&E> {
        match self {
            Self::Storage(e) => Some(e),
            _ => None,
        }
    }
}

/// Result alias for object storage operations over storage error `E`.
pub type ObjectStorageResult<T, E> = Result<T, ObjectStorageError<E>>;
