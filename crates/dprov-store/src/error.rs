use std::io;

/// Errors from byte storage operations.
///
/// Every variant except [`StorageError::PathInvalid`] carries the underlying
/// I/O failure. Compression and decompression failures are reported as
/// [`StorageError::Write`] and [`StorageError::Read`] respectively.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The key does not resolve to a location inside the storage root.
    #[error("invalid storage key: {key:?}")]
    PathInvalid { key: String },

    /// Loading (or decompressing) the payload failed.
    #[error("read error: {0}")]
    Read(#[source] io::Error),

    /// Compressing or persisting the payload failed.
    #[error("write error: {0}")]
    Write(#[source] io::Error),

    /// Removing the entry failed.
    #[error("delete error: {0}")]
    Delete(#[source] io::Error),

    /// Querying the entry's attributes failed.
    #[error("attributes error: {0}")]
    Attributes(#[source] io::Error),
}

impl StorageError {
    pub(crate) fn path_invalid(key: &str) -> Self {
        Self::PathInvalid { key: key.to_string() }
    }

    /// The underlying I/O error, if any.
    pub fn io_error(&self) -> Option<&io::Error> {
        match self {
            Self::PathInvalid { .. } => None,
            Self::Read(e) | Self::Write(e) | Self::Delete(e) | Self::Attributes(e) => Some(e),
        }
    }

    /// Returns `true` if the entry did not exist.
    pub fn is_not_found(&self) -> bool {
        self.io_error()
            .is_some_and(|e| e.kind() == io::ErrorKind::NotFound)
    }
}

/// Result alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;
