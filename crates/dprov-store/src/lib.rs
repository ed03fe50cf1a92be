//! Key-addressed byte storage for dprov.
//!
//! [`DataStorage`] is the contract: `exists`, `read` and `write` by string
//! key. [`FileStorage`] maps keys onto a directory tree and can compress
//! payloads transparently with any [`CompressionAlgorithm`].
//!
//! # Backends
//!
//! - [`FileStorage`] -- directory tree, atomic replacement, optional compression
//! - [`InMemoryStorage`] -- `HashMap` behind a lock, for tests and embedding
//! - [`PrefixedStorage`] -- scopes another backend under a sub-directory

pub mod compression;
pub mod config;
pub mod error;
pub mod file;
pub mod memory;
pub mod prefixed;
pub mod traits;

pub use compression::CompressionAlgorithm;
pub use config::FileStorageConfig;
pub use error::{StorageError, StorageResult};
pub use file::{FileAttributes, FileStorage};
pub use memory::InMemoryStorage;
pub use prefixed::PrefixedStorage;
pub use traits::DataStorage;
