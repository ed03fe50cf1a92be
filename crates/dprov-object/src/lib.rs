//! Typed object storage for dprov.
//!
//! [`ObjectStorage`] layers a [`Codec`] over any
//! [`DataStorage`](dprov_store::DataStorage): values are encoded on write and
//! decoded on read, and each failure says which stage produced it.

pub mod codec;
pub mod error;
pub mod storage;

pub use codec::{BincodeCodec, Codec, CodecError, JsonCodec};
pub use error::{ObjectStorageError, ObjectStorageResult};
pub use storage::ObjectStorage;
