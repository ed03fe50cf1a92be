use std::io::{self, Write};
use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::compression::CompressionAlgorithm;
use crate::config::FileStorageConfig;
use crate::error::{StorageError, StorageResult};
use crate::traits::DataStorage;

// ---------------------------------------------------------------------------
// FileAttributes
// ---------------------------------------------------------------------------

/// Filesystem metadata for a stored entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileAttributes {
    /// Creation time, when the filesystem records one.
    pub created: Option<DateTime<Utc>>,
    /// Last modification time.
    pub modified: DateTime<Utc>,
    /// Size of the file on disk in bytes.
    ///
    /// This is the *persisted* size: with compression enabled it is the
    /// compressed length, not the length `read` returns. Callers that need
    /// the logical size must read the entry and measure it.
    pub size: u64,
}

// ---------------------------------------------------------------------------
// FileStorage
// ---------------------------------------------------------------------------

/// [`DataStorage`] over a directory tree.
///
/// Keys are paths relative to `root`. A key may only contain normal path
/// components, so nothing it names can sit outside `root`. The check is
/// lexical: symlinks already present under `root` are followed as-is.
///
/// When a [`CompressionAlgorithm`] is configured, payloads are compressed
/// before they are persisted and decompressed after they are loaded; only
/// the compressed form ever reaches disk.
#[derive(Clone, Debug)]
pub struct FileStorage {
    root: PathBuf,
    compression: CompressionAlgorithm,
}

impl FileStorage {
    pub fn new(root: impl Into<PathBuf>, compression: CompressionAlgorithm) -> Self {
        Self {
            root: root.into(),
            compression,
        }
    }

    /// Storage at `config.root` with `config.compression`.
    ///
    /// `config.prefix` is not applied here; use
    /// [`FileStorageConfig::open`] for storage scoped under it.
    pub fn from_config(config: &FileStorageConfig) -> Self {
        Self::new(config.root.clone(), config.compression)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn compression(&self) -> CompressionAlgorithm {
        self.compression
    }

    /// Map `key` to its location under the root.
    ///
    /// Fails with [`StorageError::PathInvalid`] for empty keys, absolute
    /// paths and any `..` component.
    pub fn resolve(&self, key: &str) -> StorageResult<PathBuf> {
        let mut path = self.root.clone();
        let mut depth = 0usize;
        for component in Path::new(key).components() {
            match component {
                Component::Normal(part) => {
                    path.push(part);
                    depth += 1;
                }
                Component::CurDir => {}
                Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                    return Err(StorageError::path_invalid(key));
                }
            }
        }
        if depth == 0 {
            return Err(StorageError::path_invalid(key));
        }
        Ok(path)
    }

    /// Remove the entry stored under `key`.
    pub async fn delete(&self, key: &str) -> StorageResult<()> {
        let path = self.resolve(key)?;
        tokio::fs::remove_file(&path)
            .await
            .map_err(StorageError::Delete)?;
        debug!(key, "deleted");
        Ok(())
    }

    /// Metadata for the entry stored under `key`.
    ///
    /// [`FileAttributes::size`] is the persisted size; see its docs.
    pub async fn attributes(&self, key: &str) -> StorageResult<FileAttributes> {
        let path = self.resolve(key)?;
        let metadata = tokio::fs::metadata(&path)
            .await
            .map_err(StorageError::Attributes)?;
        let modified = metadata.modified().map_err(StorageError::Attributes)?;
        Ok(FileAttributes {
            created: metadata.created().ok().map(DateTime::<Utc>::from),
            modified: DateTime::<Utc>::from(modified),
            size: metadata.len(),
        })
    }
}

#[async_trait]
impl DataStorage for FileStorage {
    type Error = StorageError;

    async fn exists(&self, key: &str) -> bool {
        let Ok(path) = self.resolve(key) else {
            return false;
        };
        match tokio::fs::metadata(&path).await {
            Ok(metadata) => metadata.is_file(),
            Err(_) => false,
        }
    }

    async fn read(&self, key: &str) -> StorageResult<Vec<u8>> {
        let path = self.resolve(key)?;
        let persisted = tokio::fs::read(&path).await.map_err(StorageError::Read)?;
        debug!(key, bytes = persisted.len(), "read");

        if !self.compression.is_enabled() {
            return Ok(persisted);
        }

        let algorithm = self.compression;
        let data = tokio::task::spawn_blocking(move || algorithm.decompress(&persisted))
            .await
            .map_err(|e| StorageError::Read(io::Error::other(e)))?
            .map_err(|e| {
                warn!(key, %algorithm, error = %e, "decompression failed");
                StorageError::Read(e)
            })?;
        debug!(key, %algorithm, bytes = data.len(), "decompressed");
        Ok(data)
    }

    async fn write(&self, key: &str, data: &[u8]) -> StorageResult<()> {
        let path = self.resolve(key)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(StorageError::Write)?;
        }

        let algorithm = self.compression;
        let logical = data.len();
        let data = data.to_vec();
        let persisted = tokio::task::spawn_blocking(move || -> io::Result<usize> {
            let payload = algorithm.compress(&data)?;
            persist_atomically(&path, &payload)?;
            Ok(payload.len())
        })
        .await
        .map_err(|e| StorageError::Write(io::Error::other(e)))?
        .map_err(StorageError::Write)?;

        if algorithm.is_enabled() && logical > 0 {
            debug!(
                key,
                %algorithm,
                logical,
                persisted,
                ratio = persisted as f64 / logical as f64,
                "wrote compressed"
            );
        } else {
            debug!(key, bytes = persisted, "wrote");
        }
        Ok(())
    }
}

/// Write `payload` to a temp file next to `path`, then rename it into place.
///
/// The temp file is removed if anything fails before the rename.
fn persist_atomically(path: &Path, payload: &[u8]) -> io::Result<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(payload)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use proptest::prelude::*;

    use super::*;

    fn storage(compression: CompressionAlgorithm) -> (tempfile::TempDir, FileStorage) {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path(), compression);
        (dir, storage)
    }

    fn compressible() -> Vec<u8> {
        b"2024-11-29T10:00:00Z,EURUSD,1.0550,1.0552\n".repeat(256)
    }

    // -----------------------------------------------------------------------
    // Key resolution
    // -----------------------------------------------------------------------

    #[test]
    fn resolve_joins_root_and_key() {
        let storage = FileStorage::new("/data", CompressionAlgorithm::None);
        assert_eq!(
            storage.resolve("a/b.txt").unwrap(),
            PathBuf::from("/data/a/b.txt")
        );
        assert_eq!(
            storage.resolve("./a/./b.txt").unwrap(),
            PathBuf::from("/data/a/b.txt")
        );
    }

    #[test]
    fn resolve_rejects_escapes() {
        let storage = FileStorage::new("/data", CompressionAlgorithm::None);
        for key in ["", ".", "..", "../etc/passwd", "a/../../b", "/etc/passwd"] {
            assert!(
                matches!(storage.resolve(key), Err(StorageError::PathInvalid { .. })),
                "{key:?} should be rejected"
            );
        }
    }

    // -----------------------------------------------------------------------
    // Read / write
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn write_then_read_roundtrips_for_every_algorithm() {
        for algorithm in CompressionAlgorithm::ALL {
            let (_dir, storage) = storage(algorithm);
            let data = compressible();
            storage.write("quotes/eurusd.csv", &data).await.unwrap();
            assert_eq!(storage.read("quotes/eurusd.csv").await.unwrap(), data);
        }
    }

    #[tokio::test]
    async fn write_creates_intermediate_directories() {
        let (dir, storage) = storage(CompressionAlgorithm::None);
        storage.write("a/b/c/d.bin", b"deep").await.unwrap();
        assert!(dir.path().join("a/b/c").is_dir());
        assert_eq!(std::fs::read(dir.path().join("a/b/c/d.bin")).unwrap(), b"deep");
    }

    #[tokio::test]
    async fn write_replaces_previous_payload() {
        let (_dir, storage) = storage(CompressionAlgorithm::Zlib);
        storage.write("k", b"first version").await.unwrap();
        storage.write("k", b"second").await.unwrap();
        assert_eq!(storage.read("k").await.unwrap(), b"second");
    }

    #[tokio::test]
    async fn write_leaves_no_temp_files() {
        let (dir, storage) = storage(CompressionAlgorithm::Lz4);
        storage.write("only.bin", b"payload").await.unwrap();
        let names: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("only.bin")]);
    }

    #[tokio::test]
    async fn only_compressed_bytes_reach_disk() {
        let (dir, storage) = storage(CompressionAlgorithm::Lzma);
        let data = compressible();
        storage.write("c.bin", &data).await.unwrap();
        let on_disk = std::fs::read(dir.path().join("c.bin")).unwrap();
        assert_ne!(on_disk, data);
        assert_eq!(CompressionAlgorithm::Lzma.decompress(&on_disk).unwrap(), data);
    }

    #[tokio::test]
    async fn missing_key_is_read_error() {
        let (_dir, storage) = storage(CompressionAlgorithm::None);
        let err = storage.read("never/written").await.unwrap_err();
        assert!(matches!(err, StorageError::Read(_)));
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn invalid_key_is_path_invalid() {
        let (_dir, storage) = storage(CompressionAlgorithm::None);
        assert!(matches!(
            storage.read("../outside").await,
            Err(StorageError::PathInvalid { .. })
        ));
        assert!(matches!(
            storage.write("../outside", b"x").await,
            Err(StorageError::PathInvalid { .. })
        ));
    }

    #[tokio::test]
    async fn corrupt_compressed_file_is_read_error() {
        let (dir, storage) = storage(CompressionAlgorithm::Zlib);
        std::fs::write(dir.path().join("bad"), b"plain, not zlib").unwrap();
        let err = storage.read("bad").await.unwrap_err();
        assert!(matches!(err, StorageError::Read(ref e) if e.kind() == io::ErrorKind::InvalidData));
    }

    #[tokio::test]
    async fn truncated_compressed_file_is_read_error() {
        for algorithm in CompressionAlgorithm::ALL.into_iter().filter(|a| a.is_enabled()) {
            let (dir, storage) = storage(algorithm);
            let data: Vec<u8> = (0..20_000u32).map(|i| (i * 13 % 241) as u8).collect();
            storage.write("series.bin", &data).await.unwrap();

            let path = dir.path().join("series.bin");
            let persisted = std::fs::read(&path).unwrap();
            std::fs::write(&path, &persisted[..persisted.len() / 2]).unwrap();

            let err = storage.read("series.bin").await.unwrap_err();
            assert!(
                matches!(err, StorageError::Read(ref e) if e.kind() == io::ErrorKind::InvalidData),
                "{algorithm}: {err}"
            );
        }
    }

    #[tokio::test]
    async fn write_into_file_path_is_write_error() {
        let (_dir, storage) = storage(CompressionAlgorithm::None);
        storage.write("blocker", b"file").await.unwrap();
        let err = storage.write("blocker/child", b"x").await.unwrap_err();
        assert!(matches!(err, StorageError::Write(_)));
    }

    // -----------------------------------------------------------------------
    // Existence / delete
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn exists_tracks_write_and_delete() {
        let (_dir, storage) = storage(CompressionAlgorithm::Lzfse);
        assert!(!storage.exists("Test/entry.txt").await);
        storage.write("Test/entry.txt", b"Hello").await.unwrap();
        assert!(storage.exists("Test/entry.txt").await);
        storage.delete("Test/entry.txt").await.unwrap();
        assert!(!storage.exists("Test/entry.txt").await);
    }

    #[tokio::test]
    async fn exists_is_false_for_invalid_keys_and_directories() {
        let (_dir, storage) = storage(CompressionAlgorithm::None);
        storage.write("dir/file", b"x").await.unwrap();
        assert!(!storage.exists("../dir/file").await);
        assert!(!storage.exists("").await);
        assert!(!storage.exists("dir").await);
    }

    #[tokio::test]
    async fn delete_missing_is_delete_error() {
        let (_dir, storage) = storage(CompressionAlgorithm::None);
        let err = storage.delete("ghost").await.unwrap_err();
        assert!(matches!(err, StorageError::Delete(_)));
        assert!(err.is_not_found());
    }

    // -----------------------------------------------------------------------
    // Attributes
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn attributes_report_plain_size() {
        let (_dir, storage) = storage(CompressionAlgorithm::None);
        storage.write("Test/hello.txt", b"Hello").await.unwrap();
        let attrs = storage.attributes("Test/hello.txt").await.unwrap();
        assert_eq!(attrs.size, 5);
        if let Some(created) = attrs.created {
            assert!(created <= Utc::now());
        }
        assert!(attrs.modified <= Utc::now());
    }

    #[tokio::test]
    async fn attributes_report_persisted_size_when_compressed() {
        for algorithm in CompressionAlgorithm::ALL.into_iter().filter(|a| a.is_enabled()) {
            let (_dir, storage) = storage(algorithm);
            let data = compressible();
            storage.write("big.csv", &data).await.unwrap();

            let attrs = storage.attributes("big.csv").await.unwrap();
            assert!(
                attrs.size < data.len() as u64,
                "{algorithm}: persisted {} >= logical {}",
                attrs.size,
                data.len()
            );
            assert_eq!(storage.read("big.csv").await.unwrap(), data);
        }
    }

    #[tokio::test]
    async fn attributes_of_missing_key_is_attributes_error() {
        let (_dir, storage) = storage(CompressionAlgorithm::None);
        assert!(matches!(
            storage.attributes("ghost").await,
            Err(StorageError::Attributes(_))
        ));
    }

    // -----------------------------------------------------------------------
    // Concurrency
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn concurrent_writers_leave_one_whole_payload() {
        let (_dir, storage) = storage(CompressionAlgorithm::Lz4);
        let storage = Arc::new(storage);
        let payloads: Vec<Vec<u8>> = (0u8..8).map(|i| vec![i; 64 * 1024]).collect();

        let handles: Vec<_> = payloads
            .iter()
            .cloned()
            .map(|payload| {
                let storage = Arc::clone(&storage);
                tokio::spawn(async move { storage.write("shared", &payload).await })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let stored = storage.read("shared").await.unwrap();
        assert!(payloads.contains(&stored));
    }

    #[test]
    fn from_config_uses_root_and_compression() {
        let config = FileStorageConfig {
            root: PathBuf::from("/srv/cache"),
            compression: CompressionAlgorithm::Lzma,
            prefix: None,
        };
        let storage = FileStorage::from_config(&config);
        assert_eq!(storage.root(), Path::new("/srv/cache"));
        assert_eq!(storage.compression(), CompressionAlgorithm::Lzma);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(16))]

        #[test]
        fn arbitrary_payloads_roundtrip_through_disk(
            data in proptest::collection::vec(any::<u8>(), 0..2048),
            compressed in any::<bool>(),
        ) {
            let algorithm = if compressed { CompressionAlgorithm::Zlib } else { CompressionAlgorithm::None };
            let (_dir, storage) = storage(algorithm);
            let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap();
            let read = runtime.block_on(async {
                storage.write("p/payload.bin", &data).await.unwrap();
                storage.read("p/payload.bin").await.unwrap()
            });
            prop_assert_eq!(read, data);
        }
    }
}
