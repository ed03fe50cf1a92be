use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::compression::CompressionAlgorithm;
use crate::file::FileStorage;
use crate::prefixed::PrefixedStorage;

/// Settings for a [`FileStorage`](crate::FileStorage).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileStorageConfig {
    /// Directory all keys resolve under.
    pub root: PathBuf,
    pub compression: CompressionAlgorithm,
    /// Sub-directory prepended to every key, if any. Applied by
    /// [`FileStorageConfig::open`].
    pub prefix: Option<String>,
}

impl Default for FileStorageConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from(".dprov"),
            compression: CompressionAlgorithm::None,
            prefix: None,
        }
    }
}

impl FileStorageConfig {
    /// File storage as configured, scoped under `prefix` when one is set.
    pub fn open(&self) -> PrefixedStorage<FileStorage> {
        PrefixedStorage::new(
            FileStorage::from_config(self),
            self.prefix.clone().unwrap_or_default(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let c = FileStorageConfig::default();
        assert_eq!(c.root, PathBuf::from(".dprov"));
        assert_eq!(c.compression, CompressionAlgorithm::None);
        assert!(c.prefix.is_none());
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let c: FileStorageConfig = serde_json::from_str(r#"{"compression":"lz4"}"#).unwrap();
        assert_eq!(c.compression, CompressionAlgorithm::Lz4);
        assert_eq!(c.root, PathBuf::from(".dprov"));
    }

    #[tokio::test]
    async fn open_applies_prefix() {
        use crate::traits::DataStorage;

        let dir = tempfile::tempdir().unwrap();
        let config = FileStorageConfig {
            root: dir.path().to_path_buf(),
            compression: CompressionAlgorithm::Lz4,
            prefix: Some("Caches/".into()),
        };
        let storage = config.open();
        assert_eq!(storage.prefix(), "Caches");
        storage.write("feed.json", b"[]").await.unwrap();
        assert!(dir.path().join("Caches/feed.json").is_file());
        assert_eq!(storage.read("feed.json").await.unwrap(), b"[]");
    }

    #[tokio::test]
    async fn open_without_prefix_uses_root() {
        use crate::traits::DataStorage;

        let dir = tempfile::tempdir().unwrap();
        let config = FileStorageConfig {
            root: dir.path().to_path_buf(),
            ..FileStorageConfig::default()
        };
        config.open().write("top.bin", b"x").await.unwrap();
        assert!(dir.path().join("top.bin").is_file());
    }

    #[test]
    fn serde_roundtrip() {
        let c = FileStorageConfig {
            root: "/var/cache/dprov".into(),
            compression: CompressionAlgorithm::Lzma,
            prefix: Some("quotes".into()),
        };
        let json = serde_json::to_string(&c).unwrap();
        let back: FileStorageConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, c);
    }
}
