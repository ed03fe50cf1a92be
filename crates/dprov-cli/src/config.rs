use std::path::Path;

use anyhow::Context;
use dprov_http::TransportConfig;
use dprov_store::FileStorageConfig;
use serde::{Deserialize, Serialize};

/// Top-level `dprov.toml` contents.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub storage: FileStorageConfig,
    pub transport: TransportConfig,
    /// Add a `Referer` header derived from each fetched URL.
    pub referer: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage: FileStorageConfig::default(),
            transport: TransportConfig::default(),
            referer: true,
        }
    }
}

impl Config {
    /// Read `path`, or return the defaults if it does not exist.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("parsing {}", path.display()))
    }
}
