//! Configuration schema for zigbox
//!
//! Configuration is stored at `~/.config/zigbox/config.toml`

use crate::image::ImageOptions;
use crate::index::{BUILDS_URL_PREFIX, DEFAULT_INDEX_URL};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// Download index settings
    pub index: IndexConfig,

    /// Image settings
    pub image: ImageOptions,

    /// Container engine settings
    pub engine: EngineConfig,
}

impl Config {
    /// Reject settings that would only fail later, mid-resolve or mid-build
    pub fn validate(&self) -> Result<(), String> {
        if self.index.timeout_secs == 0 {
            return Err("index.timeout_secs must be greater than zero".to_string());
        }
        if !self.index.builds_prefix.ends_with('/') {
            return Err(format!(
                "index.builds_prefix must end with '/', got {:?}",
                self.index.builds_prefix
            ));
        }
        if self.image.run_as_user && (self.image.user.is_empty() || self.image.user == "root") {
            return Err("image.user must name a non-root user when run_as_user is set".to_string());
        }
        if !self.image.workdir.starts_with('/') {
            return Err(format!("image.workdir must be absolute, got {:?}", self.image.workdir));
        }
        Ok(())
    }
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log format: "text" or "json"
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_format: "text".to_string(),
        }
    }
}

/// Download index settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    /// URL of the JSON download index
    pub url: String,

    /// Prefix every nightly tarball URL must start with
    pub builds_prefix: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// Default platform (e.g. "linux/amd64")
    pub platform: String,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_INDEX_URL.to_string(),
            builds_prefix: BUILDS_URL_PREFIX.to_string(),
            timeout_secs: 30,
            platform: "linux/amd64".to_string(),
        }
    }
}

impl IndexConfig {
    /// Request timeout as a duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Container engine settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Podman binary to invoke
    pub podman: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            podman: "podman".to_string(),
        }
    }
}
