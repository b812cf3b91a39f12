//! Toolchain cache volumes
//!
//! The Zig global cache lives in a named volume so compiled artifacts
//! survive across containers. Volumes are labelled so they can be told
//! apart from volumes created by other tools.

use crate::error::ZigboxResult;
use crate::orchestration::ImageEngine;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tracing::debug;

/// Volume label keys used to track cache metadata
pub mod labels {
    /// Marks volume as a zigbox cache
    pub const ZIGBOX_CACHE: &str = "io.zigbox.cache";
    /// Mount path inside the container
    pub const PATH: &str = "io.zigbox.cache.path";
    /// Creation timestamp (RFC3339)
    pub const CREATED_AT: &str = "io.zigbox.cache.created_at";
}

/// A named cache volume and where it is mounted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheVolume {
    /// Volume name (e.g. `root-zig-cache`)
    pub name: String,
    /// Mount path inside the container
    pub container_path: String,
    /// When the volume record was created
    pub created_at: DateTime<Utc>,
}

impl CacheVolume {
    /// Create a new cache volume record
    pub fn new(name: impl Into<String>, container_path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            container_path: container_path.into(),
            created_at: Utc::now(),
        }
    }

    /// Generate labels for volume creation
    pub fn labels(&self) -> HashMap<String, String> {
        let mut labels = HashMap::new();
        labels.insert(labels::ZIGBOX_CACHE.to_string(), "true".to_string());
        labels.insert(labels::PATH.to_string(), self.container_path.clone());
        labels.insert(labels::CREATED_AT.to_string(), self.created_at.to_rfc3339());
        labels
    }

    /// Generate the volume mount string for podman
    pub fn volume_arg(&self) -> String {
        format!("{}:{}", self.name, self.container_path)
    }

    /// Create the volume unless it already exists.
    ///
    /// Returns `true` if a new volume was created.
    pub async fn ensure(&self, engine: &dyn ImageEngine) -> ZigboxResult<bool> {
        if engine.volume_exists(&self.name).await? {
            debug!("Cache volume exists: {}", self.name);
            return Ok(false);
        }

        engine.volume_create(&self.name, &self.labels()).await?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cache_volume_labels() {
        let vol = CacheVolume::new("root-zig-cache", "/root/.cache/zig");
        let labels = vol.labels();

        assert_eq!(labels.get(labels::ZIGBOX_CACHE), Some(&"true".to_string()));
        assert_eq!(labels.get(labels::PATH), Some(&"/root/.cache/zig".to_string()));
        assert!(labels.contains_key(labels::CREATED_AT));
    }

    #[test]
    fn cache_volume_arg() {
        let vol = CacheVolume::new("root-zig-cache", "/root/.cache/zig");
        assert_eq!(vol.volume_arg(), "root-zig-cache:/root/.cache/zig");
    }
}
