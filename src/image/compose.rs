//! Image composition
//!
//! Renders an image spec to a Dockerfile and builds it with a
//! content-addressed tag. The tag is derived from a SHA256 hash of the
//! rendered Dockerfile, so an unchanged nightly reuses the existing image.

use crate::cache::CacheVolume;
use crate::error::{ZigboxError, ZigboxResult};
use crate::image::dockerfile::render_dockerfile;
use crate::image::spec::ImageSpec;
use crate::orchestration::{ImageEngine, RunConfig};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Tag prefix for every image zigbox builds
pub const IMAGE_TAG_PREFIX: &str = "zigbox-";

/// A built (or already present) image and what running it needs
#[derive(Debug, Clone)]
pub struct ImageHandle {
    /// Full image tag (e.g. "zigbox-a1b2c3d4e5f6")
    pub tag: String,

    /// Cache volumes to attach when running the image
    pub cache_volumes: Vec<CacheVolume>,

    /// User the image switched to, if any
    pub user: Option<String>,

    /// Whether the image was already present (no build needed)
    pub was_cached: bool,
}

impl ImageHandle {
    /// Container configuration for running commands in this image
    pub fn run_config(&self) -> RunConfig {
        RunConfig {
            image: self.tag.clone(),
            user: self.user.clone(),
            volumes: self.cache_volumes.iter().map(CacheVolume::volume_arg).collect(),
            ..RunConfig::default()
        }
    }
}

/// Compute a deterministic image tag from the rendered Dockerfile.
pub fn compute_image_tag(dockerfile: &str) -> String {
    let hash = hex::encode(Sha256::digest(dockerfile.as_bytes()));
    format!("{}{}", IMAGE_TAG_PREFIX, &hash[..12])
}

/// Build the image described by `spec` unless it already exists.
///
/// The Dockerfile is written to a fresh directory under `builds_dir`,
/// which is removed again once the build finishes. Cache volumes named by
/// `spec` are created if missing.
pub async fn compose_image(
    engine: &dyn ImageEngine,
    spec: &ImageSpec,
    builds_dir: &Path,
    on_output: Option<&(dyn Fn(String) + Send + Sync)>,
) -> ZigboxResult<ImageHandle> {
    let dockerfile = render_dockerfile(spec);
    let tag = compute_image_tag(&dockerfile);
    debug!("Composed image tag: {}", tag);

    let cache_volumes: Vec<CacheVolume> = spec
        .cache_mounts()
        .into_iter()
        .map(|(volume, path)| CacheVolume::new(volume, path))
        .collect();

    for volume in &cache_volumes {
        volume.ensure(engine).await?;
    }

    let handle = |was_cached| ImageHandle {
        tag: tag.clone(),
        cache_volumes: cache_volumes.clone(),
        user: spec.user().map(str::to_string),
        was_cached,
    };

    if engine.image_exists(&tag).await.unwrap_or(false) {
        debug!("Image already present: {}", tag);
        return Ok(handle(true));
    }

    let build_dir = prepare_build_dir(builds_dir, &dockerfile).await?;

    let result = match on_output {
        Some(on_output) => {
            engine
                .build_image_with_progress(&build_dir, &tag, on_output)
                .await
        }
        None => engine.build_image(&build_dir, &tag).await,
    };

    // Clean up build directory (best-effort)
    let _ = tokio::fs::remove_dir_all(&build_dir).await;

    result?;

    Ok(handle(false))
}

/// Write the Dockerfile into a unique directory under `builds_dir`.
async fn prepare_build_dir(builds_dir: &Path, dockerfile: &str) -> ZigboxResult<PathBuf> {
    let build_dir = builds_dir.join(uuid::Uuid::new_v4().to_string());
    tokio::fs::create_dir_all(&build_dir)
        .await
        .map_err(|e| ZigboxError::io("creating build directory", e))?;

    tokio::fs::write(build_dir.join("Dockerfile"), dockerfile)
        .await
        .map_err(|e| ZigboxError::io("writing Dockerfile", e))?;

    Ok(build_dir)
}
