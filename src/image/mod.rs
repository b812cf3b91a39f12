//! Zig toolchain images
//!
//! Describes, renders and builds a container image with the nightly Zig
//! toolchain installed and on PATH.

pub mod compose;
pub mod dockerfile;
pub mod spec;

pub use compose::{compose_image, compute_image_tag, ImageHandle};
pub use dockerfile::render_dockerfile;
pub use spec::{build_image_spec, BuildOp, ImageOptions, ImageSpec};

use crate::error::ZigboxResult;
use crate::index::{IndexResolver, Platform};
use crate::orchestration::ImageEngine;
use std::path::Path;
use tokio_util::sync::CancellationToken;

/// Produce an image with the latest nightly Zig for `platform`
/// (default `linux/amd64`).
///
/// Either a complete image handle is returned or the first failing stage's
/// error; nothing is built when resolution fails.
pub async fn zig_container(
    engine: &dyn ImageEngine,
    resolver: &IndexResolver<'_>,
    platform: Option<&Platform>,
    options: &ImageOptions,
    builds_dir: &Path,
    cancel: &CancellationToken,
) -> ZigboxResult<ImageHandle> {
    let default_platform = Platform::default();
    let platform = platform.unwrap_or(&default_platform);

    let meta = resolver.resolve(platform, cancel).await?;
    let spec = build_image_spec(&meta, options);
    compose_image(engine, &spec, builds_dir, None).await
}
