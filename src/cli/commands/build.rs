//! Build command - build the toolchain image

use super::{index_resolver, index_source};
use crate::cli::args::ImageArgs;
use crate::config::{Config, ConfigManager};
use crate::error::ZigboxResult;
use crate::image::{build_image_spec, compose_image};
use crate::orchestration::create_engine;
use crate::ui::{self, BuildProgress, UiContext};
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Execute the build command
pub async fn execute(
    args: ImageArgs,
    config: &Config,
    manager: &ConfigManager,
    cancel: &CancellationToken,
) -> ZigboxResult<()> {
    let ctx = UiContext::detect();
    let platform = args.platform.resolve(config);
    let options = args.image_options(config);

    let source = index_source(config)?;
    let resolver = index_resolver(&source, config);
    let meta = ui::with_spinner(
        &ctx,
        &format!("Resolving nightly Zig for {}...", platform),
        resolver.resolve(&platform, cancel),
        |meta| format!("Resolved {}", meta.archive_name),
    )
    .await?;

    let engine = create_engine(config);
    engine.ensure_ready().await?;
    let builds_dir = manager.ensure_builds_dir().await?;
    debug!("Using {} engine", engine.runtime_name());

    let spec = build_image_spec(&meta, &options);
    let progress = BuildProgress::new(&ctx, &meta.archive_name);
    let on_output: &(dyn Fn(String) + Send + Sync) = &|line: String| progress.on_line(line);

    let result = compose_image(
        engine.as_ref(),
        &spec,
        &builds_dir,
        Some(on_output),
    )
    .await;
    progress.finish();
    let handle = result?;

    let status = if handle.was_cached {
        "Image up to date"
    } else {
        "Image built"
    };
    ui::step_ok_detail(&ctx, status, &handle.tag);
    for volume in &handle.cache_volumes {
        ui::key_value(&ctx, "cache", &volume.volume_arg());
    }

    Ok(())
}
