//! Resolve command - show the latest nightly build

use super::{index_resolver, index_source};
use crate::cli::args::ResolveArgs;
use crate::config::Config;
use crate::error::{ZigboxError, ZigboxResult};
use crate::index::BuildMetadata;
use crate::ui::{self, UiContext};
use tokio_util::sync::CancellationToken;

/// Execute the resolve command
pub async fn execute(
    args: ResolveArgs,
    config: &Config,
    cancel: &CancellationToken,
) -> ZigboxResult<()> {
    let platform = args.platform.resolve(config);
    let source = index_source(config)?;
    let resolver = index_resolver(&source, config);

    if args.json {
        let meta = resolver.resolve(&platform, cancel).await?;
        let json = serde_json::to_string_pretty(&meta)
            .map_err(|e| ZigboxError::Internal(format!("serializing build metadata: {}", e)))?;
        println!("{}", json);
        return Ok(());
    }

    let ctx = UiContext::detect();
    let meta = ui::with_spinner(
        &ctx,
        &format!("Resolving nightly Zig for {}...", platform),
        resolver.resolve(&platform, cancel),
        |_| "Resolved nightly build".to_string(),
    )
    .await?;

    print_metadata(&ctx, &meta);
    Ok(())
}

fn print_metadata(ctx: &UiContext, meta: &BuildMetadata) {
    if let Some(ref version) = meta.version {
        ui::key_value(ctx, "version", &version.to_string());
    }
    ui::key_value(ctx, "archive", &meta.archive_name);
    ui::key_value(ctx, "url", &meta.download_url);
    if let Some(ref shasum) = meta.shasum {
        ui::key_value(ctx, "sha256", shasum);
    }
    if let Some(size) = meta.size {
        ui::key_value(ctx, "size", &format_bytes(size));
    }
}

/// Format bytes as human-readable size (e.g., "45.1 MB")
fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_bytes_units() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(2048), "2.0 KB");
        assert_eq!(format_bytes(47_312_740), "45.1 MB");
        assert_eq!(format_bytes(3 * 1024 * 1024 * 1024), "3.0 GB");
    }
}
