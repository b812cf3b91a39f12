//! Dockerfile command - print the rendered Dockerfile

use super::{index_resolver, index_source};
use crate::cli::args::ImageArgs;
use crate::config::Config;
use crate::error::ZigboxResult;
use crate::image::{build_image_spec, render_dockerfile};
use tokio_util::sync::CancellationToken;

/// Execute the dockerfile command
///
/// Only the Dockerfile goes to stdout so the output can be piped.
pub async fn execute(
    args: ImageArgs,
    config: &Config,
    cancel: &CancellationToken,
) -> ZigboxResult<()> {
    let platform = args.platform.resolve(config);
    let options = args.image_options(config);

    let source = index_source(config)?;
    let meta = index_resolver(&source, config)
        .resolve(&platform, cancel)
        .await?;

    print!("{}", render_dockerfile(&build_image_spec(&meta, &options)));
    Ok(())
}
