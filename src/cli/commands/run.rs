//! Run command - run a command with the nightly toolchain

use super::{index_resolver, index_source};
use crate::cli::args::RunArgs;
use crate::config::{Config, ConfigManager};
use crate::error::{ZigboxError, ZigboxResult};
use crate::image::zig_container;
use crate::orchestration::create_engine;
use crate::ui::{self, UiContext};
use std::collections::HashMap;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Execute the run command, returning the container's exit code
pub async fn execute(
    args: RunArgs,
    config: &Config,
    manager: &ConfigManager,
    cancel: &CancellationToken,
) -> ZigboxResult<i32> {
    let ctx = UiContext::detect();
    let platform = args.image.platform.resolve(config);
    let options = args.image.image_options(config);
    let env = parse_env(&args.env)?;

    let engine = create_engine(config);
    engine.ensure_ready().await?;
    let builds_dir = manager.ensure_builds_dir().await?;

    let source = index_source(config)?;
    let resolver = index_resolver(&source, config);

    ui::step_info(&ctx, &format!("Preparing nightly Zig for {}", platform));
    let handle = zig_container(
        engine.as_ref(),
        &resolver,
        Some(&platform),
        &options,
        &builds_dir,
        cancel,
    )
    .await?;

    if handle.was_cached {
        ui::step_ok(&ctx, "Image up to date");
    } else {
        ui::step_ok_detail(&ctx, "Image built", &handle.tag);
    }

    let mut run_config = handle.run_config();
    run_config.volumes.extend(args.volumes.iter().cloned());
    run_config.workdir = args.workdir.clone();
    run_config.env = env;
    ctx.configure_run(&mut run_config);

    info!("Running {:?} in {}", args.command, handle.tag);
    let code = engine.run(&run_config, &args.command).await?;
    debug!("Container exited with {}", code);

    Ok(code)
}

/// Parse `KEY=VALUE` pairs given with `--env`
fn parse_env(pairs: &[String]) -> ZigboxResult<HashMap<String, String>> {
    pairs
        .iter()
        .map(|pair| match pair.split_once('=') {
            Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
            _ => Err(ZigboxError::InvalidArgument(format!(
                "invalid environment variable '{}', expected KEY=VALUE",
                pair
            ))),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_env_pairs() {
        let env = parse_env(&[
            "ZIG_GLOBAL_CACHE_DIR=/tmp/zig".to_string(),
            "EMPTY=".to_string(),
            "OPTS=a=b".to_string(),
        ])
        .unwrap();

        assert_eq!(env["ZIG_GLOBAL_CACHE_DIR"], "/tmp/zig");
        assert_eq!(env["EMPTY"], "");
        assert_eq!(env["OPTS"], "a=b");
    }

    #[test]
    fn parse_env_rejects_missing_separator() {
        assert!(parse_env(&["NOVALUE".to_string()]).is_err());
        assert!(parse_env(&["=value".to_string()]).is_err());
    }
}
