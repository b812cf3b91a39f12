//! zigbox - Zig nightly toolchain containers
//!
//! CLI entry point that dispatches to subcommands.

use clap::Parser;
use console::style;
use std::process::ExitCode;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use tracing_subscriber::EnvFilter;
use zigbox::cli::{commands, Cli, Commands};
use zigbox::config::{Config, ConfigManager};
use zigbox::error::ZigboxResult;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            if let Some(hint) = e.hint() {
                eprintln!("{} {}", style("Hint:").yellow(), hint);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> ZigboxResult<ExitCode> {
    let cli = Cli::parse();

    // Completions need neither config nor logging
    if let Commands::Completions(args) = cli.command {
        commands::completions(args);
        return Ok(ExitCode::SUCCESS);
    }

    let config_manager = match cli.config {
        Some(ref path) => ConfigManager::with_path(path.clone()),
        None => ConfigManager::new(),
    };
    let config = config_manager.load().await?;

    init_logging(cli.verbose, &config);
    debug!("Using config at {}", config_manager.path().display());

    let cancel = CancellationToken::new();
    spawn_interrupt_watcher(cancel.clone());

    match cli.command {
        Commands::Completions(_) => unreachable!("Completions handled above"),
        Commands::Resolve(args) => commands::resolve(args, &config, &cancel).await?,
        Commands::Dockerfile(args) => commands::dockerfile(args, &config, &cancel).await?,
        Commands::Build(args) => commands::build(args, &config, &config_manager, &cancel).await?,
        Commands::Run(args) => {
            let code = commands::run(args, &config, &config_manager, &cancel).await?;
            return Ok(exit_code(code));
        }
        Commands::Config(args) => commands::config(args, &config, &config_manager).await?,
    }

    Ok(ExitCode::SUCCESS)
}

/// Initialize logging: 0 = warn (spinners only), 1 = info, 2+ = debug
fn init_logging(verbose: u8, config: &Config) {
    let filter = match verbose {
        0 => EnvFilter::new("zigbox=warn"),
        1 => EnvFilter::new("zigbox=info"),
        _ => EnvFilter::new("zigbox=debug"),
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .without_time();

    if config.general.log_format == "json" {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// Cancel in-flight work on the first Ctrl-C, exit on the second
fn spawn_interrupt_watcher(cancel: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_err() {
            return;
        }
        debug!("Interrupt received, cancelling");
        cancel.cancel();

        if tokio::signal::ctrl_c().await.is_ok() {
            std::process::exit(130);
        }
    });
}

/// Map a container exit code onto the process exit code
fn exit_code(code: i32) -> ExitCode {
    match u8::try_from(code) {
        Ok(code) => ExitCode::from(code),
        Err(_) => ExitCode::FAILURE,
    }
}
