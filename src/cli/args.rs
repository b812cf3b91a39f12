//! CLI argument definitions using clap derive

use crate::config::Config;
use crate::image::ImageOptions;
use crate::index::Platform;
use clap::{ArgAction, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// zigbox - Zig nightly toolchain containers
///
/// Resolves the latest Zig nightly build and builds a rootless Podman
/// image with the toolchain on PATH.
#[derive(Parser, Debug)]
#[command(name = "zigbox")]
#[command(author, version, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, global = true, env = "ZIGBOX_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the latest nightly build for a platform
    Resolve(ResolveArgs),

    /// Print the Dockerfile for the latest nightly
    Dockerfile(ImageArgs),

    /// Build the toolchain image
    Build(ImageArgs),

    /// Run a command in the toolchain image (builds it if needed)
    Run(RunArgs),

    /// Show or initialize configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Platform selection shared by commands that resolve a build
#[derive(Parser, Debug, Default)]
pub struct PlatformArgs {
    /// Target platform (default from config, normally linux/amd64)
    #[arg(short, long)]
    pub platform: Option<String>,
}

impl PlatformArgs {
    /// Platform from the flag, falling back to the configured default
    pub fn resolve(&self, config: &Config) -> Platform {
        Platform::parse(self.platform.as_deref().unwrap_or(&config.index.platform))
    }
}

/// Arguments for the resolve command
#[derive(Parser, Debug)]
pub struct ResolveArgs {
    #[command(flatten)]
    pub platform: PlatformArgs,

    /// Print as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments shaping the image (dockerfile, build)
#[derive(Parser, Debug, Default)]
pub struct ImageArgs {
    #[command(flatten)]
    pub platform: PlatformArgs,

    /// Create an unprivileged user and run as it
    #[arg(long, conflicts_with = "as_root")]
    pub as_user: bool,

    /// Build and run as root
    #[arg(long)]
    pub as_root: bool,

    /// Name of the unprivileged user (implies --as-user)
    #[arg(long, conflicts_with = "as_root")]
    pub user: Option<String>,

    /// Base image to install the toolchain into
    #[arg(long)]
    pub base_image: Option<String>,
}

impl ImageArgs {
    /// Image options from config with command-line overrides applied
    pub fn image_options(&self, config: &Config) -> ImageOptions {
        let mut options = config.image.clone();

        if self.as_root {
            options.run_as_user = false;
        }
        if self.as_user {
            options.run_as_user = true;
        }
        if let Some(ref user) = self.user {
            options.run_as_user = true;
            options.user = user.clone();
        }
        if let Some(ref base_image) = self.base_image {
            options.base_image = base_image.clone();
        }

        options
    }
}

/// Arguments for the run command
#[derive(Parser, Debug)]
pub struct RunArgs {
    #[command(flatten)]
    pub image: ImageArgs,

    /// Additional volume mounts (host:container)
    #[arg(long = "volume")]
    pub volumes: Vec<String>,

    /// Working directory inside the container
    #[arg(short, long)]
    pub workdir: Option<String>,

    /// Environment variables (KEY=VALUE)
    #[arg(short, long = "env")]
    pub env: Vec<String>,

    /// Command to run (after --)
    #[arg(last = true, required = true)]
    pub command: Vec<String>,
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: Option<ConfigAction>,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,

    /// Write the default configuration file
    Init {
        /// Overwrite existing config
        #[arg(short, long)]
        force: bool,
    },
}

/// Arguments for the completions command
#[derive(Parser, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
