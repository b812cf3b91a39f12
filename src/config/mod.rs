//! Configuration management for zigbox
//!
//! One TOML file holds the settings; a separate state directory holds the
//! transient build contexts handed to `podman build`.

pub mod schema;

pub use schema::Config;

use crate::error::{ZigboxError, ZigboxResult};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

/// What `init` did with the config file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitOutcome {
    Created,
    Overwritten,
    /// A file was already there and `force` was not given
    Kept,
}

/// Locates, loads and writes configuration and state
pub struct ConfigManager {
    config_path: PathBuf,
    state_dir: PathBuf,
}

impl ConfigManager {
    /// Manager using `~/.config/zigbox/config.toml` and the user state dir
    pub fn new() -> Self {
        Self::with_path(Self::default_config_path())
    }

    /// Manager reading `path` instead of the default config file
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            config_path: path,
            state_dir: Self::default_state_dir(),
        }
    }

    /// Keep build contexts under `dir` instead of the user state dir
    pub fn with_state_dir(mut self, dir: PathBuf) -> Self {
        self.state_dir = dir;
        self
    }

    fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("zigbox")
            .join("config.toml")
    }

    fn default_state_dir() -> PathBuf {
        dirs::state_dir()
            .or_else(dirs::data_local_dir)
            .unwrap_or_else(|| PathBuf::from("."))
            .join("zigbox")
    }

    /// Config file path
    pub fn path(&self) -> &Path {
        &self.config_path
    }

    /// Directory holding one subdirectory per in-progress image build
    pub fn builds_dir(&self) -> PathBuf {
        self.state_dir.join("builds")
    }

    /// Load and validate the configuration; a missing file means defaults
    pub async fn load(&self) -> ZigboxResult<Config> {
        let config = match fs::read_to_string(&self.config_path).await {
            Ok(content) => toml::from_str(&content).map_err(|e| self.invalid(e.to_string()))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No config at {}, using defaults", self.config_path.display());
                Config::default()
            }
            Err(e) => {
                return Err(ZigboxError::io(
                    format!("reading config from {}", self.config_path.display()),
                    e,
                ))
            }
        };

        config.validate().map_err(|reason| self.invalid(reason))?;
        Ok(config)
    }

    /// Write `config`, creating the parent directory if needed
    pub async fn save(&self, config: &Config) -> ZigboxResult<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| ZigboxError::ConfigDirCreate {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
        }

        let content = toml::to_string_pretty(config)?;
        fs::write(&self.config_path, content).await.map_err(|e| {
            ZigboxError::io(format!("writing config to {}", self.config_path.display()), e)
        })?;

        info!("Configuration saved to {}", self.config_path.display());
        Ok(())
    }

    /// Write the default configuration unless a file exists and `force` is off
    pub async fn init(&self, force: bool) -> ZigboxResult<InitOutcome> {
        let existed = fs::try_exists(&self.config_path).await.unwrap_or(false);
        if existed && !force {
            return Ok(InitOutcome::Kept);
        }

        self.save(&Config::default()).await?;
        Ok(if existed {
            InitOutcome::Overwritten
        } else {
            InitOutcome::Created
        })
    }

    /// Create the builds directory, returning its path
    pub async fn ensure_builds_dir(&self) -> ZigboxResult<PathBuf> {
        let dir = self.builds_dir();
        fs::create_dir_all(&dir)
            .await
            .map_err(|e| ZigboxError::io(format!("creating directory {}", dir.display()), e))?;
        Ok(dir)
    }

    fn invalid(&self, reason: String) -> ZigboxError {
        ZigboxError::ConfigInvalid {
            path: self.config_path.clone(),
            reason,
        }
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}
