//! Error types for zigbox
//!
//! All modules use `ZigboxResult<T>` as their return type.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for zigbox operations
pub type ZigboxResult<T> = Result<T, ZigboxError>;

/// Boxed transport error carried by [`ZigboxError::Fetch`]
pub type TransportError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// All errors that can occur in zigbox
#[derive(Error, Debug)]
pub enum ZigboxError {
    // Index errors
    #[error("Unsupported platform: {0}. Supported platforms: linux/amd64")]
    UnsupportedPlatform(String),

    #[error("Failed to fetch download index {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: TransportError,
    },

    #[error("Malformed download index: {reason}")]
    MalformedIndex {
        reason: String,
        #[source]
        source: Option<serde_json::Error>,
    },

    #[error("Operation cancelled")]
    Cancelled,

    // Engine errors
    #[error("Podman not found. Install it with your package manager (e.g. apt install podman)")]
    PodmanNotFound,

    #[error("Image build failed: {tag}: {reason}")]
    ImageBuild { tag: String, reason: String },

    #[error("Container failed to run: {0}")]
    ContainerRun(String),

    #[error("Failed to create cache volume {name}: {reason}")]
    CacheVolumeCreate { name: String, reason: String },

    // Configuration errors
    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    #[error("Failed to create config directory {path}: {source}")]
    ConfigDirCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    // Process errors
    #[error("Command failed: {command}")]
    CommandFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    // Serialization errors
    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    // General errors
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ZigboxError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create a fetch error wrapping a transport failure
    pub fn fetch(url: impl Into<String>, source: impl Into<TransportError>) -> Self {
        Self::Fetch {
            url: url.into(),
            source: source.into(),
        }
    }

    /// Create a malformed index error without an underlying parse error
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedIndex {
            reason: reason.into(),
            source: None,
        }
    }

    /// Create a command failed error
    pub fn command_failed(command: impl Into<String>, source: std::io::Error) -> Self {
        Self::CommandFailed {
            command: command.into(),
            source,
        }
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::UnsupportedPlatform(_) => Some("Use --platform linux/amd64"),
            Self::Fetch { .. } => Some("Check network access to ziglang.org or set index.url"),
            Self::PodmanNotFound => Some("Install podman, then run: podman info"),
            _ => None,
        }
    }
}
