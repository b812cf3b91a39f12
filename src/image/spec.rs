//! Image build plan
//!
//! Turns resolved build metadata into an ordered list of container build
//! operations. Construction is pure: the same metadata and options always
//! yield the same sequence.

use crate::index::BuildMetadata;
use serde::{Deserialize, Serialize};

/// Local file the tarball is downloaded to
pub const ARCHIVE_FILE: &str = "zig.tar.xz";

/// Canonical directory the toolchain is renamed to
pub const TOOLCHAIN_DIR: &str = "zig-master";

/// System directories placed ahead of the toolchain on PATH
const SYSTEM_PATH: &str = "/usr/bin:/usr/sbin:/bin:/sbin";

/// Options shaping the image
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageOptions {
    /// Base OS image
    pub base_image: String,

    /// Working directory the toolchain is unpacked into
    pub workdir: String,

    /// Create an unprivileged user and build/run as that user
    pub run_as_user: bool,

    /// Name of the unprivileged user
    pub user: String,
}

impl Default for ImageOptions {
    fn default() -> Self {
        Self {
            base_image: "debian:bookworm-slim".to_string(),
            workdir: "/app".to_string(),
            run_as_user: false,
            user: "zig".to_string(),
        }
    }
}

impl ImageOptions {
    /// Account the container runs as
    pub fn effective_user(&self) -> &str {
        if self.run_as_user {
            &self.user
        } else {
            "root"
        }
    }

    /// Home directory of the effective user
    pub fn home_dir(&self) -> String {
        if self.run_as_user {
            format!("/home/{}", self.user)
        } else {
            "/root".to_string()
        }
    }

    /// Zig global cache directory of the effective user
    pub fn cache_dir(&self) -> String {
        format!("{}/.cache/zig", self.home_dir())
    }

    /// Name of the persistent cache volume
    pub fn cache_volume(&self) -> String {
        format!("{}-zig-cache", self.effective_user())
    }

    /// Installed toolchain location
    pub fn toolchain_path(&self) -> String {
        format!("{}/{}", self.workdir.trim_end_matches('/'), TOOLCHAIN_DIR)
    }
}

/// A single container build operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum BuildOp {
    /// Start from a base image
    From { image: String },
    /// Set the working directory
    Workdir { path: String },
    /// Run a command (argv form, no shell)
    Exec { args: Vec<String> },
    /// Create an unprivileged user with a home directory
    CreateUser { name: String },
    /// Switch subsequent steps and the final image to a user
    User { name: String },
    /// Attach a named persistent cache volume at `path`
    MountCache { volume: String, path: String },
    /// Set an environment variable
    Env { key: String, value: String },
}

/// Ordered build operations for one image
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSpec {
    ops: Vec<BuildOp>,
}

impl ImageSpec {
    /// Operations in execution order
    pub fn ops(&self) -> &[BuildOp] {
        &self.ops
    }

    /// Cache mounts as `(volume, path)` pairs
    pub fn cache_mounts(&self) -> Vec<(String, String)> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                BuildOp::MountCache { volume, path } => Some((volume.clone(), path.clone())),
                _ => None,
            })
            .collect()
    }

    /// User the final image runs as, if a switch happened
    pub fn user(&self) -> Option<&str> {
        self.ops.iter().rev().find_map(|op| match op {
            BuildOp::User { name } => Some(name.as_str()),
            _ => None,
        })
    }
}

fn exec<I, S>(args: I) -> BuildOp
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    BuildOp::Exec {
        args: args.into_iter().map(Into::into).collect(),
    }
}

/// Describe an image with the nightly toolchain installed and on PATH.
pub fn build_image_spec(meta: &BuildMetadata, options: &ImageOptions) -> ImageSpec {
    let mut ops = vec![
        BuildOp::From {
            image: options.base_image.clone(),
        },
        BuildOp::Workdir {
            path: options.workdir.clone(),
        },
        exec(["apt-get", "update"]),
        exec(["apt-get", "install", "-y", "curl", "xz-utils"]),
        exec(["curl", "-fsSL", "-o", ARCHIVE_FILE, meta.download_url.as_str()]),
        exec(["tar", "xJf", ARCHIVE_FILE]),
        exec(["mv", meta.archive_name.as_str(), TOOLCHAIN_DIR]),
    ];

    if options.run_as_user {
        ops.push(BuildOp::CreateUser {
            name: options.user.clone(),
        });
        ops.push(BuildOp::User {
            name: options.user.clone(),
        });
    }

    ops.push(BuildOp::MountCache {
        volume: options.cache_volume(),
        path: options.cache_dir(),
    });
    ops.push(BuildOp::Env {
        key: "PATH".to_string(),
        value: format!("{}:{}", SYSTEM_PATH, options.toolchain_path()),
    });

    ImageSpec { ops }
}
