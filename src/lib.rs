//! zigbox - Zig nightly toolchain containers
//!
//! Resolves the latest nightly Zig build from the official download index
//! and builds a rootless Podman image with the toolchain installed and a
//! persistent Zig cache volume attached.

pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod image;
pub mod index;
pub mod orchestration;
pub mod ui;

pub use error::{ZigboxError, ZigboxResult};
