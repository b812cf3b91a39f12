//! Container engine abstraction
//!
//! The engine handle is passed explicitly to everything that builds or runs
//! images, so tests can substitute a fake and nothing relies on a
//! process-wide client.

use crate::error::ZigboxResult;
use crate::orchestration::podman::RunConfig;
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::Path;

/// Abstract container engine interface
#[async_trait]
pub trait ImageEngine: Send + Sync {
    /// Ensure the engine is ready to build and run images
    async fn ensure_ready(&self) -> ZigboxResult<()>;

    /// Check if an image with this tag exists locally
    async fn image_exists(&self, tag: &str) -> ZigboxResult<bool>;

    /// Build the Dockerfile in `context_dir` and tag the result
    async fn build_image(&self, context_dir: &Path, tag: &str) -> ZigboxResult<()>;

    /// Build like [`ImageEngine::build_image`], streaming each output line
    async fn build_image_with_progress(
        &self,
        context_dir: &Path,
        tag: &str,
        on_output: &(dyn Fn(String) + Send + Sync),
    ) -> ZigboxResult<()>;

    /// Check if a named volume exists
    async fn volume_exists(&self, name: &str) -> ZigboxResult<bool>;

    /// Create a named volume with labels (no-op if it exists)
    async fn volume_create(&self, name: &str, labels: &HashMap<String, String>)
        -> ZigboxResult<()>;

    /// Run a command in a fresh container and return its exit code
    async fn run(&self, config: &RunConfig, command: &[String]) -> ZigboxResult<i32>;

    /// Get the human-readable engine name for display
    fn runtime_name(&self) -> &'static str;
}
