//! Native Podman engine
//!
//! Implements the ImageEngine trait by executing the `podman` binary
//! directly. Rootless Podman is expected but not required.

use crate::error::{ZigboxError, ZigboxResult};
use crate::orchestration::podman::RunConfig;
use crate::orchestration::runtime::ImageEngine;
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, info};

/// Engine using a local `podman` binary
pub struct NativePodmanEngine {
    program: String,
}

impl NativePodmanEngine {
    /// Create an engine that invokes `program` (usually `podman`)
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Check if Podman is installed
    async fn podman_installed(&self) -> bool {
        Command::new(&self.program)
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map(|s| s.success())
            .unwrap_or(false)
    }

    /// Execute a Podman command and return the output
    async fn exec(&self, args: &[&str]) -> ZigboxResult<std::process::Output> {
        debug!("Executing: {} {:?}", self.program, args);

        Command::new(&self.program)
            .args(args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| ZigboxError::command_failed(format!("{} {:?}", self.program, args), e))
    }
}

impl Default for NativePodmanEngine {
    fn default() -> Self {
        Self::new("podman")
    }
}

#[async_trait]
impl ImageEngine for NativePodmanEngine {
    async fn ensure_ready(&self) -> ZigboxResult<()> {
        if !self.podman_installed().await {
            return Err(ZigboxError::PodmanNotFound);
        }
        Ok(())
    }

    async fn image_exists(&self, tag: &str) -> ZigboxResult<bool> {
        let output = self.exec(&["image", "exists", tag]).await?;
        Ok(output.status.success())
    }

    async fn build_image(&self, context_dir: &Path, tag: &str) -> ZigboxResult<()> {
        let context_str = context_dir.display().to_string();
        info!("Building image: {}", tag);

        let output = self.exec(&["build", "-t", tag, &context_str]).await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stdout = String::from_utf8_lossy(&output.stdout);
            return Err(ZigboxError::ImageBuild {
                tag: tag.to_string(),
                reason: super::build_error_output(&stdout, &stderr),
            });
        }

        Ok(())
    }

    async fn build_image_with_progress(
        &self,
        context_dir: &Path,
        tag: &str,
        on_output: &(dyn Fn(String) + Send + Sync),
    ) -> ZigboxResult<()> {
        let context_str = context_dir.display().to_string();
        info!("Building image: {}", tag);

        let mut child = Command::new(&self.program)
            .args(["build", "-t", tag, &context_str])
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| ZigboxError::command_failed("podman build", e))?;

        let all_output = super::stream_child_output(&mut child, on_output).await?;

        let status = child
            .wait()
            .await
            .map_err(|e| ZigboxError::command_failed("podman build", e))?;

        if !status.success() {
            let combined = all_output.join("\n");
            return Err(ZigboxError::ImageBuild {
                tag: tag.to_string(),
                reason: super::build_error_output(&combined, ""),
            });
        }

        Ok(())
    }

    async fn volume_exists(&self, name: &str) -> ZigboxResult<bool> {
        let output = self.exec(&["volume", "exists", name]).await?;
        Ok(output.status.success())
    }

    async fn volume_create(
        &self,
        name: &str,
        labels: &HashMap<String, String>,
    ) -> ZigboxResult<()> {
        debug!("Creating volume: {}", name);

        let mut label_strings: Vec<String> =
            labels.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
        label_strings.sort();

        let mut args = vec!["volume", "create", "--ignore"];
        for label in &label_strings {
            args.push("--label");
            args.push(label);
        }
        args.push(name);

        let output = self.exec(&args).await?;

        if output.status.success() {
            debug!("Volume created: {}", name);
            Ok(())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            Err(ZigboxError::CacheVolumeCreate {
                name: name.to_string(),
                reason: stderr.trim().to_string(),
            })
        }
    }

    async fn run(&self, config: &RunConfig, command: &[String]) -> ZigboxResult<i32> {
        let args = config.to_args(command);
        debug!("Running container: {} {:?}", self.program, args);

        let status = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await
            .map_err(|e| ZigboxError::command_failed("podman run", e))?;

        // Killed by a signal
        status.code().ok_or_else(|| {
            ZigboxError::ContainerRun(format!("{} terminated by signal", config.image))
        })
    }

    fn runtime_name(&self) -> &'static str {
        "Native Podman"
    }
}
