//! Orchestration module for the container engine
//!
//! Builds images and runs containers through rootless Podman.

mod native_podman;
pub mod podman;
mod runtime;

pub use native_podman::NativePodmanEngine;
pub use podman::RunConfig;
pub use runtime::ImageEngine;

use crate::config::Config;
use crate::error::{ZigboxError, ZigboxResult};
use tokio::io::{AsyncBufReadExt, BufReader};

/// Max number of output lines to include in build error messages.
const BUILD_ERROR_TAIL_LINES: usize = 50;

/// Create the engine configured for this machine
pub fn create_engine(config: &Config) -> Box<dyn ImageEngine> {
    Box::new(NativePodmanEngine::new(config.engine.podman.clone()))
}

/// Extract the useful tail of build output for error diagnostics.
///
/// Combines stdout and stderr, then returns the last `BUILD_ERROR_TAIL_LINES`
/// lines so error messages are actionable without being overwhelming.
pub(crate) fn build_error_output(stdout: &str, stderr: &str) -> String {
    let lines: Vec<&str> = stdout.lines().chain(stderr.lines()).collect();
    let total = lines.len();
    let tail: Vec<&str> = if total > BUILD_ERROR_TAIL_LINES {
        lines[total - BUILD_ERROR_TAIL_LINES..].to_vec()
    } else {
        lines
    };
    tail.join("\n")
}

/// Stream stdout+stderr from a child process, calling `on_output` for each line.
///
/// Returns all collected output lines for error reporting.
pub(crate) async fn stream_child_output(
    child: &mut tokio::process::Child,
    on_output: &(dyn Fn(String) + Send + Sync),
) -> ZigboxResult<Vec<String>> {
    let stderr = child
        .stderr
        .take()
        .ok_or_else(|| ZigboxError::Internal("child stderr not piped".to_string()))?;
    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| ZigboxError::Internal("child stdout not piped".to_string()))?;

    let mut stderr_reader = BufReader::new(stderr).lines();
    let mut stdout_reader = BufReader::new(stdout).lines();

    let mut all_output = Vec::new();
    let mut stderr_done = false;
    let mut stdout_done = false;

    while !stderr_done || !stdout_done {
        tokio::select! {
            line = stderr_reader.next_line(), if !stderr_done => {
                match line {
                    Ok(Some(line)) => {
                        on_output(line.clone());
                        all_output.push(line);
                    }
                    _ => stderr_done = true,
                }
            }
            line = stdout_reader.next_line(), if !stdout_done => {
                match line {
                    Ok(Some(line)) => {
                        on_output(line.clone());
                        all_output.push(line);
                    }
                    _ => stdout_done = true,
                }
            }
        }
    }

    Ok(all_output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::process::Stdio;
    use std::sync::{Arc, Mutex};

    #[test]
    fn build_error_output_keeps_tail() {
        let stdout: String = (0..60).map(|i| format!("line {}\n", i)).collect();
        let tail = build_error_output(&stdout, "error: boom");

        assert_eq!(tail.lines().count(), BUILD_ERROR_TAIL_LINES);
        assert!(tail.ends_with("error: boom"));
        assert!(!tail.contains("line 10\n"));
    }

    #[test]
    fn build_error_output_short_is_unchanged() {
        assert_eq!(build_error_output("a\nb", "c"), "a\nb\nc");
    }

    #[tokio::test]
    async fn stream_child_output_collects_lines() {
        let mut child = tokio::process::Command::new("sh")
            .args(["-c", "echo out; echo err 1>&2"])
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .unwrap();

        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let lines = stream_child_output(&mut child, &move |line: String| {
            sink.lock().unwrap().push(line);
        })
        .await
        .unwrap();
        child.wait().await.unwrap();

        assert_eq!(lines.len(), 2);
        assert!(lines.contains(&"out".to_string()));
        assert!(lines.contains(&"err".to_string()));
        assert_eq!(seen.lock().unwrap().len(), 2);
    }
}
