//! Podman shared types
//!
//! Contains data structures used by engine implementations.
//! The actual Podman execution logic is in `native_podman`.

use std::collections::HashMap;

/// Configuration for running a command in a built image
#[derive(Debug, Clone, Default)]
pub struct RunConfig {
    /// Image tag to run
    pub image: String,
    /// User to run as (image default if unset)
    pub user: Option<String>,
    /// Working directory inside the container (image default if unset)
    pub workdir: Option<String>,
    /// Volume mounts (volume:path format)
    pub volumes: Vec<String>,
    /// Environment variables
    pub env: HashMap<String, String>,
    /// Keep stdin open
    pub interactive: bool,
    /// Allocate a TTY
    pub tty: bool,
}

impl RunConfig {
    /// Arguments for `podman run`, ending with the image and command
    pub fn to_args(&self, command: &[String]) -> Vec<String> {
        let mut args = vec!["run".to_string(), "--rm".to_string()];

        if self.interactive {
            args.push("-i".to_string());
        }
        if self.tty {
            args.push("-t".to_string());
        }

        if let Some(ref user) = self.user {
            args.push("--user".to_string());
            args.push(user.clone());
        }

        if let Some(ref workdir) = self.workdir {
            args.push("-w".to_string());
            args.push(workdir.clone());
        }

        for v in &self.volumes {
            args.push("-v".to_string());
            args.push(v.clone());
        }

        // Sorted for stable command lines
        let mut env: Vec<(&String, &String)> = self.env.iter().collect();
        env.sort();
        for (k, v) in env {
            args.push("-e".to_string());
            args.push(format!("{}={}", k, v));
        }

        args.push(self.image.clone());
        args.extend(command.iter().cloned());
        args
    }
}
