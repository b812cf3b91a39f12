//! Dockerfile rendering
//!
//! Podman consumes the build plan as a Dockerfile. Commands use the exec
//! (JSON array) form so arguments reach the program untouched.

use crate::image::spec::{BuildOp, ImageSpec};

/// Render an image spec as a Dockerfile.
///
/// Cache volumes cannot be attached during a plain `podman build`; their
/// mount points are created here and the volume is attached at run time.
pub fn render_dockerfile(spec: &ImageSpec) -> String {
    let mut lines = Vec::new();

    for op in spec.ops() {
        match op {
            BuildOp::From { image } => lines.push(format!("FROM {}", image)),
            BuildOp::Workdir { path } => lines.push(format!("WORKDIR {}", path)),
            BuildOp::Exec { args } => lines.push(format!("RUN {}", exec_form(args))),
            BuildOp::CreateUser { name } => {
                let args = [
                    "useradd".to_string(),
                    "--create-home".to_string(),
                    "--shell".to_string(),
                    "/bin/sh".to_string(),
                    name.clone(),
                ];
                lines.push(format!("RUN {}", exec_form(&args)));
            }
            BuildOp::User { name } => lines.push(format!("USER {}", name)),
            BuildOp::MountCache { volume, path } => {
                lines.push(format!("# Cache volume: {} -> {}", volume, path));
                let args = ["mkdir".to_string(), "-p".to_string(), path.clone()];
                lines.push(format!("RUN {}", exec_form(&args)));
            }
            BuildOp::Env { key, value } => {
                lines.push(format!("ENV {}={}", key, dockerfile_quote(value)))
            }
        }
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

/// JSON array form of a command (`["apt-get", "update"]`)
fn exec_form(args: &[String]) -> String {
    // Serializing a list of strings cannot fail
    serde_json::to_string(args).unwrap_or_else(|_| "[]".to_string())
}

/// Quote a value for Dockerfile ENV instruction.
/// Embedded double quotes and backslashes are escaped to prevent injection.
fn dockerfile_quote(value: &str) -> String {
    if value.contains('$') || value.contains(' ') || value.contains('"') || value.contains('\\') {
        let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
        format!("\"{}\"", escaped)
    } else {
        value.to_string()
    }
}
