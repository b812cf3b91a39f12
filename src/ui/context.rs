//! Terminal detection
//!
//! Decides two things from the same facts: whether output may use spinners
//! and progress bars, and which terminal flags `podman run` needs so the
//! toolchain sees the same stdin/stdout the user gave zigbox.

use crate::orchestration::RunConfig;
use std::io::IsTerminal;

/// What zigbox found out about its terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UiContext {
    stdin_tty: bool,
    stdout_tty: bool,
    ci: bool,
}

impl UiContext {
    /// Inspect the real stdin, stdout and environment
    pub fn detect() -> Self {
        Self {
            stdin_tty: std::io::stdin().is_terminal(),
            stdout_tty: std::io::stdout().is_terminal(),
            ci: running_in_ci(|key| std::env::var(key).ok()),
        }
    }

    /// Plain output and no terminal (tests, explicit CI mode)
    pub fn non_interactive() -> Self {
        Self {
            stdin_tty: false,
            stdout_tty: false,
            ci: true,
        }
    }

    /// Spinners and progress bars only on a terminal outside CI
    pub fn use_fancy_output(&self) -> bool {
        self.stdout_tty && !self.ci
    }

    /// Set `-i`/`-t` on a container run to mirror this terminal.
    ///
    /// stdin is forwarded when it is a terminal. A pseudo-TTY is allocated
    /// only when both ends are terminals, so piped output stays free of
    /// carriage returns.
    pub fn configure_run(&self, run: &mut RunConfig) {
        run.interactive = self.stdin_tty;
        run.tty = self.stdin_tty && self.stdout_tty;
    }
}

/// CI systems set `CI`; a few older ones only set their own marker
fn running_in_ci(var: impl Fn(&str) -> Option<String>) -> bool {
    if let Some(value) = var("CI") {
        return !matches!(value.as_str(), "" | "0" | "false");
    }
    ["GITHUB_ACTIONS", "GITLAB_CI", "BUILDKITE", "JENKINS_URL"]
        .iter()
        .any(|key| var(key).is_some())
}
