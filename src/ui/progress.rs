//! Progress display for index resolution and image builds

use super::context::UiContext;
use crate::error::ZigboxResult;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::future::Future;
use std::time::Duration;

/// Await `task` behind a spinner showing `message`.
///
/// On success the spinner is replaced by `done(&value)`, on failure by the
/// error message. Without a terminal, plain status lines are printed.
pub async fn with_spinner<T, F>(
    ctx: &UiContext,
    message: &str,
    task: F,
    done: impl FnOnce(&T) -> String,
) -> ZigboxResult<T>
where
    F: Future<Output = ZigboxResult<T>>,
{
    let spinner = if ctx.use_fancy_output() {
        let spinner = cliclack::spinner();
        spinner.start(message);
        Some(spinner)
    } else {
        println!("{} {}", style("...").dim(), message);
        None
    };

    let result = task.await;

    match (&result, spinner) {
        (Ok(value), Some(spinner)) => spinner.stop(done(value)),
        (Ok(value), None) => println!("{} {}", style("[OK]").green(), done(value)),
        (Err(e), Some(spinner)) => spinner.error(e.to_string()),
        (Err(_), None) => println!("{} {}", style("[FAIL]").red(), message),
    }

    result
}

/// One line of `podman build` output
#[derive(Debug, PartialEq, Eq)]
enum BuildLine<'a> {
    /// `STEP n/total: INSTRUCTION`
    Step {
        n: u64,
        total: u64,
        instruction: String,
    },
    /// Layer ids, cache hits and commit markers
    Noise,
    /// Output of the command a step runs (apt, curl, tar)
    Output(&'a str),
}

impl<'a> BuildLine<'a> {
    fn classify(line: &'a str) -> Self {
        let line = line.trim();
        if line.is_empty()
            || line.starts_with("-->")
            || line.starts_with("--->")
            || line.starts_with("COMMIT")
            || line.starts_with("Successfully tagged")
        {
            return BuildLine::Noise;
        }

        match Self::parse_step(line) {
            Some(step) => step,
            None => BuildLine::Output(line),
        }
    }

    fn parse_step(line: &str) -> Option<Self> {
        let (counts, instruction) = line.strip_prefix("STEP ")?.split_once(':')?;
        let (n, total) = counts.split_once('/')?;
        Some(BuildLine::Step {
            n: n.trim().parse().ok()?,
            total: total.trim().parse().ok()?,
            instruction: summarize_instruction(instruction.trim()),
        })
    }
}

/// Show exec-form `RUN ["curl","-fsSL",...]` as `curl -fsSL ...`
fn summarize_instruction(instruction: &str) -> String {
    instruction
        .strip_prefix("RUN ")
        .and_then(|argv| serde_json::from_str::<Vec<String>>(argv).ok())
        .map(|argv| argv.join(" "))
        .unwrap_or_else(|| instruction.to_string())
}

/// Truncate to `max` characters, marking the cut
fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        let kept: String = text.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    } else {
        text.to_string()
    }
}

/// Progress bar for the toolchain image build.
///
/// Advances on each build step. In plain mode only the steps are printed.
pub struct BuildProgress {
    bar: Option<ProgressBar>,
}

impl BuildProgress {
    /// Start tracking the build of the image for `archive`
    pub fn new(ctx: &UiContext, archive: &str) -> Self {
        let bar = if ctx.use_fancy_output() {
            let bar = ProgressBar::new(0);
            let bar_style = ProgressStyle::default_bar()
                .template("  {spinner:.cyan} {prefix} [{bar:20.cyan/dim}] {pos}/{len} {msg:.dim}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=> ");
            bar.set_style(bar_style);
            bar.set_prefix(archive.to_string());
            bar.enable_steady_tick(Duration::from_millis(120));
            Some(bar)
        } else {
            println!("Building image for {}", archive);
            None
        };
        Self { bar }
    }

    /// Feed one line of build output
    pub fn on_line(&self, line: String) {
        match (BuildLine::classify(&line), &self.bar) {
            (BuildLine::Step { n, total, instruction }, Some(bar)) => {
                bar.set_length(total);
                bar.set_position(n);
                bar.set_message(truncate(&instruction, 60));
            }
            (BuildLine::Step { n, total, instruction }, None) => {
                println!("  [{}/{}] {}", n, total, instruction);
            }
            (BuildLine::Output(text), Some(bar)) => bar.set_message(truncate(text, 60)),
            (BuildLine::Output(_), None) | (BuildLine::Noise, _) => {}
        }
    }

    /// Remove the bar once the build is over
    pub fn finish(&self) {
        if let Some(ref bar) = self.bar {
            bar.finish_and_clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ZigboxError;

    #[test]
    fn classify_exec_form_step() {
        let line = "STEP 5/10: RUN [\"curl\",\"-fsSL\",\"-o\",\"zig.tar.xz\",\"https://example.test/z.tar.xz\"]";
        assert_eq!(
            BuildLine::classify(line),
            BuildLine::Step {
                n: 5,
                total: 10,
                instruction: "curl -fsSL -o zig.tar.xz https://example.test/z.tar.xz".to_string(),
            }
        );
    }

    #[test]
    fn classify_plain_step() {
        assert_eq!(
            BuildLine::classify("STEP 1/10: FROM debian:bookworm-slim"),
            BuildLine::Step {
                n: 1,
                total: 10,
                instruction: "FROM debian:bookworm-slim".to_string(),
            }
        );
    }

    #[test]
    fn classify_noise_and_output() {
        assert_eq!(BuildLine::classify("--> Using cache 3f2a"), BuildLine::Noise);
        assert_eq!(BuildLine::classify("COMMIT zigbox-abc"), BuildLine::Noise);
        assert_eq!(BuildLine::classify("   "), BuildLine::Noise);
        assert_eq!(
            BuildLine::classify("STEP three: RUN"),
            BuildLine::Output("STEP three: RUN")
        );
        assert_eq!(
            BuildLine::classify("Setting up xz-utils (5.4.1-0.2) ..."),
            BuildLine::Output("Setting up xz-utils (5.4.1-0.2) ...")
        );
    }

    #[test]
    fn truncate_long_messages() {
        assert_eq!(truncate("short", 60), "short");
        assert_eq!(truncate("abcdefghij", 8), "abcde...");
    }

    #[tokio::test]
    async fn spinner_passes_result_through() {
        let ctx = UiContext::non_interactive();

        let ok = with_spinner(&ctx, "Resolving", async { Ok::<u32, ZigboxError>(7) }, |n| {
            format!("got {}", n)
        })
        .await;
        assert_eq!(ok.unwrap(), 7);

        let err = with_spinner(
            &ctx,
            "Resolving",
            async { Err::<u32, ZigboxError>(ZigboxError::Cancelled) },
            |_| String::new(),
        )
        .await;
        assert!(matches!(err, Err(ZigboxError::Cancelled)));
    }

    #[test]
    fn build_progress_plain_mode() {
        let ctx = UiContext::non_interactive();
        let progress = BuildProgress::new(&ctx, "zig-x86_64-linux-0.1.0-dev");
        progress.on_line("STEP 1/10: FROM debian:bookworm-slim".to_string());
        progress.on_line("--> abc123".to_string());
        progress.on_line("Get:1 http://deb.debian.org/debian bookworm InRelease".to_string());
        progress.finish();
    }
}
