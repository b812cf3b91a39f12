//! UI module for consistent CLI output
//!
//! `cliclack` spinners and log lines on a terminal, plain status lines in
//! CI or when output is piped.

mod context;
mod output;
mod progress;

pub use context::UiContext;
pub use output::{key_value, step_info, step_ok, step_ok_detail, step_warn_hint};
pub use progress::{with_spinner, BuildProgress};
