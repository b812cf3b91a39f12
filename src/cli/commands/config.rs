//! Config command - show or initialize configuration

use crate::cli::args::{ConfigAction, ConfigArgs};
use crate::config::{Config, ConfigManager, InitOutcome};
use crate::error::ZigboxResult;
use crate::ui::{self, UiContext};

/// Execute the config command
pub async fn execute(
    args: ConfigArgs,
    config: &Config,
    manager: &ConfigManager,
) -> ZigboxResult<()> {
    match args.action {
        None | Some(ConfigAction::Show) => println!("{}", toml::to_string_pretty(config)?),
        Some(ConfigAction::Path) => println!("{}", manager.path().display()),
        Some(ConfigAction::Init { force }) => {
            let ctx = UiContext::detect();
            let path = manager.path().display().to_string();
            match manager.init(force).await? {
                InitOutcome::Created => ui::step_ok_detail(&ctx, "Configuration created", &path),
                InitOutcome::Overwritten => {
                    ui::step_ok_detail(&ctx, "Configuration reset to defaults", &path)
                }
                InitOutcome::Kept => ui::step_warn_hint(
                    &ctx,
                    &format!("Config already exists at {}", path),
                    "Use --force to overwrite",
                ),
            }
        }
    }

    Ok(())
}
