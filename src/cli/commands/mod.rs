//! CLI command implementations

pub mod build;
pub mod completions;
pub mod config;
pub mod dockerfile;
pub mod resolve;
pub mod run;

pub use build::execute as build;
pub use completions::execute as completions;
pub use config::execute as config;
pub use dockerfile::execute as dockerfile;
pub use resolve::execute as resolve;
pub use run::execute as run;

use crate::config::Config;
use crate::error::ZigboxResult;
use crate::index::{HttpIndexSource, IndexResolver};

/// Index source configured from `[index]`
pub(crate) fn index_source(config: &Config) -> ZigboxResult<HttpIndexSource> {
    HttpIndexSource::new(config.index.url.clone(), config.index.timeout())
}

/// Resolver over `source` expecting the configured builds prefix
pub(crate) fn index_resolver<'a>(
    source: &'a HttpIndexSource,
    config: &Config,
) -> IndexResolver<'a> {
    IndexResolver::new(source).with_builds_prefix(config.index.builds_prefix.clone())
}
