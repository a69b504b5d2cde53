//! Config command - print the configuration in effect

use std::path::PathBuf;

use civicverify::config::Config;
use civicverify::output::{ConfigView, OutputMode, Render};

/// Show the active configuration and where it was loaded from
#[allow(clippy::unnecessary_wraps)]
pub fn show_config(source: Option<PathBuf>, config: Config, mode: OutputMode) -> anyhow::Result<()> {
    let view = ConfigView {
        source,
        store_path: config.store_path(),
        config,
    };
    view.render(mode);
    Ok(())
}
