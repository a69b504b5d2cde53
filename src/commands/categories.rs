//! Categories command

use civicverify::api;
use civicverify::output::{OutputMode, Render};

/// List supported issue categories
#[allow(clippy::unnecessary_wraps)]
pub fn categories(mode: OutputMode) -> anyhow::Result<()> {
    api::list_categories().render(mode);
    Ok(())
}
