//! Status command - latest recorded verification of one issue

use civicverify::adapters::JsonlOutcomeStore;
use civicverify::api::StatusData;
use civicverify::config::Config;
use civicverify::core::ports::OutcomeStore;
use civicverify::output::{OutputMode, Render};

/// Show what was last decided for an issue
pub fn status(issue_id: u64, config: Config, mode: OutputMode) -> anyhow::Result<()> {
    let store = JsonlOutcomeStore::new(config.store_path());
    let records = store.for_issue(issue_id)?;

    let Some(status) = StatusData::from_records(&records) else {
        anyhow::bail!("No verification found for issue {issue_id}");
    };
    status.render(mode);
    Ok(())
}
