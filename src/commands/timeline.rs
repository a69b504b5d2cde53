//! Timeline command - what has happened to one issue

use civicverify::adapters::JsonlTimelineStore;
use civicverify::api::TimelineData;
use civicverify::config::Config;
use civicverify::core::ports::TimelineStore;
use civicverify::output::{OutputMode, Render};
use civicverify::paths;

/// List the recorded timeline events of an issue, oldest first
pub fn timeline(issue_id: u64, config: Config, mode: OutputMode) -> anyhow::Result<()> {
    let store = JsonlTimelineStore::new(paths::timeline_beside(&config.store_path()));
    let events = store.for_issue(issue_id)?;
    TimelineData { issue_id, events }.render(mode);
    Ok(())
}
