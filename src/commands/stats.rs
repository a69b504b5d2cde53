//! Stats command

use civicverify::adapters::JsonlOutcomeStore;
use civicverify::api::StatsData;
use civicverify::config::Config;
use civicverify::core::ports::OutcomeStore;
use civicverify::output::{OutputMode, Render};

/// Summarise every recorded verification
pub fn stats(config: Config, mode: OutputMode) -> anyhow::Result<()> {
    let store = JsonlOutcomeStore::new(config.store_path());
    StatsData::from_records(&store.list()?, 0).render(mode);
    Ok(())
}
