//! In-process adapters
//!
//! `InMemoryHashRegistry` backs duplicate detection for a single process;
//! the JSON-lines registry wraps it to survive restarts.
//! `MemoryOutcomeStore` keeps records in a vector; useful in tests and when
//! persistence is switched off. `MemoryTimelineStore` does the same for
//! timeline events.

use std::sync::{PoisonError, RwLock};

use crate::core::models::{PerceptualHash, TimelineEvent, VerificationRecord};
use crate::core::ports::{HashMatch, HashRegistry, OutcomeStore, TimelineStore};

/// Perceptual hashes seen so far, with the issue that introduced each
#[derive(Debug, Default)]
pub struct InMemoryHashRegistry {
    entries: RwLock<Vec<(PerceptualHash, u64)>>,
}

impl InMemoryHashRegistry {
    /// Empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry pre-loaded with known hashes
    #[must_use]
    pub fn with_entries(entries: impl IntoIterator<Item = (PerceptualHash, u64)>) -> Self {
        Self {
            entries: RwLock::new(entries.into_iter().collect()),
        }
    }

    /// Record a hash; returns `false` when the pair was already known
    pub fn insert(&self, hash: PerceptualHash, issue_id: u64) -> anyhow::Result<bool> {
        let mut entries = self.entries.write().map_err(poisoned)?;
        if entries.contains(&(hash, issue_id)) {
            return Ok(false);
        }
        entries.push((hash, issue_id));
        Ok(true)
    }
}

fn poisoned<T>(_: PoisonError<T>) -> anyhow::Error {
    anyhow::anyhow!("hash registry lock poisoned")
}

impl HashRegistry for InMemoryHashRegistry {
    fn find_similar(
        &self,
        hash: &PerceptualHash,
        exclude_issue: u64,
        threshold: f64,
    ) -> anyhow::Result<Option<HashMatch>> {
        let entries = self.entries.read().map_err(poisoned)?;
        Ok(entries
            .iter()
            .filter(|(_, issue_id)| *issue_id != exclude_issue)
            .map(|(known, issue_id)| HashMatch {
                issue_id: *issue_id,
                similarity: hash.similarity(known),
            })
            .find(|m| m.similarity >= threshold))
    }

    fn record(&self, hash: PerceptualHash, issue_id: u64) -> anyhow::Result<()> {
        self.insert(hash, issue_id).map(|_| ())
    }

    fn len(&self) -> anyhow::Result<usize> {
        Ok(self.entries.read().map_err(poisoned)?.len())
    }
}

/// Verification records held in memory
#[derive(Debug, Default)]
pub struct MemoryOutcomeStore {
    records: RwLock<Vec<VerificationRecord>>,
}

impl MemoryOutcomeStore {
    /// Empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl OutcomeStore for MemoryOutcomeStore {
    fn save(&self, record: &VerificationRecord) -> anyhow::Result<()> {
        self.records
            .write()
            .map_err(|_| anyhow::anyhow!("outcome store lock poisoned"))?
            .push(record.clone());
        Ok(())
    }

    fn list(&self) -> anyhow::Result<Vec<VerificationRecord>> {
        Ok(self.records.read().map_err(|_| anyhow::anyhow!("outcome store lock poisoned"))?.clone())
    }
}

/// Timeline events held in memory
#[derive(Debug, Default)]
pub struct MemoryTimelineStore {
    events: RwLock<Vec<TimelineEvent>>,
}

impl MemoryTimelineStore {
    /// Empty timeline
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl TimelineStore for MemoryTimelineStore {
    fn append(&self, event: &TimelineEvent) -> anyhow::Result<()> {
        self.events
            .write()
            .map_err(|_| anyhow::anyhow!("timeline lock poisoned"))?
            .push(event.clone());
        Ok(())
    }

    fn list(&self) -> anyhow::Result<Vec<TimelineEvent>> {
        Ok(self.events.read().map_err(|_| anyhow::anyhow!("timeline lock poisoned"))?.clone())
    }
}
