//! Timeline store port
//!
//! Defines the interface for recording issue timeline events.

use super::super::models::TimelineEvent;

/// Append-only log of timeline events
pub trait TimelineStore: Send + Sync {
    /// Append an event
    fn append(&self, event: &TimelineEvent) -> anyhow::Result<()>;

    /// All events, in the order they were appended
    fn list(&self) -> anyhow::Result<Vec<TimelineEvent>>;

    /// Events for one issue, oldest first
    fn for_issue(&self, issue_id: u64) -> anyhow::Result<Vec<TimelineEvent>> {
        let mut events: Vec<_> =
            self.list()?.into_iter().filter(|e| e.issue_id == issue_id).collect();
        events.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(events)
    }
}
