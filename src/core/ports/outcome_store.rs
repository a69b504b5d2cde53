//! Outcome store port
//!
//! Defines the interface for persisting verification records.

use super::super::models::VerificationRecord;

/// Persistence for verification records
///
/// Implementations handle where records live (a database in production, a
/// JSON-lines file for the CLI, memory in tests).
pub trait OutcomeStore: Send + Sync {
    /// Append a record
    fn save(&self, record: &VerificationRecord) -> anyhow::Result<()>;

    /// All records, oldest first
    fn list(&self) -> anyhow::Result<Vec<VerificationRecord>>;

    /// All records for one issue, newest first
    fn for_issue(&self, issue_id: u64) -> anyhow::Result<Vec<VerificationRecord>> {
        let mut records: Vec<_> =
            self.list()?.into_iter().filter(|r| r.issue_id == issue_id).collect();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(records)
    }

    /// The most recent record for one issue
    fn latest_for_issue(&self, issue_id: u64) -> anyhow::Result<Option<VerificationRecord>> {
        Ok(self.for_issue(issue_id)?.into_iter().next())
    }
}
