//! Hash registry port
//!
//! Defines the interface to the store of perceptual hashes seen so far.

use super::super::models::PerceptualHash;

/// A previously seen image that resembles a new one
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HashMatch {
    /// Issue the earlier image was submitted with
    pub issue_id: u64,
    /// Similarity in 0..=1
    pub similarity: f64,
}

/// Registry of image hashes across issues
///
/// This is an external collaborator (a database or cache in production).
/// It is the only state shared between verifications.
pub trait HashRegistry: Send + Sync {
    /// Find the first recorded hash at or above `threshold` similarity,
    /// ignoring hashes recorded for `exclude_issue`
    fn find_similar(
        &self,
        hash: &PerceptualHash,
        exclude_issue: u64,
        threshold: f64,
    ) -> anyhow::Result<Option<HashMatch>>;

    /// Remember a hash for future lookups
    fn record(&self, hash: PerceptualHash, issue_id: u64) -> anyhow::Result<()>;

    /// Number of recorded hashes
    fn len(&self) -> anyhow::Result<usize>;

    /// Whether nothing has been recorded yet
    fn is_empty(&self) -> anyhow::Result<bool> {
        Ok(self.len()? == 0)
    }
}
