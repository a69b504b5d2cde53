//! Status levels
//!
//! `CheckStatus` is what a single check runner reports; `VerificationStatus`
//! is the overall decision the aggregator reaches.

use serde::{Deserialize, Serialize};

/// Outcome of a single check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CheckStatus {
    /// The check found nothing suspicious
    Passed,
    /// Something looks off, or the check could not be completed
    Warning,
    /// The check found a disqualifying problem
    Failed,
    /// The check is disabled and was not run
    Skipped,
}

impl CheckStatus {
    /// Whether this status takes part in aggregation
    #[must_use]
    pub const fn is_active(self) -> bool {
        !matches!(self, Self::Skipped)
    }
}

impl std::fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Passed => write!(f, "PASSED"),
            Self::Warning => write!(f, "WARNING"),
            Self::Failed => write!(f, "FAILED"),
            Self::Skipped => write!(f, "SKIPPED"),
        }
    }
}

impl std::str::FromStr for CheckStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "PASSED" => Ok(Self::Passed),
            "WARNING" => Ok(Self::Warning),
            "FAILED" => Ok(Self::Failed),
            "SKIPPED" => Ok(Self::Skipped),
            _ => Err(format!("Invalid check status: {s}. Use: passed, warning, failed, skipped")),
        }
    }
}

/// Overall decision for a verification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VerificationStatus {
    /// Confident enough to accept automatically
    Approved,
    /// A check failed or confidence is too low
    Rejected,
    /// A human has to decide
    NeedsReview,
}

impl std::fmt::Display for VerificationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Approved => write!(f, "APPROVED"),
            Self::Rejected => write!(f, "REJECTED"),
            Self::NeedsReview => write!(f, "NEEDS_REVIEW"),
        }
    }
}

impl std::str::FromStr for VerificationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().replace('-', "_").as_str() {
            "APPROVED" => Ok(Self::Approved),
            "REJECTED" => Ok(Self::Rejected),
            "NEEDS_REVIEW" => Ok(Self::NeedsReview),
            _ => Err(format!(
                "Invalid verification status: {s}. Use: approved, rejected, needs_review"
            )),
        }
    }
}

/// Which pipeline produced a persisted verification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VerificationType {
    /// First verification of a freshly submitted issue
    Initial,
    /// Citizen-versus-government before/after comparison
    CrossVerification,
}

impl std::fmt::Display for VerificationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Initial => write!(f, "INITIAL"),
            Self::CrossVerification => write!(f, "CROSS_VERIFICATION"),
        }
    }
}
