//! Check model
//!
//! A check result says: "this runner looked at the submission and this is
//! what it concluded, with this much confidence."

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::CheckStatus;

/// Structured evidence attached to results and records
pub type ExtraData = BTreeMap<String, serde_json::Value>;

/// Identity of a check runner
///
/// Declaration order is the canonical order of checks in an outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckKind {
    /// AI-generated or manipulated image detection
    FakeDetection,
    /// Reuse of an image across issues
    DuplicateDetection,
    /// EXIF presence and plausibility
    MetadataValidation,
    /// EXIF GPS versus reported location
    LocationConsistency,
    /// Description versus reported category
    CategoryRelevance,
    /// Reverse image search on the open internet
    InternetSearch,
}

impl CheckKind {
    /// All kinds in canonical order
    pub const ALL: [Self; 6] = [
        Self::FakeDetection,
        Self::DuplicateDetection,
        Self::MetadataValidation,
        Self::LocationConsistency,
        Self::CategoryRelevance,
        Self::InternetSearch,
    ];

    /// Stable snake_case name, used in JSON and configuration
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FakeDetection => "fake_detection",
            Self::DuplicateDetection => "duplicate_detection",
            Self::MetadataValidation => "metadata_validation",
            Self::LocationConsistency => "location_consistency",
            Self::CategoryRelevance => "category_relevance",
            Self::InternetSearch => "internet_search",
        }
    }
}

impl std::fmt::Display for CheckKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CheckKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == s.to_lowercase().replace('-', "_"))
            .ok_or_else(|| format!("Unknown check: {s}"))
    }
}

/// Result of one check runner for one request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckResult {
    /// Which check produced this result
    pub check: CheckKind,

    /// Pass / warn / fail / skipped
    pub status: CheckStatus,

    /// Confidence in the submission's legitimacy, clamped to 0..=1
    pub confidence: f64,

    /// Human-readable explanation
    pub details: String,

    /// Structured evidence (dimensions, distances, hashes, ...)
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra_data: ExtraData,
}

impl CheckResult {
    /// Create a result; confidence is clamped into 0..=1
    #[must_use]
    pub fn new(
        check: CheckKind,
        status: CheckStatus,
        confidence: f64,
        details: impl Into<String>,
    ) -> Self {
        let confidence = if confidence.is_nan() { 0.0 } else { confidence.clamp(0.0, 1.0) };
        Self {
            check,
            status,
            confidence,
            details: details.into(),
            extra_data: ExtraData::new(),
        }
    }

    /// A passing result
    #[must_use]
    pub fn passed(check: CheckKind, confidence: f64, details: impl Into<String>) -> Self {
        Self::new(check, CheckStatus::Passed, confidence, details)
    }

    /// A warning result
    #[must_use]
    pub fn warning(check: CheckKind, confidence: f64, details: impl Into<String>) -> Self {
        Self::new(check, CheckStatus::Warning, confidence, details)
    }

    /// A failing result
    #[must_use]
    pub fn failed(check: CheckKind, confidence: f64, details: impl Into<String>) -> Self {
        Self::new(check, CheckStatus::Failed, confidence, details)
    }

    /// Result for a check that is switched off in configuration
    #[must_use]
    pub fn skipped(check: CheckKind) -> Self {
        Self::new(check, CheckStatus::Skipped, 0.0, format!("{check} disabled"))
    }

    /// Attach one piece of structured evidence
    #[must_use]
    pub fn with_extra(mut self, key: &str, value: impl Into<serde_json::Value>) -> Self {
        self.extra_data.insert(key.to_string(), value.into());
        self
    }
}
