//! Verification outcomes and their persisted form

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{CheckResult, ExtraData, VerificationStatus, VerificationType};

/// Final decision for an initial verification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationOutcome {
    /// Issue identifier
    pub issue_id: u64,
    /// Overall decision
    pub status: VerificationStatus,
    /// Aggregate confidence in 0..=1
    pub confidence_score: f64,
    /// Individual check results in canonical order
    pub checks: Vec<CheckResult>,
    /// Details of every failed check
    pub rejection_reasons: Vec<String>,
    /// Details of every warning, plus pipeline notes
    pub warnings: Vec<String>,
    /// Wall-clock time spent verifying
    pub processing_time_ms: u64,
    /// When the decision was made
    pub timestamp: DateTime<Utc>,
}

/// Final decision for a before/after cross-verification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrossCheckOutcome {
    /// Issue identifier
    pub issue_id: u64,
    /// Overall decision
    pub status: VerificationStatus,
    /// Heuristic confidence in 0..=1
    pub confidence_score: f64,
    /// Whether both image sets appear to be taken at the same place
    pub same_location: bool,
    /// Distance between the two images' GPS positions; zero when unknown
    pub location_distance_meters: f64,
    /// Whether the visual change suggests the work was done
    pub work_completed: bool,
    /// Perceptual similarity between before and after images
    pub image_similarity_score: f64,
    /// Human-readable summary
    pub notes: String,
    /// Anything a reviewer should look at
    pub warnings: Vec<String>,
    /// Wall-clock time spent verifying
    pub processing_time_ms: u64,
    /// When the decision was made
    pub timestamp: DateTime<Utc>,
}

/// A verification as stored by an `OutcomeStore`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationRecord {
    /// Issue identifier
    pub issue_id: u64,
    /// Which pipeline produced the record
    pub verification_type: VerificationType,
    /// Overall decision
    pub status: VerificationStatus,
    /// Confidence score
    pub confidence_score: f64,
    /// Rejection reasons (or cross-check warnings)
    #[serde(default)]
    pub rejection_reasons: Vec<String>,
    /// Per-check summary
    #[serde(default)]
    pub checks_performed: serde_json::Value,
    /// Processing time and other context
    #[serde(default)]
    pub extra_data: ExtraData,
    /// When the record was created
    pub created_at: DateTime<Utc>,
}

impl VerificationRecord {
    /// Processing time recorded in `extra_data`, if any
    #[must_use]
    pub fn processing_time_ms(&self) -> Option<u64> {
        self.extra_data.get("processing_time_ms").and_then(serde_json::Value::as_u64)
    }
}

impl From<&VerificationOutcome> for VerificationRecord {
    fn from(outcome: &VerificationOutcome) -> Self {
        let checks = outcome
            .checks
            .iter()
            .map(|c| {
                (
                    c.check.as_str().to_string(),
                    serde_json::json!({
                        "status": c.status,
                        "confidence": c.confidence,
                        "details": c.details,
                    }),
                )
            })
            .collect::<serde_json::Map<_, _>>();

        let mut extra_data = ExtraData::new();
        extra_data.insert("processing_time_ms".into(), outcome.processing_time_ms.into());
        extra_data.insert("warnings".into(), outcome.warnings.clone().into());

        Self {
            issue_id: outcome.issue_id,
            verification_type: VerificationType::Initial,
            status: outcome.status,
            confidence_score: outcome.confidence_score,
            rejection_reasons: outcome.rejection_reasons.clone(),
            checks_performed: serde_json::Value::Object(checks),
            extra_data,
            created_at: outcome.timestamp,
        }
    }
}

impl From<&CrossCheckOutcome> for VerificationRecord {
    fn from(outcome: &CrossCheckOutcome) -> Self {
        let mut extra_data = ExtraData::new();
        extra_data.insert("processing_time_ms".into(), outcome.processing_time_ms.into());
        extra_data.insert("notes".into(), outcome.notes.clone().into());

        Self {
            issue_id: outcome.issue_id,
            verification_type: VerificationType::CrossVerification,
            status: outcome.status,
            confidence_score: outcome.confidence_score,
            rejection_reasons: outcome.warnings.clone(),
            checks_performed: serde_json::json!({
                "same_location": outcome.same_location,
                "work_completed": outcome.work_completed,
                "similarity_score": outcome.image_similarity_score,
                "location_distance_meters": outcome.location_distance_meters,
            }),
            extra_data,
            created_at: outcome.timestamp,
        }
    }
}
