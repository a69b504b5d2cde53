//! Aggregation - check results in, one decision out
//!
//! This is pure business logic with no I/O. The same inputs always produce
//! the same outcome; the caller supplies the elapsed time and the
//! completion timestamp.

use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::config::{ChecksConfig, Thresholds};
use crate::core::models::{CheckResult, CheckStatus, VerificationOutcome, VerificationStatus};

/// Confidence reported when no check produced an opinion
pub const NO_EVIDENCE_CONFIDENCE: f64 = 0.5;

/// Combines check results into a `VerificationOutcome`
#[derive(Debug, Clone)]
pub struct Aggregator {
    thresholds: Thresholds,
    checks: ChecksConfig,
}

impl Aggregator {
    /// Create an aggregator with decision thresholds and check weights
    #[must_use]
    pub const fn new(thresholds: Thresholds, checks: ChecksConfig) -> Self {
        Self { thresholds, checks }
    }

    /// Decide on a set of check results
    ///
    /// Results are reported in canonical check order. Skipped checks are
    /// listed but carry no weight.
    #[must_use]
    pub fn aggregate(
        &self,
        issue_id: u64,
        mut checks: Vec<CheckResult>,
        elapsed: Duration,
        completed_at: DateTime<Utc>,
    ) -> VerificationOutcome {
        checks.sort_by_key(|c| c.check);

        let active: Vec<&CheckResult> = checks.iter().filter(|c| c.status.is_active()).collect();
        let rejection_reasons: Vec<String> = active
            .iter()
            .filter(|c| c.status == CheckStatus::Failed)
            .map(|c| c.details.clone())
            .collect();
        let mut warnings: Vec<String> = active
            .iter()
            .filter(|c| c.status == CheckStatus::Warning)
            .map(|c| c.details.clone())
            .collect();
        warnings.extend(
            active
                .iter()
                .filter(|c| {
                    c.status == CheckStatus::Passed && c.confidence < self.thresholds.min_confidence
                })
                .map(|c| {
                    format!(
                        "{} passed with low confidence ({:.2} < {:.2})",
                        c.check, c.confidence, self.thresholds.min_confidence
                    )
                }),
        );

        let (status, confidence_score) = if active.is_empty() {
            warnings.push("No checks were performed".to_string());
            (VerificationStatus::NeedsReview, NO_EVIDENCE_CONFIDENCE)
        } else {
            let score = self.weighted_mean(&active);
            (self.classify(score, !rejection_reasons.is_empty()), score)
        };

        VerificationOutcome {
            issue_id,
            status,
            confidence_score,
            checks,
            rejection_reasons,
            warnings,
            processing_time_ms: u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
            timestamp: completed_at,
        }
    }

    /// Map a score to a decision
    #[must_use]
    pub fn classify(&self, score: f64, any_failed: bool) -> VerificationStatus {
        if any_failed || score < self.thresholds.auto_reject {
            VerificationStatus::Rejected
        } else if score >= self.thresholds.auto_approve {
            VerificationStatus::Approved
        } else {
            VerificationStatus::NeedsReview
        }
    }

    fn weighted_mean(&self, active: &[&CheckResult]) -> f64 {
        let total_weight: f64 = active.iter().map(|c| self.checks.weight(c.check)).sum();
        if total_weight > 0.0 {
            active.iter().map(|c| c.confidence * self.checks.weight(c.check)).sum::<f64>()
                / total_weight
        } else {
            // every weight configured to zero: fall back to a plain mean
            #[allow(clippy::cast_precision_loss)]
            let n = active.len() as f64;
            active.iter().map(|c| c.confidence).sum::<f64>() / n
        }
    }
}
