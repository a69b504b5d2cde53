//! Property-based tests for the aggregator
//!
//! Uses proptest to verify properties that should hold for all inputs.

use std::time::Duration;

use chrono::{DateTime, Utc};
use civicverify::config::{ChecksConfig, Thresholds};
use civicverify::core::models::{CheckKind, CheckResult, CheckStatus, VerificationStatus};
use civicverify::core::services::Aggregator;
use proptest::prelude::*;

const STATUSES: [CheckStatus; 4] =
    [CheckStatus::Passed, CheckStatus::Warning, CheckStatus::Failed, CheckStatus::Skipped];

fn aggregator() -> Aggregator {
    Aggregator::new(Thresholds::default(), ChecksConfig::default())
}

fn at() -> DateTime<Utc> {
    DateTime::from_timestamp(1_700_000_000, 0).unwrap()
}

fn results() -> impl Strategy<Value = Vec<CheckResult>> {
    prop::collection::vec((0..CheckKind::ALL.len(), 0..STATUSES.len(), 0.0f64..=1.0), 0..8)
        .prop_map(|items| {
            items
                .into_iter()
                .map(|(k, s, c)| CheckResult::new(CheckKind::ALL[k], STATUSES[s], c, "generated"))
                .collect()
        })
}

proptest! {
    /// A single failed check always rejects
    #[test]
    fn any_failure_rejects(
        mut checks in results(),
        kind in 0..CheckKind::ALL.len(),
        confidence in 0.0f64..=1.0,
    ) {
        checks.push(CheckResult::failed(CheckKind::ALL[kind], confidence, "broken"));
        let outcome = aggregator().aggregate(1, checks, Duration::ZERO, at());
        prop_assert_eq!(outcome.status, VerificationStatus::Rejected);
        prop_assert!(outcome.rejection_reasons.contains(&"broken".to_string()));
    }

    /// All checks passing at or above the approve threshold approves
    #[test]
    fn confident_passes_approve(confidences in prop::collection::vec(0.91f64..=1.0, 1..7)) {
        let checks = confidences
            .into_iter()
            .zip(CheckKind::ALL)
            .map(|(c, kind)| CheckResult::passed(kind, c, "fine"))
            .collect();
        let outcome = aggregator().aggregate(1, checks, Duration::ZERO, at());
        prop_assert_eq!(outcome.status, VerificationStatus::Approved);
        prop_assert!(outcome.rejection_reasons.is_empty());
    }

    /// The score never leaves 0..=1
    #[test]
    fn score_is_a_probability(checks in results()) {
        let outcome = aggregator().aggregate(1, checks, Duration::ZERO, at());
        prop_assert!((0.0..=1.0).contains(&outcome.confidence_score));
    }

    /// Same inputs, same outcome
    #[test]
    fn aggregation_is_pure(checks in results()) {
        let a = aggregator().aggregate(9, checks.clone(), Duration::from_millis(12), at());
        let b = aggregator().aggregate(9, checks, Duration::from_millis(12), at());
        prop_assert_eq!(a, b);
    }

    /// Adding skipped checks changes nothing but the listing
    #[test]
    fn skipped_checks_carry_no_weight(checks in results(), kind in 0..CheckKind::ALL.len()) {
        let base = aggregator().aggregate(1, checks.clone(), Duration::ZERO, at());
        let mut padded = checks;
        padded.push(CheckResult::skipped(CheckKind::ALL[kind]));
        let with_skip = aggregator().aggregate(1, padded, Duration::ZERO, at());
        prop_assert_eq!(base.status, with_skip.status);
        prop_assert!((base.confidence_score - with_skip.confidence_score).abs() < 1e-12);
    }
}
