//! Tests for before/after cross-verification

use std::sync::Arc;

use civicverify::adapters::{MemoryOutcomeStore, MemoryTimelineStore};
use civicverify::config::Config;
use civicverify::core::error::ValidationError;
use civicverify::core::models::{
    PerceptualHash, TimelineEventType, VerificationStatus, VerificationType,
};
use civicverify::core::ports::{OutcomeStore, TimelineStore};
use civicverify::core::services::CrossVerifier;

use super::common::fixtures::{self, AFTER, BEFORE, REPORTED};
use super::common::mocks::StaticImageSource;

fn verifier(images: StaticImageSource) -> CrossVerifier {
    CrossVerifier::new(Arc::new(Config::default()), Arc::new(images))
}

#[tokio::test]
async fn repaired_pothole_at_the_same_spot_is_approved() {
    let images = StaticImageSource::new()
        .with(fixtures::evidence(
            BEFORE,
            PerceptualHash::default(),
            fixtures::camera_exif(Some(REPORTED)),
        ))
        .with(fixtures::evidence(
            AFTER,
            fixtures::hash_with_bits(90),
            fixtures::camera_exif(Some(fixtures::north_of(REPORTED, 15.3))),
        ));
    let store = Arc::new(MemoryOutcomeStore::new());
    let timeline = Arc::new(MemoryTimelineStore::new());
    let outcome = verifier(images)
        .with_store(store.clone())
        .with_timeline(timeline.clone())
        .cross_check_submission(fixtures::cross_submission(4))
        .await
        .unwrap();

    assert!(outcome.same_location);
    assert!(outcome.work_completed);
    assert!((outcome.location_distance_meters - 15.3).abs() < 0.05);
    assert!((outcome.image_similarity_score - (1.0 - 90.0 / 256.0)).abs() < 1e-12);
    assert_eq!(outcome.status, VerificationStatus::Approved);
    assert!(outcome.warnings.is_empty());
    assert!(outcome.notes.contains("Location verified (distance: 15.3m)"), "{}", outcome.notes);

    let records = store.list().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].verification_type, VerificationType::CrossVerification);
    assert_eq!(records[0].checks_performed["work_completed"], true);

    let events = timeline.for_issue(4).unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].event_type, TimelineEventType::AiCrossVerificationCompleted);
    assert_eq!(events[0].description, format!("Cross-verification completed: {}", outcome.notes));
    assert_eq!(events[0].image_urls, [AFTER]);
    assert_eq!(events[0].extra_data["work_completed"], true);
    assert_eq!(events[0].extra_data["status"], "APPROVED");
}

#[tokio::test]
async fn pixel_change_is_reported_when_thumbnails_exist() {
    let images = StaticImageSource::new()
        .with(fixtures::evidence_from_luma(BEFORE, fixtures::pattern(false), fixtures::camera_exif(None)))
        .with(fixtures::evidence_from_luma(AFTER, fixtures::pattern(true), fixtures::camera_exif(None)));
    let outcome = verifier(images).cross_check_submission(fixtures::cross_submission(4)).await.unwrap();

    assert!(outcome.same_location);
    assert!(outcome.notes.contains("GPS unavailable; location assumed consistent"));
    assert!(outcome.notes.contains("Mean pixel change:"), "{}", outcome.notes);
}

#[tokio::test]
async fn photos_from_elsewhere_are_rejected() {
    let images = StaticImageSource::new()
        .with(fixtures::evidence(
            BEFORE,
            PerceptualHash::default(),
            fixtures::camera_exif(Some(REPORTED)),
        ))
        .with(fixtures::evidence(
            AFTER,
            fixtures::hash_with_bits(90),
            fixtures::camera_exif(Some(fixtures::north_of(REPORTED, 1_000.0))),
        ));
    let outcome = verifier(images).cross_check_submission(fixtures::cross_submission(4)).await.unwrap();

    assert!(!outcome.same_location);
    assert_eq!(outcome.status, VerificationStatus::Rejected);
    assert!(outcome.warnings.contains(&"Location mismatch detected".to_string()));
}

#[tokio::test]
async fn unchanged_scene_needs_review() {
    let images = StaticImageSource::new()
        .with(fixtures::evidence(BEFORE, PerceptualHash::default(), fixtures::camera_exif(None)))
        .with(fixtures::evidence(AFTER, PerceptualHash::default(), fixtures::camera_exif(None)));
    let outcome = verifier(images).cross_check_submission(fixtures::cross_submission(4)).await.unwrap();

    assert!(!outcome.work_completed);
    assert_eq!(outcome.status, VerificationStatus::NeedsReview);
    assert!(outcome.warnings.contains(&"Work completion unclear from images".to_string()));
}

#[tokio::test]
async fn missing_image_sends_to_review() {
    let images = StaticImageSource::new().with(fixtures::evidence(
        BEFORE,
        PerceptualHash::default(),
        fixtures::camera_exif(None),
    ));
    let outcome = verifier(images).cross_check_submission(fixtures::cross_submission(4)).await.unwrap();

    assert_eq!(outcome.status, VerificationStatus::NeedsReview);
    assert!(outcome.confidence_score.abs() < f64::EPSILON);
    assert_eq!(
        outcome.warnings,
        ["Image unavailable: failed to fetch image mem://after.jpg: 404 Not Found"]
    );
}

#[tokio::test]
async fn submission_without_category_is_invalid() {
    let mut submission = fixtures::cross_submission(4);
    submission.issue_category = None;
    let err = verifier(StaticImageSource::new()).cross_check_submission(submission).await.unwrap_err();
    assert_eq!(err, ValidationError::MissingField("issue_category"));
}
