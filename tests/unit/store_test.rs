//! Tests for the JSON-lines record store, timeline and hash registry

use std::fs;

use chrono::{Duration, Utc};
use tempfile::TempDir;

use civicverify::adapters::{
    JsonlHashRegistry, JsonlOutcomeStore, JsonlTimelineStore, MemoryTimelineStore, StoreError,
};
use civicverify::core::models::{
    ActorType, ExtraData, PerceptualHash, TimelineEvent, TimelineEventType, VerificationRecord,
    VerificationStatus, VerificationType,
};
use civicverify::core::ports::{HashRegistry, OutcomeStore, TimelineStore};

use super::common::fixtures;

fn record(issue_id: u64, status: VerificationStatus, minutes_ago: i64) -> VerificationRecord {
    VerificationRecord {
        issue_id,
        verification_type: VerificationType::Initial,
        status,
        confidence_score: 0.8,
        rejection_reasons: Vec::new(),
        checks_performed: serde_json::json!({}),
        extra_data: ExtraData::default(),
        created_at: Utc::now() - Duration::minutes(minutes_ago),
    }
}

fn event(issue_id: u64, event_type: TimelineEventType, minutes_ago: i64) -> TimelineEvent {
    TimelineEvent {
        issue_id,
        event_type,
        actor_type: ActorType::Ai,
        actor_id: None,
        description: format!("{event_type} for #{issue_id}"),
        extra_data: ExtraData::default(),
        image_urls: vec!["https://img.example/a.jpg".into()],
        created_at: Utc::now() - Duration::minutes(minutes_ago),
    }
}

#[test]
fn missing_file_reads_as_empty() {
    let dir = TempDir::new().unwrap();
    let store = JsonlOutcomeStore::new(dir.path().join("none.jsonl"));
    assert!(store.list().unwrap().is_empty());
    assert!(store.latest_for_issue(1).unwrap().is_none());
}

#[test]
fn records_survive_a_new_store_instance() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested/dir/verifications.jsonl");

    let store = JsonlOutcomeStore::new(&path);
    store.save(&record(1, VerificationStatus::Approved, 0)).unwrap();
    store.save(&record(2, VerificationStatus::Rejected, 0)).unwrap();

    let reopened = JsonlOutcomeStore::new(&path);
    let records = reopened.list().unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[1].issue_id, 2);
    assert_eq!(records[1].status, VerificationStatus::Rejected);
    assert_eq!(fs::read_to_string(&path).unwrap().lines().count(), 2);
}

#[test]
fn latest_record_wins_per_issue() {
    let dir = TempDir::new().unwrap();
    let store = JsonlOutcomeStore::new(dir.path().join("v.jsonl"));
    store.save(&record(7, VerificationStatus::NeedsReview, 30)).unwrap();
    store.save(&record(8, VerificationStatus::Approved, 5)).unwrap();
    store.save(&record(7, VerificationStatus::Approved, 1)).unwrap();

    let history = store.for_issue(7).unwrap();
    assert_eq!(history.len(), 2);
    assert!(history[0].created_at > history[1].created_at);
    assert_eq!(
        store.latest_for_issue(7).unwrap().unwrap().status,
        VerificationStatus::Approved
    );
}

#[test]
fn corrupt_line_is_reported_with_its_number() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("v.jsonl");
    let store = JsonlOutcomeStore::new(&path);
    store.save(&record(1, VerificationStatus::Approved, 0)).unwrap();
    let mut content = fs::read_to_string(&path).unwrap();
    content.push_str("{truncated\n");
    fs::write(&path, content).unwrap();

    let err = store.list().unwrap_err();
    match err.downcast_ref::<StoreError>() {
        Some(StoreError::Corrupt { line, .. }) => assert_eq!(*line, 2),
        other => panic!("expected a corrupt line error, got {other:?}"),
    }
}

#[test]
fn hash_registry_persists_without_duplicates() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("image-hashes.jsonl");
    let hash = fixtures::hash_with_bits(40);

    let registry = JsonlHashRegistry::open(&path).unwrap();
    registry.record(hash, 10).unwrap();
    registry.record(hash, 10).unwrap();
    registry.record(PerceptualHash::default(), 11).unwrap();
    assert_eq!(registry.len().unwrap(), 2);
    assert_eq!(fs::read_to_string(&path).unwrap().lines().count(), 2);

    let reopened = JsonlHashRegistry::open(&path).unwrap();
    assert_eq!(reopened.len().unwrap(), 2);
    let found = reopened.find_similar(&hash, 99, 0.85).unwrap().unwrap();
    assert_eq!(found.issue_id, 10);
    assert!((found.similarity - 1.0).abs() < f64::EPSILON);
    assert!(reopened.find_similar(&hash, 10, 0.99).unwrap().is_none());
}

#[test]
fn timeline_is_oldest_first_and_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("data/timeline.jsonl");
    {
        let timeline = JsonlTimelineStore::new(&path);
        timeline.append(&event(4, TimelineEventType::AiCrossVerificationCompleted, 1)).unwrap();
        timeline.append(&event(5, TimelineEventType::AiVerificationCompleted, 3)).unwrap();
        timeline.append(&event(4, TimelineEventType::AiVerificationCompleted, 10)).unwrap();
    }

    let timeline = JsonlTimelineStore::new(&path);
    assert_eq!(timeline.list().unwrap().len(), 3);
    let events = timeline.for_issue(4).unwrap();
    let types: Vec<_> = events.iter().map(|e| e.event_type).collect();
    assert_eq!(
        types,
        [TimelineEventType::AiVerificationCompleted, TimelineEventType::AiCrossVerificationCompleted]
    );
    assert_eq!(events[0].image_urls, ["https://img.example/a.jpg"]);

    let raw = fs::read_to_string(&path).unwrap();
    assert!(raw.lines().next().unwrap().contains(r#""event_type":"AI_CROSS_VERIFICATION_COMPLETED""#));
    assert!(!raw.contains("actor_id"));
}

#[test]
fn memory_timeline_filters_by_issue() {
    let timeline = MemoryTimelineStore::new();
    timeline.append(&event(1, TimelineEventType::AiVerificationCompleted, 0)).unwrap();
    timeline.append(&event(2, TimelineEventType::AiVerificationCompleted, 0)).unwrap();
    assert_eq!(timeline.for_issue(2).unwrap().len(), 1);
    assert!(timeline.for_issue(3).unwrap().is_empty());
}
