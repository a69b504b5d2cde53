//! Tests for the API handlers and the HTTP routing table

use std::sync::Arc;

use serde_json::{Value, json};
use tiny_http::Method;
use tokio::runtime::Runtime;

use civicverify::adapters::{InMemoryHashRegistry, MemoryOutcomeStore, MemoryTimelineStore};
use civicverify::api::{self, AppState, ErrorCode};
use civicverify::config::Config;
use civicverify::core::models::{PerceptualHash, TimelineEventType, VerificationStatus};
use civicverify::core::ports::OutcomeStore;
use civicverify::server::tiny_http::{Reply, route};

use super::common::fixtures::{self, BEFORE, REPORTED};
use super::common::mocks::{BrokenStore, StaticImageSource, StaticSearch};

fn state_with(config: Config, store: Arc<dyn OutcomeStore>) -> AppState {
    let images = StaticImageSource::new().with(fixtures::evidence(
        BEFORE,
        PerceptualHash::default(),
        fixtures::camera_exif(Some(REPORTED)),
    ));
    AppState::new(
        Arc::new(config),
        Arc::new(images),
        Arc::new(InMemoryHashRegistry::new()),
        Arc::new(StaticSearch(Vec::new())),
        store,
        Arc::new(MemoryTimelineStore::new()),
    )
}

fn state() -> AppState {
    state_with(Config::default(), Arc::new(MemoryOutcomeStore::new()))
}

fn keyed_state() -> AppState {
    let mut config = Config::default();
    config.service.api_key = Some("s3cret".into());
    state_with(config, Arc::new(MemoryOutcomeStore::new()))
}

fn body_of(reply: Reply) -> Value {
    serde_json::from_str(&reply.body).unwrap()
}

// =============================================================================
// HANDLERS
// =============================================================================

#[test]
fn authorization_is_open_without_a_configured_key() {
    assert!(api::authorize(&state(), None).is_ok());
    assert!(api::authorize(&state(), Some("anything")).is_ok());
}

#[test]
fn authorization_checks_the_configured_key() {
    let state = keyed_state();
    assert!(api::authorize(&state, Some("s3cret")).is_ok());

    let wrong = api::authorize(&state, Some("guess")).unwrap_err();
    assert_eq!(wrong.code, ErrorCode::Unauthorized);
    assert_eq!(wrong.message, "Invalid API key");

    let missing = api::authorize(&state, None).unwrap_err();
    assert_eq!(missing.status_code(), 401);
    assert_eq!(missing.message, "Missing X-API-Key header");
}

#[test]
fn unknown_issue_has_no_status() {
    let err = api::get_verification_status(&state(), 404).unwrap_err();
    assert_eq!(err.code, ErrorCode::NotFound);
    assert_eq!(err.message, "No verification found for issue 404");
}

#[test]
fn issue_ids_must_be_numeric() {
    assert_eq!(api::parse_issue_id("17").unwrap(), 17);
    let err = api::parse_issue_id("abc").unwrap_err();
    assert_eq!(err.code, ErrorCode::BadRequest);
    assert_eq!(err.message, "Invalid issue id: abc");
}

#[tokio::test]
async fn verification_is_recorded_for_status_and_stats() {
    let state = state();
    let outcome = api::verify_initial(&state, fixtures::submission(21)).await.unwrap();

    let status = api::get_verification_status(&state, 21).unwrap();
    assert_eq!(status.status, outcome.status);
    assert_eq!(status.verification_count, 1);

    let stats = api::get_stats(&state).unwrap();
    assert_eq!(stats.total_verifications, 1);
    assert_eq!(stats.by_type["INITIAL"], 1);
}

#[tokio::test]
async fn both_verifications_land_on_the_issue_timeline() {
    let state = state();
    assert!(api::get_timeline(&state, 21).unwrap().events.is_empty());

    let outcome = api::verify_initial(&state, fixtures::submission(21)).await.unwrap();
    api::cross_check(&state, fixtures::cross_submission(21)).await.unwrap();

    let timeline = api::get_timeline(&state, 21).unwrap();
    assert_eq!(timeline.issue_id, 21);
    let types: Vec<_> = timeline.events.iter().map(|e| e.event_type).collect();
    assert_eq!(
        types,
        [TimelineEventType::AiVerificationCompleted, TimelineEventType::AiCrossVerificationCompleted]
    );
    assert_eq!(
        timeline.events[0].description,
        format!("AI verification completed with status: {}", outcome.status)
    );
    assert_eq!(timeline.events[0].image_urls, [BEFORE]);
    assert!(timeline.events[1].description.starts_with("Cross-verification completed: "));
    assert!(api::get_timeline(&state, 22).unwrap().events.is_empty());
}

#[tokio::test]
async fn invalid_submission_is_a_bad_request() {
    let mut submission = fixtures::submission(21);
    submission.category = None;
    let err = api::verify_initial(&state(), submission).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::BadRequest);
    assert!(err.message.contains("category"), "{}", err.message);
}

#[test]
fn categories_are_listed() {
    let data = api::list_categories();
    assert!(data.categories.iter().any(|c| c == "Road Infrastructure"));
}

#[test]
fn health_reports_checks_and_store() {
    let data = api::health(&state());
    assert_eq!(data.status, "healthy");
    assert_eq!(data.services["fake_detection"], "enabled");
    assert_eq!(data.services["internet_search"], "disabled");
    assert_eq!(data.services["store"], "healthy");

    let degraded = api::health(&state_with(Config::default(), Arc::new(BrokenStore::default())));
    assert_eq!(degraded.status, "degraded");
    assert_eq!(degraded.services["store"], "unhealthy");
}

// =============================================================================
// ROUTING
// =============================================================================

#[test]
fn root_and_health_need_no_key() {
    let rt = Runtime::new().unwrap();
    let state = keyed_state();

    let root = route(&state, rt.handle(), &Method::Get, "/", None, "");
    assert_eq!(root.status, 200);
    assert_eq!(body_of(root)["data"]["status"], "running");

    let health = route(&state, rt.handle(), &Method::Get, "/health", None, "");
    assert_eq!(health.status, 200);
}

#[test]
fn api_routes_require_the_key() {
    let rt = Runtime::new().unwrap();
    let state = keyed_state();

    let denied = route(&state, rt.handle(), &Method::Get, "/api/v1/categories", None, "");
    assert_eq!(denied.status, 401);
    let body = body_of(denied);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");

    let allowed =
        route(&state, rt.handle(), &Method::Get, "/api/v1/categories", Some("s3cret"), "");
    assert_eq!(allowed.status, 200);
}

#[test]
fn verify_then_query_status_over_http() {
    let rt = Runtime::new().unwrap();
    let state = state();
    let body = serde_json::to_string(&json!({
        "issue_id": 5,
        "image_urls": [BEFORE],
        "category": "Road Infrastructure",
        "location": {"latitude": REPORTED.latitude, "longitude": REPORTED.longitude},
        "description": "Large pothole on the road causing traffic issues"
    }))
    .unwrap();

    let response = route(&state, rt.handle(), &Method::Post, "/api/v1/verify/initial", None, &body);
    assert_eq!(response.status, 200);
    let verified = body_of(response);
    assert_eq!(verified["success"], true);
    assert_eq!(verified["data"]["issue_id"], 5);
    assert_eq!(verified["data"]["checks"].as_array().unwrap().len(), 6);

    let status = route(&state, rt.handle(), &Method::Get, "/api/v1/verify/status/5", None, "");
    assert_eq!(status.status, 200);
    let status = body_of(status);
    assert_eq!(status["data"]["issue_id"], 5);
    assert_eq!(status["data"]["verification_type"], "INITIAL");

    let timeline =
        route(&state, rt.handle(), &Method::Get, "/api/v1/verify/timeline/5", None, "");
    assert_eq!(timeline.status, 200);
    let timeline = body_of(timeline);
    assert_eq!(timeline["data"]["events"][0]["event_type"], "AI_VERIFICATION_COMPLETED");
    assert_eq!(timeline["data"]["events"][0]["actor_type"], "AI");
}

#[test]
fn malformed_bodies_and_ids_are_bad_requests() {
    let rt = Runtime::new().unwrap();
    let state = state();

    let response =
        route(&state, rt.handle(), &Method::Post, "/api/v1/verify/initial", None, "{not json");
    assert_eq!(response.status, 400);
    let body = body_of(response);
    assert!(body["error"]["message"].as_str().unwrap().starts_with("Invalid JSON"));

    let response =
        route(&state, rt.handle(), &Method::Get, "/api/v1/verify/status/abc", None, "");
    assert_eq!(response.status, 400);
}

#[test]
fn unknown_routes_are_not_found() {
    let rt = Runtime::new().unwrap();
    let state = state();

    let response = route(&state, rt.handle(), &Method::Get, "/api/v1/unknown", None, "");
    assert_eq!(response.status, 404);
    assert_eq!(body_of(response)["error"]["code"], "NOT_FOUND");

    let response = route(&state, rt.handle(), &Method::Delete, "/health", None, "");
    assert_eq!(response.status, 404);

    let response = route(&state, rt.handle(), &Method::Get, "/api/v1/verify/status/9", None, "");
    assert_eq!(response.status, 404);
}

#[test]
fn cross_check_over_http_persists_a_record() {
    let rt = Runtime::new().unwrap();
    let store = Arc::new(MemoryOutcomeStore::new());
    let state = state_with(Config::default(), store.clone());
    let body = serde_json::to_string(&fixtures::cross_submission(8)).unwrap();

    let response =
        route(&state, rt.handle(), &Method::Post, "/api/v1/verify/cross-check", None, &body);
    assert_eq!(response.status, 200);
    // the government image is unknown to the mock source
    let data = &body_of(response)["data"];
    assert_eq!(data["status"], VerificationStatus::NeedsReview.to_string());
    assert_eq!(store.for_issue(8).unwrap().len(), 1);
}
