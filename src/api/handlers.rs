//! Pure API handlers
//!
//! These handlers contain business logic and are HTTP-agnostic.
//! They take typed input and return `Result<T, ApiError>`.

use std::collections::BTreeMap;

use chrono::Utc;
use log::{error, info, warn};

use super::error::ApiError;
use super::state::AppState;
use super::types::{
    CategoriesData, HealthData, ServiceInfo, StatsData, StatusData, TimelineData,
};
use crate::core::models::{
    CheckKind, CrossCheckOutcome, CrossCheckSubmission, VerificationOutcome,
    VerificationSubmission,
};
use crate::core::services::supported_categories;

// =============================================================================
// SERVICE
// =============================================================================

/// Service identity
#[must_use]
pub fn service_info(state: &AppState) -> ServiceInfo {
    ServiceInfo {
        service: state.config().service.name.clone(),
        version: crate::VERSION.to_string(),
        status: "running".to_string(),
        timestamp: Utc::now(),
    }
}

/// Which checks are on, and whether the store can be read
#[must_use]
pub fn health(state: &AppState) -> HealthData {
    let config = state.config();
    let mut services: BTreeMap<String, String> = CheckKind::ALL
        .into_iter()
        .map(|kind| {
            let on = config.checks.is_enabled(kind, &config.features);
            (kind.as_str().to_string(), if on { "enabled" } else { "disabled" }.to_string())
        })
        .collect();

    let store_ok = match state.store().list() {
        Ok(_) => true,
        Err(e) => {
            warn!("Health check could not read the store: {e}");
            false
        },
    };
    services.insert("store".into(), if store_ok { "healthy" } else { "unhealthy" }.into());

    HealthData {
        status: if store_ok { "healthy" } else { "degraded" }.to_string(),
        version: crate::VERSION.to_string(),
        timestamp: Utc::now(),
        services,
    }
}

/// Check the caller's API key against the configured one
///
/// Always succeeds when no key is configured.
pub fn authorize(state: &AppState, provided: Option<&str>) -> Result<(), ApiError> {
    match (&state.config().service.api_key, provided) {
        (None, _) => Ok(()),
        (Some(expected), Some(given)) if expected == given => Ok(()),
        (Some(_), Some(_)) => Err(ApiError::unauthorized("Invalid API key")),
        (Some(_), None) => Err(ApiError::unauthorized("Missing X-API-Key header")),
    }
}

// =============================================================================
// VERIFICATION
// =============================================================================

/// Verify a newly submitted issue
pub async fn verify_initial(
    state: &AppState,
    submission: VerificationSubmission,
) -> Result<VerificationOutcome, ApiError> {
    let outcome = state.verifier().verify_submission(submission).await.inspect_err(|e| {
        info!("Rejected verification request: {e}");
    })?;
    Ok(outcome)
}

/// Compare citizen and government images for a resolved issue
pub async fn cross_check(
    state: &AppState,
    submission: CrossCheckSubmission,
) -> Result<CrossCheckOutcome, ApiError> {
    let outcome = state.cross_verifier().cross_check_submission(submission).await.inspect_err(|e| {
        info!("Rejected cross-check request: {e}");
    })?;
    Ok(outcome)
}

/// Latest stored verification for an issue
pub fn get_verification_status(state: &AppState, issue_id: u64) -> Result<StatusData, ApiError> {
    let records = state.store().for_issue(issue_id).map_err(|e| {
        error!("Failed to read verification status: {e}");
        ApiError::internal(e.to_string())
    })?;
    StatusData::from_records(&records)
        .ok_or_else(|| ApiError::not_found(format!("No verification found for issue {issue_id}")))
}

/// Timeline events recorded for an issue; empty when nothing happened yet
pub fn get_timeline(state: &AppState, issue_id: u64) -> Result<TimelineData, ApiError> {
    let events = state.timeline().for_issue(issue_id).map_err(|e| {
        error!("Failed to read timeline: {e}");
        ApiError::internal(e.to_string())
    })?;
    Ok(TimelineData { issue_id, events })
}

/// Parse an issue id taken from a URL path
pub fn parse_issue_id(raw: &str) -> Result<u64, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::bad_request(format!("Invalid issue id: {raw}")))
}

// =============================================================================
// STATS
// =============================================================================

/// Statistics over every stored verification
pub fn get_stats(state: &AppState) -> Result<StatsData, ApiError> {
    let records = state.store().list().map_err(|e| ApiError::internal(e.to_string()))?;
    Ok(StatsData::from_records(&records, state.uptime().as_secs()))
}

// =============================================================================
// CATEGORIES
// =============================================================================

/// Categories the relevance check knows
#[must_use]
pub fn list_categories() -> CategoriesData {
    CategoriesData {
        categories: supported_categories().into_iter().map(String::from).collect(),
    }
}
