//! API request and response types
//!
//! Request bodies reuse the domain submission types; everything here is
//! response data and framework-agnostic.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::error::ApiErrorData;
use crate::core::models::{
    TimelineEvent, VerificationRecord, VerificationStatus, VerificationType,
};

// =============================================================================
// RESPONSE ENVELOPE
// =============================================================================

/// Standard API response envelope
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    /// Whether the request succeeded
    pub success: bool,
    /// Response data (present on success)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Error details (present on failure)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiErrorData>,
}

impl<T: Serialize> ApiResponse<T> {
    /// Create a successful response
    #[must_use]
    pub const fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
}

impl ApiResponse<()> {
    /// Create an error response
    #[must_use]
    pub fn error(code: &str, message: &str) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(ApiErrorData {
                code: code.to_string(),
                message: message.to_string(),
            }),
        }
    }
}

// =============================================================================
// SERVICE
// =============================================================================

/// `GET /` response data
#[derive(Debug, Serialize)]
pub struct ServiceInfo {
    /// Configured service name
    pub service: String,
    /// Crate version
    pub version: String,
    /// Always "running"
    pub status: String,
    /// Time of the response
    pub timestamp: DateTime<Utc>,
}

/// `GET /health` response data
#[derive(Debug, Serialize)]
pub struct HealthData {
    /// "healthy", or "degraded" when the store cannot be read
    pub status: String,
    /// Crate version
    pub version: String,
    /// Time of the response
    pub timestamp: DateTime<Utc>,
    /// "enabled"/"disabled" per check, plus "store" health
    pub services: BTreeMap<String, String>,
}

// =============================================================================
// VERIFICATIONS
// =============================================================================

/// Latest persisted verification for an issue
#[derive(Debug, Serialize)]
pub struct StatusData {
    /// Issue identifier
    pub issue_id: u64,
    /// Pipeline that produced the record
    pub verification_type: VerificationType,
    /// Decision
    pub status: VerificationStatus,
    /// Confidence score
    pub confidence_score: f64,
    /// When the first verification of the issue was recorded
    pub created_at: DateTime<Utc>,
    /// When the latest verification was recorded
    pub updated_at: DateTime<Utc>,
    /// Per-check summary of the latest verification
    pub checks_performed: serde_json::Value,
    /// How many verifications the issue has had
    pub verification_count: usize,
}

impl StatusData {
    /// Summarise an issue's records, newest first
    #[must_use]
    pub fn from_records(records: &[VerificationRecord]) -> Option<Self> {
        let latest = records.first()?;
        let created_at = records.iter().map(|r| r.created_at).min().unwrap_or(latest.created_at);
        Some(Self {
            issue_id: latest.issue_id,
            verification_type: latest.verification_type,
            status: latest.status,
            confidence_score: latest.confidence_score,
            created_at,
            updated_at: latest.created_at,
            checks_performed: latest.checks_performed.clone(),
            verification_count: records.len(),
        })
    }
}

/// Aggregate statistics over stored verifications
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsData {
    /// All stored verifications
    pub total_verifications: usize,
    /// Approved count
    pub approved: usize,
    /// Rejected count
    pub rejected: usize,
    /// Needs-review count
    pub needs_review: usize,
    /// Mean confidence; zero when there are no records
    pub average_confidence: f64,
    /// Mean processing time; zero when no record carries one
    pub average_processing_time_ms: u64,
    /// Count per verification type
    pub by_type: BTreeMap<String, usize>,
    /// Seconds since the service started
    pub uptime_seconds: u64,
}

impl StatsData {
    /// Compute statistics from stored records
    #[must_use]
    pub fn from_records(records: &[VerificationRecord], uptime_seconds: u64) -> Self {
        let count = |status| records.iter().filter(|r| r.status == status).count();

        let mut by_type = BTreeMap::new();
        for record in records {
            *by_type.entry(record.verification_type.to_string()).or_insert(0) += 1;
        }

        let average_confidence = if records.is_empty() {
            0.0
        } else {
            records.iter().map(|r| r.confidence_score).sum::<f64>() / records.len() as f64
        };

        let times: Vec<u64> = records.iter().filter_map(VerificationRecord::processing_time_ms).collect();
        let average_processing_time_ms =
            if times.is_empty() { 0 } else { times.iter().sum::<u64>() / times.len() as u64 };

        Self {
            total_verifications: records.len(),
            approved: count(VerificationStatus::Approved),
            rejected: count(VerificationStatus::Rejected),
            needs_review: count(VerificationStatus::NeedsReview),
            average_confidence,
            average_processing_time_ms,
            by_type,
            uptime_seconds,
        }
    }
}

/// Supported issue categories
#[derive(Debug, Serialize)]
pub struct CategoriesData {
    /// Category names accepted by the relevance check
    pub categories: Vec<String>,
}

// =============================================================================
// TIMELINE
// =============================================================================

/// `GET /api/v1/verify/timeline/:issue_id` response data
#[derive(Debug, Serialize)]
pub struct TimelineData {
    /// Issue identifier
    pub issue_id: u64,
    /// Events, oldest first
    pub events: Vec<TimelineEvent>,
}
