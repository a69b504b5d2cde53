//! Issue timeline events
//!
//! Every finished verification leaves an entry on the issue's timeline, so
//! the history of an issue reads as a sequence of "who did what, when".

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{CrossCheckOutcome, ExtraData, VerificationOutcome};

/// What happened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TimelineEventType {
    /// An initial verification finished
    AiVerificationCompleted,
    /// A before/after cross-verification finished
    AiCrossVerificationCompleted,
}

impl std::fmt::Display for TimelineEventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AiVerificationCompleted => write!(f, "AI_VERIFICATION_COMPLETED"),
            Self::AiCrossVerificationCompleted => write!(f, "AI_CROSS_VERIFICATION_COMPLETED"),
        }
    }
}

/// Who did it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActorType {
    /// The automated verifier
    #[serde(rename = "AI")]
    Ai,
}

impl std::fmt::Display for ActorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ai => write!(f, "AI"),
        }
    }
}

/// One entry on an issue's timeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineEvent {
    /// Issue identifier
    pub issue_id: u64,
    /// What happened
    pub event_type: TimelineEventType,
    /// Who did it
    pub actor_type: ActorType,
    /// Identifier of a human actor; never set for the verifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actor_id: Option<u64>,
    /// One-line summary
    pub description: String,
    /// Decision summary (status, confidence, ...)
    #[serde(default)]
    pub extra_data: ExtraData,
    /// Images the event refers to
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub image_urls: Vec<String>,
    /// When it happened
    pub created_at: DateTime<Utc>,
}

impl From<&VerificationOutcome> for TimelineEvent {
    fn from(outcome: &VerificationOutcome) -> Self {
        let mut extra_data = ExtraData::new();
        extra_data.insert("confidence_score".into(), outcome.confidence_score.into());
        extra_data.insert("status".into(), outcome.status.to_string().into());
        extra_data.insert("processing_time_ms".into(), outcome.processing_time_ms.into());

        Self {
            issue_id: outcome.issue_id,
            event_type: TimelineEventType::AiVerificationCompleted,
            actor_type: ActorType::Ai,
            actor_id: None,
            description: format!("AI verification completed with status: {}", outcome.status),
            extra_data,
            image_urls: Vec::new(),
            created_at: outcome.timestamp,
        }
    }
}

impl From<&CrossCheckOutcome> for TimelineEvent {
    fn from(outcome: &CrossCheckOutcome) -> Self {
        let mut extra_data = ExtraData::new();
        extra_data.insert("confidence".into(), outcome.confidence_score.into());
        extra_data.insert("status".into(), outcome.status.to_string().into());
        extra_data.insert("work_completed".into(), outcome.work_completed.into());

        Self {
            issue_id: outcome.issue_id,
            event_type: TimelineEventType::AiCrossVerificationCompleted,
            actor_type: ActorType::Ai,
            actor_id: None,
            description: format!("Cross-verification completed: {}", outcome.notes),
            extra_data,
            image_urls: Vec::new(),
            created_at: outcome.timestamp,
        }
    }
}
