//! Cross-verification - was the reported problem actually fixed?
//!
//! Compares the first citizen "before" image with the first government
//! "after" image. They should be taken at the same place and should look
//! alike, but not identical. The work heuristic is approximate: a clear
//! visual change at the same spot is taken as evidence of remediation.

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use log::{info, warn};

use super::ingest;
use super::pipeline::{append_event, attach_context};
use super::similarity::image_similarity;
use crate::config::{Config, Thresholds};
use crate::core::error::{CheckExecutionError, ValidationError};
use crate::core::models::{
    CrossCheckOutcome, CrossCheckRequest, CrossCheckSubmission, ImageEvidence, TimelineEvent,
    VerificationRecord, VerificationStatus,
};
use crate::core::ports::{ImageSource, OutcomeStore, TimelineStore};

/// Similarity below which two photos are unlikely to show the same place
const SAME_SCENE_FLOOR: f64 = 0.3;

/// Similarity above which two photos may be the same picture
const SAME_PICTURE_CEILING: f64 = 0.8;

/// What a before/after pair shows
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Comparison {
    /// Both photos were taken within the allowed radius (assumed without GPS)
    pub same_location: bool,
    /// Distance between the two EXIF positions; zero without GPS
    pub distance_meters: f64,
    /// Whether both photos carried GPS
    pub gps_available: bool,
    /// Perceptual similarity in 0..=1
    pub similarity: f64,
    /// Mean absolute luminance change of the thumbnails (0..=255)
    pub pixel_difference: Option<f64>,
    /// Enough visual change to believe the work was done
    pub work_completed: bool,
}

impl Comparison {
    /// Compare two decoded images
    #[must_use]
    pub fn between(before: &ImageEvidence, after: &ImageEvidence, thresholds: &Thresholds) -> Self {
        let (same_location, distance_meters, gps_available) =
            match (before.exif.gps, after.exif.gps) {
                (Some(a), Some(b)) => {
                    let d = a.distance_to(&b);
                    (d <= thresholds.cross_check_radius_meters, d, true)
                }
                _ => (true, 0.0, false),
            };
        let similarity = image_similarity(before, after);
        Self {
            same_location,
            distance_meters,
            gps_available,
            similarity,
            pixel_difference: before.mean_abs_difference(after),
            work_completed: 1.0 - similarity >= thresholds.work_change,
        }
    }

    /// Weighted evidence that the resolution is genuine, capped at 1
    #[must_use]
    pub fn confidence(&self) -> f64 {
        let mut confidence = 0.0;
        if self.same_location {
            confidence += 0.4;
        }
        if (SAME_SCENE_FLOOR..=SAME_PICTURE_CEILING).contains(&self.similarity) {
            confidence += 0.3;
        } else if self.similarity > SAME_PICTURE_CEILING {
            confidence += 0.15;
        }
        if self.work_completed {
            confidence += 0.3;
        }
        f64::min(confidence, 1.0)
    }

    /// Concerns a reviewer should see
    #[must_use]
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if !self.same_location {
            warnings.push("Location mismatch detected".to_string());
        }
        if self.similarity < SAME_SCENE_FLOOR {
            warnings.push("Images appear to be from different locations".to_string());
        }
        if !self.work_completed {
            warnings.push("Work completion unclear from images".to_string());
        }
        warnings
    }

    /// One-line summary
    #[must_use]
    pub fn notes(&self, category: &str) -> String {
        let mut notes = Vec::with_capacity(5);
        if !self.gps_available {
            notes.push("GPS unavailable; location assumed consistent".to_string());
        } else if self.same_location {
            notes.push(format!("Location verified (distance: {:.1}m)", self.distance_meters));
        } else {
            notes.push(format!("Location mismatch (distance: {:.1}m)", self.distance_meters));
        }
        notes.push(format!("Image similarity: {:.2}%", self.similarity * 100.0));
        if let Some(diff) = self.pixel_difference {
            notes.push(format!("Mean pixel change: {diff:.1}"));
        }
        if self.work_completed {
            notes.push("Visual changes detected - work appears completed".to_string());
        } else {
            notes.push("No significant visual changes detected".to_string());
        }
        notes.push(format!("Category: {category}"));
        notes.join(" | ")
    }

    /// Decide on the comparison
    #[must_use]
    pub fn status(&self, thresholds: &Thresholds) -> VerificationStatus {
        let confidence = self.confidence();
        if confidence >= thresholds.auto_approve && self.work_completed {
            VerificationStatus::Approved
        } else if confidence < thresholds.auto_reject || !self.same_location {
            VerificationStatus::Rejected
        } else {
            VerificationStatus::NeedsReview
        }
    }
}

/// Compares citizen and government image sets
pub struct CrossVerifier {
    config: Arc<Config>,
    images: Arc<dyn ImageSource>,
    store: Option<Arc<dyn OutcomeStore>>,
    timeline: Option<Arc<dyn TimelineStore>>,
}

impl std::fmt::Debug for CrossVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CrossVerifier")
            .field("store", &self.store.is_some())
            .field("timeline", &self.timeline.is_some())
            .finish_non_exhaustive()
    }
}

impl CrossVerifier {
    /// Create a comparator over an image source
    #[must_use]
    pub fn new(config: Arc<Config>, images: Arc<dyn ImageSource>) -> Self {
        Self {
            config,
            images,
            store: None,
            timeline: None,
        }
    }

    /// Persist every outcome to this store
    #[must_use]
    pub fn with_store(mut self, store: Arc<dyn OutcomeStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Append a timeline event for every outcome
    #[must_use]
    pub fn with_timeline(mut self, timeline: Arc<dyn TimelineStore>) -> Self {
        self.timeline = Some(timeline);
        self
    }

    /// Ingest and compare a raw submission
    pub async fn cross_check_submission(
        &self,
        submission: CrossCheckSubmission,
    ) -> Result<CrossCheckOutcome, ValidationError> {
        let request = ingest::ingest_cross_check(submission, &self.config.limits)?;
        Ok(self.cross_check(&request).await)
    }

    /// Compare a validated request
    pub async fn cross_check(&self, request: &CrossCheckRequest) -> CrossCheckOutcome {
        let started = Instant::now();
        let issue_id = request.issue_id();
        let thresholds = &self.config.thresholds;

        let outcome = match self.load_pair(request).await {
            Ok((before, after)) => {
                let cmp = Comparison::between(&before, &after, thresholds);
                CrossCheckOutcome {
                    issue_id,
                    status: cmp.status(thresholds),
                    confidence_score: cmp.confidence(),
                    same_location: cmp.same_location,
                    location_distance_meters: cmp.distance_meters,
                    work_completed: cmp.work_completed,
                    image_similarity_score: cmp.similarity,
                    notes: cmp.notes(request.issue_category()),
                    warnings: cmp.warnings(),
                    processing_time_ms: elapsed_ms(started),
                    timestamp: Utc::now(),
                }
            }
            Err(err) => {
                warn!("issue {issue_id}: cross-verification degraded: {err}");
                CrossCheckOutcome {
                    issue_id,
                    status: VerificationStatus::NeedsReview,
                    confidence_score: 0.0,
                    same_location: false,
                    location_distance_meters: 0.0,
                    work_completed: false,
                    image_similarity_score: 0.0,
                    notes: "Images could not be compared".to_string(),
                    warnings: vec![format!("Image unavailable: {err}")],
                    processing_time_ms: elapsed_ms(started),
                    timestamp: Utc::now(),
                }
            }
        };

        info!(
            "issue {issue_id}: cross-check {} (confidence {:.2}, work completed: {})",
            outcome.status, outcome.confidence_score, outcome.work_completed
        );
        if let Some(store) = &self.store {
            let mut record = VerificationRecord::from(&outcome);
            attach_context(&mut record, request.extra_data());
            if let Err(e) = store.save(&record) {
                warn!("issue {issue_id}: failed to persist cross-verification: {e:#}");
            }
        }
        if let Some(timeline) = &self.timeline {
            let mut event = TimelineEvent::from(&outcome);
            event.image_urls = request.government_images().to_vec();
            append_event(timeline.as_ref(), &event);
        }
        outcome
    }

    async fn load_pair(
        &self,
        request: &CrossCheckRequest,
    ) -> Result<(ImageEvidence, ImageEvidence), CheckExecutionError> {
        let before = request.citizen_images().first().map_or("", String::as_str);
        let after = request.government_images().first().map_or("", String::as_str);
        let budget = self.config.limits.request_timeout();

        let loads = async { tokio::try_join!(self.images.load(before), self.images.load(after)) };
        tokio::time::timeout(budget, loads).await.unwrap_or_else(|_| {
            Err(CheckExecutionError::Unavailable {
                service: "image source",
                reason: format!("no response within {}s", budget.as_secs()),
            })
        })
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}
