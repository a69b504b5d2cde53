//! EXIF metadata validation
//!
//! Missing metadata lowers confidence but is never a failure: screenshots,
//! messaging apps and privacy settings all strip EXIF from genuine photos.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDateTime, Utc};

use super::CheckRunner;
use crate::core::error::CheckExecutionError;
use crate::core::models::{CheckKind, CheckResult, ExifSummary, VerificationRequest};
use crate::core::ports::ImageSource;

/// EXIF date-time layout
const EXIF_DATETIME: &str = "%Y:%m:%d %H:%M:%S";

/// Photos older than this are called out (five years)
const MAX_AGE_DAYS: i64 = 1825;

const EDITING_SOFTWARE: [&str; 5] = ["photoshop", "gimp", "lightroom", "snapseed", "vsco"];

/// Validates the EXIF block of the first image
pub struct MetadataCheck {
    images: Arc<dyn ImageSource>,
}

impl MetadataCheck {
    /// Create the check over an image source
    #[must_use]
    pub fn new(images: Arc<dyn ImageSource>) -> Self {
        Self { images }
    }

    /// Assess an EXIF summary as of `now`
    #[must_use]
    pub fn assess(exif: &ExifSummary, now: NaiveDateTime) -> CheckResult {
        let mut findings = Vec::new();
        let mut confidence: f64 = 1.0;

        if !exif.is_present() {
            findings.push("No EXIF data found (common in screenshots or edited images)".to_string());
            confidence = 0.6;
        }

        if !exif.has_camera_info() {
            findings.push("Missing camera make/model information".to_string());
            confidence = confidence.min(0.7);
        }

        match exif.timestamp() {
            Some(raw) => match NaiveDateTime::parse_from_str(raw.trim(), EXIF_DATETIME) {
                Ok(taken) => {
                    if taken > now {
                        findings.push("Image timestamp is in the future".to_string());
                        confidence = confidence.min(0.5);
                    }
                    let age_days = (now - taken).num_days();
                    if age_days > MAX_AGE_DAYS {
                        findings.push(format!("Image is very old ({age_days} days)"));
                        confidence = confidence.min(0.7);
                    }
                }
                Err(_) => {
                    findings.push(format!("Invalid timestamp format: {raw}"));
                    confidence = confidence.min(0.7);
                }
            },
            None => {
                findings.push("No timestamp information found".to_string());
                confidence = confidence.min(0.75);
            }
        }

        if exif.gps.is_none() {
            findings.push("No GPS data in EXIF (location cannot be verified from metadata)".to_string());
            confidence = confidence.min(0.8);
        }

        if let Some(software) = &exif.software {
            let lower = software.to_lowercase();
            if EDITING_SOFTWARE.iter().any(|editor| lower.contains(editor)) {
                findings.push(format!("Image edited with: {software}"));
                confidence = confidence.min(0.6);
            }
        }

        let result = if findings.is_empty() {
            CheckResult::passed(CheckKind::MetadataValidation, confidence, "Metadata appears valid")
        } else {
            CheckResult::warning(
                CheckKind::MetadataValidation,
                confidence,
                format!("Metadata validation complete. {}", findings.join("; ")),
            )
        };
        result
            .with_extra("has_exif", exif.is_present())
            .with_extra("has_gps", exif.gps.is_some())
            .with_extra("has_camera_info", exif.has_camera_info())
            .with_extra("has_timestamp", exif.timestamp().is_some())
            .with_extra("findings_count", findings.len())
    }
}

#[async_trait]
impl CheckRunner for MetadataCheck {
    fn kind(&self) -> CheckKind {
        CheckKind::MetadataValidation
    }

    async fn evaluate(
        &self,
        request: &VerificationRequest,
    ) -> Result<CheckResult, CheckExecutionError> {
        let image = self.images.load(request.primary_image()).await?;
        Ok(Self::assess(&image.exif, Utc::now().naive_utc()))
    }
}
