//! EXIF GPS versus reported location

use std::sync::Arc;

use async_trait::async_trait;

use super::CheckRunner;
use crate::core::error::CheckExecutionError;
use crate::core::models::{CheckKind, CheckResult, ExifSummary, GeoPoint, VerificationRequest};
use crate::core::ports::ImageSource;

/// Compares where the photo says it was taken with where the report says
pub struct LocationCheck {
    images: Arc<dyn ImageSource>,
    radius_meters: f64,
}

impl LocationCheck {
    /// Create the check with the accepted radius in meters
    #[must_use]
    pub fn new(images: Arc<dyn ImageSource>, radius_meters: f64) -> Self {
        Self {
            images,
            radius_meters,
        }
    }

    /// Compare an EXIF summary with the reported location
    #[must_use]
    pub fn assess(exif: &ExifSummary, reported: &GeoPoint, radius_meters: f64) -> CheckResult {
        let Some(photo) = exif.gps else {
            return CheckResult::warning(
                CheckKind::LocationConsistency,
                0.7,
                "No GPS data in image metadata. Location cannot be verified from EXIF.",
            )
            .with_extra("has_gps", false);
        };

        let distance = photo.distance_to(reported);
        let result = if distance <= radius_meters {
            CheckResult::passed(
                CheckKind::LocationConsistency,
                0.95,
                format!("Location verified. EXIF GPS matches reported location (distance: {distance:.1}m)"),
            )
        } else {
            CheckResult::failed(
                CheckKind::LocationConsistency,
                0.3,
                format!(
                    "Location mismatch! EXIF GPS is {distance:.1}m away from reported location. Acceptable radius: {radius_meters}m"
                ),
            )
        };
        result
            .with_extra("has_gps", true)
            .with_extra("exif_latitude", photo.latitude)
            .with_extra("exif_longitude", photo.longitude)
            .with_extra("distance_meters", distance)
    }
}

#[async_trait]
impl CheckRunner for LocationCheck {
    fn kind(&self) -> CheckKind {
        CheckKind::LocationConsistency
    }

    async fn evaluate(
        &self,
        request: &VerificationRequest,
    ) -> Result<CheckResult, CheckExecutionError> {
        let image = self.images.load(request.primary_image()).await?;
        Ok(Self::assess(&image.exif, request.location(), self.radius_meters))
    }
}
