//! Ingestion - turn loosely typed submissions into immutable requests
//!
//! Nothing here performs I/O. A submission either becomes a request or is
//! rejected with a `ValidationError` before any check runs.

use crate::config::Limits;
use crate::core::error::ValidationError;
use crate::core::models::{
    CrossCheckRequest, CrossCheckSubmission, GeoPoint, LocationInput, VerificationRequest,
    VerificationSubmission,
};

/// Parse a JSON verification submission
pub fn parse_submission(json: &str) -> Result<VerificationSubmission, ValidationError> {
    serde_json::from_str(json).map_err(|e| ValidationError::Malformed(e.to_string()))
}

/// Parse a JSON cross-verification submission
pub fn parse_cross_check(json: &str) -> Result<CrossCheckSubmission, ValidationError> {
    serde_json::from_str(json).map_err(|e| ValidationError::Malformed(e.to_string()))
}

/// Validate and normalize a verification submission
pub fn ingest(
    submission: VerificationSubmission,
    limits: &Limits,
) -> Result<VerificationRequest, ValidationError> {
    let issue_id = submission.issue_id.ok_or(ValidationError::MissingField("issue_id"))?;
    let image_urls = normalize_images("image_urls", submission.image_urls, limits)?;
    let location = normalize_location(submission.location)?;
    let category = required_text("category", submission.category)?;
    let description = submission.description.map(|d| d.trim().to_string()).unwrap_or_default();

    Ok(VerificationRequest::new(
        issue_id,
        image_urls,
        category,
        location,
        description,
        submission.extra_data.unwrap_or_default(),
    ))
}

/// Validate and normalize a cross-verification submission
pub fn ingest_cross_check(
    submission: CrossCheckSubmission,
    limits: &Limits,
) -> Result<CrossCheckRequest, ValidationError> {
    let issue_id = submission.issue_id.ok_or(ValidationError::MissingField("issue_id"))?;
    let citizen = normalize_images("citizen_images", submission.citizen_images, limits)?;
    let government = normalize_images("government_images", submission.government_images, limits)?;
    let location = normalize_location(submission.location)?;
    let category = required_text("issue_category", submission.issue_category)?;

    Ok(CrossCheckRequest::new(
        issue_id,
        citizen,
        government,
        location,
        category,
        submission.extra_data.unwrap_or_default(),
    ))
}

fn normalize_images(
    field: &'static str,
    images: Vec<String>,
    limits: &Limits,
) -> Result<Vec<String>, ValidationError> {
    if images.is_empty() {
        return Err(ValidationError::NoImages(field));
    }
    if images.len() > limits.max_images_per_request {
        return Err(ValidationError::TooManyImages {
            field,
            count: images.len(),
            limit: limits.max_images_per_request,
        });
    }
    images
        .into_iter()
        .enumerate()
        .map(|(index, reference)| {
            let trimmed = reference.trim();
            if trimmed.is_empty() {
                Err(ValidationError::BlankImage { field, index })
            } else {
                Ok(trimmed.to_string())
            }
        })
        .collect()
}

fn normalize_location(location: Option<LocationInput>) -> Result<GeoPoint, ValidationError> {
    let location = location.ok_or(ValidationError::MissingField("location"))?;
    let latitude = location.latitude.ok_or(ValidationError::MissingField("location.latitude"))?;
    let longitude =
        location.longitude.ok_or(ValidationError::MissingField("location.longitude"))?;

    let point = GeoPoint {
        latitude,
        longitude,
        accuracy: location.accuracy.filter(|a| a.is_finite() && *a >= 0.0),
    };
    if !point.is_valid() {
        return Err(ValidationError::InvalidCoordinate {
            latitude,
            longitude,
        });
    }
    Ok(point)
}

fn required_text(field: &'static str, value: Option<String>) -> Result<String, ValidationError> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or(ValidationError::MissingField(field))
}
