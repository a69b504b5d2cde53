//! Verification requests
//!
//! Submissions arrive loosely typed (every field optional) so that a missing
//! field is reported as a `ValidationError` rather than a parse failure.
//! Ingestion turns them into immutable requests.

use serde::{Deserialize, Serialize};

use super::{ExtraData, GeoPoint};

/// Raw coordinate as submitted
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LocationInput {
    /// Latitude in decimal degrees
    #[serde(default)]
    pub latitude: Option<f64>,
    /// Longitude in decimal degrees
    #[serde(default)]
    pub longitude: Option<f64>,
    /// Horizontal accuracy in meters
    #[serde(default)]
    pub accuracy: Option<f64>,
}

impl From<GeoPoint> for LocationInput {
    fn from(p: GeoPoint) -> Self {
        Self {
            latitude: Some(p.latitude),
            longitude: Some(p.longitude),
            accuracy: p.accuracy,
        }
    }
}

/// A verification submission before ingestion
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VerificationSubmission {
    /// Issue identifier assigned by the reporting platform
    #[serde(default)]
    pub issue_id: Option<u64>,
    /// Image references (URLs, `file://` URLs or local paths)
    #[serde(default)]
    pub image_urls: Vec<String>,
    /// Reported issue category
    #[serde(default)]
    pub category: Option<String>,
    /// Reported location
    #[serde(default)]
    pub location: Option<LocationInput>,
    /// Free-text description
    #[serde(default)]
    pub description: Option<String>,
    /// Caller-supplied context, carried through untouched
    #[serde(default)]
    pub extra_data: Option<ExtraData>,
}

/// A cross-verification submission before ingestion
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CrossCheckSubmission {
    /// Issue identifier
    #[serde(default)]
    pub issue_id: Option<u64>,
    /// Citizen "before" images
    #[serde(default)]
    pub citizen_images: Vec<String>,
    /// Government "after" images
    #[serde(default)]
    pub government_images: Vec<String>,
    /// Reported issue location
    #[serde(default)]
    pub location: Option<LocationInput>,
    /// Issue category
    #[serde(default)]
    pub issue_category: Option<String>,
    /// Caller-supplied context
    #[serde(default)]
    pub extra_data: Option<ExtraData>,
}

/// A validated, immutable verification request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VerificationRequest {
    issue_id: u64,
    image_urls: Vec<String>,
    category: String,
    location: GeoPoint,
    description: String,
    extra_data: ExtraData,
}

impl VerificationRequest {
    pub(crate) fn new(
        issue_id: u64,
        image_urls: Vec<String>,
        category: String,
        location: GeoPoint,
        description: String,
        extra_data: ExtraData,
    ) -> Self {
        Self {
            issue_id,
            image_urls,
            category,
            location,
            description,
            extra_data,
        }
    }

    /// Issue identifier
    #[must_use]
    pub const fn issue_id(&self) -> u64 {
        self.issue_id
    }

    /// Image references in submission order; never empty
    #[must_use]
    pub fn image_urls(&self) -> &[String] {
        &self.image_urls
    }

    /// The first image, used by single-image checks
    #[must_use]
    pub fn primary_image(&self) -> &str {
        self.image_urls.first().map_or("", String::as_str)
    }

    /// Reported category
    #[must_use]
    pub fn category(&self) -> &str {
        &self.category
    }

    /// Reported location
    #[must_use]
    pub const fn location(&self) -> &GeoPoint {
        &self.location
    }

    /// Free-text description
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Caller-supplied context
    #[must_use]
    pub const fn extra_data(&self) -> &ExtraData {
        &self.extra_data
    }
}

/// A validated, immutable cross-verification request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CrossCheckRequest {
    issue_id: u64,
    citizen_images: Vec<String>,
    government_images: Vec<String>,
    location: GeoPoint,
    issue_category: String,
    extra_data: ExtraData,
}

impl CrossCheckRequest {
    pub(crate) fn new(
        issue_id: u64,
        citizen_images: Vec<String>,
        government_images: Vec<String>,
        location: GeoPoint,
        issue_category: String,
        extra_data: ExtraData,
    ) -> Self {
        Self {
            issue_id,
            citizen_images,
            government_images,
            location,
            issue_category,
            extra_data,
        }
    }

    /// Issue identifier
    #[must_use]
    pub const fn issue_id(&self) -> u64 {
        self.issue_id
    }

    /// Citizen "before" images; never empty
    #[must_use]
    pub fn citizen_images(&self) -> &[String] {
        &self.citizen_images
    }

    /// Government "after" images; never empty
    #[must_use]
    pub fn government_images(&self) -> &[String] {
        &self.government_images
    }

    /// Reported issue location
    #[must_use]
    pub const fn location(&self) -> &GeoPoint {
        &self.location
    }

    /// Issue category
    #[must_use]
    pub fn issue_category(&self) -> &str {
        &self.issue_category
    }

    /// Caller-supplied context
    #[must_use]
    pub const fn extra_data(&self) -> &ExtraData {
        &self.extra_data
    }
}
