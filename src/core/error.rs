//! Domain errors
//!
//! `ValidationError` rejects a submission before any check runs.
//! `CheckExecutionError` is local to one check runner and never aborts the
//! whole verification; the pipeline downgrades it to a warning.

use std::time::Duration;

use thiserror::Error;

use super::models::CheckKind;

/// A submission that cannot be verified as given
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// A required field is absent or blank
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// No image references were supplied
    #[error("at least one image is required ({0})")]
    NoImages(&'static str),

    /// An image reference is blank
    #[error("image reference #{index} in {field} is empty")]
    BlankImage {
        /// Which list the reference is in
        field: &'static str,
        /// Zero-based position
        index: usize,
    },

    /// More images than the configured limit
    #[error("too many images in {field}: {count} (limit {limit})")]
    TooManyImages {
        /// Which list overflowed
        field: &'static str,
        /// Number supplied
        count: usize,
        /// Configured maximum
        limit: usize,
    },

    /// Latitude or longitude out of range or not finite
    #[error("invalid coordinate: latitude {latitude}, longitude {longitude}")]
    InvalidCoordinate {
        /// Submitted latitude
        latitude: f64,
        /// Submitted longitude
        longitude: f64,
    },

    /// The submission is not valid JSON for the expected shape
    #[error("malformed request: {0}")]
    Malformed(String),
}

/// A check runner could not complete its evaluation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckExecutionError {
    /// The image could not be retrieved
    #[error("failed to fetch image {reference}: {reason}")]
    Fetch {
        /// Image reference
        reference: String,
        /// Underlying cause
        reason: String,
    },

    /// The image bytes could not be decoded
    #[error("failed to decode image {reference}: {reason}")]
    Decode {
        /// Image reference
        reference: String,
        /// Underlying cause
        reason: String,
    },

    /// The image exceeds the configured size limit
    #[error("image {reference} is {bytes} bytes (limit {limit})")]
    TooLarge {
        /// Image reference
        reference: String,
        /// Actual size
        bytes: usize,
        /// Configured limit
        limit: usize,
    },

    /// An external lookup (registry, search service) failed
    #[error("{service} unavailable: {reason}")]
    Unavailable {
        /// Name of the external collaborator
        service: &'static str,
        /// Underlying cause
        reason: String,
    },

    /// The runner exceeded its own time budget
    #[error("{check} timed out after {}s", .after.as_secs_f64())]
    Timeout {
        /// The check that timed out
        check: CheckKind,
        /// The budget it had
        after: Duration,
    },

    /// The runner's task died
    #[error("{check} aborted: {reason}")]
    Aborted {
        /// The check that died
        check: CheckKind,
        /// Panic or cancellation message
        reason: String,
    },
}
