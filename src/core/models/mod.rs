//! Domain models for civicverify
//!
//! Pure data structures with no I/O dependencies.
//!
//! - [`VerificationRequest`] - "Is this report genuine?"
//! - [`CheckResult`] - "One runner's opinion, with confidence"
//! - [`VerificationOutcome`] - "The decision, and why"
//! - [`CrossCheckRequest`] - "Was the reported problem actually fixed?"
//! - [`ImageEvidence`] - What the checks know about an image
//! - [`TimelineEvent`] - "What happened to this issue, and when"

mod check;
mod image;
mod location;
mod outcome;
mod request;
mod status;
mod timeline;

pub use check::{CheckKind, CheckResult, ExtraData};
pub use image::{ExifSummary, ImageEvidence, PHASH_BITS, PerceptualHash, THUMBNAIL_SIDE};
pub use location::{EARTH_RADIUS_METERS, GeoPoint};
pub use outcome::{CrossCheckOutcome, VerificationOutcome, VerificationRecord};
pub use request::{
    CrossCheckRequest, CrossCheckSubmission, LocationInput, VerificationRequest,
    VerificationSubmission,
};
pub use status::{CheckStatus, VerificationStatus, VerificationType};
pub use timeline::{ActorType, TimelineEvent, TimelineEventType};
