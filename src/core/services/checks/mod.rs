//! Check runners
//!
//! Each runner answers one question about a request and knows nothing about
//! the others. Runners that need pixels ask an [`ImageSource`] port; an
//! error from a port is returned as a `CheckExecutionError` and the pipeline
//! turns it into a warning for that check alone.
//!
//! [`ImageSource`]: crate::core::ports::ImageSource

mod category;
mod duplicate;
mod fake_image;
mod internet_search;
mod location;
mod metadata;

use async_trait::async_trait;

use crate::core::error::CheckExecutionError;
use crate::core::models::{CheckKind, CheckResult, VerificationRequest};

pub use category::{CategoryCheck, category_keywords, supported_categories};
pub use duplicate::DuplicateCheck;
pub use fake_image::FakeImageCheck;
pub use internet_search::InternetSearchCheck;
pub use location::LocationCheck;
pub use metadata::MetadataCheck;

/// One independent verification check
#[async_trait]
pub trait CheckRunner: Send + Sync {
    /// Which check this is
    fn kind(&self) -> CheckKind;

    /// Evaluate the request
    ///
    /// Returning an error never fails the verification; the caller records
    /// a warning for this check instead.
    async fn evaluate(
        &self,
        request: &VerificationRequest,
    ) -> Result<CheckResult, CheckExecutionError>;
}
