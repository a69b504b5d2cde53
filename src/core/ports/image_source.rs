//! Image source port
//!
//! Defines how check runners obtain decoded image evidence.

use async_trait::async_trait;

use super::super::error::CheckExecutionError;
use super::super::models::ImageEvidence;

/// Loads and decodes images by reference
///
/// Implementations decide what a reference means (HTTP URL, `file://` URL,
/// local path, fixture key). A failure is reported per image so the calling
/// check can degrade on its own without affecting the others.
#[async_trait]
pub trait ImageSource: Send + Sync {
    /// Load one image
    async fn load(&self, reference: &str) -> Result<ImageEvidence, CheckExecutionError>;

    /// Load several images, stopping at the first failure
    async fn load_all(
        &self,
        references: &[String],
    ) -> Result<Vec<ImageEvidence>, CheckExecutionError> {
        let mut images = Vec::with_capacity(references.len());
        for reference in references {
            images.push(self.load(reference).await?);
        }
        Ok(images)
    }
}
