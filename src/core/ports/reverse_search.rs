//! Reverse image search port

use async_trait::async_trait;

use super::super::error::CheckExecutionError;
use super::super::models::ImageEvidence;

/// A page on which the searched image was found
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchMatch {
    /// URL of the page or image
    pub url: String,
}

/// Searches the open internet for copies of an image
#[async_trait]
pub trait ReverseImageSearch: Send + Sync {
    /// All known pages containing the image; empty when none
    async fn search(&self, image: &ImageEvidence) -> Result<Vec<SearchMatch>, CheckExecutionError>;
}
