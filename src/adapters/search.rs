//! Reverse image search adapters

use async_trait::async_trait;

use crate::core::error::CheckExecutionError;
use crate::core::models::ImageEvidence;
use crate::core::ports::{ReverseImageSearch, SearchMatch};

/// Search backend used when no search service is configured
///
/// Always reports no matches.
#[derive(Debug, Default, Clone, Copy)]
pub struct OfflineReverseSearch;

#[async_trait]
impl ReverseImageSearch for OfflineReverseSearch {
    async fn search(&self, _image: &ImageEvidence) -> Result<Vec<SearchMatch>, CheckExecutionError> {
        Ok(Vec::new())
    }
}
