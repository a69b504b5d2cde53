//! Image acquisition adapter
//!
//! Implements `ImageSource` by fetching bytes (HTTP, `file://`, local
//! paths) and decoding them off the async executor. `CachingImageSource`
//! shares one load between the runners of a verification.

mod cache;
mod decode;
mod fetch;

use async_trait::async_trait;
use log::debug;

pub use cache::{CachingImageSource, DEFAULT_CACHE_ENTRIES};
pub use decode::{decode, read_exif};
pub use fetch::Fetcher;

use crate::config::Limits;
use crate::core::error::CheckExecutionError;
use crate::core::models::ImageEvidence;
use crate::core::ports::ImageSource;

/// The production `ImageSource`
#[derive(Debug, Clone)]
pub struct FetchingImageSource {
    fetcher: Fetcher,
}

impl FetchingImageSource {
    /// Build from configured limits
    pub fn new(limits: &Limits) -> Result<Self, CheckExecutionError> {
        Ok(Self {
            fetcher: Fetcher::new(limits.max_image_bytes(), limits.fetch_timeout())?,
        })
    }
}

#[async_trait]
impl ImageSource for FetchingImageSource {
    async fn load(&self, reference: &str) -> Result<ImageEvidence, CheckExecutionError> {
        let bytes = self.fetcher.fetch(reference).await?;
        let owned = reference.to_string();
        let evidence = tokio::task::spawn_blocking(move || decode(&owned, &bytes))
            .await
            .map_err(|e| CheckExecutionError::Decode {
                reference: reference.to_string(),
                reason: e.to_string(),
            })??;
        debug!("decoded {} ({}, phash {})", reference, evidence.dimensions(), evidence.phash);
        Ok(evidence)
    }
}
