//! Reverse image search

use std::sync::Arc;

use async_trait::async_trait;

use super::CheckRunner;
use crate::core::error::CheckExecutionError;
use crate::core::models::{CheckKind, CheckResult, VerificationRequest};
use crate::core::ports::{ImageSource, ReverseImageSearch, SearchMatch};

const STOCK_HOSTS: [&str; 5] = ["shutterstock", "getty", "istockphoto", "unsplash", "pexels"];

/// More matches than this means the picture circulates widely
const WIDESPREAD_MATCHES: usize = 5;

/// Looks the first image up on the open internet
pub struct InternetSearchCheck {
    images: Arc<dyn ImageSource>,
    search: Arc<dyn ReverseImageSearch>,
}

impl InternetSearchCheck {
    /// Create the check over an image source and a search backend
    #[must_use]
    pub fn new(images: Arc<dyn ImageSource>, search: Arc<dyn ReverseImageSearch>) -> Self {
        Self { images, search }
    }

    /// Judge a list of search hits
    #[must_use]
    pub fn assess(matches: &[SearchMatch]) -> CheckResult {
        if matches.is_empty() {
            return CheckResult::passed(
                CheckKind::InternetSearch,
                0.9,
                "No matches found on the internet. Image appears original.",
            )
            .with_extra("matches_found", 0);
        }

        let urls: Vec<&str> = matches.iter().map(|m| m.url.as_str()).collect();
        let stock: Vec<&str> = urls
            .iter()
            .copied()
            .filter(|url| {
                let lower = url.to_lowercase();
                STOCK_HOSTS.iter().any(|host| lower.contains(host))
            })
            .collect();

        let result = if !stock.is_empty() {
            CheckResult::failed(
                CheckKind::InternetSearch,
                0.2,
                format!(
                    "Image found on stock photo sites ({} matches). This appears to be a reused stock image.",
                    stock.len()
                ),
            )
            .with_extra("stock_matches", stock)
        } else if matches.len() > WIDESPREAD_MATCHES {
            CheckResult::warning(
                CheckKind::InternetSearch,
                0.5,
                format!(
                    "Image found in {} locations on the internet. May be reused from another source.",
                    matches.len()
                ),
            )
        } else {
            CheckResult::warning(
                CheckKind::InternetSearch,
                0.7,
                format!("Image found in {} locations. Verify authenticity.", matches.len()),
            )
        };
        result
            .with_extra("matches_found", matches.len())
            .with_extra("urls", urls.into_iter().take(10).collect::<Vec<_>>())
    }
}

#[async_trait]
impl CheckRunner for InternetSearchCheck {
    fn kind(&self) -> CheckKind {
        CheckKind::InternetSearch
    }

    async fn evaluate(
        &self,
        request: &VerificationRequest,
    ) -> Result<CheckResult, CheckExecutionError> {
        let image = self.images.load(request.primary_image()).await?;
        let matches = self.search.search(&image).await?;
        Ok(Self::assess(&matches))
    }
}
