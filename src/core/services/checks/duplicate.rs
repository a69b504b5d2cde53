//! Duplicate image detection

use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, info};

use super::CheckRunner;
use crate::core::error::CheckExecutionError;
use crate::core::models::{CheckKind, CheckResult, VerificationRequest};
use crate::core::ports::{HashRegistry, ImageSource};

/// Detects images already submitted for a different issue
pub struct DuplicateCheck {
    images: Arc<dyn ImageSource>,
    registry: Arc<dyn HashRegistry>,
    threshold: f64,
}

impl DuplicateCheck {
    /// Create the check; `threshold` is the similarity at which two images
    /// count as the same picture
    #[must_use]
    pub fn new(images: Arc<dyn ImageSource>, registry: Arc<dyn HashRegistry>, threshold: f64) -> Self {
        Self {
            images,
            registry,
            threshold,
        }
    }
}

fn registry_error(e: &anyhow::Error) -> CheckExecutionError {
    CheckExecutionError::Unavailable {
        service: "hash registry",
        reason: format!("{e:#}"),
    }
}

#[async_trait]
impl CheckRunner for DuplicateCheck {
    fn kind(&self) -> CheckKind {
        CheckKind::DuplicateDetection
    }

    async fn evaluate(
        &self,
        request: &VerificationRequest,
    ) -> Result<CheckResult, CheckExecutionError> {
        let issue_id = request.issue_id();
        let images = self.images.load_all(request.image_urls()).await?;

        for image in &images {
            let found = self
                .registry
                .find_similar(&image.phash, issue_id, self.threshold)
                .map_err(|e| registry_error(&e))?;
            if let Some(prior) = found {
                info!(
                    "issue {issue_id}: {} matches issue {} ({:.2})",
                    image.reference, prior.issue_id, prior.similarity
                );
                return Ok(CheckResult::failed(
                    CheckKind::DuplicateDetection,
                    prior.similarity,
                    format!(
                        "Duplicate image detected (similarity: {:.2}%). Previously used in issue #{}",
                        prior.similarity * 100.0,
                        prior.issue_id
                    ),
                )
                .with_extra("image", image.reference.as_str())
                .with_extra("duplicate_issue_id", prior.issue_id)
                .with_extra("similarity", prior.similarity)
                .with_extra("phash", image.phash.to_hex()));
            }
        }

        for image in &images {
            self.registry.record(image.phash, issue_id).map_err(|e| registry_error(&e))?;
        }
        debug!("issue {issue_id}: recorded {} hash(es)", images.len());

        let hashes: Vec<String> = images.iter().map(|i| i.phash.to_hex()).collect();
        Ok(CheckResult::passed(CheckKind::DuplicateDetection, 0.95, "No duplicate detected")
            .with_extra("phash", hashes))
    }
}
