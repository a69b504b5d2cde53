//! Fake / AI-generated image heuristics

use std::sync::Arc;

use async_trait::async_trait;
use log::debug;

use super::CheckRunner;
use crate::core::error::CheckExecutionError;
use crate::core::models::{CheckKind, CheckResult, ImageEvidence, VerificationRequest};
use crate::core::ports::ImageSource;

/// Output sizes of popular image generators
const GENERATOR_DIMENSIONS: [(u32, u32); 5] =
    [(512, 512), (1024, 1024), (768, 768), (1024, 1792), (1792, 1024)];

/// Square sides that rarely come out of a phone camera
const SQUARE_SIDES: [u32; 5] = [256, 512, 768, 1024, 2048];

const AUTHENTIC_CONFIDENCE: f64 = 0.95;

/// Flags images whose shape and metadata look generated rather than taken
pub struct FakeImageCheck {
    images: Arc<dyn ImageSource>,
}

impl FakeImageCheck {
    /// Create the check over an image source
    #[must_use]
    pub fn new(images: Arc<dyn ImageSource>) -> Self {
        Self { images }
    }

    /// Assess a single decoded image
    #[must_use]
    pub fn assess(image: &ImageEvidence) -> CheckResult {
        let mut confidence = AUTHENTIC_CONFIDENCE;
        let mut suspicious = false;
        let mut indicators = Vec::new();
        let dims = (image.width, image.height);

        if GENERATOR_DIMENSIONS.contains(&dims) {
            suspicious = true;
            confidence = 0.7;
            indicators.push(format!(
                "Image dimensions ({}) match common AI generation sizes",
                image.dimensions()
            ));
        }
        if image.width == image.height && SQUARE_SIDES.contains(&image.width) {
            suspicious = true;
            confidence = confidence.min(0.75);
            indicators.push("Perfect square dimensions (common in AI-generated images)".to_string());
        }
        if !image.exif.is_present() {
            confidence = confidence.min(0.85);
            indicators.push("No EXIF metadata (AI images often lack camera data)".to_string());
        }

        let result = if suspicious && confidence < 0.8 {
            CheckResult::warning(
                CheckKind::FakeDetection,
                confidence,
                format!("Possible AI-generated image: {}", indicators.join("; ")),
            )
        } else {
            CheckResult::passed(
                CheckKind::FakeDetection,
                AUTHENTIC_CONFIDENCE,
                "Image appears to be authentic",
            )
        };
        result
            .with_extra("image", image.reference.as_str())
            .with_extra("dimensions", image.dimensions())
            .with_extra("has_exif", image.exif.is_present())
            .with_extra("indicators", indicators)
    }
}

#[async_trait]
impl CheckRunner for FakeImageCheck {
    fn kind(&self) -> CheckKind {
        CheckKind::FakeDetection
    }

    async fn evaluate(
        &self,
        request: &VerificationRequest,
    ) -> Result<CheckResult, CheckExecutionError> {
        let images = self.images.load_all(request.image_urls()).await?;
        let worst = images
            .iter()
            .map(Self::assess)
            .min_by(|a, b| a.confidence.total_cmp(&b.confidence));
        debug!("fake detection assessed {} image(s) for issue {}", images.len(), request.issue_id());
        // load_all never returns an empty list for a non-empty request
        Ok(worst.unwrap_or_else(|| {
            CheckResult::warning(CheckKind::FakeDetection, 0.5, "No images could be assessed")
        }))
    }
}
