//! Category relevance
//!
//! Keyword heuristic over the free-text description. A description that
//! mentions a fifth of a category's vocabulary is taken as on-topic.

use async_trait::async_trait;

use super::CheckRunner;
use crate::core::error::CheckExecutionError;
use crate::core::models::{CheckKind, CheckResult, VerificationRequest};

/// Match ratio at or above which the category is accepted
const RELEVANT_RATIO: f64 = 0.2;

/// Match ratio below which relevance is called unclear
const WEAK_RATIO: f64 = 0.1;

static CATEGORIES: &[(&str, &[&str])] = &[
    (
        "Road Infrastructure",
        &[
            "road", "street", "pavement", "pothole", "crack", "asphalt", "highway", "lane",
            "traffic", "intersection", "crosswalk",
        ],
    ),
    (
        "Water & Drainage",
        &[
            "water", "drain", "sewer", "pipe", "leak", "flood", "puddle", "manhole", "gutter",
            "overflow", "sewage",
        ],
    ),
    (
        "Street Lighting",
        &[
            "light", "lamp", "pole", "streetlight", "bulb", "dark", "illumination", "lighting",
            "fixture",
        ],
    ),
    (
        "Waste Management",
        &[
            "garbage", "trash", "waste", "bin", "dumpster", "litter", "rubbish", "disposal",
            "recycling", "dump",
        ],
    ),
    (
        "Traffic & Transportation",
        &[
            "traffic", "signal", "sign", "bus", "stop", "parking", "vehicle", "car", "transport",
            "congestion",
        ],
    ),
    (
        "Public Safety",
        &[
            "danger", "hazard", "unsafe", "broken", "damaged", "risk", "accident", "injury",
            "security", "crime",
        ],
    ),
    (
        "Parks & Recreation",
        &[
            "park", "playground", "bench", "tree", "grass", "garden", "recreation", "sports",
            "field", "path",
        ],
    ),
    (
        "Utilities & Power",
        &[
            "power", "electric", "utility", "wire", "cable", "transformer", "pole", "outage",
            "electricity", "gas",
        ],
    ),
    (
        "Building & Construction",
        &[
            "building", "construction", "structure", "wall", "roof", "foundation", "demolition",
            "renovation", "property",
        ],
    ),
    (
        "Environmental Issues",
        &[
            "pollution", "environment", "air", "noise", "smell", "odor", "contamination", "toxic",
            "hazardous", "waste",
        ],
    ),
    (
        "Public Health",
        &[
            "health", "sanitation", "hygiene", "pest", "rodent", "insect", "disease", "medical",
            "clinic", "hospital",
        ],
    ),
    (
        "Community Services",
        &["community", "service", "facility", "center", "public", "amenity", "resource", "program"],
    ),
];

/// Category names the relevance check knows, in display order
#[must_use]
pub fn supported_categories() -> Vec<&'static str> {
    CATEGORIES.iter().map(|(name, _)| *name).collect()
}

/// Keywords for a category, matched exactly by name
#[must_use]
pub fn category_keywords(category: &str) -> Option<&'static [&'static str]> {
    CATEGORIES.iter().find(|(name, _)| *name == category).map(|(_, keywords)| *keywords)
}

/// Checks that the description is about the reported category
#[derive(Debug, Default, Clone, Copy)]
pub struct CategoryCheck;

impl CategoryCheck {
    /// Score a description against a category
    #[must_use]
    pub fn assess(category: &str, description: &str) -> CheckResult {
        let Some(keywords) = category_keywords(category) else {
            return CheckResult::warning(
                CheckKind::CategoryRelevance,
                0.6,
                format!("Unknown category: {category}"),
            )
            .with_extra("category", category);
        };

        let text = description.to_lowercase();
        let matches: Vec<&str> = keywords.iter().copied().filter(|kw| text.contains(kw)).collect();
        #[allow(clippy::cast_precision_loss)]
        let ratio = matches.len() as f64 / keywords.len() as f64;
        let confidence = 0.5 + ratio * 0.5;

        let result = if ratio >= RELEVANT_RATIO {
            let shown: Vec<&str> = matches.iter().take(5).copied().collect();
            CheckResult::passed(
                CheckKind::CategoryRelevance,
                confidence,
                format!(
                    "Category '{category}' appears relevant. Matched keywords: {}",
                    shown.join(", ")
                ),
            )
        } else if ratio >= WEAK_RATIO {
            CheckResult::warning(
                CheckKind::CategoryRelevance,
                confidence,
                format!(
                    "Category '{category}' may be relevant but confidence is low. Matched: {}",
                    matches.join(", ")
                ),
            )
        } else {
            CheckResult::warning(
                CheckKind::CategoryRelevance,
                confidence,
                format!("Category '{category}' relevance unclear. Few matching keywords found."),
            )
        };
        result
            .with_extra("category", category)
            .with_extra("matched_keywords", matches)
            .with_extra("match_ratio", ratio)
    }
}

#[async_trait]
impl CheckRunner for CategoryCheck {
    fn kind(&self) -> CheckKind {
        CheckKind::CategoryRelevance
    }

    async fn evaluate(
        &self,
        request: &VerificationRequest,
    ) -> Result<CheckResult, CheckExecutionError> {
        Ok(Self::assess(request.category(), request.description()))
    }
}
