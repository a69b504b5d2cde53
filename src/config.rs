//! Verifier configuration
//!
//! One immutable structure, built once at startup and shared read-only
//! (behind an `Arc`) by the pipeline, every check runner and the server.
//!
//! Lookup order for the file:
//! 1. `--config <path>`
//! 2. `$CIVICVERIFY_CONFIG`
//! 3. `~/.config/civicverify/config.toml`
//!
//! Every field has a default, so an empty or partial file is valid.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::models::CheckKind;
use crate::paths;

/// Environment variable naming an explicit config file
pub const CONFIG_ENV: &str = "CIVICVERIFY_CONFIG";

/// Errors loading or validating configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read
    #[error("cannot read config {path}: {source}")]
    Read {
        /// File that failed
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// The file is not valid TOML for this structure
    #[error("invalid config {path}: {source}")]
    Parse {
        /// File that failed
        path: PathBuf,
        /// Underlying TOML error
        source: toml::de::Error,
    },

    /// A value is out of its allowed range
    #[error("invalid config value {key}: {reason}")]
    Invalid {
        /// Dotted key, e.g. `thresholds.auto_approve`
        key: &'static str,
        /// What is wrong with it
        reason: String,
    },
}

/// Complete configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Service identity and surfaces
    pub service: ServiceConfig,
    /// Decision thresholds
    pub thresholds: Thresholds,
    /// Which checks run and how much they weigh
    pub checks: ChecksConfig,
    /// Size and time limits
    pub limits: Limits,
    /// Feature flags
    pub features: Features,
}

/// Service identity and surfaces
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Name reported by the health endpoint
    pub name: String,
    /// Port for `serve`
    pub port: u16,
    /// Default log filter when `RUST_LOG` is unset
    pub log_level: String,
    /// Value required in the `X-API-Key` header; no auth when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// JSON-lines file of verification records; default under the data dir
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_path: Option<PathBuf>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: "civicverify".to_string(),
            port: 8001,
            log_level: "info".to_string(),
            api_key: None,
            store_path: None,
        }
    }
}

/// Decision thresholds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// Aggregate confidence at or above which a clean report is approved
    pub auto_approve: f64,
    /// Aggregate confidence below which a report is rejected
    pub auto_reject: f64,
    /// Minimum confidence a single check should reach; lower values are
    /// called out in the outcome's warnings
    pub min_confidence: f64,
    /// Perceptual similarity at or above which an image is a duplicate
    pub duplicate: f64,
    /// Allowed distance between EXIF GPS and reported location
    pub location_radius_meters: f64,
    /// Allowed distance between citizen and government image GPS
    pub cross_check_radius_meters: f64,
    /// Minimum before/after dissimilarity taken as evidence of work
    pub work_change: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            auto_approve: 0.9,
            auto_reject: 0.3,
            min_confidence: 0.7,
            duplicate: 0.85,
            location_radius_meters: 100.0,
            cross_check_radius_meters: 200.0,
            work_change: 0.2,
        }
    }
}

/// Which checks run and how much they weigh
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChecksConfig {
    /// Run the fake/AI-generated image check
    pub fake_detection: bool,
    /// Run the duplicate image check
    pub duplicate_detection: bool,
    /// Run the EXIF metadata check
    pub metadata_validation: bool,
    /// Run the location consistency check
    pub location_consistency: bool,
    /// Run the category relevance check
    pub category_relevance: bool,
    /// Aggregation weight per check name; missing entries weigh 1.0
    pub weights: BTreeMap<String, f64>,
}

impl Default for ChecksConfig {
    fn default() -> Self {
        Self {
            fake_detection: true,
            duplicate_detection: true,
            metadata_validation: true,
            location_consistency: true,
            category_relevance: true,
            weights: BTreeMap::new(),
        }
    }
}

impl ChecksConfig {
    /// Whether a check is switched on
    ///
    /// The internet search is governed by `features.internet_search`.
    #[must_use]
    pub const fn is_enabled(&self, kind: CheckKind, features: &Features) -> bool {
        match kind {
            CheckKind::FakeDetection => self.fake_detection,
            CheckKind::DuplicateDetection => self.duplicate_detection,
            CheckKind::MetadataValidation => self.metadata_validation,
            CheckKind::LocationConsistency => self.location_consistency,
            CheckKind::CategoryRelevance => self.category_relevance,
            CheckKind::InternetSearch => features.internet_search,
        }
    }

    /// Aggregation weight for a check
    #[must_use]
    pub fn weight(&self, kind: CheckKind) -> f64 {
        self.weights.get(kind.as_str()).copied().unwrap_or(1.0)
    }
}

/// Size and time limits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Limits {
    /// Maximum images in one submission
    pub max_images_per_request: usize,
    /// Maximum encoded image size
    pub max_image_size_mb: usize,
    /// Budget for a whole verification
    pub request_timeout_seconds: u64,
    /// Budget for a single check runner
    pub check_timeout_seconds: u64,
    /// Budget for one image download
    pub fetch_timeout_seconds: u64,
    /// Largest HTTP request body accepted
    pub max_body_kb: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_images_per_request: 10,
            max_image_size_mb: 10,
            request_timeout_seconds: 30,
            check_timeout_seconds: 10,
            fetch_timeout_seconds: 30,
            max_body_kb: 1024,
        }
    }
}

impl Limits {
    /// Whole-request budget
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }

    /// Per-check budget
    #[must_use]
    pub const fn check_timeout(&self) -> Duration {
        Duration::from_secs(self.check_timeout_seconds)
    }

    /// Per-download budget
    #[must_use]
    pub const fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_seconds)
    }

    /// Maximum encoded image size in bytes
    #[must_use]
    pub const fn max_image_bytes(&self) -> usize {
        self.max_image_size_mb * 1024 * 1024
    }

    /// Maximum HTTP request body in bytes
    #[must_use]
    pub const fn max_body_bytes(&self) -> usize {
        self.max_body_kb * 1024
    }
}

/// Feature flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Features {
    /// Heuristic stand-ins instead of model inference
    pub mock_ai: bool,
    /// Run the reverse image search check
    pub internet_search: bool,
}

impl Default for Features {
    fn default() -> Self {
        Self {
            mock_ai: true,
            internet_search: false,
        }
    }
}

impl Config {
    /// Resolve the config file path from an explicit flag, the environment
    /// or the user config directory
    #[must_use]
    pub fn resolve_path(explicit: Option<&Path>) -> Option<PathBuf> {
        if let Some(path) = explicit {
            return Some(path.to_path_buf());
        }
        if let Ok(path) = std::env::var(CONFIG_ENV)
            && !path.trim().is_empty()
        {
            return Some(PathBuf::from(path));
        }
        let default = paths::global_config();
        default.exists().then_some(default)
    }

    /// Load from the resolved location, or defaults when there is none
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match Self::resolve_path(explicit) {
            Some(path) => Self::load_file(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load and validate one file
    pub fn load_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the pipeline cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let t = &self.thresholds;
        for (key, value) in [
            ("thresholds.auto_approve", t.auto_approve),
            ("thresholds.auto_reject", t.auto_reject),
            ("thresholds.min_confidence", t.min_confidence),
            ("thresholds.duplicate", t.duplicate),
            ("thresholds.work_change", t.work_change),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::Invalid {
                    key,
                    reason: format!("{value} is outside 0..=1"),
                });
            }
        }
        if t.auto_reject > t.auto_approve {
            return Err(ConfigError::Invalid {
                key: "thresholds.auto_reject",
                reason: format!(
                    "{} is above thresholds.auto_approve ({})",
                    t.auto_reject, t.auto_approve
                ),
            });
        }
        for (key, value) in [
            ("thresholds.location_radius_meters", t.location_radius_meters),
            ("thresholds.cross_check_radius_meters", t.cross_check_radius_meters),
        ] {
            if value.is_nan() || value <= 0.0 {
                return Err(ConfigError::Invalid {
                    key,
                    reason: format!("{value} must be positive"),
                });
            }
        }
        for (name, weight) in &self.checks.weights {
            if name.parse::<CheckKind>().is_err() {
                return Err(ConfigError::Invalid {
                    key: "checks.weights",
                    reason: format!("unknown check '{name}'"),
                });
            }
            if weight.is_nan() || *weight < 0.0 {
                return Err(ConfigError::Invalid {
                    key: "checks.weights",
                    reason: format!("weight for '{name}' must be non-negative"),
                });
            }
        }
        let l = &self.limits;
        for (key, value) in [
            ("limits.max_images_per_request", l.max_images_per_request as u64),
            ("limits.max_image_size_mb", l.max_image_size_mb as u64),
            ("limits.request_timeout_seconds", l.request_timeout_seconds),
            ("limits.check_timeout_seconds", l.check_timeout_seconds),
            ("limits.fetch_timeout_seconds", l.fetch_timeout_seconds),
            ("limits.max_body_kb", l.max_body_kb as u64),
        ] {
            if value == 0 {
                return Err(ConfigError::Invalid {
                    key,
                    reason: "must be greater than zero".to_string(),
                });
            }
        }
        Ok(())
    }

    /// Where verification records are kept
    #[must_use]
    pub fn store_path(&self) -> PathBuf {
        self.service.store_path.clone().unwrap_or_else(paths::default_store)
    }

    /// Render as TOML
    pub fn to_toml(&self) -> anyhow::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}
