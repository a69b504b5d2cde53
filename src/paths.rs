//! Centralized path definitions for civicverify
//!
//! ## Layout
//!
//! ```text
//! ~/.config/civicverify/
//! └── config.toml               # Thresholds, limits, feature flags
//!
//! ~/.local/share/civicverify/   # (platform data dir)
//! ├── verifications.jsonl       # One VerificationRecord per line
//! ├── image-hashes.jsonl        # Perceptual hashes for duplicate detection
//! └── timeline.jsonl            # Issue timeline events
//! ```

use std::path::{Path, PathBuf};

/// Application directory name under the config and data dirs
const APP_DIR: &str = "civicverify";

/// Global config filename
const GLOBAL_CONFIG_FILE: &str = "config.toml";

/// Verification records filename
const STORE_FILE: &str = "verifications.jsonl";

/// Perceptual hash registry filename
const HASH_FILE: &str = "image-hashes.jsonl";

/// Issue timeline filename
const TIMELINE_FILE: &str = "timeline.jsonl";

/// Get the global civicverify config directory.
///
/// Returns `~/.config/civicverify/`.
#[must_use]
pub fn global_config_dir() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from("~")).join(".config").join(APP_DIR)
}

/// Get the global config file path.
#[must_use]
pub fn global_config() -> PathBuf {
    global_config_dir().join(GLOBAL_CONFIG_FILE)
}

/// Get the data directory for persisted records.
///
/// Falls back to `./.civicverify` when the platform has no data dir.
#[must_use]
pub fn data_dir() -> PathBuf {
    dirs::data_dir().map_or_else(|| PathBuf::from(".civicverify"), |d| d.join(APP_DIR))
}

/// Default verification records file
#[must_use]
pub fn default_store() -> PathBuf {
    data_dir().join(STORE_FILE)
}

/// Hash registry kept next to a records file
#[must_use]
pub fn hash_registry_beside(store: &Path) -> PathBuf {
    store.with_file_name(HASH_FILE)
}

/// Timeline kept next to a records file
#[must_use]
pub fn timeline_beside(store: &Path) -> PathBuf {
    store.with_file_name(TIMELINE_FILE)
}
