//! JSON-lines file adapters
//!
//! One JSON object per line, appended, never rewritten. Files and parent
//! directories are created on first write; a missing file reads as empty.

use std::fs::{self, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use log::debug;
use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;
use thiserror::Error;

use super::memory::InMemoryHashRegistry;
use crate::core::models::{PerceptualHash, TimelineEvent, VerificationRecord};
use crate::core::ports::{HashMatch, HashRegistry, OutcomeStore, TimelineStore};

/// Errors reading or writing a JSON-lines file
#[derive(Debug, Error)]
pub enum StoreError {
    /// The file could not be read or written
    #[error("{path}: {source}")]
    Io {
        /// File involved
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// A line is not valid JSON for the expected type
    #[error("{path}:{line}: {source}")]
    Corrupt {
        /// File involved
        path: PathBuf,
        /// One-based line number
        line: usize,
        /// Underlying parse error
        source: serde_json::Error,
    },
}

fn io_err(path: &Path) -> impl Fn(std::io::Error) -> StoreError + '_ {
    move |source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    }
}

fn read_lines<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, StoreError> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let file = fs::File::open(path).map_err(io_err(path))?;
    let mut items = Vec::new();
    for (index, line) in BufReader::new(file).lines().enumerate() {
        let line = line.map_err(io_err(path))?;
        if line.trim().is_empty() {
            continue;
        }
        let item = serde_json::from_str(&line).map_err(|source| StoreError::Corrupt {
            path: path.to_path_buf(),
            line: index + 1,
            source,
        })?;
        items.push(item);
    }
    Ok(items)
}

fn append_line<T: Serialize>(path: &Path, item: &T) -> Result<(), StoreError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(io_err(path))?;
    }
    let mut line = serde_json::to_string(item).map_err(|source| StoreError::Corrupt {
        path: path.to_path_buf(),
        line: 0,
        source,
    })?;
    line.push('\n');
    let mut file =
        OpenOptions::new().create(true).append(true).open(path).map_err(io_err(path))?;
    file.write_all(line.as_bytes()).map_err(io_err(path))
}

/// Verification records in a JSON-lines file
#[derive(Debug)]
pub struct JsonlOutcomeStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonlOutcomeStore {
    /// Store backed by `path`
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// The backing file
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl OutcomeStore for JsonlOutcomeStore {
    fn save(&self, record: &VerificationRecord) -> anyhow::Result<()> {
        let _guard = self.write_lock.lock().map_err(|_| anyhow::anyhow!("store lock poisoned"))?;
        append_line(&self.path, record)?;
        debug!("saved {} record for issue {}", record.verification_type, record.issue_id);
        Ok(())
    }

    fn list(&self) -> anyhow::Result<Vec<VerificationRecord>> {
        Ok(read_lines(&self.path)?)
    }
}

/// Issue timeline events in a JSON-lines file
#[derive(Debug)]
pub struct JsonlTimelineStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonlTimelineStore {
    /// Timeline backed by `path`
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }
}

impl TimelineStore for JsonlTimelineStore {
    fn append(&self, event: &TimelineEvent) -> anyhow::Result<()> {
        let _guard =
            self.write_lock.lock().map_err(|_| anyhow::anyhow!("timeline lock poisoned"))?;
        append_line(&self.path, event)?;
        debug!("issue {}: {}", event.issue_id, event.event_type);
        Ok(())
    }

    fn list(&self) -> anyhow::Result<Vec<TimelineEvent>> {
        Ok(read_lines(&self.path)?)
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct HashLine {
    phash: PerceptualHash,
    issue_id: u64,
}

/// Perceptual hash registry persisted as JSON lines
///
/// Lookups are served from memory; new hashes are appended to the file.
#[derive(Debug)]
pub struct JsonlHashRegistry {
    path: PathBuf,
    inner: InMemoryHashRegistry,
    write_lock: Mutex<()>,
}

impl JsonlHashRegistry {
    /// Load the registry at `path`
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let lines: Vec<HashLine> = read_lines(&path)?;
        debug!("loaded {} image hash(es) from {}", lines.len(), path.display());
        Ok(Self {
            inner: InMemoryHashRegistry::with_entries(lines.into_iter().map(|l| (l.phash, l.issue_id))),
            path,
            write_lock: Mutex::new(()),
        })
    }
}

impl HashRegistry for JsonlHashRegistry {
    fn find_similar(
        &self,
        hash: &PerceptualHash,
        exclude_issue: u64,
        threshold: f64,
    ) -> anyhow::Result<Option<HashMatch>> {
        self.inner.find_similar(hash, exclude_issue, threshold)
    }

    fn record(&self, hash: PerceptualHash, issue_id: u64) -> anyhow::Result<()> {
        let _guard =
            self.write_lock.lock().map_err(|_| anyhow::anyhow!("registry lock poisoned"))?;
        if self.inner.insert(hash, issue_id)? {
            append_line(&self.path, &HashLine { phash: hash, issue_id })?;
        }
        Ok(())
    }

    fn len(&self) -> anyhow::Result<usize> {
        self.inner.len()
    }
}
