//! Raw image retrieval
//!
//! A reference is one of:
//! - `http://` / `https://` URL (requires the `remote` feature)
//! - `file://` URL
//! - a plain filesystem path

use std::path::PathBuf;
use std::time::Duration;

use log::debug;

use crate::core::error::CheckExecutionError;

/// Downloads or reads image bytes within size and time limits
#[derive(Debug, Clone)]
pub struct Fetcher {
    max_bytes: usize,
    timeout: Duration,
    #[cfg(feature = "remote")]
    client: reqwest::Client,
}

impl Fetcher {
    /// Create a fetcher
    pub fn new(max_bytes: usize, timeout: Duration) -> Result<Self, CheckExecutionError> {
        Ok(Self {
            max_bytes,
            timeout,
            #[cfg(feature = "remote")]
            client: reqwest::Client::builder().timeout(timeout).build().map_err(|e| {
                CheckExecutionError::Unavailable {
                    service: "http client",
                    reason: e.to_string(),
                }
            })?,
        })
    }

    /// Fetch the bytes behind a reference
    pub async fn fetch(&self, reference: &str) -> Result<Vec<u8>, CheckExecutionError> {
        let work = async {
            if is_remote(reference) {
                self.fetch_remote(reference).await
            } else {
                self.read_local(reference).await
            }
        };
        tokio::time::timeout(self.timeout, work).await.unwrap_or_else(|_| {
            Err(CheckExecutionError::Fetch {
                reference: reference.to_string(),
                reason: format!("no response within {}s", self.timeout.as_secs()),
            })
        })
    }

    async fn read_local(&self, reference: &str) -> Result<Vec<u8>, CheckExecutionError> {
        let path = local_path(reference);
        let fetch_err = |e: std::io::Error| CheckExecutionError::Fetch {
            reference: reference.to_string(),
            reason: e.to_string(),
        };

        let meta = tokio::fs::metadata(&path).await.map_err(fetch_err)?;
        let len = usize::try_from(meta.len()).unwrap_or(usize::MAX);
        self.check_size(reference, len)?;

        let bytes = tokio::fs::read(&path).await.map_err(fetch_err)?;
        debug!("read {} bytes from {}", bytes.len(), path.display());
        Ok(bytes)
    }

    #[cfg(feature = "remote")]
    async fn fetch_remote(&self, reference: &str) -> Result<Vec<u8>, CheckExecutionError> {
        let fetch_err = |e: reqwest::Error| CheckExecutionError::Fetch {
            reference: reference.to_string(),
            reason: e.to_string(),
        };

        let response = self
            .client
            .get(reference)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(fetch_err)?;
        if let Some(len) = response.content_length() {
            self.check_size(reference, usize::try_from(len).unwrap_or(usize::MAX))?;
        }

        let bytes = response.bytes().await.map_err(fetch_err)?;
        self.check_size(reference, bytes.len())?;
        debug!("downloaded {} bytes from {reference}", bytes.len());
        Ok(bytes.to_vec())
    }

    #[cfg(not(feature = "remote"))]
    #[allow(clippy::unused_async)]
    async fn fetch_remote(&self, reference: &str) -> Result<Vec<u8>, CheckExecutionError> {
        Err(CheckExecutionError::Fetch {
            reference: reference.to_string(),
            reason: "built without the `remote` feature".to_string(),
        })
    }

    fn check_size(&self, reference: &str, bytes: usize) -> Result<(), CheckExecutionError> {
        if bytes > self.max_bytes {
            return Err(CheckExecutionError::TooLarge {
                reference: reference.to_string(),
                bytes,
                limit: self.max_bytes,
            });
        }
        Ok(())
    }
}

fn is_remote(reference: &str) -> bool {
    let lower = reference.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

fn local_path(reference: &str) -> PathBuf {
    PathBuf::from(reference.strip_prefix("file://").unwrap_or(reference))
}
