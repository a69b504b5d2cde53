//! Shared image loads
//!
//! Several runners ask for the same image during one verification. The
//! cache hands every caller the result of a single load; concurrent
//! callers wait for the load already in flight. Entries live for one
//! request budget, so a later request fetches again.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use log::debug;
use tokio::sync::OnceCell;

use crate::core::error::CheckExecutionError;
use crate::core::models::ImageEvidence;
use crate::core::ports::ImageSource;

/// Entries kept before the oldest is dropped
pub const DEFAULT_CACHE_ENTRIES: usize = 64;

type Loaded = Result<ImageEvidence, CheckExecutionError>;

#[derive(Clone)]
struct Slot {
    created: Instant,
    cell: Arc<OnceCell<Loaded>>,
}

#[derive(Default)]
struct Entries {
    slots: HashMap<String, Slot>,
    order: VecDeque<String>,
}

/// Memoizes another `ImageSource` for a limited time
pub struct CachingImageSource {
    inner: Arc<dyn ImageSource>,
    ttl: Duration,
    capacity: usize,
    entries: Mutex<Entries>,
}

impl std::fmt::Debug for CachingImageSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CachingImageSource")
            .field("ttl", &self.ttl)
            .field("capacity", &self.capacity)
            .finish_non_exhaustive()
    }
}

impl CachingImageSource {
    /// Cache loads of `inner` for `ttl`, keeping at most `capacity` entries
    #[must_use]
    pub fn new(inner: Arc<dyn ImageSource>, ttl: Duration, capacity: usize) -> Self {
        Self {
            inner,
            ttl,
            capacity: capacity.max(1),
            entries: Mutex::new(Entries::default()),
        }
    }

    /// Number of cached references
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner).slots.len()
    }

    /// Whether nothing is cached
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn slot(&self, reference: &str) -> Arc<OnceCell<Loaded>> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        let now = Instant::now();
        if let Some(slot) = entries.slots.get(reference)
            && now.duration_since(slot.created) < self.ttl
        {
            return Arc::clone(&slot.cell);
        }

        let cell = Arc::new(OnceCell::new());
        let slot = Slot {
            created: now,
            cell: Arc::clone(&cell),
        };
        if entries.slots.insert(reference.to_string(), slot).is_none() {
            entries.order.push_back(reference.to_string());
        }
        while entries.order.len() > self.capacity {
            if let Some(oldest) = entries.order.pop_front() {
                entries.slots.remove(&oldest);
            }
        }
        cell
    }
}

#[async_trait]
impl ImageSource for CachingImageSource {
    async fn load(&self, reference: &str) -> Result<ImageEvidence, CheckExecutionError> {
        let cell = self.slot(reference);
        cell.get_or_init(|| async {
            debug!("image cache miss: {reference}");
            self.inner.load(reference).await
        })
        .await
        .clone()
    }
}
