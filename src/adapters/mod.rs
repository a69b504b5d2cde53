//! Adapter implementations for port traits
//!
//! This module contains concrete implementations that handle I/O:
//!
//! - `image/` - Fetch, decode and cache images (`ImageSource`)
//! - `jsonl` - JSON-lines record store, timeline and hash registry
//! - `memory` - In-process registry and stores
//! - `search` - Reverse image search backends

pub mod image;
pub mod jsonl;
pub mod memory;
pub mod search;

pub use image::{CachingImageSource, FetchingImageSource};
pub use jsonl::{JsonlHashRegistry, JsonlOutcomeStore, JsonlTimelineStore, StoreError};
pub use memory::{InMemoryHashRegistry, MemoryOutcomeStore, MemoryTimelineStore};
pub use search::OfflineReverseSearch;
