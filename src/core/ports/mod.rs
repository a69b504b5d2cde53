//! Port traits (interfaces) for external dependencies
//!
//! These traits define the boundaries between core business logic
//! and external systems (image hosts, hash stores, search services,
//! result persistence, issue timelines).
//!
//! Implementations live in the `adapters` module.

mod hash_registry;
mod image_source;
mod outcome_store;
mod reverse_search;
mod timeline_store;

pub use hash_registry::{HashMatch, HashRegistry};
pub use image_source::ImageSource;
pub use outcome_store::OutcomeStore;
pub use reverse_search::{ReverseImageSearch, SearchMatch};
pub use timeline_store::TimelineStore;
