//! Core domain logic for civicverify
//!
//! Business logic with no knowledge of HTTP, files or image formats.
//! All external interactions are abstracted through port traits.
//!
//! ## Architecture
//!
//! - `models/` - Domain types (requests, check results, outcomes)
//! - `services/` - Ingestion, check runners, aggregation, cross-verification
//! - `ports/` - Trait definitions for external dependencies
//! - `error` - Validation and check execution errors

pub mod error;
pub mod models;
pub mod ports;
pub mod services;
