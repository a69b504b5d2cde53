//! Business logic services
//!
//! - [`ingest`] - Validate submissions into requests
//! - [`checks`] - Independent check runners
//! - [`aggregator`] - Check results to a decision (pure)
//! - [`pipeline`] - Concurrent fan-out, timeouts, persistence
//! - [`cross_verify`] - Before/after comparison
//! - [`similarity`] - Perceptual hashing

pub mod aggregator;
pub mod checks;
pub mod cross_verify;
pub mod ingest;
pub mod pipeline;
pub mod similarity;

pub use aggregator::Aggregator;
pub use checks::{CheckRunner, supported_categories};
pub use cross_verify::{Comparison, CrossVerifier};
pub use ingest::{ingest, ingest_cross_check, parse_cross_check, parse_submission};
pub use pipeline::Verifier;
pub use similarity::{image_similarity, perceptual_hash};
