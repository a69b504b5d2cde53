//! civicverify - Verification decisions for civic issue reports
//!
//! A citizen reports a problem (a pothole, a broken street light) with one
//! or more photos and a location. This library decides whether the report
//! is genuine by running independent heuristic checks concurrently and
//! aggregating them, and later compares the citizen's photos with the
//! government's resolution photos to judge whether the work was done.
//!
//! - [`core`] - Domain models, ports and the verification services
//! - [`adapters`] - Image fetching/decoding, stores, hash registries
//! - [`api`] - HTTP-agnostic handlers shared by the CLI and the server
//! - [`server`] - `tiny_http` adapter (feature `server`)

#![deny(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    missing_debug_implementations,
    missing_copy_implementations,
    trivial_casts,
    trivial_numeric_casts,
    unused_import_braces,
    unused_qualifications
)]
// Allow some pedantic lints that are too noisy or not applicable
#![allow(
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::cargo_common_metadata,
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod adapters;
pub mod api;
pub mod config;
pub mod core;
pub mod output;
pub mod paths;
pub mod server;
