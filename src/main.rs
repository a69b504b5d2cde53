//! civicverify - Verification decisions for civic issue reports
//!
//! Command-line front end: verify and cross-check requests from JSON files,
//! query recorded decisions, and serve the HTTP API.

#![deny(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    missing_debug_implementations,
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
    clippy::needless_pass_by_value
)]

mod cli;
mod commands;

/// Main entry point for the civicverify CLI
fn main() {
    if let Err(e) = cli::run() {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
