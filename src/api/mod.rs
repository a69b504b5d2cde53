//! HTTP-agnostic API layer
//!
//! This module provides typed response structures and handlers that can be
//! used by any HTTP server implementation or directly by the CLI.
//!
//! ## Design
//!
//! - **Handlers take typed input**: return `Result<T, ApiError>`
//! - **Types are framework-agnostic**: No HTTP types leak into this module
//! - **Errors carry HTTP semantics**: `ApiError` knows its status code for translation

mod error;
mod handlers;
mod state;
mod types;

pub use error::{ApiError, ErrorCode};
pub use handlers::{
    authorize, cross_check, get_stats, get_timeline, get_verification_status, health,
    list_categories, parse_issue_id, service_info, verify_initial,
};
pub use state::AppState;
pub use types::{
    ApiResponse, CategoriesData, HealthData, ServiceInfo, StatsData, StatusData, TimelineData,
};
