//! `tiny_http` server adapter
//!
//! Handles routing, body parsing, authentication and response conversion.
//! Each request is handled on a blocking worker of the tokio runtime, so a
//! slow verification does not hold up other callers.

use std::io::{Cursor, Read};
use std::sync::Arc;

use log::{debug, info, warn};
use serde::{Serialize, de::DeserializeOwned};
use tiny_http::{Header, Method, Request, Response, Server, StatusCode};
use tokio::runtime::Handle;

use crate::api::{self, ApiError, ApiResponse, AppState};
use crate::core::models::{CrossCheckSubmission, VerificationSubmission};

/// Header carrying the API key
pub const API_KEY_HEADER: &str = "X-API-Key";

/// A routed JSON reply, before it becomes a `tiny_http` response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    /// HTTP status code
    pub status: u16,
    /// Serialized `ApiResponse` envelope
    pub body: String,
}

impl Reply {
    /// Convert to a `tiny_http` response with a JSON content type
    #[must_use]
    pub fn into_response(self) -> Response<Cursor<Vec<u8>>> {
        let response =
            Response::from_data(self.body.into_bytes()).with_status_code(StatusCode(self.status));
        match Header::from_bytes("Content-Type", "application/json") {
            Ok(header) => response.with_header(header),
            Err(()) => response,
        }
    }
}

/// Serve until the listener fails
pub fn serve(state: Arc<AppState>, runtime: &Handle, addr: &str) -> anyhow::Result<()> {
    let server = Server::http(addr).map_err(|e| anyhow::anyhow!("Failed to start server: {e}"))?;
    info!("Listening on http://{addr}");

    for mut request in server.incoming_requests() {
        let state = Arc::clone(&state);
        let handle = runtime.clone();
        runtime.spawn_blocking(move || {
            let response = handle_request(&state, &handle, &mut request).into_response();
            if let Err(e) = request.respond(response) {
                warn!("Failed to send response: {e}");
            }
        });
    }

    Ok(())
}

// =============================================================================
// REQUEST HANDLING
// =============================================================================

/// Read what routing needs from a live request and dispatch it
pub fn handle_request(
    state: &AppState,
    runtime: &Handle,
    request: &mut Request,
) -> Reply {
    let method = request.method().clone();
    let url = request.url().to_string();
    let api_key = request
        .headers()
        .iter()
        .find(|h| h.field.equiv(API_KEY_HEADER))
        .map(|h| h.value.as_str().to_string());
    debug!("{method} {url}");

    let body = if method == Method::Post {
        match read_body(request, state.config().limits.max_body_bytes()) {
            Ok(body) => body,
            Err(e) => return error_response(&e),
        }
    } else {
        String::new()
    };

    route(state, runtime, &method, &url, api_key.as_deref(), &body)
}

/// Map a method and path to a handler
///
/// Routes under `/api/` require the configured API key.
pub fn route(
    state: &AppState,
    runtime: &Handle,
    method: &Method,
    url: &str,
    api_key: Option<&str>,
    body: &str,
) -> Reply {
    let path = url.split('?').next().unwrap_or(url);

    match (method, path) {
        (&Method::Get, "/") => success_response(api::service_info(state)),
        (&Method::Get, "/health") => success_response(api::health(state)),
        _ if path.starts_with("/api/") => {
            if let Err(e) = api::authorize(state, api_key) {
                return error_response(&e);
            }
            handle_api_request(state, runtime, method, path, body)
        },
        _ => not_found_response(&format!("No route for {method} {path}")),
    }
}

fn handle_api_request(
    state: &AppState,
    runtime: &Handle,
    method: &Method,
    path: &str,
    body: &str,
) -> Reply {
    let api_path = path.strip_prefix("/api/v1").unwrap_or(path);

    match (method, api_path) {
        (&Method::Post, "/verify/initial") => match parse_json::<VerificationSubmission>(body) {
            Ok(req) => handle_result(runtime.block_on(api::verify_initial(state, req))),
            Err(e) => error_response(&e),
        },
        (&Method::Post, "/verify/cross-check") => match parse_json::<CrossCheckSubmission>(body) {
            Ok(req) => handle_result(runtime.block_on(api::cross_check(state, req))),
            Err(e) => error_response(&e),
        },
        (&Method::Get, "/stats") => handle_result(api::get_stats(state)),
        (&Method::Get, "/categories") => success_response(api::list_categories()),

        // GET /verify/status/:issue_id
        _ if method == &Method::Get && api_path.starts_with("/verify/status/") => {
            let raw = api_path.strip_prefix("/verify/status/").unwrap_or("");
            handle_result(
                api::parse_issue_id(raw).and_then(|id| api::get_verification_status(state, id)),
            )
        },

        // GET /verify/timeline/:issue_id
        _ if method == &Method::Get && api_path.starts_with("/verify/timeline/") => {
            let raw = api_path.strip_prefix("/verify/timeline/").unwrap_or("");
            handle_result(api::parse_issue_id(raw).and_then(|id| api::get_timeline(state, id)))
        },

        _ => not_found_response(&format!("Unknown endpoint: {method} {path}")),
    }
}

// =============================================================================
// BODY PARSING
// =============================================================================

fn read_body(request: &mut Request, limit: usize) -> Result<String, ApiError> {
    if let Some(length) = request.body_length()
        && length > limit
    {
        return Err(ApiError::payload_too_large(limit));
    }
    read_limited(request.as_reader(), limit)
}

/// Read at most `limit` bytes of UTF-8; anything longer is refused
fn read_limited(reader: impl Read, limit: usize) -> Result<String, ApiError> {
    let mut body = Vec::new();
    reader
        .take(limit as u64 + 1)
        .read_to_end(&mut body)
        .map_err(|e| ApiError::bad_request(format!("Failed to read request body: {e}")))?;
    if body.len() > limit {
        return Err(ApiError::payload_too_large(limit));
    }
    String::from_utf8(body)
        .map_err(|e| ApiError::bad_request(format!("Request body is not UTF-8: {e}")))
}

fn parse_json<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|e| ApiError::bad_request(format!("Invalid JSON: {e}")))
}

// =============================================================================
// RESPONSE CONVERSION
// =============================================================================

/// Convert a handler result to an HTTP response
fn handle_result<T: Serialize>(result: Result<T, ApiError>) -> Reply {
    match result {
        Ok(data) => success_response(data),
        Err(e) => error_response(&e),
    }
}

/// Create a successful JSON response
fn success_response<T: Serialize>(data: T) -> Reply {
    let response = ApiResponse::success(data);
    json_response(&response, 200)
}

/// Create an error JSON response with appropriate status code
fn error_response(error: &ApiError) -> Reply {
    let response = ApiResponse::<()>::error(error.code.as_str(), &error.message);
    json_response(&response, error.status_code())
}

/// Create a 404 not found response
fn not_found_response(message: &str) -> Reply {
    let response = ApiResponse::<()>::error("NOT_FOUND", message);
    json_response(&response, 404)
}

/// Serialize data to a JSON reply with status code
fn json_response<T: Serialize>(data: &T, status: u16) -> Reply {
    let body = serde_json::to_string(data).unwrap_or_else(|_| r#"{"success":false}"#.to_string());
    Reply { status, body }
}
