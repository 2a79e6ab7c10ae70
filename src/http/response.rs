//! JSON response construction.
//!
//! # Responsibilities
//! - Serialize response bodies and set `Content-Type: application/json`
//! - Build the generic error body used for faults
//!
//! # Design Decisions
//! - Serialization failures are logged and answered with an empty body;
//!   they are never retried
//! - Error bodies carry no internal detail

use std::time::{SystemTime, UNIX_EPOCH};

use axum::body::Body;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::Response;
use serde::Serialize;

/// Body of every fault response.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub status: u16,
    pub timestamp: i64,
}

/// Seconds since the Unix epoch.
pub fn unix_timestamp() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

/// Serialize `data` as the body of a `status` response.
pub fn json_response<T: Serialize>(status: StatusCode, data: &T) -> Response {
    let body = match serde_json::to_vec(data) {
        Ok(bytes) => Body::from(bytes),
        Err(e) => {
            tracing::error!(error = %e, "Failed to encode JSON response");
            Body::empty()
        }
    };

    let mut response = Response::new(body);
    *response.status_mut() = status;
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    response
}

/// Generic JSON error with the canonical reason phrase for `status`.
pub fn error_response(status: StatusCode) -> Response {
    let message = status.canonical_reason().unwrap_or("Unknown Error");
    json_response(
        status,
        &ErrorResponse {
            error: message.to_string(),
            status: status.as_u16(),
            timestamp: unix_timestamp(),
        },
    )
}
