//! Probe and status handlers.
//!
//! - `/health` - Liveness: the process is running and can respond
//! - `/ready` - Readiness: always ready once serving has started
//! - `/api/v1/status` - Service identity and operational status

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::Response;
use serde::Serialize;

use crate::http::response::{json_response, unix_timestamp};

pub const SERVICE_NAME: &str = "api-gateway";
pub const SERVICE_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatusResponse {
    pub service: &'static str,
    pub version: &'static str,
    pub status: &'static str,
    pub timestamp: i64,
}

/// Liveness probe handler.
pub async fn health(_req: Request<Body>) -> Response {
    json_response(
        StatusCode::OK,
        &HealthResponse {
            status: "healthy",
            timestamp: unix_timestamp(),
        },
    )
}

/// Readiness probe handler.
pub async fn ready(_req: Request<Body>) -> Response {
    json_response(
        StatusCode::OK,
        &HealthResponse {
            status: "ready",
            timestamp: unix_timestamp(),
        },
    )
}

pub async fn status(_req: Request<Body>) -> Response {
    json_response(
        StatusCode::OK,
        &StatusResponse {
            service: SERVICE_NAME,
            version: SERVICE_VERSION,
            status: "operational",
            timestamp: unix_timestamp(),
        },
    )
}
