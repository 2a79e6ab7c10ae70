//! Per-request transient state.
//!
//! A `RequestContext` is created when a request enters the pipeline, has its
//! status recorded once the inner chain produced a response, and is consumed
//! by the access log. Nothing in it outlives the request.

use std::net::SocketAddr;
use std::time::{Duration, Instant};

use axum::body::Body;
use axum::extract::ConnectInfo;
use axum::http::{Method, Request, StatusCode};

#[derive(Debug, Clone)]
pub struct RequestContext {
    method: Method,
    path: String,
    remote_addr: Option<SocketAddr>,
    started: Instant,
    captured_status: Option<StatusCode>,
}

impl RequestContext {
    /// Capture method, path and peer address from an incoming request.
    pub fn from_request(req: &Request<Body>) -> Self {
        let remote_addr = req
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| *addr);

        Self {
            method: req.method().clone(),
            path: req.uri().path().to_string(),
            remote_addr,
            started: Instant::now(),
            captured_status: None,
        }
    }

    /// Record the status written by the inner chain. The latest write wins.
    pub fn record_status(&mut self, status: StatusCode) {
        self.captured_status = Some(status);
    }

    /// Recorded status, or `200 OK` when nothing was written explicitly.
    pub fn status(&self) -> StatusCode {
        self.captured_status.unwrap_or(StatusCode::OK)
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Peer address as logged; `"unknown"` when the transport did not supply one.
    pub fn remote_addr(&self) -> String {
        self.remote_addr
            .map(|addr| addr.to_string())
            .unwrap_or_else(|| "unknown".to_string())
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}
