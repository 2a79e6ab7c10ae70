//! Route lookup and dispatch.
//!
//! # Responsibilities
//! - Store handlers keyed by exact method + path
//! - Look up the handler for a request
//! - Return matched handler or explicit no-match
//!
//! # Design Decisions
//! - Immutable after construction (shared via Arc, no locks)
//! - O(1) lookup via HashMap (path, then method)
//! - No wildcards or path parameters
//! - Explicit NotFound rather than silent default

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::response::{IntoResponse, Response};
use futures_util::future::BoxFuture;
use futures_util::FutureExt;

use crate::http::handlers;

/// Type-erased request handler.
pub type BoxedHandler = Arc<dyn Fn(Request<Body>) -> BoxFuture<'static, Response> + Send + Sync>;

/// Result of a route lookup.
pub enum Dispatch<'a> {
    Matched(&'a BoxedHandler),
    NotFound,
}

impl Dispatch<'_> {
    pub fn is_match(&self) -> bool {
        matches!(self, Dispatch::Matched(_))
    }
}

/// Exact-match route table.
#[derive(Clone, Default)]
pub struct RouteTable {
    routes: HashMap<String, HashMap<Method, BoxedHandler>>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Table holding the built-in probe and status routes.
    pub fn with_probes() -> Self {
        let mut table = Self::new();
        table
            .register(Method::GET, "/health", handlers::health)
            .register(Method::GET, "/ready", handlers::ready)
            .register(Method::GET, "/api/v1/status", handlers::status);
        table
    }

    /// Register `handler` for `method` + `path`. A later registration for the
    /// same pair replaces the earlier one.
    pub fn register<F, Fut>(&mut self, method: Method, path: impl Into<String>, handler: F) -> &mut Self
    where
        F: Fn(Request<Body>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        let path = path.into();
        let boxed: BoxedHandler = Arc::new(move |req| handler(req).boxed());

        if self
            .routes
            .entry(path.clone())
            .or_default()
            .insert(method.clone(), boxed)
            .is_some()
        {
            tracing::warn!(method = %method, path = %path, "Route registered twice, keeping the latest");
        }
        self
    }

    /// Find the handler for `method` + `path`.
    pub fn dispatch(&self, method: &Method, path: &str) -> Dispatch<'_> {
        match self.routes.get(path).and_then(|by_method| by_method.get(method)) {
            Some(handler) => Dispatch::Matched(handler),
            None => Dispatch::NotFound,
        }
    }

    /// Dispatch and invoke. Unmatched requests get an empty `404`.
    pub async fn handle(&self, req: Request<Body>) -> Response {
        let handler = match self.dispatch(req.method(), req.uri().path()) {
            Dispatch::Matched(handler) => Arc::clone(handler),
            Dispatch::NotFound => {
                tracing::debug!(method = %req.method(), path = %req.uri().path(), "No route matched");
                return StatusCode::NOT_FOUND.into_response();
            }
        };
        handler(req).await
    }

    /// Number of registered method + path pairs.
    pub fn len(&self) -> usize {
        self.routes.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for RouteTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut routes: Vec<String> = self
            .routes
            .iter()
            .flat_map(|(path, by_method)| by_method.keys().map(move |m| format!("{} {}", m, path)))
            .collect();
        routes.sort();
        f.debug_struct("RouteTable").field("routes", &routes).finish()
    }
}
