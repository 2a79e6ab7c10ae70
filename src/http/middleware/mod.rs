//! Request middleware.
//!
//! # Ordering
//! ```text
//! request → logging → recovery → timeout → dispatcher → handler
//! ```
//! Recovery sits inside logging so a panicking handler still produces its
//! access-log line, with status 500.

pub mod logging;
pub mod recovery;

use std::time::Duration;

use axum::{middleware, Router};
use tower_http::timeout::TimeoutLayer;

pub use logging::logging_middleware;
pub use recovery::recovery_middleware;

/// Wrap `router` in the request pipeline. `write_timeout` bounds the time a
/// handler has to produce its response (408 on expiry).
#[allow(deprecated)]
pub fn apply(router: Router, write_timeout: Duration) -> Router {
    router
        .layer(TimeoutLayer::new(write_timeout))
        .layer(middleware::from_fn(recovery_middleware))
        .layer(middleware::from_fn(logging_middleware))
}
