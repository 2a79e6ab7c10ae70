//! Access logging middleware.
//!
//! Emits exactly one `request completed` event per request, after the inner
//! chain (recovery included) has produced the final response.
//!
//! The inner chain and the emission run on their own task. Hyper drops the
//! service future when the client goes away mid-request; the detached task
//! still runs the handler to completion and logs it.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::middleware::Next;
use axum::response::Response;
use tracing::instrument::WithSubscriber;

use crate::http::context::RequestContext;
use crate::http::response::error_response;
use crate::observability::metrics;

pub async fn logging_middleware(req: Request<Body>, next: Next) -> Response {
    let ctx = RequestContext::from_request(&req);

    let task = tokio::spawn(complete(ctx, next, req).with_current_subscriber());

    match task.await {
        Ok(response) => response,
        Err(e) => {
            tracing::error!(error = %e, "request task failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

async fn complete(mut ctx: RequestContext, next: Next, req: Request<Body>) -> Response {
    let response = next.run(req).await;
    ctx.record_status(response.status());

    let elapsed = ctx.elapsed();
    let status = ctx.status().as_u16();

    tracing::info!(
        method = %ctx.method(),
        path = %ctx.path(),
        remote_addr = %ctx.remote_addr(),
        status,
        duration_ms = elapsed.as_secs_f64() * 1000.0,
        "request completed"
    );
    metrics::record_request(ctx.method().as_str(), status, elapsed);

    response
}
