//! HTTP server setup and accept loop.
//!
//! # Responsibilities
//! - Assemble the Axum router: route table behind the middleware chain
//! - Accept connections until shutdown is triggered
//! - Drive the lifecycle state machine
//! - Drain open connections within the grace period

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    response::Response,
    Router,
};
use tokio::net::TcpListener;

use crate::config::GatewayConfig;
use crate::http::middleware;
use crate::lifecycle::shutdown::{Shutdown, ShutdownOutcome};
use crate::lifecycle::state::Lifecycle;
use crate::net::connection::{serve_connection, ConnectionTimeouts, ConnectionTracker};
use crate::routing::RouteTable;

/// Back-off after a failed accept (e.g. file descriptor exhaustion).
const ACCEPT_ERROR_BACKOFF: Duration = Duration::from_millis(100);

/// HTTP server for the gateway.
pub struct HttpServer {
    router: Router,
    config: GatewayConfig,
    lifecycle: Arc<Lifecycle>,
    connections: ConnectionTracker,
}

impl HttpServer {
    /// Create a new HTTP server serving `routes`.
    pub fn new(config: GatewayConfig, routes: RouteTable) -> Self {
        let router = Self::build_router(&config, routes);
        Self {
            router,
            config,
            lifecycle: Arc::new(Lifecycle::new()),
            connections: ConnectionTracker::new(),
        }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &GatewayConfig, routes: RouteTable) -> Router {
        let router = Router::new()
            .fallback(dispatch)
            .with_state(Arc::new(routes));
        middleware::apply(router, config.timeouts.write())
    }

    /// The fully layered router, usable without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn lifecycle(&self) -> Arc<Lifecycle> {
        Arc::clone(&self.lifecycle)
    }

    /// Serve on `listener` until `shutdown` is triggered, then drain.
    ///
    /// The listener is closed as soon as shutdown begins. Open connections
    /// finish their in-flight request and close; if any remain when the grace
    /// period elapses the outcome is [`ShutdownOutcome::Forced`].
    pub async fn run(self, listener: TcpListener, shutdown: Shutdown) -> Result<ShutdownOutcome, std::io::Error> {
        let addr = listener.local_addr()?;
        let timeouts = ConnectionTimeouts {
            read: self.config.timeouts.read(),
            idle: self.config.timeouts.idle(),
        };

        self.lifecycle.mark_listening();
        tracing::info!(address = %addr, "HTTP server listening");

        let mut signal = shutdown.subscribe();
        loop {
            tokio::select! {
                biased;
                _ = signal.recv() => break,
                accepted = listener.accept() => match accepted {
                    Ok((stream, peer_addr)) => {
                        let guard = self.connections.track();
                        tracing::trace!(connection_id = %guard.id(), peer = %peer_addr, "Connection accepted");

                        let app = self.router.clone();
                        let conn_shutdown = shutdown.subscribe();
                        tokio::spawn(async move {
                            serve_connection(stream, peer_addr, app, timeouts, conn_shutdown).await;
                            drop(guard);
                        });
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "Failed to accept connection");
                        tokio::time::sleep(ACCEPT_ERROR_BACKOFF).await;
                    }
                }
            }
        }

        drop(listener);
        self.lifecycle.begin_shutdown();

        let grace = self.config.timeouts.shutdown_grace();
        tracing::info!(
            open_connections = self.connections.active_count(),
            grace_secs = grace.as_secs_f64(),
            "Shutting down server, draining connections"
        );

        let outcome = match tokio::time::timeout(grace, self.connections.wait_for_drain()).await {
            Ok(()) => {
                tracing::info!("All connections drained");
                ShutdownOutcome::Clean
            }
            Err(_) => {
                let remaining = self.connections.active_count();
                tracing::error!(
                    remaining_connections = remaining,
                    grace_secs = grace.as_secs_f64(),
                    "Server forced to shut down, in-flight requests may have been cut short"
                );
                ShutdownOutcome::Forced { remaining }
            }
        };

        self.lifecycle.mark_stopped();
        Ok(outcome)
    }
}

/// Fallback handler: every request goes through the route table.
async fn dispatch(State(routes): State<Arc<RouteTable>>, request: Request<Body>) -> Response {
    routes.handle(request).await
}
