//! Startup orchestration.
//!
//! # Responsibilities
//! - Initialize optional subsystems (metrics exporter)
//! - Bind the listener and begin accepting traffic
//! - Wire OS signals to the shutdown coordinator
//!
//! # Design Decisions
//! - Fail fast: an invalid config or a bind error is fatal and not retried
//! - Listener binds last (traffic only when ready)

use std::net::SocketAddr;

use crate::config::validation::validate_config;
use crate::config::{ConfigError, GatewayConfig};
use crate::http::HttpServer;
use crate::lifecycle::shutdown::{Shutdown, ShutdownOutcome};
use crate::lifecycle::signals;
use crate::net::listener::{self, ListenerError};
use crate::observability::metrics;
use crate::routing::RouteTable;

/// Fatal errors between process start and the end of the serve loop.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Listener(#[from] ListenerError),

    #[error("Server error: {0}")]
    Server(#[from] std::io::Error),
}

/// Run the gateway until a termination signal arrives and the drain ends.
pub async fn run(config: GatewayConfig, routes: RouteTable) -> Result<ShutdownOutcome, StartupError> {
    let shutdown = Shutdown::new();
    let _signals = signals::spawn_listener(shutdown.clone());
    serve(config, routes, shutdown).await
}

/// Like [`run`], but shutdown is driven by the caller's `shutdown` handle only.
pub async fn serve(
    config: GatewayConfig,
    routes: RouteTable,
    shutdown: Shutdown,
) -> Result<ShutdownOutcome, StartupError> {
    validate_config(&config).map_err(ConfigError::Validation)?;

    if let Some(addr) = config.observability.metrics_address.as_deref() {
        match addr.parse::<SocketAddr>() {
            Ok(addr) => {
                metrics::init_metrics(addr);
            }
            Err(e) => tracing::warn!(address = addr, error = %e, "Metrics exporter disabled"),
        }
    }

    let listener = listener::bind(&config.listener).await?;
    let server = HttpServer::new(config, routes);
    Ok(server.run(listener, shutdown).await?)
}
