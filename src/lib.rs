//! API gateway front: health, readiness and status probes behind a logging
//! and panic-recovery pipeline, with graceful shutdown.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod observability;
pub mod routing;

pub use config::schema::GatewayConfig;
pub use http::HttpServer;
pub use lifecycle::{Shutdown, ShutdownOutcome};
pub use routing::RouteTable;
