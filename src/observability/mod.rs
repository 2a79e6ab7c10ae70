//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events via `tracing`)
//!     → metrics.rs (counters, gauges, histograms)
//!
//! Consumers:
//!     → stdout (json / text / pretty)
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```
//!
//! # Design Decisions
//! - One subscriber per process, installed before the listener binds
//! - JSON for production profiles, pretty output for development
//! - Metrics are cheap (atomic increments) and off unless configured

pub mod logging;
pub mod metrics;

pub use logging::{init_logging, resolve_log_config, LogConfig, LogFormat, LogLevel};
