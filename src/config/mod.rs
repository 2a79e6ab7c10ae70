//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! defaults (schema.rs)
//!     → optional TOML file (loader.rs)
//!     → environment overrides: HOST, PORT, ... (loader.rs)
//!     → validation.rs (semantic checks)
//!     → GatewayConfig (validated, immutable)
//!
//! environment.rs:
//!     ENV / GO_ENV / ENVIRONMENT / APP_ENV / KUBERNETES_SERVICE_HOST
//!     → EnvironmentProfile (drives logging defaults)
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults to allow running with no config at all
//! - Environment access goes through `EnvSource` so resolution is pure

pub mod environment;
pub mod loader;
pub mod schema;
pub mod validation;

pub use environment::{EnvSource, EnvironmentProfile, ProcessEnv};
pub use loader::{load_config, ConfigError};
pub use schema::{GatewayConfig, ListenerConfig, ObservabilityConfig, TimeoutConfig};
