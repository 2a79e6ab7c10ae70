//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! Accepted connection (net)
//!     → server.rs (Axum router, accept loop, drain)
//!     → middleware/logging.rs (context.rs: method, path, peer, timer)
//!     → middleware/recovery.rs (panic boundary)
//!     → routing (exact method + path lookup)
//!     → handlers.rs → response.rs (JSON encoding)
//!     → Send to client
//! ```

pub mod context;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod server;

pub use context::RequestContext;
pub use server::HttpServer;
