//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! listener.rs (bind host:port)
//!     → accept loop (http/server.rs)
//!     → connection.rs (HTTP engine, timeouts, tracking)
//!     → Hand off to the layered router
//!
//! Connection States:
//!     Open → Serving ⇄ Idle → Closing → Closed
//! ```
//!
//! # Design Decisions
//! - Each connection tracked for graceful shutdown
//! - Idle keep-alive connections are closed after the idle timeout

pub mod connection;
pub mod listener;
