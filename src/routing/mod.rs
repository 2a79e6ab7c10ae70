//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (method, path)
//!     → router.rs (exact lookup)
//!     → Return: matched handler or NotFound (404)
//!
//! Route registration (at startup):
//!     register(method, path, handler)
//!     → Freeze as immutable RouteTable
//! ```
//!
//! # Design Decisions
//! - Routes registered at startup, immutable at runtime
//! - Deterministic: same input always matches same route

pub mod router;

pub use router::{BoxedHandler, Dispatch, RouteTable};
