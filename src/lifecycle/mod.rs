//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Config → Metrics (optional) → Bind listener → Serve
//!
//! State (state.rs):
//!     Created → Listening → ShuttingDown → Stopped
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Shutdown::trigger
//!
//! Shutdown (shutdown.rs):
//!     Trigger → Stop accepting → Drain connections (bounded) → Clean | Forced
//! ```
//!
//! # Design Decisions
//! - Shutdown has timeout: forced stop after the grace period
//! - In-flight requests are never cancelled, only time-bounded

pub mod shutdown;
pub mod signals;
pub mod startup;
pub mod state;

pub use shutdown::{Shutdown, ShutdownOutcome, ShutdownSignal};
pub use startup::StartupError;
pub use state::{Lifecycle, ServerState};
