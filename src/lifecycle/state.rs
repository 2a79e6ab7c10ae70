//! Server lifecycle state machine.
//!
//! ```text
//! Created → Listening → ShuttingDown → Stopped
//! ```
//! Transitions only move forward; each one happens at most once.

use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum ServerState {
    Created = 0,
    Listening = 1,
    ShuttingDown = 2,
    Stopped = 3,
}

impl ServerState {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => ServerState::Created,
            1 => ServerState::Listening,
            2 => ServerState::ShuttingDown,
            _ => ServerState::Stopped,
        }
    }
}

impl fmt::Display for ServerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ServerState::Created => "created",
            ServerState::Listening => "listening",
            ServerState::ShuttingDown => "shutting_down",
            ServerState::Stopped => "stopped",
        };
        f.write_str(s)
    }
}

/// Shared, lock-free holder of the current [`ServerState`].
#[derive(Debug)]
pub struct Lifecycle {
    state: AtomicU8,
}

impl Lifecycle {
    pub fn new() -> Self {
        Self {
            state: AtomicU8::new(ServerState::Created as u8),
        }
    }

    pub fn state(&self) -> ServerState {
        ServerState::from_u8(self.state.load(Ordering::SeqCst))
    }

    pub fn is_listening(&self) -> bool {
        self.state() == ServerState::Listening
    }

    pub fn mark_listening(&self) -> bool {
        self.advance(ServerState::Created, ServerState::Listening)
    }

    /// `Listening → ShuttingDown`. Returns `false` if shutdown already began.
    pub fn begin_shutdown(&self) -> bool {
        self.advance(ServerState::Listening, ServerState::ShuttingDown)
    }

    pub fn mark_stopped(&self) -> bool {
        self.advance(ServerState::ShuttingDown, ServerState::Stopped)
    }

    fn advance(&self, from: ServerState, to: ServerState) -> bool {
        let moved = self
            .state
            .compare_exchange(from as u8, to as u8, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok();

        if moved {
            tracing::debug!(from = %from, to = %to, "Lifecycle transition");
        } else {
            tracing::warn!(from = %from, to = %to, current = %self.state(), "Rejected lifecycle transition");
        }
        moved
    }
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn walks_forward_once() {
        let lifecycle = Lifecycle::new();
        assert_eq!(lifecycle.state(), ServerState::Created);

        assert!(lifecycle.mark_listening());
        assert!(lifecycle.is_listening());

        assert!(lifecycle.begin_shutdown());
        assert!(!lifecycle.begin_shutdown());
        assert_eq!(lifecycle.state(), ServerState::ShuttingDown);

        assert!(lifecycle.mark_stopped());
        assert_eq!(lifecycle.state(), ServerState::Stopped);
    }

    #[test]
    fn never_moves_backwards() {
        let lifecycle = Lifecycle::new();
        lifecycle.mark_listening();
        lifecycle.begin_shutdown();
        assert!(!lifecycle.mark_listening());
        assert_eq!(lifecycle.state(), ServerState::ShuttingDown);
    }

    #[test]
    fn cannot_skip_states() {
        let lifecycle = Lifecycle::new();
        assert!(!lifecycle.begin_shutdown());
        assert!(!lifecycle.mark_stopped());
        assert_eq!(lifecycle.state(), ServerState::Created);
    }
}
