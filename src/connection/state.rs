//! Connection lifecycle states.
//!
//! ```text
//!              listen()                      connect() / accepted
//!   LISTENING ◀──────── INACTIVE ────────────────────────▶ CONNECTED
//!       │                  ▲                                   │
//!       └──── close() ─────┴────────────── close() ────────────┘
//! ```

use std::fmt;

/// Current state of a [`Connection`](crate::Connection).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SocketStatus {
    /// No socket; the initial state and the state after `close`.
    #[default]
    Inactive,
    /// Bound and accepting connections.
    Listening,
    /// Connected to a peer; reads and writes are allowed.
    Connected,
}

impl fmt::Display for SocketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SocketStatus::Inactive => write!(f, "inactive"),
            SocketStatus::Listening => write!(f, "listening"),
            SocketStatus::Connected => write!(f, "connected"),
        }
    }
}
