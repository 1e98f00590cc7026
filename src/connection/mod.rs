//! Connection Module
//!
//! This module holds the [`Connection`] type and the background tasks that run
//! on it.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  Connection (listening)                     │
//! │                                                             │
//! │        accept loop ──▶ tokio::spawn on_accept(conn)         │
//! └──────────────────────┬──────────────────────────────────────┘
//!                        │
//!                        │ accepted
//!                        ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  Connection (connected)                     │
//! │                                                             │
//! │  ┌─────────────┐    ┌─────────────┐    ┌─────────────┐      │
//! │  │ Read bytes  │───>│ Parse frame │───>│  on_packet  │      │
//! │  └─────────────┘    └─────────────┘    └──────┬──────┘      │
//! │                                               │             │
//! │                                               ▼             │
//! │                      ┌─────────────┐   ┌─────────────┐      │
//! │                      │   Worker    │<──│   Enqueue   │      │
//! │                      └─────────────┘   └─────────────┘      │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Tasks
//!
//! - **Write worker**: one per connection, drains the write queues
//! - **Accept loop**: while listening
//! - **Receive loop**: while a receive callback is registered
//!
//! ## Example
//!
//! ```no_run
//! use framesock::Connection;
//!
//! # async fn run() -> Result<(), framesock::SocketError> {
//! let server = Connection::new();
//! server.listen(7000, 128, true, |result| async move {
//!     let Ok(conn) = result else { return };
//!     let _ = conn.receive_callback(|packet, conn| {
//!         if let Ok(payload) = packet {
//!             let _ = conn.enqueue_packet(payload);
//!         }
//!     });
//! })?;
//! # Ok(())
//! # }
//! ```

mod listener;
mod receiver;
mod socket;
mod state;
mod stats;
mod worker;

#[cfg(test)]
mod test_util;

pub use socket::Connection;
pub use state::SocketStatus;
pub use stats::{ConnectionStats, StatsSnapshot};
