//! # framesock - Framed TCP Connections on Tokio
//!
//! framesock wraps a TCP socket in a [`Connection`] that can listen, connect,
//! exchange raw bytes and exchange length-prefixed packets. Writes can be
//! queued to a per-connection worker and packets can be delivered to a
//! callback as they arrive.
//!
//! ## Features
//!
//! - **Packet Framing**: `|` + big-endian u32 length + payload + `|`
//! - **Queued Writes**: FIFO write queues drained by a background task
//! - **Callbacks**: Accepted connections and received packets are pushed to
//!   user callbacks
//! - **Clean Shutdown**: `close` unblocks every pending operation and waits
//!   for the background tasks
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                              framesock                                  │
//! │                                                                         │
//! │  ┌─────────────┐    ┌─────────────┐    ┌─────────────┐                  │
//! │  │   Accept    │───>│ Connection  │───>│   Receive   │                  │
//! │  │    Loop     │    │             │    │    Loop     │                  │
//! │  └─────────────┘    └──────┬──────┘    └──────┬──────┘                  │
//! │                            │                  │                         │
//! │                            ▼                  ▼                         │
//! │                     ┌─────────────┐    ┌─────────────┐                  │
//! │                     │   Write     │    │   Frame     │                  │
//! │                     │   Worker    │    │   Parser    │                  │
//! │                     └─────────────┘    └─────────────┘                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```no_run
//! use framesock::Connection;
//! use std::net::Ipv4Addr;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), framesock::SocketError> {
//!     let server = Connection::new();
//!     server.listen(7000, framesock::DEFAULT_BACKLOG, true, |result| async move {
//!         if let Ok(conn) = result {
//!             while let Ok(packet) = conn.receive_packet().await {
//!                 let _ = conn.write_packet(&packet).await;
//!             }
//!         }
//!     })?;
//!
//!     let client = Connection::new();
//!     client.connect(Ipv4Addr::LOCALHOST, 7000, Duration::from_secs(1)).await?;
//!     client.write_packet_str("ping").await?;
//!     assert_eq!(client.receive_packet_string().await?, "ping");
//!
//!     client.close().await;
//!     server.close().await;
//!     Ok(())
//! }
//! ```
//!
//! ## Module Overview
//!
//! - [`connection`]: The connection type and its background tasks
//! - [`protocol`]: Frame encoding and incremental decoding
//! - [`error`]: Error kinds reported by every operation
//! - [`config`]: Per-connection settings

pub mod config;
pub mod connection;
pub mod error;
pub mod protocol;

// Re-export commonly used types for convenience
pub use config::ConnectionConfig;
pub use connection::{Connection, ConnectionStats, SocketStatus, StatsSnapshot};
pub use error::{SocketError, SocketResult};
pub use protocol::{encode_frame, FrameError, FrameParser};

use std::time::Duration;

/// Default length of the pending connection queue
pub const DEFAULT_BACKLOG: i32 = 128;

/// Default time allowed for a connect to complete
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Version of framesock
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
