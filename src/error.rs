//! Socket Error Taxonomy
//!
//! Every fallible operation on a [`Connection`](crate::Connection) reports one
//! of the kinds in [`SocketError`]. OS failures are folded into the same enum
//! through `From<std::io::Error>`, so callers match on a single closed set of
//! kinds instead of inspecting platform error codes.
//!
//! ## Kinds
//!
//! ```text
//! argument checks     InvalidPort, InvalidIp, InvalidArgument
//! state checks        InvalidUsage (listen/connect while active)
//!                     NotReady     (I/O while not connected)
//! connection          NotConnected, ConnectionFailed, Timeout, InProgress
//! protocol            ProtocolDesync, InvalidUtf8
//! mapped OS kinds     AddressInUse, ConnectionRefused, ... , Io(other)
//! ```
//!
//! There is no "success" kind: success is `Ok(..)`.

use crate::protocol::FrameError;
use std::io;
use thiserror::Error;

/// Result type for socket operations.
pub type SocketResult<T> = Result<T, SocketError>;

/// Errors that can occur on a connection.
#[derive(Debug, Error)]
pub enum SocketError {
    /// Port 0 was given where a concrete port is required
    #[error("invalid port")]
    InvalidPort,

    /// The address is the unspecified or broadcast address
    #[error("invalid IP address")]
    InvalidIp,

    /// An argument is out of range
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// The connection is in the wrong state for the requested operation
    #[error("operation not allowed in the current state")]
    InvalidUsage,

    /// I/O was attempted while the connection is not connected
    #[error("connection is not ready")]
    NotReady,

    /// The peer closed the stream, or the connection was closed locally
    #[error("not connected")]
    NotConnected,

    /// The peer could not be reached
    #[error("connection failed")]
    ConnectionFailed,

    /// The connect timeout elapsed
    #[error("timed out")]
    Timeout,

    /// A non-blocking connect has not completed yet
    #[error("operation in progress")]
    InProgress,

    /// The incoming byte stream does not start with a frame
    #[error("protocol desync: {0}")]
    ProtocolDesync(#[from] FrameError),

    /// A packet read as text is not valid UTF-8
    #[error("packet is not valid UTF-8")]
    InvalidUtf8,

    #[error("address already in use")]
    AddressInUse,

    #[error("address not available")]
    AddressNotAvailable,

    #[error("connection refused")]
    ConnectionRefused,

    #[error("connection reset by peer")]
    ConnectionReset,

    #[error("connection aborted")]
    ConnectionAborted,

    #[error("host unreachable")]
    HostUnreachable,

    #[error("network unreachable")]
    NetworkUnreachable,

    #[error("operation would block")]
    WouldBlock,

    #[error("permission denied")]
    PermissionDenied,

    /// Any OS error without a dedicated kind
    #[error("I/O error: {0}")]
    Io(io::Error),
}

impl SocketError {
    /// Returns true if the error means the peer is gone.
    ///
    /// Used to tell an ordinary disconnect apart from a real fault when
    /// deciding how loudly to log.
    pub fn is_disconnect(&self) -> bool {
        matches!(
            self,
            SocketError::NotConnected
                | SocketError::ConnectionReset
                | SocketError::ConnectionAborted
        )
    }
}

impl From<io::Error> for SocketError {
    fn from(err: io::Error) -> Self {
        if is_in_progress(&err) {
            return SocketError::InProgress;
        }

        match err.kind() {
            io::ErrorKind::AddrInUse => SocketError::AddressInUse,
            io::ErrorKind::AddrNotAvailable => SocketError::AddressNotAvailable,
            io::ErrorKind::ConnectionRefused => SocketError::ConnectionRefused,
            io::ErrorKind::ConnectionReset => SocketError::ConnectionReset,
            io::ErrorKind::ConnectionAborted => SocketError::ConnectionAborted,
            io::ErrorKind::HostUnreachable => SocketError::HostUnreachable,
            io::ErrorKind::NetworkUnreachable => SocketError::NetworkUnreachable,
            io::ErrorKind::WouldBlock => SocketError::WouldBlock,
            io::ErrorKind::PermissionDenied => SocketError::PermissionDenied,
            io::ErrorKind::TimedOut => SocketError::Timeout,
            io::ErrorKind::InvalidInput => SocketError::InvalidArgument("rejected by the OS"),
            // A send that moved zero bytes or hit a closed pipe means the
            // peer went away
            io::ErrorKind::NotConnected
            | io::ErrorKind::BrokenPipe
            | io::ErrorKind::WriteZero
            | io::ErrorKind::UnexpectedEof => SocketError::NotConnected,
            _ => SocketError::Io(err),
        }
    }
}

#[cfg(unix)]
fn is_in_progress(err: &io::Error) -> bool {
    err.raw_os_error() == Some(libc::EINPROGRESS)
}

#[cfg(windows)]
fn is_in_progress(err: &io::Error) -> bool {
    err.raw_os_error() == Some(windows_sys::Win32::Networking::WinSock::WSAEINPROGRESS)
}

#[cfg(not(any(unix, windows)))]
fn is_in_progress(_err: &io::Error) -> bool {
    false
}
