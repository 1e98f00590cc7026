//! Connection configuration.

use crate::protocol::MAX_PAYLOAD_SIZE;

/// Default reassembly buffer capacity (4 KB)
pub const DEFAULT_READ_BUFFER_SIZE: usize = 4096;

/// Configuration for a [`Connection`](crate::Connection).
///
/// Connections accepted by a listening connection inherit its configuration.
///
/// # Example
///
/// ```
/// use framesock::ConnectionConfig;
///
/// let config = ConnectionConfig {
///     nodelay: true,
///     ..Default::default()
/// };
/// assert_eq!(config.read_buffer_size, 4096);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    /// Capacity reserved in the reassembly buffer before each packet read
    pub read_buffer_size: usize,

    /// Largest payload a received frame may declare; larger frames are a
    /// protocol error
    pub max_packet_size: usize,

    /// Disable Nagle's algorithm on connected streams
    pub nodelay: bool,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            read_buffer_size: DEFAULT_READ_BUFFER_SIZE,
            max_packet_size: MAX_PAYLOAD_SIZE,
            nodelay: false,
        }
    }
}

impl ConnectionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_read_buffer_size(mut self, size: usize) -> Self {
        // A zero reservation would make every read return immediately
        self.read_buffer_size = size.max(1);
        self
    }

    pub fn with_max_packet_size(mut self, size: usize) -> Self {
        self.max_packet_size = size.min(MAX_PAYLOAD_SIZE);
        self
    }

    pub fn with_nodelay(mut self, nodelay: bool) -> Self {
        self.nodelay = nodelay;
        self
    }
}
