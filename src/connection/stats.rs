//! Per-connection traffic counters.

use std::sync::atomic::{AtomicU64, Ordering};

/// Statistics for one connection.
///
/// Counters are updated with relaxed atomics from whichever task performs the
/// I/O, so a snapshot taken while traffic is flowing may be slightly behind.
#[derive(Debug, Default)]
pub struct ConnectionStats {
    /// Total bytes read from the socket
    pub bytes_read: AtomicU64,
    /// Total bytes written to the socket, frame overhead included
    pub bytes_written: AtomicU64,
    /// Packets written, sync and queued
    pub packets_sent: AtomicU64,
    /// Packets decoded
    pub packets_received: AtomicU64,
    /// Queued writes the worker failed to send
    pub write_failures: AtomicU64,
    /// Connections accepted while listening
    pub connections_accepted: AtomicU64,
}

/// A point-in-time copy of [`ConnectionStats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub bytes_read: u64,
    pub bytes_written: u64,
    pub packets_sent: u64,
    pub packets_received: u64,
    pub write_failures: u64,
    pub connections_accepted: u64,
}

impl ConnectionStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bytes_read(&self, count: usize) {
        self.bytes_read.fetch_add(count as u64, Ordering::Relaxed);
    }

    pub fn bytes_written(&self, count: usize) {
        self.bytes_written
            .fetch_add(count as u64, Ordering::Relaxed);
    }

    pub fn packet_sent(&self) {
        self.packets_sent.fetch_add(1, Ordering::Relaxed);
    }

    pub fn packet_received(&self) {
        self.packets_received.fetch_add(1, Ordering::Relaxed);
    }

    pub fn write_failed(&self) {
        self.write_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn connection_accepted(&self) {
        self.connections_accepted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            bytes_read: self.bytes_read.load(Ordering::Relaxed),
            bytes_written: self.bytes_written.load(Ordering::Relaxed),
            packets_sent: self.packets_sent.load(Ordering::Relaxed),
            packets_received: self.packets_received.load(Ordering::Relaxed),
            write_failures: self.write_failures.load(Ordering::Relaxed),
            connections_accepted: self.connections_accepted.load(Ordering::Relaxed),
        }
    }
}
