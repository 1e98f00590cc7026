//! Write Worker
//!
//! Every connection owns one worker task that drains two unbounded queues:
//!
//! ```text
//! enqueue_packet ──▶ packets ──┐  (checked first)
//!                              ├──▶ worker ──▶ write_packet / write
//! enqueue_write  ──▶ raw ──────┘
//! ```
//!
//! Packets are framed when they are written, raw data is written as-is. When
//! both queues hold data the packet queue wins, so a raw write only goes out
//! once no packet is waiting. Within one queue the order is FIFO.
//!
//! The senders live with the connection handles. Once the last handle is
//! dropped the queues close, the worker writes out whatever is still queued,
//! closes the connection and exits.

use super::socket::Shared;
use crate::error::{SocketError, SocketResult};
use bytes::Bytes;
use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tracing::{debug, trace, warn};

/// Sending side of the write queues.
pub(crate) struct WriteQueues {
    packets: UnboundedSender<Bytes>,
    raw: UnboundedSender<Bytes>,
}

/// Receiving side of the write queues, owned by the worker.
pub(crate) struct WriteReceivers {
    packets: UnboundedReceiver<Bytes>,
    raw: UnboundedReceiver<Bytes>,
}

pub(crate) fn channels() -> (WriteQueues, WriteReceivers) {
    let (packets_tx, packets_rx) = mpsc::unbounded_channel();
    let (raw_tx, raw_rx) = mpsc::unbounded_channel();
    (
        WriteQueues {
            packets: packets_tx,
            raw: raw_tx,
        },
        WriteReceivers {
            packets: packets_rx,
            raw: raw_rx,
        },
    )
}

impl WriteQueues {
    pub(crate) fn push_packet(&self, payload: Bytes) -> SocketResult<()> {
        self.packets
            .send(payload)
            .map_err(|_| SocketError::NotReady)
    }

    pub(crate) fn push_raw(&self, data: Bytes) -> SocketResult<()> {
        self.raw.send(data).map_err(|_| SocketError::NotReady)
    }
}

/// Spawns the write worker for `shared`.
pub(crate) fn spawn(shared: Arc<Shared>, queues: WriteReceivers) -> JoinHandle<()> {
    tokio::spawn(run(shared, queues))
}

async fn run(shared: Arc<Shared>, mut queues: WriteReceivers) {
    trace!(conn = shared.id, "Write worker started");

    loop {
        tokio::select! {
            biased;

            Some(payload) = queues.packets.recv() => {
                if let Err(e) = shared.write_packet(&payload).await {
                    report_failure(&shared, "packet", payload.len(), &e);
                }
            }
            Some(data) = queues.raw.recv() => {
                if let Err(e) = shared.write(&data).await {
                    report_failure(&shared, "raw", data.len(), &e);
                }
            }
            else => break,
        }
    }

    // Every handle is gone and both queues are drained
    shared.close().await;
    trace!(conn = shared.id, "Write worker stopped");
}

fn report_failure(shared: &Shared, kind: &'static str, len: usize, err: &SocketError) {
    shared.stats.write_failed();
    if err.is_disconnect() || matches!(err, SocketError::NotReady) {
        debug!(conn = shared.id, kind = kind, bytes = len, error = %err, "Dropped queued write");
    } else {
        warn!(conn = shared.id, kind = kind, bytes = len, error = %err, "Queued write failed");
    }
}
