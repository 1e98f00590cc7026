//! Receive Loop
//!
//! Backs [`Connection::receive_callback`]. The loop decodes packets one after
//! another and hands each to the callback together with the connection, so
//! the callback can reply. It stops when:
//!
//! - a receive fails (the callback sees that error once)
//! - the connection is closed
//! - a newer callback replaces this one

use super::socket::Connection;
use crate::error::SocketResult;
use bytes::Bytes;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::debug;

pub(crate) fn spawn<F>(conn: Connection, generation: u64, mut on_packet: F) -> JoinHandle<()>
where
    F: FnMut(SocketResult<Bytes>, &Connection) + Send + 'static,
{
    tokio::spawn(async move {
        let shared = Arc::clone(conn.shared());
        debug!(conn = shared.id, generation = generation, "Receive loop started");

        while shared.is_connected() && shared.receive_generation() == generation {
            let result = shared.receive_packet().await;
            let failed = result.is_err();
            on_packet(result, &conn);
            if failed {
                break;
            }
        }

        debug!(conn = shared.id, generation = generation, "Receive loop stopped");
    })
}

#[cfg(test)]
mod tests {
    use crate::connection::test_util::connected_pair;
    use crate::error::SocketError;
    use bytes::Bytes;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::mpsc;

    const TIMEOUT: Duration = Duration::from_secs(5);

    #[tokio::test]
    async fn test_callback_receives_packets() {
        let (_listener, client, accepted) = connected_pair().await;
        let (tx, mut rx) = mpsc::unbounded_channel();

        accepted
            .receive_callback(move |result, _| {
                let _ = tx.send(result);
            })
            .unwrap();

        client.write_packet_str("ping").await.unwrap();
        client.write_packet_str("pong").await.unwrap();

        let first = tokio::time::timeout(TIMEOUT, rx.recv()).await.unwrap().unwrap();
        assert_eq!(first.unwrap(), Bytes::from_static(b"ping"));
        let second = tokio::time::timeout(TIMEOUT, rx.recv()).await.unwrap().unwrap();
        assert_eq!(second.unwrap(), Bytes::from_static(b"pong"));
    }

    #[tokio::test]
    async fn test_error_is_reported_once_then_loop_stops() {
        let (_listener, client, accepted) = connected_pair().await;
        let calls = Arc::new(AtomicUsize::new(0));
        let (tx, mut rx) = mpsc::unbounded_channel();

        let counter = Arc::clone(&calls);
        accepted
            .receive_callback(move |result, _| {
                counter.fetch_add(1, Ordering::SeqCst);
                let _ = tx.send(result);
            })
            .unwrap();

        client.close().await;

        let result = tokio::time::timeout(TIMEOUT, rx.recv()).await.unwrap().unwrap();
        assert!(matches!(result, Err(SocketError::NotConnected)));

        // The sender was dropped with the finished loop
        assert!(tokio::time::timeout(TIMEOUT, rx.recv()).await.unwrap().is_none());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_callback_replies_through_queue() {
        let (_listener, client, accepted) = connected_pair().await;

        accepted
            .receive_callback(|result, conn| {
                if let Ok(payload) = result {
                    let mut reply = b"echo:".to_vec();
                    reply.extend_from_slice(&payload);
                    let _ = conn.enqueue_packet(reply);
                }
            })
            .unwrap();

        for word in ["one", "two", "three"] {
            client.write_packet_str(word).await.unwrap();
            let reply = tokio::time::timeout(TIMEOUT, client.receive_packet_string())
                .await
                .unwrap()
                .unwrap();
            assert_eq!(reply, format!("echo:{}", word));
        }
    }

    #[tokio::test]
    async fn test_close_ends_the_loop() {
        let (_listener, _client, accepted) = connected_pair().await;
        let (tx, mut rx) = mpsc::unbounded_channel();

        accepted
            .receive_callback(move |result, _| {
                let _ = tx.send(result);
            })
            .unwrap();
        tokio::time::sleep(Duration::from_millis(20)).await;

        tokio::time::timeout(TIMEOUT, accepted.close())
            .await
            .expect("close waited on the receive loop");

        let result = rx.recv().await.unwrap();
        assert!(matches!(result, Err(SocketError::NotConnected)));
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_new_callback_replaces_old_one() {
        let (_listener, client, accepted) = connected_pair().await;
        let (old_tx, mut old_rx) = mpsc::unbounded_channel();
        let (new_tx, mut new_rx) = mpsc::unbounded_channel();

        accepted
            .receive_callback(move |result, _| {
                let _ = old_tx.send(result);
            })
            .unwrap();
        client.write_packet_str("first").await.unwrap();
        let first = tokio::time::timeout(TIMEOUT, old_rx.recv()).await.unwrap().unwrap();
        assert_eq!(first.unwrap(), Bytes::from_static(b"first"));

        accepted
            .receive_callback(move |result, _| {
                let _ = new_tx.send(result);
            })
            .unwrap();
        client.write_packet_str("second").await.unwrap();

        let second = tokio::time::timeout(TIMEOUT, new_rx.recv()).await.unwrap().unwrap();
        assert_eq!(second.unwrap(), Bytes::from_static(b"second"));

        // The old loop was stopped and its callback dropped
        assert!(tokio::time::timeout(TIMEOUT, old_rx.recv()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_callback_can_replace_itself() {
        let (_listener, client, accepted) = connected_pair().await;
        let (tx, mut rx) = mpsc::unbounded_channel();

        let first_tx = tx.clone();
        accepted
            .receive_callback(move |result, conn| {
                let Ok(payload) = result else { return };
                let _ = first_tx.send((1, payload));

                let tx = tx.clone();
                conn.receive_callback(move |result, _| {
                    if let Ok(payload) = result {
                        let _ = tx.send((2, payload));
                    }
                })
                .unwrap();
            })
            .unwrap();

        for word in ["a", "b", "c"] {
            client.write_packet_str(word).await.unwrap();
        }

        let mut delivered = Vec::new();
        for _ in 0..3 {
            let (loop_id, payload) =
                tokio::time::timeout(TIMEOUT, rx.recv()).await.unwrap().unwrap();
            delivered.push((loop_id, payload));
        }
        assert_eq!(
            delivered,
            vec![
                (1, Bytes::from_static(b"a")),
                (2, Bytes::from_static(b"b")),
                (2, Bytes::from_static(b"c")),
            ]
        );
    }
}
