//! Helpers shared by the connection tests.

use super::Connection;
use crate::config::ConnectionConfig;
use std::net::Ipv4Addr;
use std::time::Duration;
use tokio::sync::mpsc;

/// Returns a port that was free a moment ago.
pub(crate) fn free_port() -> u16 {
    let socket = std::net::TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).unwrap();
    socket.local_addr().unwrap().port()
}

/// Returns `(listener, client, accepted)` with `client` connected to `accepted`.
pub(crate) async fn connected_pair() -> (Connection, Connection, Connection) {
    connected_pair_with_config(ConnectionConfig::default()).await
}

pub(crate) async fn connected_pair_with_config(
    config: ConnectionConfig,
) -> (Connection, Connection, Connection) {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let listener = Connection::with_config(config);
    let port = free_port();

    listener
        .listen(port, 16, true, move |result| {
            let tx = tx.clone();
            async move {
                let _ = tx.send(result);
            }
        })
        .unwrap();

    let client = Connection::new();
    client
        .connect(Ipv4Addr::LOCALHOST, port, Duration::from_secs(5))
        .await
        .unwrap();

    let accepted = tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("no connection accepted")
        .expect("accept loop stopped")
        .expect("accept failed");

    (listener, client, accepted)
}
