//! Accept Loop
//!
//! A listening connection binds `0.0.0.0:port` and runs one accept task:
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │                  accept loop                    │
//! │                                                 │
//! │   accept() ──ok──▶ Connection ──▶ tokio::spawn  │
//! │      │                           on_accept(..)  │
//! │      │                                          │
//! │      └──err──▶ tokio::spawn on_accept(Err) ─▶ ✕ │
//! │                                                 │
//! │   close() ─────────────────────────────────▶ ✕  │
//! └─────────────────────────────────────────────────┘
//! ```
//!
//! Callbacks run on their own tasks so a slow handler never holds up the next
//! accept. Leaving the loop drops the listening socket; the connection stays
//! `Listening` until it is closed.

use super::socket::{Connection, Shared};
use crate::error::SocketResult;
use std::future::Future;
use std::io;
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;
use tokio::net::{TcpListener, TcpSocket, TcpStream};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Binds a reusable listening socket on all IPv4 interfaces.
///
/// # Arguments
///
/// * `port` - Port to bind
/// * `backlog` - Length of the pending connection queue
pub(crate) fn bind(port: u16, backlog: u32) -> SocketResult<TcpListener> {
    let addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, port));

    // The socket is closed on every early return
    let socket = TcpSocket::new_v4()?;
    socket.set_reuseaddr(true)?;
    socket.bind(addr)?;
    Ok(socket.listen(backlog)?)
}

/// Source of incoming streams for the accept loop.
pub(crate) trait Acceptor: Send + Sync + 'static {
    fn accept(&self) -> impl Future<Output = io::Result<(TcpStream, SocketAddr)>> + Send;
}

impl Acceptor for TcpListener {
    fn accept(&self) -> impl Future<Output = io::Result<(TcpStream, SocketAddr)>> + Send {
        TcpListener::accept(self)
    }
}

/// Spawns the accept loop for a listening connection.
pub(crate) fn spawn<A, F, Fut>(
    shared: Arc<Shared>,
    listener: A,
    accept_multiple: bool,
    on_accept: F,
) -> JoinHandle<()>
where
    A: Acceptor,
    F: Fn(SocketResult<Connection>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    tokio::spawn(accept_loop(shared, listener, accept_multiple, Arc::new(on_accept)))
}

async fn accept_loop<A, F, Fut>(
    shared: Arc<Shared>,
    listener: A,
    accept_multiple: bool,
    on_accept: Arc<F>,
) where
    A: Acceptor,
    F: Fn(SocketResult<Connection>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    debug!(conn = shared.id, "Accept loop started");

    loop {
        let accepted = tokio::select! {
            result = listener.accept() => result,
            _ = shared.closed() => break,
        };

        match accepted {
            Ok((stream, peer)) => {
                let conn = Connection::from_stream(stream, shared.config.clone());
                shared.stats.connection_accepted();
                info!(conn = shared.id, accepted = conn.id(), peer = %peer, "Accepted connection");

                let on_accept = Arc::clone(&on_accept);
                tokio::spawn(async move { on_accept(Ok(conn)).await });

                if !accept_multiple {
                    break;
                }
            }
            Err(e) => {
                warn!(conn = shared.id, error = %e, "Accept failed");

                let on_accept = Arc::clone(&on_accept);
                tokio::spawn(async move { on_accept(Err(e.into())).await });
                break;
            }
        }
    }

    debug!(conn = shared.id, "Accept loop stopped");
}
