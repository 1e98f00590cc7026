//! The Connection
//!
//! A [`Connection`] wraps one TCP socket and everything that runs on it:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                          Connection                              │
//! │                                                                  │
//! │  write / write_packet ───────────────────────┐                   │
//! │                                              ▼                   │
//! │  enqueue_packet ──▶ packet queue ──┐   ┌───────────┐             │
//! │                                    ├──▶│  worker   │──▶ write    │
//! │  enqueue_write  ──▶ raw queue ─────┘   │  (task)   │    half     │
//! │                                        └───────────┘             │
//! │                                                                  │
//! │  read / receive_packet ◀──── reassembly buffer ◀──── read half   │
//! │  receive_callback ──▶ receive loop (task) ──┘                    │
//! │                                                                  │
//! │  listen ──▶ accept loop (task) ──▶ on_accept(Connection)         │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Lifecycle
//!
//! A connection starts `Inactive`. `listen` moves it to `Listening`,
//! `connect` (or being accepted) to `Connected`. `close` returns it to
//! `Inactive` from either state, after which it can be used again.
//!
//! The write worker is spawned when the connection is created and lives until
//! the last handle is dropped. On drop, every queued write is still sent and
//! then the connection is closed.
//!
//! ## Cancellation
//!
//! Each session has a shutdown signal. `close` raises it before touching the
//! socket, which makes a pending accept, read or write return at once. That
//! is what lets `close` wait for the accept and receive tasks without
//! hanging.

use super::listener;
use super::receiver;
use super::state::SocketStatus;
use super::stats::{ConnectionStats, StatsSnapshot};
use super::worker::{self, WriteQueues};
use crate::config::ConnectionConfig;
use crate::error::{SocketError, SocketResult};
use crate::protocol::{encode_frame, FrameParser, MAX_PAYLOAD_SIZE};
use bytes::{Bytes, BytesMut};
use std::fmt;
use std::future::Future;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::{TcpSocket, TcpStream};
use tokio::sync::{watch, Mutex as AsyncMutex};
use tokio::task::JoinHandle;
use tracing::{debug, info, trace, warn};

const PAYLOAD_TOO_LARGE: &str = "payload exceeds the frame length field";

static NEXT_CONNECTION_ID: AtomicU64 = AtomicU64::new(1);

/// Read side of the socket plus bytes received but not yet decoded.
struct Inbound {
    stream: Option<OwnedReadHalf>,
    buffer: BytesMut,
}

#[derive(Default)]
struct State {
    status: SocketStatus,
    connecting: bool,
    closing: bool,
    local_addr: Option<SocketAddr>,
    peer_addr: Option<SocketAddr>,
    listener: Option<JoinHandle<()>>,
    receiver: Option<JoinHandle<()>>,
    receive_generation: u64,
}

impl State {
    fn is_idle(&self) -> bool {
        self.status == SocketStatus::Inactive && !self.connecting && !self.closing
    }

    fn is_connected(&self) -> bool {
        self.status == SocketStatus::Connected && !self.closing
    }
}

/// State shared by every handle and background task of one connection.
pub(crate) struct Shared {
    pub(crate) id: u64,
    pub(crate) config: ConnectionConfig,
    pub(crate) stats: ConnectionStats,
    state: Mutex<State>,
    pub(crate) writer: AsyncMutex<Option<OwnedWriteHalf>>,
    inbound: AsyncMutex<Inbound>,
    queues: Mutex<Option<WriteQueues>>,
    shutdown: watch::Sender<bool>,
    /// Held for the whole of `close`, so concurrent calls finish together
    close_lock: AsyncMutex<()>,
}

/// A connected stream split into its halves.
struct Split {
    reader: OwnedReadHalf,
    writer: OwnedWriteHalf,
    local_addr: Option<SocketAddr>,
    peer_addr: Option<SocketAddr>,
}

fn split_stream(stream: TcpStream, config: &ConnectionConfig) -> Split {
    if config.nodelay {
        if let Err(e) = stream.set_nodelay(true) {
            warn!(error = %e, "Failed to set TCP_NODELAY");
        }
    }
    let local_addr = stream.local_addr().ok();
    let peer_addr = stream.peer_addr().ok();
    let (reader, writer) = stream.into_split();
    Split {
        reader,
        writer,
        local_addr,
        peer_addr,
    }
}

impl Shared {
    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn status(&self) -> SocketStatus {
        self.state().status
    }

    pub(crate) fn is_connected(&self) -> bool {
        self.state().is_connected()
    }

    pub(crate) fn receive_generation(&self) -> u64 {
        self.state().receive_generation
    }

    fn ensure_connected(&self) -> SocketResult<()> {
        if self.is_connected() {
            Ok(())
        } else {
            Err(SocketError::NotReady)
        }
    }

    /// Resolves once the current session has been closed.
    pub(crate) async fn closed(&self) {
        let mut rx = self.shutdown.subscribe();
        loop {
            if *rx.borrow_and_update() {
                return;
            }
            // The sender lives in `self`, so this only fails during teardown
            if rx.changed().await.is_err() {
                return;
            }
        }
    }

    /// Drops the queue senders so the worker can flush and exit.
    fn release_queues(&self) {
        let queues = self
            .queues
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        drop(queues);
    }

    fn with_queues(&self, push: impl FnOnce(&WriteQueues) -> SocketResult<()>) -> SocketResult<()> {
        let queues = self.queues.lock().unwrap_or_else(PoisonError::into_inner);
        match queues.as_ref() {
            Some(queues) => push(queues),
            None => Err(SocketError::NotReady),
        }
    }

    async fn attach(&self, stream: TcpStream) {
        let split = split_stream(stream, &self.config);

        *self.writer.lock().await = Some(split.writer);
        {
            let mut inbound = self.inbound.lock().await;
            inbound.stream = Some(split.reader);
            inbound.buffer.clear();
        }
        self.shutdown.send_replace(false);

        let mut state = self.state();
        state.status = SocketStatus::Connected;
        state.local_addr = split.local_addr;
        state.peer_addr = split.peer_addr;
    }

    pub(crate) async fn write(&self, data: &[u8]) -> SocketResult<()> {
        self.ensure_connected()?;

        let mut writer = self.writer.lock().await;
        let stream = writer.as_mut().ok_or(SocketError::NotReady)?;
        tokio::select! {
            result = stream.write_all(data) => result?,
            _ = self.closed() => return Err(SocketError::NotConnected),
        }
        drop(writer);

        self.stats.bytes_written(data.len());
        trace!(conn = self.id, bytes = data.len(), "Wrote data");
        Ok(())
    }

    pub(crate) async fn write_packet(&self, payload: &[u8]) -> SocketResult<()> {
        self.ensure_connected()?;

        let frame =
            encode_frame(payload).map_err(|_| SocketError::InvalidArgument(PAYLOAD_TOO_LARGE))?;
        self.write(&frame).await?;
        self.stats.packet_sent();
        Ok(())
    }

    pub(crate) async fn read(&self, buf: &mut [u8]) -> SocketResult<usize> {
        self.ensure_connected()?;

        let mut inbound = self.inbound.lock().await;
        let stream = inbound.stream.as_mut().ok_or(SocketError::NotReady)?;
        let n = tokio::select! {
            result = stream.read(buf) => result?,
            _ = self.closed() => return Err(SocketError::NotConnected),
        };

        if n == 0 && !buf.is_empty() {
            debug!(conn = self.id, "Peer closed the stream");
            return Err(SocketError::NotConnected);
        }

        self.stats.bytes_read(n);
        trace!(conn = self.id, bytes = n, "Read data");
        Ok(n)
    }

    /// Decodes the next packet, reading from the socket only while the
    /// buffered bytes do not hold a whole frame.
    pub(crate) async fn receive_packet(&self) -> SocketResult<Bytes> {
        self.ensure_connected()?;

        let parser = FrameParser::with_max_payload(self.config.max_packet_size);
        let mut guard = self.inbound.lock().await;
        let inbound = &mut *guard;

        loop {
            match parser.parse(&mut inbound.buffer) {
                Ok(Some(payload)) => {
                    self.stats.packet_received();
                    trace!(
                        conn = self.id,
                        bytes = payload.len(),
                        remaining = inbound.buffer.len(),
                        "Decoded packet"
                    );
                    return Ok(payload);
                }
                Ok(None) => {}
                Err(e) => {
                    warn!(conn = self.id, error = %e, "Discarding undecodable input");
                    inbound.buffer.clear();
                    return Err(e.into());
                }
            }

            let stream = inbound.stream.as_mut().ok_or(SocketError::NotReady)?;
            let reserve = self.config.read_buffer_size;
            if inbound.buffer.capacity() - inbound.buffer.len() < reserve {
                inbound.buffer.reserve(reserve);
            }

            let n = tokio::select! {
                result = stream.read_buf(&mut inbound.buffer) => result?,
                _ = self.closed() => return Err(SocketError::NotConnected),
            };

            if n == 0 {
                debug!(
                    conn = self.id,
                    buffered = inbound.buffer.len(),
                    "Peer closed the stream"
                );
                return Err(SocketError::NotConnected);
            }

            self.stats.bytes_read(n);
            trace!(conn = self.id, bytes = n, "Read data");
        }
    }

    pub(crate) fn enqueue_packet(&self, payload: Bytes) -> SocketResult<()> {
        self.ensure_connected()?;
        if payload.len() > MAX_PAYLOAD_SIZE {
            return Err(SocketError::InvalidArgument(PAYLOAD_TOO_LARGE));
        }
        self.with_queues(|queues| queues.push_packet(payload))
    }

    pub(crate) fn enqueue_write(&self, data: Bytes) -> SocketResult<()> {
        self.ensure_connected()?;
        self.with_queues(|queues| queues.push_raw(data))
    }

    pub(crate) async fn close(&self) {
        let _serial = self.close_lock.lock().await;

        let (listener, receiver) = {
            let mut state = self.state();
            if state.status == SocketStatus::Inactive || state.closing {
                return;
            }
            state.closing = true;
            (state.listener.take(), state.receiver.take())
        };

        // Wakes every pending accept, read and write of this session
        self.shutdown.send_replace(true);

        if let Some(mut writer) = self.writer.lock().await.take() {
            // May fail if the peer never finished connecting
            let _ = writer.shutdown().await;
        }
        {
            let mut inbound = self.inbound.lock().await;
            inbound.stream = None;
            inbound.buffer.clear();
        }

        if let Some(handle) = listener {
            self.join(handle, "accept").await;
        }
        if let Some(handle) = receiver {
            self.join(handle, "receive").await;
        }

        let mut state = self.state();
        state.status = SocketStatus::Inactive;
        state.closing = false;
        state.local_addr = None;
        state.peer_addr = None;
        debug!(conn = self.id, "Connection closed");
    }

    async fn join(&self, handle: JoinHandle<()>, task: &'static str) {
        if let Err(e) = handle.await {
            if e.is_panic() {
                warn!(conn = self.id, task = task, "Background task panicked");
            }
        }
    }
}

/// Releases the write queues once the last handle is gone.
struct Handle {
    shared: Arc<Shared>,
}

impl Drop for Handle {
    fn drop(&mut self) {
        self.shared.release_queues();
    }
}

/// Clears the connecting flag even if `connect` is cancelled midway.
struct ConnectingGuard<'a> {
    shared: &'a Shared,
}

impl Drop for ConnectingGuard<'_> {
    fn drop(&mut self) {
        self.shared.state().connecting = false;
    }
}

/// A TCP connection with packet framing, queued writes and callback reads.
///
/// Handles are cheap to clone and all clones refer to the same connection.
/// Creating one spawns its write worker, so it must happen inside a Tokio
/// runtime.
///
/// # Example
///
/// ```no_run
/// use framesock::Connection;
/// use std::net::Ipv4Addr;
/// use std::time::Duration;
///
/// # async fn run() -> Result<(), framesock::SocketError> {
/// let conn = Connection::new();
/// conn.connect(Ipv4Addr::LOCALHOST, 7000, Duration::from_secs(1)).await?;
/// conn.write_packet(b"ping").await?;
/// let reply = conn.receive_packet().await?;
/// println!("{:?}", reply);
/// conn.close().await;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Connection {
    handle: Arc<Handle>,
}

impl Default for Connection {
    fn default() -> Self {
        Self::new()
    }
}

impl Connection {
    /// Creates an inactive connection with the default configuration.
    pub fn new() -> Self {
        Self::with_config(ConnectionConfig::default())
    }

    /// Creates an inactive connection.
    pub fn with_config(config: ConnectionConfig) -> Self {
        Self::build(config, None)
    }

    /// Wraps an accepted stream; the connection starts out connected.
    pub(crate) fn from_stream(stream: TcpStream, config: ConnectionConfig) -> Self {
        Self::build(config, Some(stream))
    }

    fn build(config: ConnectionConfig, stream: Option<TcpStream>) -> Self {
        let (queues, receivers) = worker::channels();
        let (shutdown, _) = watch::channel(false);

        let mut state = State::default();
        let mut writer = None;
        let mut inbound = Inbound {
            stream: None,
            buffer: BytesMut::with_capacity(config.read_buffer_size),
        };

        if let Some(stream) = stream {
            let split = split_stream(stream, &config);
            inbound.stream = Some(split.reader);
            writer = Some(split.writer);
            state.status = SocketStatus::Connected;
            state.local_addr = split.local_addr;
            state.peer_addr = split.peer_addr;
        }

        let shared = Arc::new(Shared {
            id: NEXT_CONNECTION_ID.fetch_add(1, Ordering::Relaxed),
            config,
            stats: ConnectionStats::new(),
            state: Mutex::new(state),
            writer: AsyncMutex::new(writer),
            inbound: AsyncMutex::new(inbound),
            queues: Mutex::new(Some(queues)),
            shutdown,
            close_lock: AsyncMutex::new(()),
        });

        worker::spawn(Arc::clone(&shared), receivers);

        Self {
            handle: Arc::new(Handle { shared }),
        }
    }

    pub(crate) fn shared(&self) -> &Arc<Shared> {
        &self.handle.shared
    }

    /// Starts accepting connections on `0.0.0.0:port`.
    ///
    /// Returns as soon as the socket is listening. Each accepted connection is
    /// handed to `on_accept` on its own task. If accepting fails, `on_accept`
    /// receives the error once and the listening socket is closed.
    ///
    /// # Arguments
    ///
    /// * `port` - Port to listen on, must not be 0
    /// * `max_backlog` - Pending connection queue length, must not be negative
    /// * `accept_multiple` - Keep accepting after the first connection
    /// * `on_accept` - Called with every accepted connection or accept error
    pub fn listen<F, Fut>(
        &self,
        port: u16,
        max_backlog: i32,
        accept_multiple: bool,
        on_accept: F,
    ) -> SocketResult<()>
    where
        F: Fn(SocketResult<Connection>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        if port == 0 {
            return Err(SocketError::InvalidPort);
        }
        let backlog = u32::try_from(max_backlog)
            .map_err(|_| SocketError::InvalidArgument("backlog must not be negative"))?;

        let shared = self.shared();
        let mut state = shared.state();
        if !state.is_idle() {
            return Err(SocketError::InvalidUsage);
        }

        let listener = listener::bind(port, backlog)?;
        let local_addr = listener.local_addr().ok();
        shared.shutdown.send_replace(false);

        // Must be visible before the accept task can hand out connections
        state.status = SocketStatus::Listening;
        state.local_addr = local_addr;
        state.listener = Some(listener::spawn(
            Arc::clone(shared),
            listener,
            accept_multiple,
            on_accept,
        ));

        info!(conn = shared.id, port = port, backlog = backlog, "Listening");
        Ok(())
    }

    /// Connects to `address:port`, giving up after `timeout`.
    ///
    /// Fails with [`SocketError::Timeout`] if the handshake does not finish in
    /// time and [`SocketError::ConnectionFailed`] if the peer rejects it. A
    /// failed connect leaves the connection inactive.
    pub async fn connect(
        &self,
        address: impl Into<IpAddr>,
        port: u16,
        timeout: Duration,
    ) -> SocketResult<()> {
        let ip = address.into();
        if port == 0 {
            return Err(SocketError::InvalidPort);
        }
        if !is_connectable(ip) {
            return Err(SocketError::InvalidIp);
        }

        let shared = self.shared();
        {
            let mut state = shared.state();
            if !state.is_idle() {
                return Err(SocketError::InvalidUsage);
            }
            state.connecting = true;
        }
        let _guard = ConnectingGuard {
            shared: shared.as_ref(),
        };

        let remote = SocketAddr::new(ip, port);
        let stream = open_stream(remote, timeout).await?;
        shared.attach(stream).await;

        info!(conn = shared.id, peer = %remote, "Connected");
        Ok(())
    }

    /// Sends `data` as-is.
    pub async fn write(&self, data: &[u8]) -> SocketResult<()> {
        self.shared().write(data).await
    }

    /// Performs one read into `buf` and returns the number of bytes read.
    ///
    /// May return fewer bytes than `buf` holds. End of stream is reported as
    /// [`SocketError::NotConnected`].
    pub async fn read(&self, buf: &mut [u8]) -> SocketResult<usize> {
        self.shared().read(buf).await
    }

    /// Sends `payload` as one frame.
    pub async fn write_packet(&self, payload: &[u8]) -> SocketResult<()> {
        self.shared().write_packet(payload).await
    }

    /// Sends `text` as one frame.
    pub async fn write_packet_str(&self, text: &str) -> SocketResult<()> {
        self.write_packet(text.as_bytes()).await
    }

    /// Waits for the next whole packet and returns its payload.
    pub async fn receive_packet(&self) -> SocketResult<Bytes> {
        self.shared().receive_packet().await
    }

    /// Waits for the next packet and decodes it as UTF-8.
    pub async fn receive_packet_string(&self) -> SocketResult<String> {
        let payload = self.receive_packet().await?;
        String::from_utf8(payload.to_vec()).map_err(|_| SocketError::InvalidUtf8)
    }

    /// Queues `payload` to be sent as one frame by the write worker.
    ///
    /// Queued packets are sent in order, and always before queued raw writes
    /// that are waiting at the same time.
    pub fn enqueue_packet(&self, payload: impl Into<Bytes>) -> SocketResult<()> {
        self.shared().enqueue_packet(payload.into())
    }

    /// Queues `data` to be sent as-is by the write worker.
    pub fn enqueue_write(&self, data: impl Into<Bytes>) -> SocketResult<()> {
        self.shared().enqueue_write(data.into())
    }

    /// Decodes packets on a background task and hands each to `on_packet`.
    ///
    /// The first error is passed to `on_packet` as well, after which the loop
    /// stops. Registering a new callback stops the previous loop. The loop
    /// holds a handle, so the connection stays open while it runs.
    pub fn receive_callback<F>(&self, on_packet: F) -> SocketResult<()>
    where
        F: FnMut(SocketResult<Bytes>, &Connection) + Send + 'static,
    {
        let shared = self.shared();
        let mut state = shared.state();
        if !state.is_connected() {
            return Err(SocketError::NotReady);
        }

        state.receive_generation += 1;
        if let Some(previous) = state.receiver.take() {
            // Suspended only in cancel-safe reads
            previous.abort();
        }
        state.receiver = Some(receiver::spawn(
            self.clone(),
            state.receive_generation,
            on_packet,
        ));
        Ok(())
    }

    /// Closes the socket and stops the accept and receive loops.
    ///
    /// Does nothing if the connection is inactive. A call made while another
    /// close is running waits for it, so the connection is inactive once
    /// either returns. Queued writes that have
    /// not been sent yet fail once the socket is gone.
    pub async fn close(&self) {
        self.shared().close().await
    }

    /// Current lifecycle state.
    pub fn status(&self) -> SocketStatus {
        self.shared().status()
    }

    /// True while connected and not being closed.
    pub fn is_connected(&self) -> bool {
        self.shared().is_connected()
    }

    /// Process-unique id, used in log fields.
    pub fn id(&self) -> u64 {
        self.shared().id
    }

    /// Configuration this connection was created with.
    pub fn config(&self) -> &ConnectionConfig {
        &self.shared().config
    }

    /// Snapshot of the traffic counters.
    pub fn stats(&self) -> StatsSnapshot {
        self.shared().stats.snapshot()
    }

    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.shared().state().local_addr
    }

    pub fn peer_addr(&self) -> Option<SocketAddr> {
        self.shared().state().peer_addr
    }

    /// IP address of the peer, `None` unless connected.
    pub fn remote_ip(&self) -> Option<IpAddr> {
        self.peer_addr().map(|addr| addr.ip())
    }

    /// Port of the peer, 0 unless connected.
    pub fn remote_port(&self) -> u16 {
        self.peer_addr().map_or(0, |addr| addr.port())
    }

    /// Local address this socket is bound to, as seen by the peer's network.
    pub fn public_ip(&self) -> Option<IpAddr> {
        self.local_addr().map(|addr| addr.ip())
    }

    /// Local port, 0 while inactive.
    pub fn local_port(&self) -> u16 {
        self.local_addr().map_or(0, |addr| addr.port())
    }

    /// Resolves this machine's host name and returns one `(host, ip)` pair
    /// per distinct address.
    ///
    /// Falls back to the loopback address when the host name does not
    /// resolve, so the result is never empty.
    pub async fn enumerate_local_ips() -> SocketResult<Vec<(String, IpAddr)>> {
        let host = hostname::get()?
            .into_string()
            .map_err(|_| SocketError::InvalidArgument("host name is not valid UTF-8"))?;

        let mut ips: Vec<(String, IpAddr)> = Vec::new();
        match tokio::net::lookup_host((host.as_str(), 0)).await {
            Ok(addrs) => {
                for addr in addrs {
                    if !ips.iter().any(|(_, ip)| *ip == addr.ip()) {
                        ips.push((host.clone(), addr.ip()));
                    }
                }
            }
            Err(e) => debug!(host = %host, error = %e, "Host name did not resolve"),
        }

        if ips.is_empty() {
            ips.push((host, IpAddr::V4(Ipv4Addr::LOCALHOST)));
        }
        Ok(ips)
    }

    /// First address of [`enumerate_local_ips`](Self::enumerate_local_ips).
    pub async fn local_ip() -> SocketResult<IpAddr> {
        let ips = Self::enumerate_local_ips().await?;
        ips.into_iter()
            .map(|(_, ip)| ip)
            .next()
            .ok_or(SocketError::AddressNotAvailable)
    }
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let shared = self.shared();
        let state = shared.state();
        f.debug_struct("Connection")
            .field("id", &shared.id)
            .field("status", &state.status)
            .field("local_addr", &state.local_addr)
            .field("peer_addr", &state.peer_addr)
            .finish()
    }
}

fn is_connectable(ip: IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => !v4.is_unspecified() && !v4.is_broadcast(),
        IpAddr::V6(v6) => !v6.is_unspecified(),
    }
}

async fn open_stream(remote: SocketAddr, timeout: Duration) -> SocketResult<TcpStream> {
    let socket = match remote {
        SocketAddr::V4(_) => TcpSocket::new_v4()?,
        SocketAddr::V6(_) => TcpSocket::new_v6()?,
    };

    match tokio::time::timeout(timeout, socket.connect(remote)).await {
        Ok(Ok(stream)) => Ok(stream),
        Ok(Err(e)) => {
            debug!(peer = %remote, error = %e, "Connect failed");
            Err(match SocketError::from(e) {
                // The handshake was attempted and rejected or lost
                SocketError::ConnectionRefused
                | SocketError::ConnectionReset
                | SocketError::ConnectionAborted
                | SocketError::HostUnreachable
                | SocketError::NetworkUnreachable
                | SocketError::Timeout => SocketError::ConnectionFailed,
                other => other,
            })
        }
        Err(_) => {
            debug!(peer = %remote, timeout_ms = timeout.as_millis() as u64, "Connect timed out");
            Err(SocketError::Timeout)
        }
    }
}
