//! framesock - Framed TCP Connections
//!
//! Command-line front end. `listen` runs a packet echo server, `send` connects
//! to one, sends a packet and prints the reply.

use anyhow::{bail, Context};
use framesock::{Connection, SocketError};
use std::net::IpAddr;
use std::time::Duration;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Listen,
    Send,
}

/// Command-line configuration
struct Config {
    mode: Mode,
    /// Host to connect to in send mode
    host: IpAddr,
    /// Port to listen on or connect to
    port: u16,
    /// Pending connection queue length in listen mode
    backlog: i32,
    /// Connect timeout in send mode
    timeout: Duration,
    /// Packet to send in send mode
    message: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mode: Mode::Listen,
            host: IpAddr::from([127, 0, 0, 1]),
            port: 7000,
            backlog: framesock::DEFAULT_BACKLOG,
            timeout: framesock::DEFAULT_CONNECT_TIMEOUT,
            message: "ping".to_string(),
        }
    }
}

impl Config {
    /// Parse configuration from command-line arguments
    fn from_args() -> anyhow::Result<Self> {
        let mut config = Config::default();
        let mut args = std::env::args().skip(1);

        match args.next().as_deref() {
            Some("listen") => config.mode = Mode::Listen,
            Some("send") => config.mode = Mode::Send,
            Some("--help") | None => {
                print_help();
                std::process::exit(0);
            }
            Some("--version" | "-v") => {
                println!("framesock version {}", framesock::VERSION);
                std::process::exit(0);
            }
            Some(other) => bail!("unknown command: {}", other),
        }

        while let Some(arg) = args.next() {
            let mut value = |name: &str| {
                args.next()
                    .with_context(|| format!("{} requires a value", name))
            };

            match arg.as_str() {
                "--host" | "-h" => {
                    config.host = value("--host")?.parse().context("invalid host address")?;
                }
                "--port" | "-p" => {
                    config.port = value("--port")?.parse().context("invalid port number")?;
                }
                "--backlog" | "-b" => {
                    config.backlog = value("--backlog")?.parse().context("invalid backlog")?;
                }
                "--timeout" | "-t" => {
                    let millis: u64 = value("--timeout")?.parse().context("invalid timeout")?;
                    config.timeout = Duration::from_millis(millis);
                }
                "--help" => {
                    print_help();
                    std::process::exit(0);
                }
                _ if config.mode == Mode::Send && !arg.starts_with('-') => {
                    config.message = arg;
                }
                _ => bail!("unknown argument: {}", arg),
            }
        }

        Ok(config)
    }
}

fn print_help() {
    println!(
        r#"
framesock - Framed TCP Connections

USAGE:
    framesock listen [OPTIONS]
    framesock send [OPTIONS] [MESSAGE]

OPTIONS:
    -h, --host <HOST>         Host to connect to (default: 127.0.0.1)
    -p, --port <PORT>         Port to listen on or connect to (default: 7000)
    -b, --backlog <N>         Pending connection queue length (default: 128)
    -t, --timeout <MS>        Connect timeout in milliseconds (default: 5000)
    -v, --version             Print version information
        --help                Print this help message

EXAMPLES:
    framesock listen --port 7000          # Echo every packet back
    framesock send --port 7000 hello      # Send "hello" and print the reply

LOGGING:
    Set RUST_LOG to change verbosity, e.g. RUST_LOG=framesock=debug
"#
    );
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_args()?;

    // Set up logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();

    match config.mode {
        Mode::Listen => run_echo_server(&config).await,
        Mode::Send => run_client(&config).await,
    }
}

/// Echoes every received packet back to its sender until Ctrl+C.
async fn run_echo_server(config: &Config) -> anyhow::Result<()> {
    let server = Connection::new();
    server
        .listen(config.port, config.backlog, true, |result| async move {
            let conn = match result {
                Ok(conn) => conn,
                Err(e) => {
                    warn!("Accept failed: {}", e);
                    return;
                }
            };

            info!("Client connected from {:?}", conn.peer_addr());
            let registered = conn.receive_callback(|packet, conn| match packet {
                Ok(payload) => {
                    if let Err(e) = conn.enqueue_packet(payload) {
                        warn!("Failed to queue reply: {}", e);
                    }
                }
                Err(SocketError::NotConnected) => {
                    info!("Client disconnected from {:?}", conn.peer_addr());
                }
                Err(e) => warn!("Receive failed: {}", e),
            });
            if let Err(e) = registered {
                warn!("Failed to start receiving: {}", e);
            }
        })
        .with_context(|| format!("failed to listen on port {}", config.port))?;

    info!(
        "framesock v{} echoing packets on 0.0.0.0:{}",
        framesock::VERSION,
        config.port
    );
    info!("Use Ctrl+C to shutdown gracefully.");

    signal::ctrl_c()
        .await
        .context("failed to install Ctrl+C handler")?;
    info!("Shutdown signal received, stopping server...");

    server.close().await;
    info!("Server shutdown complete");
    Ok(())
}

/// Sends one packet and prints the reply.
async fn run_client(config: &Config) -> anyhow::Result<()> {
    let conn = Connection::new();
    conn.connect(config.host, config.port, config.timeout)
        .await
        .with_context(|| format!("failed to connect to {}:{}", config.host, config.port))?;

    conn.write_packet_str(&config.message).await?;
    let reply = conn.receive_packet_string().await?;
    println!("{}", reply);

    conn.close().await;
    Ok(())
}
