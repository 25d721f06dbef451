//! touchbridge-server entry point.
//!
//! Runs on the controlled device.  Establishes the control connection with
//! the desktop client, then serves one session of line commands (`TAP`,
//! `SWIPE`, `TEXT`, `CLIP_GET`, ...) until the client disconnects or the
//! process is interrupted.
//!
//! # Usage
//!
//! ```text
//! touchbridge-server [OPTIONS] [CLIENT_VERSION]
//!
//! Arguments:
//!   [CLIENT_VERSION]            Must equal the server version when given
//!
//! Options:
//!   --config <PATH>             TOML configuration file
//!   --scid <HEX>                Session id (-1 = none)
//!   --tunnel-forward <BOOL>     Listen and accept instead of connecting
//!   --tcp <ADDR>                Use a TCP endpoint instead of the local socket
//!   --display-id <N>            Display receiving input [default: 0]
//!   --power-on <BOOL>           Wake the screen before the first command [default: true]
//!   --control <BOOL>            Serve the control session [default: true]
//!   --send-dummy-byte <BOOL>    Write 0x00 after accepting [default: true]
//!   --log-level <LEVEL>         verbose|debug|info|warn|error [default: info]
//!   --max-line-length <BYTES>   Longest accepted request line [default: 8388608]
//! ```
//!
//! # Precedence
//!
//! Command-line flags win over environment variables, which win over the
//! configuration file, which wins over built-in defaults.  `RUST_LOG`, when
//! set, replaces the log level entirely.
//!
//! | Variable                       | Flag                |
//! |--------------------------------|---------------------|
//! | `TOUCHBRIDGE_CONFIG`           | `--config`          |
//! | `TOUCHBRIDGE_SCID`             | `--scid`            |
//! | `TOUCHBRIDGE_TUNNEL_FORWARD`   | `--tunnel-forward`  |
//! | `TOUCHBRIDGE_TCP`              | `--tcp`             |
//! | `TOUCHBRIDGE_DISPLAY_ID`       | `--display-id`      |
//! | `TOUCHBRIDGE_POWER_ON`         | `--power-on`        |
//! | `TOUCHBRIDGE_CONTROL`          | `--control`         |
//! | `TOUCHBRIDGE_SEND_DUMMY_BYTE`  | `--send-dummy-byte` |
//! | `TOUCHBRIDGE_LOG_LEVEL`        | `--log-level`       |

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use touchbridge_server::application::capability::CapabilityBackend;
use touchbridge_server::application::dispatcher::Dispatcher;
use touchbridge_server::domain::config::{Endpoint, LogLevel, Scid, ServerConfig};
use touchbridge_server::infrastructure::backend::MockCapabilityBackend;
use touchbridge_server::infrastructure::channel::LineChannel;
use touchbridge_server::infrastructure::config_file::FileConfig;
use touchbridge_server::infrastructure::session::{Session, SessionOutcome};
use touchbridge_server::infrastructure::transport::{self, TransportError};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// touchbridge device-side server.
///
/// Every option is optional: unset options fall back to the configuration
/// file, then to the built-in defaults.
#[derive(Debug, Parser)]
#[command(
    name = "touchbridge-server",
    about = "Injects taps, swipes, keys and text sent by a desktop client",
    version
)]
struct Cli {
    /// Version of the desktop client; must equal the server version.
    client_version: Option<String>,

    /// TOML configuration file.
    #[arg(long, env = "TOUCHBRIDGE_CONFIG")]
    config: Option<PathBuf>,

    /// Session id in hex, or -1 for none.  Selects the local socket name.
    #[arg(long, env = "TOUCHBRIDGE_SCID", allow_hyphen_values = true)]
    scid: Option<String>,

    /// Listen and accept one connection instead of connecting out.
    #[arg(long, env = "TOUCHBRIDGE_TUNNEL_FORWARD")]
    tunnel_forward: Option<bool>,

    /// TCP address to use instead of the local socket.
    #[arg(long, env = "TOUCHBRIDGE_TCP")]
    tcp: Option<SocketAddr>,

    /// Display that receives injected input.
    #[arg(long, env = "TOUCHBRIDGE_DISPLAY_ID")]
    display_id: Option<u32>,

    /// Wake the primary display before the first command if it is off.
    #[arg(long, env = "TOUCHBRIDGE_POWER_ON")]
    power_on: Option<bool>,

    /// Serve the control session.  `false` makes the server exit at once.
    #[arg(long, env = "TOUCHBRIDGE_CONTROL")]
    control: Option<bool>,

    /// Write a 0x00 byte after accepting, so the client can detect errors.
    #[arg(long, env = "TOUCHBRIDGE_SEND_DUMMY_BYTE")]
    send_dummy_byte: Option<bool>,

    /// Log verbosity: verbose, debug, info, warn or error.
    #[arg(long, env = "TOUCHBRIDGE_LOG_LEVEL")]
    log_level: Option<LogLevel>,

    /// Longest accepted request line, in bytes.
    #[arg(long)]
    max_line_length: Option<usize>,
}

impl Cli {
    /// Resolves the final [`ServerConfig`]: file (if any), then overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the client version does not match, the config
    /// file cannot be loaded, or `--scid` is invalid.
    fn into_server_config(self) -> anyhow::Result<ServerConfig> {
        check_client_version(self.client_version.as_deref())?;

        let file = match &self.config {
            Some(path) => FileConfig::load(path)
                .with_context(|| format!("failed to load config file {}", path.display()))?,
            None => FileConfig::default(),
        };
        let mut config = file.into_server_config()?;

        if let Some(raw) = &self.scid {
            config.scid = Scid::parse_arg(raw).with_context(|| format!("invalid --scid {raw:?}"))?;
            if matches!(config.transport.endpoint, Endpoint::LocalSocket { .. }) {
                config.transport.endpoint = Endpoint::local(config.scid);
            }
        }
        if let Some(addr) = self.tcp {
            config.transport.endpoint = Endpoint::Tcp(addr);
        }
        if let Some(tunnel_forward) = self.tunnel_forward {
            config.transport.tunnel_forward = tunnel_forward;
        }
        if let Some(send_dummy_byte) = self.send_dummy_byte {
            config.transport.send_dummy_byte = send_dummy_byte;
        }
        if let Some(display_id) = self.display_id {
            config.display_id.0 = display_id;
        }
        if let Some(power_on) = self.power_on {
            config.power_on = power_on;
        }
        if let Some(control) = self.control {
            config.control = control;
        }
        if let Some(log_level) = self.log_level {
            config.log_level = log_level;
        }
        if let Some(max_line_length) = self.max_line_length {
            config.max_line_length = max_line_length;
        }
        Ok(config)
    }
}

/// Rejects a client built for a different server version.
fn check_client_version(client_version: Option<&str>) -> anyhow::Result<()> {
    let server_version = env!("CARGO_PKG_VERSION");
    match client_version {
        Some(client) if client != server_version => bail!(
            "the server version ({server_version}) does not match the client ({client})"
        ),
        _ => Ok(()),
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

/// Program entry point.
///
/// # What happens at startup
///
/// 1. CLI arguments (and environment variables) are parsed with `clap` and
///    merged over the configuration file into a [`ServerConfig`].
/// 2. `tracing_subscriber` is initialised; `RUST_LOG` wins over the
///    configured level.
/// 3. A Ctrl+C handler is spawned; it cancels the shared
///    [`CancellationToken`], which interrupts the accept/connect, a waiting
///    read, or a swipe in progress.
/// 4. The control connection is established and one [`Session`] runs on it.
/// 5. The process exits non-zero if the session ended on a transport error.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Cli::parse().into_server_config()?;

    // ── Logging setup ─────────────────────────────────────────────────────────
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.log_level.as_filter())),
        )
        .init();

    info!(
        "touchbridge-server {} starting: endpoint={}, tunnel_forward={}, display={}",
        env!("CARGO_PKG_VERSION"),
        config.transport.endpoint,
        config.transport.tunnel_forward,
        config.display_id
    );

    if !config.control {
        info!("control disabled, nothing to serve");
        return Ok(());
    }

    // ── Graceful shutdown ─────────────────────────────────────────────────────
    let cancel = CancellationToken::new();
    let cancel_on_signal = cancel.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("received Ctrl+C, shutting down");
                cancel_on_signal.cancel();
            }
            Err(e) => error!("failed to listen for Ctrl+C signal: {e}"),
        }
    });

    // ── Connection ────────────────────────────────────────────────────────────
    let connection = match transport::open(&config.transport, &cancel).await {
        Ok(connection) => connection,
        Err(TransportError::Cancelled) => {
            info!("shutdown requested before the client connected");
            return Ok(());
        }
        Err(e) => return Err(e).context("could not establish the control connection"),
    };

    // ── Session ───────────────────────────────────────────────────────────────
    // No device backend is linked into this binary; the in-memory backend
    // keeps the protocol fully functional for client development.
    let backend: Arc<dyn CapabilityBackend> =
        Arc::new(MockCapabilityBackend::new().without_recording());
    let dispatcher = Dispatcher::new(backend, config.display_id, cancel.clone());
    let channel = LineChannel::new(connection.reader, connection.writer, config.max_line_length);
    let session = Session::new(channel, dispatcher, cancel).with_power_on(config.power_on);

    match session.run().await {
        SessionOutcome::Clean(_) => {
            info!("touchbridge-server stopped");
            Ok(())
        }
        SessionOutcome::Fatal(e) => Err(e).context("control session failed"),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
