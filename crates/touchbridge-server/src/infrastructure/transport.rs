//! Connection establishment for the control stream.
//!
//! # Forward vs. reverse (for beginners)
//!
//! The desktop client reaches the device through a port forward set up by
//! its tooling.  Depending on the direction of that forward, either side may
//! be the one listening:
//!
//! - **Tunnel forward** (`tunnel_forward = true`): the server listens on the
//!   local socket, accepts exactly one connection and stops listening.  It
//!   then optionally writes a single `0x00` byte: a forwarded connection may
//!   "succeed" even when nothing is behind it, and reading that byte is how
//!   the client tells a real server from a dangling forward.
//! - **Reverse** (`tunnel_forward = false`): the client listens and the server
//!   connects to it.
//!
//! Local socket names live in the abstract namespace on Linux and Android
//! (no file on disk).  Other Unix systems get a socket file in the temporary
//! directory.  A TCP endpoint can be used instead on any platform.

use std::io;

use thiserror::Error;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
#[cfg(unix)]
use tokio::net::{UnixListener, UnixStream};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::domain::config::{Endpoint, TransportConfig};

/// Read half of an established connection.
pub type BoxReader = Box<dyn AsyncRead + Send + Unpin>;
/// Write half of an established connection.
pub type BoxWriter = Box<dyn AsyncWrite + Send + Unpin>;

/// Error type for connection establishment.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("could not listen on {endpoint}: {source}")]
    Bind {
        endpoint: String,
        #[source]
        source: io::Error,
    },
    #[error("accept on {endpoint} failed: {source}")]
    Accept {
        endpoint: String,
        #[source]
        source: io::Error,
    },
    #[error("could not connect to {endpoint}: {source}")]
    Connect {
        endpoint: String,
        #[source]
        source: io::Error,
    },
    #[error("could not send the connection check byte: {0}")]
    DummyByte(#[source] io::Error),
    #[error("local sockets are not supported on this platform; use a TCP endpoint")]
    Unsupported,
    #[error("cancelled while establishing the connection")]
    Cancelled,
}

/// An established control stream, split into halves.
pub struct Connection {
    pub reader: BoxReader,
    pub writer: BoxWriter,
    /// Human-readable description of the other end, for logs.
    pub peer: String,
}

impl Connection {
    fn from_tcp(stream: TcpStream, peer: String) -> Self {
        let (reader, writer) = stream.into_split();
        Self { reader: Box::new(reader), writer: Box::new(writer), peer }
    }

    #[cfg(unix)]
    fn from_unix(stream: UnixStream, peer: String) -> Self {
        let (reader, writer) = stream.into_split();
        Self { reader: Box::new(reader), writer: Box::new(writer), peer }
    }
}

/// Establishes the control connection described by `config`.
///
/// # Errors
///
/// Returns [`TransportError`] if listening, accepting, or connecting failed,
/// or [`TransportError::Cancelled`] if `cancel` fired first.
pub async fn open(
    config: &TransportConfig,
    cancel: &CancellationToken,
) -> Result<Connection, TransportError> {
    if config.tunnel_forward {
        let listener = Listener::bind(&config.endpoint).await?;
        listener.accept_one(config.send_dummy_byte, cancel).await
    } else {
        connect(&config.endpoint, cancel).await
    }
}

// ── Listening side ────────────────────────────────────────────────────────────

/// A bound listener waiting for the single client connection.
pub enum Listener {
    Tcp(TcpListener),
    #[cfg(unix)]
    Unix(UnixListener),
}

impl Listener {
    /// Binds `endpoint`.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Bind`] if the address is in use or invalid.
    pub async fn bind(endpoint: &Endpoint) -> Result<Self, TransportError> {
        let bind_error = |source| TransportError::Bind { endpoint: endpoint.to_string(), source };
        match endpoint {
            Endpoint::Tcp(addr) => TcpListener::bind(addr).await.map(Listener::Tcp).map_err(bind_error),
            #[cfg(unix)]
            Endpoint::LocalSocket { name } => {
                let path = local_socket_path(name);
                #[cfg(not(any(target_os = "linux", target_os = "android")))]
                let _ = std::fs::remove_file(&path);
                UnixListener::bind(&path).map(Listener::Unix).map_err(bind_error)
            }
            #[cfg(not(unix))]
            Endpoint::LocalSocket { .. } => Err(TransportError::Unsupported),
        }
    }

    /// Address of a TCP listener (useful when bound to port 0).
    pub fn tcp_addr(&self) -> Option<std::net::SocketAddr> {
        match self {
            Listener::Tcp(listener) => listener.local_addr().ok(),
            #[cfg(unix)]
            Listener::Unix(_) => None,
        }
    }

    /// Accepts one connection, closes the listener, and optionally writes the
    /// `0x00` check byte.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Accept`], [`TransportError::DummyByte`], or
    /// [`TransportError::Cancelled`].
    pub async fn accept_one(
        self,
        send_dummy_byte: bool,
        cancel: &CancellationToken,
    ) -> Result<Connection, TransportError> {
        let mut connection = tokio::select! {
            _ = cancel.cancelled() => return Err(TransportError::Cancelled),
            accepted = self.accept() => accepted?,
        };
        info!("accepted control connection from {}", connection.peer);

        if send_dummy_byte {
            connection
                .writer
                .write_all(&[0])
                .await
                .map_err(TransportError::DummyByte)?;
            debug!("sent connection check byte");
        }
        Ok(connection)
    }

    async fn accept(&self) -> Result<Connection, TransportError> {
        match self {
            Listener::Tcp(listener) => {
                let (stream, peer) = listener.accept().await.map_err(|source| {
                    TransportError::Accept { endpoint: describe(listener.local_addr()), source }
                })?;
                Ok(Connection::from_tcp(stream, peer.to_string()))
            }
            #[cfg(unix)]
            Listener::Unix(listener) => {
                let (stream, _) = listener.accept().await.map_err(|source| {
                    TransportError::Accept { endpoint: "local socket".to_string(), source }
                })?;
                Ok(Connection::from_unix(stream, "local socket peer".to_string()))
            }
        }
    }
}

fn describe(addr: io::Result<std::net::SocketAddr>) -> String {
    addr.map(|a| a.to_string()).unwrap_or_else(|_| "tcp listener".to_string())
}

// ── Connecting side ───────────────────────────────────────────────────────────

/// Connects to the client's listener at `endpoint`.
///
/// # Errors
///
/// Returns [`TransportError::Connect`] or [`TransportError::Cancelled`].
pub async fn connect(
    endpoint: &Endpoint,
    cancel: &CancellationToken,
) -> Result<Connection, TransportError> {
    let connect_error = |source| TransportError::Connect { endpoint: endpoint.to_string(), source };
    let connection = match endpoint {
        Endpoint::Tcp(addr) => {
            let stream = tokio::select! {
                _ = cancel.cancelled() => return Err(TransportError::Cancelled),
                stream = TcpStream::connect(addr) => stream.map_err(connect_error)?,
            };
            Connection::from_tcp(stream, addr.to_string())
        }
        #[cfg(unix)]
        Endpoint::LocalSocket { name } => {
            let path = local_socket_path(name);
            let stream = tokio::select! {
                _ = cancel.cancelled() => return Err(TransportError::Cancelled),
                stream = UnixStream::connect(&path) => stream.map_err(connect_error)?,
            };
            Connection::from_unix(stream, name.clone())
        }
        #[cfg(not(unix))]
        Endpoint::LocalSocket { .. } => return Err(TransportError::Unsupported),
    };
    info!("connected to {endpoint}");
    Ok(connection)
}

/// Filesystem or abstract-namespace address of a named local socket.
///
/// A leading NUL byte selects the Linux abstract namespace.
#[cfg(unix)]
pub fn local_socket_path(name: &str) -> std::path::PathBuf {
    #[cfg(any(target_os = "linux", target_os = "android"))]
    {
        std::path::PathBuf::from(format!("\0{name}"))
    }
    #[cfg(not(any(target_os = "linux", target_os = "android")))]
    {
        std::env::temp_dir().join(format!("{name}.sock"))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    fn loopback() -> Endpoint {
        Endpoint::Tcp("127.0.0.1:0".parse().unwrap())
    }

    #[tokio::test]
    async fn test_accept_sends_dummy_byte_first() {
        // Arrange
        let listener = Listener::bind(&loopback()).await.unwrap();
        let addr = listener.tcp_addr().unwrap();
        let client = tokio::spawn(async move {
            let mut stream = TcpStream::connect(addr).await.unwrap();
            let mut first = [0xffu8; 1];
            stream.read_exact(&mut first).await.unwrap();
            stream.write_all(b"PING\n").await.unwrap();
            first[0]
        });

        // Act
        let mut connection = listener
            .accept_one(true, &CancellationToken::new())
            .await
            .unwrap();
        let mut line = [0u8; 5];
        connection.reader.read_exact(&mut line).await.unwrap();

        // Assert
        assert_eq!(client.await.unwrap(), 0);
        assert_eq!(&line, b"PING\n");
    }

    #[tokio::test]
    async fn test_accept_without_dummy_byte_writes_nothing() {
        let listener = Listener::bind(&loopback()).await.unwrap();
        let addr = listener.tcp_addr().unwrap();
        let client = tokio::spawn(async move {
            let mut stream = TcpStream::connect(addr).await.unwrap();
            let mut received = Vec::new();
            stream.read_to_end(&mut received).await.unwrap();
            received
        });

        let connection = listener
            .accept_one(false, &CancellationToken::new())
            .await
            .unwrap();
        drop(connection);

        assert!(client.await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_accept_is_cancellable() {
        let listener = Listener::bind(&loopback()).await.unwrap();
        let cancel = CancellationToken::new();
        cancel.cancel();

        let result = listener.accept_one(true, &cancel).await;

        assert!(matches!(result, Err(TransportError::Cancelled)));
    }

    #[tokio::test]
    async fn test_connect_reaches_client_listener() {
        // Arrange – the desktop side listens
        let client = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let endpoint = Endpoint::Tcp(client.local_addr().unwrap());
        let accept = tokio::spawn(async move {
            let (mut stream, _) = client.accept().await.unwrap();
            let mut buf = [0u8; 3];
            stream.read_exact(&mut buf).await.unwrap();
            buf
        });

        // Act
        let mut connection = connect(&endpoint, &CancellationToken::new()).await.unwrap();
        connection.writer.write_all(b"OK\n").await.unwrap();

        // Assert
        assert_eq!(&accept.await.unwrap(), b"OK\n");
    }

    #[tokio::test]
    async fn test_connect_refused_is_an_error() {
        // Bind then drop to get a port nobody listens on.
        let addr = TcpListener::bind("127.0.0.1:0").await.unwrap().local_addr().unwrap();

        let result = connect(&Endpoint::Tcp(addr), &CancellationToken::new()).await;

        assert!(matches!(result, Err(TransportError::Connect { .. })));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_local_socket_round_trip() {
        // Arrange – unique name so parallel test runs do not collide
        let name = format!("touchbridge_test_{}", uuid::Uuid::new_v4().simple());
        let endpoint = Endpoint::LocalSocket { name };
        let listener = Listener::bind(&endpoint).await.unwrap();
        let cancel = CancellationToken::new();

        // Act
        let (accepted, connected) = tokio::join!(
            listener.accept_one(true, &cancel),
            connect(&endpoint, &cancel)
        );

        // Assert – the connecting side sees the check byte
        let mut connected = connected.unwrap();
        let _accepted = accepted.unwrap();
        let mut byte = [0xffu8; 1];
        connected.reader.read_exact(&mut byte).await.unwrap();
        assert_eq!(byte, [0]);
    }

    #[cfg(any(target_os = "linux", target_os = "android"))]
    #[test]
    fn test_local_socket_uses_abstract_namespace() {
        let path = local_socket_path("touchbridge_0000abcd");
        assert_eq!(path.to_str(), Some("\0touchbridge_0000abcd"));
    }
}
