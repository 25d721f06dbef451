//! Server configuration types.
//!
//! [`ServerConfig`] is the fully resolved configuration the binary hands to
//! the transport and session layers.  It is assembled in `main.rs` from, in
//! increasing precedence: built-in defaults, the TOML file (see
//! `infrastructure::config_file`), environment variables, and command-line
//! flags.
//!
//! # Session ids (for beginners)
//!
//! Several servers may run on one device at the same time, each serving a
//! different desktop client.  The client picks a random 31-bit *scid* and
//! passes it to the server as hex; both sides then derive the same local
//! socket name from it (`touchbridge_0000abcd`), so connections never cross.

use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;

use serde::Deserialize;
use thiserror::Error;

/// Prefix of every local socket name.
pub const SOCKET_NAME_PREFIX: &str = "touchbridge";

/// Default upper bound on one request line, in bytes.
pub const DEFAULT_MAX_LINE_LENGTH: usize = 8 * 1024 * 1024;

// ── Display id ────────────────────────────────────────────────────────────────

/// Identifier of a device display.  `0` is the primary display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(transparent)]
pub struct DisplayId(pub u32);

impl DisplayId {
    /// The primary (built-in) display.
    pub const PRIMARY: DisplayId = DisplayId(0);

    /// Returns `true` for the primary display.
    pub fn is_primary(&self) -> bool {
        *self == Self::PRIMARY
    }
}

impl fmt::Display for DisplayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for DisplayId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(DisplayId)
    }
}

// ── Session id ────────────────────────────────────────────────────────────────

/// Errors produced when parsing a session id.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScidError {
    #[error("scid must be hexadecimal, got {0:?}")]
    NotHex(String),
    #[error("scid must fit in 31 bits, got {0:#x}")]
    OutOfRange(u64),
}

/// A 31-bit session id distinguishing concurrent servers on one device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Scid(u32);

impl Scid {
    /// Largest accepted value.
    pub const MAX: u32 = 0x7FFF_FFFF;

    /// Creates a session id, rejecting values above [`Scid::MAX`].
    pub fn new(value: u32) -> Result<Self, ScidError> {
        if value > Self::MAX {
            return Err(ScidError::OutOfRange(u64::from(value)));
        }
        Ok(Self(value))
    }

    pub fn value(&self) -> u32 {
        self.0
    }

    /// Parses a command-line scid: hex digits, or `-1` for "no scid".
    ///
    /// # Errors
    ///
    /// Returns [`ScidError`] if `s` is neither `-1` nor a 31-bit hex number.
    pub fn parse_arg(s: &str) -> Result<Option<Scid>, ScidError> {
        let s = s.trim();
        if s == "-1" {
            return Ok(None);
        }
        s.parse().map(Some)
    }
}

impl FromStr for Scid {
    type Err = ScidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.trim();
        let digits = digits
            .strip_prefix("0x")
            .or_else(|| digits.strip_prefix("0X"))
            .unwrap_or(digits);
        let value =
            u64::from_str_radix(digits, 16).map_err(|_| ScidError::NotHex(s.to_string()))?;
        let value = u32::try_from(value).map_err(|_| ScidError::OutOfRange(value))?;
        Scid::new(value)
    }
}

impl fmt::Display for Scid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:08x}", self.0)
    }
}

/// Local socket name shared by the server and its desktop client.
///
/// # Examples
///
/// ```rust
/// use touchbridge_server::domain::config::{socket_name, Scid};
///
/// assert_eq!(socket_name(None), "touchbridge");
/// assert_eq!(socket_name(Some(Scid::new(0xabc).unwrap())), "touchbridge_00000abc");
/// ```
pub fn socket_name(scid: Option<Scid>) -> String {
    match scid {
        Some(scid) => format!("{SOCKET_NAME_PREFIX}_{scid}"),
        None => SOCKET_NAME_PREFIX.to_string(),
    }
}

// ── Log level ─────────────────────────────────────────────────────────────────

/// Error returned for an unrecognised log level name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown log level {0:?} (expected verbose, debug, info, warn or error)")]
pub struct LogLevelError(pub String);

/// Server log verbosity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum LogLevel {
    Verbose,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// The equivalent `tracing` filter directive.
    pub fn as_filter(&self) -> &'static str {
        match self {
            LogLevel::Verbose => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl FromStr for LogLevel {
    type Err = LogLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "verbose" | "trace" => Ok(LogLevel::Verbose),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(LogLevelError(s.to_string())),
        }
    }
}

impl TryFrom<String> for LogLevel {
    type Error = LogLevelError;

    fn try_from(value: String) -> Result<Self, LogLevelError> {
        value.parse()
    }
}

// ── Transport ─────────────────────────────────────────────────────────────────

/// Where the control connection lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    /// A named local socket (abstract namespace on Linux/Android).
    LocalSocket { name: String },
    /// A TCP address, for development hosts without a forwarded local socket.
    Tcp(SocketAddr),
}

impl Endpoint {
    /// The local socket endpoint for `scid`.
    pub fn local(scid: Option<Scid>) -> Self {
        Endpoint::LocalSocket { name: socket_name(scid) }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::LocalSocket { name } => write!(f, "local:{name}"),
            Endpoint::Tcp(addr) => write!(f, "tcp:{addr}"),
        }
    }
}

/// How the control connection is established.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportConfig {
    pub endpoint: Endpoint,
    /// `true`: listen and accept one connection.  `false`: connect out.
    pub tunnel_forward: bool,
    /// Write one `0x00` byte after accepting, so the client can detect errors.
    pub send_dummy_byte: bool,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            endpoint: Endpoint::local(None),
            tunnel_forward: false,
            send_dummy_byte: true,
        }
    }
}

// ── Server config ─────────────────────────────────────────────────────────────

/// Fully resolved server configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub scid: Option<Scid>,
    /// Display that receives injected input.
    pub display_id: DisplayId,
    /// Wake the primary display before the first command if it is off.
    pub power_on: bool,
    /// Serve the control session at all.  When `false` the server exits
    /// without opening a connection.
    pub control: bool,
    pub transport: TransportConfig,
    pub log_level: LogLevel,
    /// Longest accepted request line, in bytes.
    pub max_line_length: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            scid: None,
            display_id: DisplayId::PRIMARY,
            power_on: true,
            control: true,
            transport: TransportConfig::default(),
            log_level: LogLevel::default(),
            max_line_length: DEFAULT_MAX_LINE_LENGTH,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
