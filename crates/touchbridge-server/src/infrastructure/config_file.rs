//! TOML configuration file.
//!
//! The file is optional and is only read when a path is given with
//! `--config` or `TOUCHBRIDGE_CONFIG`.  Every key has a default, so a file
//! only needs the settings it changes:
//!
//! ```toml
//! [server]
//! scid = "1a2b3c4d"
//! display_id = 0
//! power_on = true
//! control = true
//! max_line_length = 8388608
//!
//! [transport]
//! tunnel_forward = true
//! send_dummy_byte = true
//! # tcp = "127.0.0.1:27183"
//!
//! [logging]
//! level = "debug"
//! ```
//!
//! Command-line flags and environment variables override whatever the file
//! says; see `main.rs`.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::domain::config::{
    DisplayId, Endpoint, LogLevel, Scid, ScidError, ServerConfig, TransportConfig,
    DEFAULT_MAX_LINE_LENGTH,
};

/// Error type for configuration file loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("I/O error reading config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// `server.scid` is not a valid session id.
    #[error("invalid server.scid: {0}")]
    Scid(#[from] ScidError),
}

// ── File schema ───────────────────────────────────────────────────────────────

/// Top-level layout of the configuration file.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct FileConfig {
    #[serde(default)]
    pub server: ServerSection,
    #[serde(default)]
    pub transport: TransportSection,
    #[serde(default)]
    pub logging: LoggingSection,
}

/// `[server]` table.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ServerSection {
    /// Hex session id, or `"-1"` for none.
    #[serde(default)]
    pub scid: Option<String>,
    #[serde(default)]
    pub display_id: DisplayId,
    #[serde(default = "default_true")]
    pub power_on: bool,
    /// `false` disables the control session entirely.
    #[serde(default = "default_true")]
    pub control: bool,
    #[serde(default = "default_max_line_length")]
    pub max_line_length: usize,
}

/// `[transport]` table.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct TransportSection {
    #[serde(default)]
    pub tunnel_forward: bool,
    #[serde(default = "default_true")]
    pub send_dummy_byte: bool,
    /// Use this TCP address instead of the local socket.
    #[serde(default)]
    pub tcp: Option<SocketAddr>,
}

/// `[logging]` table.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct LoggingSection {
    #[serde(default)]
    pub level: LogLevel,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_true() -> bool {
    true
}
fn default_max_line_length() -> usize {
    DEFAULT_MAX_LINE_LENGTH
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            scid: None,
            display_id: DisplayId::PRIMARY,
            power_on: default_true(),
            control: default_true(),
            max_line_length: default_max_line_length(),
        }
    }
}

impl Default for TransportSection {
    fn default() -> Self {
        Self {
            tunnel_forward: false,
            send_dummy_byte: default_true(),
            tcp: None,
        }
    }
}

// ── Loading ───────────────────────────────────────────────────────────────────

impl FileConfig {
    /// Parses TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML or mistyped values.
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Reads and parses the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Parse`] if it is not valid.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text)
    }

    /// Resolves the file settings into a [`ServerConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Scid`] if `server.scid` is invalid.
    pub fn into_server_config(self) -> Result<ServerConfig, ConfigError> {
        let scid = match self.server.scid.as_deref() {
            Some(raw) => Scid::parse_arg(raw)?,
            None => None,
        };
        let endpoint = match self.transport.tcp {
            Some(addr) => Endpoint::Tcp(addr),
            None => Endpoint::local(scid),
        };

        Ok(ServerConfig {
            scid,
            display_id: self.server.display_id,
            power_on: self.server.power_on,
            control: self.server.control,
            transport: TransportConfig {
                endpoint,
                tunnel_forward: self.transport.tunnel_forward,
                send_dummy_byte: self.transport.send_dummy_byte,
            },
            log_level: self.logging.level,
            max_line_length: self.server.max_line_length,
        })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_gives_default_config() {
        // Arrange / Act
        let config = FileConfig::parse("").unwrap().into_server_config().unwrap();

        // Assert
        assert_eq!(config, ServerConfig::default());
    }

    #[test]
    fn test_full_file_is_applied() {
        // Arrange
        let text = r#"
            [server]
            scid = "1a2b3c4d"
            display_id = 2
            power_on = false
            control = false
            max_line_length = 4096

            [transport]
            tunnel_forward = true
            send_dummy_byte = false

            [logging]
            level = "verbose"
        "#;

        // Act
        let config = FileConfig::parse(text).unwrap().into_server_config().unwrap();

        // Assert
        assert_eq!(config.scid.map(|s| s.value()), Some(0x1a2b3c4d));
        assert_eq!(config.display_id, DisplayId(2));
        assert!(!config.power_on);
        assert!(!config.control);
        assert_eq!(config.max_line_length, 4096);
        assert!(config.transport.tunnel_forward);
        assert!(!config.transport.send_dummy_byte);
        assert_eq!(
            config.transport.endpoint,
            Endpoint::LocalSocket { name: "touchbridge_1a2b3c4d".into() }
        );
        assert_eq!(config.log_level, LogLevel::Verbose);
    }

    #[test]
    fn test_tcp_endpoint_replaces_local_socket() {
        let text = "[transport]\ntcp = \"127.0.0.1:27183\"\n";

        let config = FileConfig::parse(text).unwrap().into_server_config().unwrap();

        assert_eq!(
            config.transport.endpoint,
            Endpoint::Tcp("127.0.0.1:27183".parse().unwrap())
        );
    }

    #[test]
    fn test_partial_table_keeps_other_defaults() {
        let file = FileConfig::parse("[server]\npower_on = false\n").unwrap();

        assert!(!file.server.power_on);
        assert!(file.server.control);
        assert_eq!(file.server.max_line_length, DEFAULT_MAX_LINE_LENGTH);
        assert!(file.transport.send_dummy_byte);
    }

    #[test]
    fn test_invalid_scid_is_rejected() {
        let file = FileConfig::parse("[server]\nscid = \"zz\"\n").unwrap();
        assert!(matches!(file.into_server_config(), Err(ConfigError::Scid(_))));
    }

    #[test]
    fn test_invalid_log_level_is_a_parse_error() {
        let result = FileConfig::parse("[logging]\nlevel = \"loud\"\n");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = FileConfig::load(Path::new("/nonexistent/touchbridge.toml"));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }
}
