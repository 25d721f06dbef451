//! Line Channel: newline-delimited UTF-8 text over a byte stream.
//!
//! # Framing (for beginners)
//!
//! A TCP or Unix socket delivers a stream of bytes, not messages.  One read
//! may return half a command, or three commands at once.  The channel uses
//! `tokio_util::codec::LinesCodec` to buffer bytes until a `\n` arrives and
//! hand out exactly one line at a time (a trailing `\r` is stripped, so
//! `\r\n` clients work too).
//!
//! # Reading and writing
//!
//! - [`LineChannel::recv`] yields the next line, or `None` at end of stream.
//! - [`LineSender::send`] appends `\n` and flushes.  The sender is cloneable;
//!   every clone shares one writer behind an async mutex, so concurrent
//!   senders never interleave bytes of different lines.
//!
//! Invalid UTF-8, over-long lines and I/O failures are transport errors
//! ([`ChannelError`]), never protocol errors: the session ends.

use std::fmt::Write as _;
use std::sync::Arc;

use futures_util::{SinkExt, StreamExt};
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::Mutex;
use tokio_util::codec::{FramedRead, FramedWrite, LinesCodec, LinesCodecError};
use tracing::debug;

/// Characters of a received line shown in debug logs.
const TEXT_PREVIEW_CHARS: usize = 80;
/// Bytes of a received line shown as hex in debug logs.
const HEX_PREVIEW_BYTES: usize = 64;

/// Error type for line channel operations.
#[derive(Debug, Error)]
pub enum ChannelError {
    /// The underlying stream failed.
    #[error("I/O error on control stream: {0}")]
    Io(#[source] std::io::Error),
    /// The peer sent bytes that are not UTF-8.
    #[error("received line is not valid UTF-8")]
    InvalidUtf8,
    /// The peer sent a line longer than the configured maximum.
    #[error("received line exceeds {max} bytes")]
    LineTooLong { max: usize },
}

impl ChannelError {
    fn from_codec(error: LinesCodecError, max: usize) -> Self {
        match error {
            LinesCodecError::MaxLineLengthExceeded => ChannelError::LineTooLong { max },
            LinesCodecError::Io(e) if e.kind() == std::io::ErrorKind::InvalidData => {
                ChannelError::InvalidUtf8
            }
            LinesCodecError::Io(e) => ChannelError::Io(e),
        }
    }
}

// ── Sender ────────────────────────────────────────────────────────────────────

/// Cloneable, mutually exclusive writer of response lines.
pub struct LineSender<W> {
    inner: Arc<Mutex<FramedWrite<W, LinesCodec>>>,
    max_line_length: usize,
}

impl<W> Clone for LineSender<W> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            max_line_length: self.max_line_length,
        }
    }
}

impl<W: AsyncWrite + Unpin> LineSender<W> {
    fn new(writer: W, max_line_length: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(FramedWrite::new(writer, LinesCodec::new()))),
            max_line_length,
        }
    }

    /// Writes `line` followed by `\n` and flushes, as one critical section.
    ///
    /// # Errors
    ///
    /// Returns [`ChannelError::Io`] if the write or flush failed.
    pub async fn send(&self, line: &str) -> Result<(), ChannelError> {
        let mut writer = self.inner.lock().await;
        writer
            .send(line)
            .await
            .map_err(|e| ChannelError::from_codec(e, self.max_line_length))
    }

    /// Flushes and shuts down the write direction of the stream.
    ///
    /// # Errors
    ///
    /// Returns [`ChannelError::Io`] if the shutdown failed.
    pub async fn close(&self) -> Result<(), ChannelError> {
        let mut writer = self.inner.lock().await;
        SinkExt::<&str>::close(&mut *writer)
            .await
            .map_err(|e| ChannelError::from_codec(e, self.max_line_length))
    }
}

// ── Channel ───────────────────────────────────────────────────────────────────

/// A session's bidirectional line stream.
pub struct LineChannel<R, W> {
    reader: FramedRead<R, LinesCodec>,
    sender: LineSender<W>,
    max_line_length: usize,
}

impl<R, W> LineChannel<R, W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    /// Wraps the two halves of a stream.  Lines longer than
    /// `max_line_length` bytes are rejected.
    pub fn new(reader: R, writer: W, max_line_length: usize) -> Self {
        Self {
            reader: FramedRead::new(reader, LinesCodec::new_with_max_length(max_line_length)),
            sender: LineSender::new(writer, max_line_length),
            max_line_length,
        }
    }

    /// Waits for the next line.  Returns `Ok(None)` at end of stream.
    ///
    /// Cancel-safe: dropping the future loses no buffered input.
    ///
    /// # Errors
    ///
    /// Returns [`ChannelError`] on I/O failure, invalid UTF-8 or an
    /// over-long line.
    pub async fn recv(&mut self) -> Result<Option<String>, ChannelError> {
        match self.reader.next().await {
            Some(Ok(line)) => {
                debug!(
                    chars = line.chars().count(),
                    bytes = line.len(),
                    text = %preview_text(&line),
                    hex = %preview_hex(line.as_bytes()),
                    "received line"
                );
                Ok(Some(line))
            }
            Some(Err(e)) => Err(ChannelError::from_codec(e, self.max_line_length)),
            None => {
                debug!("control stream reached EOF");
                Ok(None)
            }
        }
    }

    /// Writes one line.  See [`LineSender::send`].
    ///
    /// # Errors
    ///
    /// Returns [`ChannelError::Io`] if the write failed.
    pub async fn send(&mut self, line: &str) -> Result<(), ChannelError> {
        self.sender.send(line).await
    }

    /// A handle for writing lines from elsewhere.
    pub fn sender(&self) -> LineSender<W> {
        self.sender.clone()
    }

    /// Shuts the write direction down.  See [`LineSender::close`].
    ///
    /// # Errors
    ///
    /// Returns [`ChannelError::Io`] if the shutdown failed.
    pub async fn close(&mut self) -> Result<(), ChannelError> {
        self.sender.close().await
    }
}

// ── Log previews ──────────────────────────────────────────────────────────────

/// The first 80 characters of `line`, with its length if truncated.
fn preview_text(line: &str) -> String {
    let total = line.chars().count();
    if total <= TEXT_PREVIEW_CHARS {
        return line.to_string();
    }
    let head: String = line.chars().take(TEXT_PREVIEW_CHARS).collect();
    format!("{head}...(len={total})")
}

/// The first 64 bytes of `bytes` as hex, with the length if truncated.
fn preview_hex(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(HEX_PREVIEW_BYTES * 3 + 16);
    for (i, byte) in bytes.iter().take(HEX_PREVIEW_BYTES).enumerate() {
        if i > 0 {
            out.push(' ');
        }
        let _ = write!(out, "{byte:02x}");
    }
    if bytes.len() > HEX_PREVIEW_BYTES {
        let _ = write!(out, "...len={}", bytes.len());
    }
    out
}

// ── Tests ─────────────────────────────────────────────────────────────────────
