//! Session: one control connection and its command loop.
//!
//! ```text
//! power-on policy ──► AwaitingLine ──► dispatch ──► send response ──┐
//!                          ▲                                        │
//!                          └────────────────────────────────────────┘
//!                          │
//!                          ├─ EOF            → Clean(EndOfStream)
//!                          ├─ cancellation   → Clean(Cancelled)
//!                          └─ I/O / UTF-8    → Fatal(error)
//! ```
//!
//! The loop processes one line at a time: it does not read the next line
//! until the previous response has been written.  Cancellation is observed
//! while waiting for a line, during the power-on settle, and between swipe
//! steps; a command interrupted that way gets no response.

use std::fmt;

use tokio::io::{AsyncRead, AsyncWrite};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::application::dispatcher::Dispatcher;
use crate::infrastructure::channel::{ChannelError, LineChannel};

/// Why a session ended normally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    /// The peer closed the stream.
    EndOfStream,
    /// Shutdown was requested.
    Cancelled,
}

impl fmt::Display for CloseReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CloseReason::EndOfStream => f.write_str("end of stream"),
            CloseReason::Cancelled => f.write_str("cancelled"),
        }
    }
}

/// How a session terminated.
#[derive(Debug)]
pub enum SessionOutcome {
    /// Expected termination.
    Clean(CloseReason),
    /// The transport failed; the peer may have missed a response.
    Fatal(ChannelError),
}

impl SessionOutcome {
    pub fn is_clean(&self) -> bool {
        matches!(self, SessionOutcome::Clean(_))
    }
}

/// One connection's command loop.
pub struct Session<R, W> {
    id: Uuid,
    channel: LineChannel<R, W>,
    dispatcher: Dispatcher,
    cancel: CancellationToken,
    power_on: bool,
}

impl<R, W> Session<R, W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    /// Creates a session with the power-on policy disabled.
    pub fn new(channel: LineChannel<R, W>, dispatcher: Dispatcher, cancel: CancellationToken) -> Self {
        Self {
            id: Uuid::new_v4(),
            channel,
            dispatcher,
            cancel,
            power_on: false,
        }
    }

    /// Enables or disables waking the screen before the first command.
    pub fn with_power_on(mut self, power_on: bool) -> Self {
        self.power_on = power_on;
        self
    }

    /// Runs the loop until the stream ends, shutdown is requested, or the
    /// transport fails.  After a clean end the write side is shut down.
    pub async fn run(mut self) -> SessionOutcome {
        let id = self.id;
        info!("session {id}: started");

        let outcome = self.serve().await;
        match &outcome {
            SessionOutcome::Clean(reason) => info!("session {id}: closed ({reason})"),
            SessionOutcome::Fatal(e) => error!("session {id}: terminated: {e}"),
        }

        // A failed stream is dropped as is; flushing it again would fail too.
        if outcome.is_clean() {
            if let Err(e) = self.channel.close().await {
                debug!("session {id}: shutdown of control stream failed: {e}");
            }
        }
        outcome
    }

    async fn serve(&mut self) -> SessionOutcome {
        match self.dispatcher.power_on_if_needed(self.power_on).await {
            Ok(true) => info!("session {}: screen powered on", self.id),
            Ok(false) => {}
            Err(_) => return SessionOutcome::Clean(CloseReason::Cancelled),
        }

        loop {
            let received = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => {
                    return SessionOutcome::Clean(CloseReason::Cancelled);
                }
                received = self.channel.recv() => received,
            };

            let line = match received {
                Ok(Some(line)) => line,
                Ok(None) => return SessionOutcome::Clean(CloseReason::EndOfStream),
                Err(e) => return SessionOutcome::Fatal(e),
            };

            let response = match self.dispatcher.dispatch(&line).await {
                Ok(response) => response,
                Err(_) => return SessionOutcome::Clean(CloseReason::Cancelled),
            };
            debug!("session {}: {response}", self.id);

            if let Err(e) = self.channel.send(&response.to_string()).await {
                return SessionOutcome::Fatal(e);
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
