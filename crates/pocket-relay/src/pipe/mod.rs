//! Translation pipes between wire frames and typed commands.
//!
//! Each pipe is one direction of the relay. A pipe reads from its input
//! channel, translates, and writes to its output channel until cancelled or
//! until either channel closes. Messages that fail to translate are logged,
//! reported to the [`HealthReporter`](crate::HealthReporter) and dropped; the
//! pipe keeps running.
//!
//! Every suspension point races the channel operation against cancellation,
//! with cancellation polled first.

pub mod inbound;
pub mod outbound;

use std::fmt;

use tokio::sync::mpsc::{Receiver, Sender};
use tokio_util::sync::CancellationToken;

pub(crate) const PIPE_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::pipe");

/// Direction a pipe translates in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Peer to application.
    Inbound,
    /// Application to peer.
    Outbound,
}

impl Direction {
    /// Returns a stable lowercase name for logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Inbound => "inbound",
            Self::Outbound => "outbound",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a pipe stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipeExit {
    /// The cancellation token fired.
    Cancelled,
    /// The input channel closed.
    InputClosed,
    /// The output channel closed.
    OutputClosed,
}

/// Message counters kept by a pipe.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipeStats {
    /// Messages translated and delivered.
    pub forwarded: u64,
    /// Messages that failed to translate.
    pub dropped: u64,
}

/// Final state of a pipe run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipeReport {
    /// Why the pipe stopped.
    pub exit: PipeExit,
    /// Counters at exit.
    pub stats: PipeStats,
}

/// Waits for the next input item or cancellation.
async fn next_input<T>(input: &mut Receiver<T>, cancel: &CancellationToken) -> Result<T, PipeExit> {
    tokio::select! {
        biased;
        () = cancel.cancelled() => Err(PipeExit::Cancelled),
        item = input.recv() => item.ok_or(PipeExit::InputClosed),
    }
}

/// Delivers one item unless cancelled first.
async fn deliver<T>(output: &Sender<T>, item: T, cancel: &CancellationToken) -> Result<(), PipeExit> {
    tokio::select! {
        biased;
        () = cancel.cancelled() => Err(PipeExit::Cancelled),
        sent = output.send(item) => sent.map_err(|_| PipeExit::OutputClosed),
    }
}
