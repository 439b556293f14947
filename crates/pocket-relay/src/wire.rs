//! Raw frames exchanged with a transport session.

use tokio::sync::mpsc;

/// Framing used for a wire message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameKind {
    /// UTF-8 text frame.
    Text,
    /// Binary frame.
    Binary,
}

/// One frame received from or destined for the peer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WireMessage {
    /// Framing used on the transport.
    pub kind: FrameKind,
    /// Frame payload.
    pub payload: Vec<u8>,
}

impl WireMessage {
    /// Builds a text frame.
    #[must_use]
    pub fn text(payload: impl Into<Vec<u8>>) -> Self {
        Self {
            kind: FrameKind::Text,
            payload: payload.into(),
        }
    }

    /// Builds a binary frame.
    #[must_use]
    pub fn binary(payload: impl Into<Vec<u8>>) -> Self {
        Self {
            kind: FrameKind::Binary,
            payload: payload.into(),
        }
    }

    /// Returns the payload as text when it is valid UTF-8.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        std::str::from_utf8(&self.payload).ok()
    }
}

/// Creates a bounded channel, treating a zero capacity as one.
pub(crate) fn bounded<T>(capacity: usize) -> (mpsc::Sender<T>, mpsc::Receiver<T>) {
    mpsc::channel(capacity.max(1))
}
