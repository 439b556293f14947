//! Error types for transport sessions.

use thiserror::Error;
use tokio_tungstenite::tungstenite;

/// Errors surfaced while establishing a transport session.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The WebSocket handshake failed.
    #[error("failed to open websocket to {endpoint}: {source}")]
    WebSocket {
        /// Endpoint that was dialled.
        endpoint: String,
        /// Underlying protocol or IO error.
        #[source]
        source: Box<tungstenite::Error>,
    },
    /// The transport has no further sessions to hand out.
    #[error("transport has no session available")]
    Exhausted,
}

impl TransportError {
    pub(crate) fn websocket(endpoint: impl Into<String>, source: tungstenite::Error) -> Self {
        Self::WebSocket {
            endpoint: endpoint.into(),
            source: Box::new(source),
        }
    }
}
