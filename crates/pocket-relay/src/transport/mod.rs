//! Transport sessions feeding the relay pipes.
//!
//! A [`Transport`] turns an [`Endpoint`] into a [`TransportSession`]: one
//! live connection exposed as an inbound and an outbound channel of
//! [`WireMessage`]s. The relay only ever touches those two channels; the
//! session ends when either side drops its end.

mod errors;
mod memory;
mod websocket;

use std::future::Future;

use pocket_config::Endpoint;
use tokio::sync::mpsc::{Receiver, Sender};

use crate::wire::WireMessage;

pub use self::errors::TransportError;
pub use self::memory::{MemoryPeer, MemoryTransport};
pub use self::websocket::WebSocketTransport;

const TRANSPORT_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::transport");

/// One live connection to the peer.
#[derive(Debug)]
pub struct TransportSession {
    /// Frames received from the peer. Closes when the connection ends.
    pub inbound: Receiver<WireMessage>,
    /// Frames to send to the peer.
    pub outbound: Sender<WireMessage>,
}

/// Source of transport sessions.
pub trait Transport: Send + Sync {
    /// Opens a session to `endpoint`.
    ///
    /// # Errors
    ///
    /// Returns a [`TransportError`] when no session can be established.
    fn connect(
        &self,
        endpoint: &Endpoint,
    ) -> impl Future<Output = Result<TransportSession, TransportError>> + Send;
}
