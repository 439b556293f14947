//! In-process transport backed by channels.

use std::sync::{Mutex, PoisonError};

use pocket_config::Endpoint;
use tokio::sync::mpsc::{Receiver, Sender, error::SendError};
use tracing::debug;

use super::{TRANSPORT_TARGET, Transport, TransportError, TransportSession};
use crate::wire::{WireMessage, bounded};

/// Transport that hands out a single pre-wired session.
///
/// The opposite channel ends are held by the paired [`MemoryPeer`], which
/// plays the role of the remote instrument.
#[derive(Debug)]
pub struct MemoryTransport {
    session: Mutex<Option<TransportSession>>,
}

/// Remote end of a [`MemoryTransport`] session.
#[derive(Debug)]
pub struct MemoryPeer {
    /// Frames delivered to the relay's inbound pipe.
    pub to_relay: Sender<WireMessage>,
    /// Frames written by the relay's outbound pipe.
    pub from_relay: Receiver<WireMessage>,
}

impl MemoryTransport {
    /// Builds a transport and the peer holding the other channel ends.
    ///
    /// Both directions are bounded by `capacity` (minimum one).
    #[must_use]
    pub fn pair(capacity: usize) -> (Self, MemoryPeer) {
        let (to_relay, inbound) = bounded(capacity);
        let (outbound, from_relay) = bounded(capacity);
        let transport = Self {
            session: Mutex::new(Some(TransportSession { inbound, outbound })),
        };
        (
            transport,
            MemoryPeer {
                to_relay,
                from_relay,
            },
        )
    }

    fn take_session(&self, endpoint: &Endpoint) -> Result<TransportSession, TransportError> {
        let session = self
            .session
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        debug!(
            target: TRANSPORT_TARGET,
            endpoint = %endpoint,
            available = session.is_some(),
            "memory transport connect"
        );
        session.ok_or(TransportError::Exhausted)
    }
}

impl Transport for MemoryTransport {
    fn connect(
        &self,
        endpoint: &Endpoint,
    ) -> impl Future<Output = Result<TransportSession, TransportError>> + Send {
        std::future::ready(self.take_session(endpoint))
    }
}

impl MemoryPeer {
    /// Sends a text frame to the relay.
    ///
    /// # Errors
    ///
    /// Fails when the relay has dropped its inbound channel.
    pub async fn send_text(&self, text: &str) -> Result<(), SendError<WireMessage>> {
        self.to_relay.send(WireMessage::text(text)).await
    }

    /// Receives the next frame written by the relay.
    pub async fn recv(&mut self) -> Option<WireMessage> {
        self.from_relay.recv().await
    }
}
