//! WebSocket transport built on `tokio-tungstenite`.
//!
//! Each [`connect`](Transport::connect) performs one handshake and spawns two
//! pump tasks: a reader forwarding data frames to the session's inbound
//! channel and a writer draining the outbound channel into the socket. There
//! are no retries; a failed handshake is returned to the caller and a dropped
//! connection closes the inbound channel.

use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use pocket_config::{DEFAULT_CHANNEL_CAPACITY, Endpoint};
use tokio::net::TcpStream;
use tokio::sync::mpsc::{Receiver, Sender};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::{debug, info, warn};

use super::{TRANSPORT_TARGET, Transport, TransportError, TransportSession};
use crate::wire::{FrameKind, WireMessage, bounded};

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Transport dialling a WebSocket endpoint once per session.
#[derive(Debug, Clone, Copy)]
pub struct WebSocketTransport {
    capacity: usize,
}

impl WebSocketTransport {
    /// Builds a transport whose session channels hold `capacity` frames.
    #[must_use]
    pub const fn new(capacity: usize) -> Self {
        Self { capacity }
    }

    /// Returns the session channel capacity.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for WebSocketTransport {
    fn default() -> Self {
        Self::new(DEFAULT_CHANNEL_CAPACITY)
    }
}

impl Transport for WebSocketTransport {
    async fn connect(&self, endpoint: &Endpoint) -> Result<TransportSession, TransportError> {
        let (socket, response) = connect_async(endpoint.as_str())
            .await
            .map_err(|source| TransportError::websocket(endpoint.as_str(), source))?;
        info!(
            target: TRANSPORT_TARGET,
            endpoint = %endpoint,
            status = %response.status(),
            "websocket connected"
        );
        Ok(spawn_pumps(socket, self.capacity))
    }
}

fn spawn_pumps(socket: Socket, capacity: usize) -> TransportSession {
    let (sink, stream) = socket.split();
    let (inbound_tx, inbound) = bounded(capacity);
    let (outbound, outbound_rx) = bounded(capacity);
    tokio::spawn(read_pump(stream, inbound_tx));
    tokio::spawn(write_pump(sink, outbound_rx));
    TransportSession { inbound, outbound }
}

async fn read_pump(mut stream: SplitStream<Socket>, inbound: Sender<WireMessage>) {
    loop {
        let frame = tokio::select! {
            biased;
            () = inbound.closed() => break,
            frame = stream.next() => frame,
        };
        let message = match frame {
            Some(Ok(Message::Text(text))) => WireMessage::text(text),
            Some(Ok(Message::Binary(bytes))) => WireMessage::binary(bytes),
            Some(Ok(Message::Close(close))) => {
                debug!(target: TRANSPORT_TARGET, frame = ?close, "peer closed websocket");
                break;
            }
            Some(Ok(_)) => continue,
            Some(Err(error)) => {
                warn!(target: TRANSPORT_TARGET, error = %error, "websocket read failed");
                break;
            }
            None => break,
        };
        if inbound.send(message).await.is_err() {
            break;
        }
    }
    debug!(target: TRANSPORT_TARGET, "websocket reader stopped");
}

async fn write_pump(mut sink: SplitSink<Socket, Message>, mut outbound: Receiver<WireMessage>) {
    while let Some(message) = outbound.recv().await {
        if let Err(error) = sink.send(into_frame(message)).await {
            warn!(target: TRANSPORT_TARGET, error = %error, "websocket write failed");
            return;
        }
    }
    if let Err(error) = sink.close().await {
        debug!(target: TRANSPORT_TARGET, error = %error, "websocket close failed");
    }
    debug!(target: TRANSPORT_TARGET, "websocket writer stopped");
}

fn into_frame(message: WireMessage) -> Message {
    match message.kind {
        FrameKind::Binary => Message::Binary(message.payload),
        FrameKind::Text => match String::from_utf8(message.payload) {
            Ok(text) => Message::Text(text),
            Err(error) => Message::Binary(error.into_bytes()),
        },
    }
}
