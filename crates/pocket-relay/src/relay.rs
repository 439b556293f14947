//! Orchestrates one relay session: connect, run both pipes, stop.

use std::fmt;
use std::sync::Arc;

use pocket_config::Endpoint;
use pocket_types::Command;
use thiserror::Error;
use tokio::sync::mpsc::{Receiver, Sender};
use tokio::sync::watch;
use tokio::task::{JoinError, JoinHandle};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::health::HealthReporter;
use crate::pipe::{Direction, PipeExit, PipeReport, inbound, outbound};
use crate::transport::{Transport, TransportError, TransportSession};
use crate::wire::bounded;

const RELAY_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::relay");

/// Lifecycle of a relay run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayState {
    /// Waiting for the transport to hand out a session.
    Connecting,
    /// Both pipes are running.
    Relaying,
    /// The run has finished; no pipe is running.
    Stopped,
}

impl fmt::Display for RelayState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Connecting => "connecting",
            Self::Relaying => "relaying",
            Self::Stopped => "stopped",
        })
    }
}

/// Why a relay run returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The caller's cancellation token fired.
    Cancelled,
    /// The transport session ended.
    SessionClosed,
    /// The application dropped its receiving end.
    ApplicationClosed,
}

/// Errors that end a relay run.
#[derive(Debug, Error)]
pub enum RelayError {
    /// The transport could not provide a session.
    #[error("failed to connect to {endpoint}: {source}")]
    Connect {
        /// Endpoint that was requested.
        endpoint: String,
        /// Underlying transport error.
        #[source]
        source: TransportError,
    },
    /// A pipe task panicked or was aborted.
    #[error("{direction} pipe task failed: {source}")]
    Pipe {
        /// Direction of the failed pipe.
        direction: Direction,
        /// Join failure reported by the runtime.
        #[source]
        source: JoinError,
    },
}

/// Application side of the relay channels.
#[derive(Debug)]
pub struct ApplicationEnds {
    /// Commands to send to the peer.
    pub to_peer: Sender<Command>,
    /// Commands received from the peer.
    pub from_peer: Receiver<Command>,
}

/// Relay side of the application channels, consumed by [`Relay::run`].
#[derive(Debug)]
pub struct ApplicationChannels {
    /// Commands the outbound pipe encodes for the peer.
    pub to_peer: Receiver<Command>,
    /// Destination for commands decoded by the inbound pipe.
    pub from_peer: Sender<Command>,
}

/// Builds the channel pair connecting an application to a relay.
///
/// Each direction is bounded by `capacity` (minimum one).
#[must_use]
pub fn application_channels(capacity: usize) -> (ApplicationEnds, ApplicationChannels) {
    let (to_peer_tx, to_peer_rx) = bounded(capacity);
    let (from_peer_tx, from_peer_rx) = bounded(capacity);
    (
        ApplicationEnds {
            to_peer: to_peer_tx,
            from_peer: from_peer_rx,
        },
        ApplicationChannels {
            to_peer: to_peer_rx,
            from_peer: from_peer_tx,
        },
    )
}

/// Bidirectional relay between a transport and typed application channels.
pub struct Relay<T> {
    transport: T,
    reporter: Arc<dyn HealthReporter>,
    state: watch::Sender<RelayState>,
}

impl<T> Relay<T>
where
    T: Transport,
{
    /// Creates a relay over `transport`.
    pub fn new(transport: T, reporter: Arc<dyn HealthReporter>) -> Self {
        let (state, _) = watch::channel(RelayState::Stopped);
        Self {
            transport,
            reporter,
            state,
        }
    }

    /// Subscribes to state transitions.
    #[must_use]
    pub fn state(&self) -> watch::Receiver<RelayState> {
        self.state.subscribe()
    }

    /// Runs one session until cancelled or until the session ends.
    ///
    /// Both pipes run under a child of `cancel`. When the transport's
    /// inbound channel closes, the remaining pipe is cancelled and
    /// [`StopReason::SessionClosed`] is returned so the caller can decide
    /// whether to connect again. Both pipes have exited when this returns.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::Connect`] when the transport refuses a session
    /// and [`RelayError::Pipe`] when a pipe task fails.
    pub async fn run(
        &self,
        endpoint: &Endpoint,
        app: ApplicationChannels,
        cancel: CancellationToken,
    ) -> Result<StopReason, RelayError> {
        self.transition(RelayState::Connecting);
        let connected = tokio::select! {
            biased;
            () = cancel.cancelled() => None,
            connected = self.transport.connect(endpoint) => Some(connected),
        };
        let session = match connected {
            Some(Ok(session)) => session,
            Some(Err(source)) => {
                self.transition(RelayState::Stopped);
                warn!(
                    target: RELAY_TARGET,
                    endpoint = %endpoint,
                    error = %source,
                    "transport refused session"
                );
                return Err(RelayError::Connect {
                    endpoint: endpoint.to_string(),
                    source,
                });
            }
            None => {
                self.transition(RelayState::Stopped);
                return Ok(StopReason::Cancelled);
            }
        };

        let scope = cancel.child_token();
        let (inbound_task, outbound_task) = self.spawn_pipes(session, app, &scope);
        self.transition(RelayState::Relaying);
        info!(target: RELAY_TARGET, endpoint = %endpoint, "relaying");

        scope.cancelled().await;
        let (inbound_joined, outbound_joined) = tokio::join!(inbound_task, outbound_task);
        self.transition(RelayState::Stopped);

        let inbound_report = self.finish(Direction::Inbound, inbound_joined)?;
        self.finish(Direction::Outbound, outbound_joined)?;

        let reason = if cancel.is_cancelled() {
            StopReason::Cancelled
        } else if inbound_report.exit == PipeExit::OutputClosed {
            StopReason::ApplicationClosed
        } else {
            StopReason::SessionClosed
        };
        info!(target: RELAY_TARGET, endpoint = %endpoint, reason = ?reason, "relay stopped");
        Ok(reason)
    }

    fn spawn_pipes(
        &self,
        session: TransportSession,
        app: ApplicationChannels,
        scope: &CancellationToken,
    ) -> (JoinHandle<PipeReport>, JoinHandle<PipeReport>) {
        let TransportSession {
            inbound: wire_in,
            outbound: wire_out,
        } = session;
        let ApplicationChannels { to_peer, from_peer } = app;

        let inbound_task = tokio::spawn({
            let reporter = Arc::clone(&self.reporter);
            let token = scope.clone();
            async move {
                // Any exit, a panic included, ends the session.
                let _session = token.clone().drop_guard();
                inbound::run(wire_in, from_peer, token, &*reporter).await
            }
        });
        let outbound_task = tokio::spawn({
            let reporter = Arc::clone(&self.reporter);
            let token = scope.clone();
            async move {
                // Disarmed on return so only a panic cancels through the guard.
                let session = token.clone().drop_guard();
                let report = outbound::run(to_peer, wire_out, token, &*reporter).await;
                let scope = session.disarm();
                // The application may stop sending and keep receiving.
                if report.exit == PipeExit::OutputClosed {
                    scope.cancel();
                }
                report
            }
        });
        (inbound_task, outbound_task)
    }

    fn finish(
        &self,
        direction: Direction,
        joined: Result<PipeReport, JoinError>,
    ) -> Result<PipeReport, RelayError> {
        let report = joined.map_err(|source| RelayError::Pipe { direction, source })?;
        self.reporter.pipe_finished(direction, report);
        Ok(report)
    }

    fn transition(&self, state: RelayState) {
        self.state.send_replace(state);
        self.reporter.relay_state_changed(state);
    }
}
