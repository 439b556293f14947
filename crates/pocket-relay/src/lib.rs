//! Bidirectional relay between WebSocket frames and typed Pocket commands.
//!
//! The relay sits between a transport session and application code. The
//! [`inbound`](pipe::inbound) pipe decodes wire frames into
//! [`Command`](pocket_types::Command) values and the
//! [`outbound`](pipe::outbound) pipe encodes commands back into text frames.
//! [`Relay`] obtains a session from a [`Transport`], runs both pipes under a
//! shared cancellation token and reports its progress through a
//! [`HealthReporter`].
//!
//! Malformed or unknown messages never stop a pipe: they are logged,
//! reported and dropped. Each channel is bounded, so a slow consumer slows
//! its producer down rather than buffering without limit.
//!
//! The `pocket-relay` binary wires the relay to a [`WebSocketTransport`]
//! using configuration loaded by [`pocket_config`].

mod bootstrap;
mod health;
mod launch;
pub mod pipe;
mod relay;
mod telemetry;
pub mod transport;
mod wire;

pub use bootstrap::{
    BootstrapError, Bootstrapped, ConfigLoader, StaticConfigLoader, SystemConfigLoader,
    bootstrap_with,
};
pub use health::{HealthReporter, StructuredHealthReporter};
pub use launch::{LaunchError, run_relay, run_relay_with};
pub use pipe::{Direction, PipeExit, PipeReport, PipeStats};
pub use relay::{
    ApplicationChannels, ApplicationEnds, Relay, RelayError, RelayState, StopReason,
    application_channels,
};
pub use telemetry::TelemetryError;
pub use transport::{
    MemoryPeer, MemoryTransport, Transport, TransportError, TransportSession, WebSocketTransport,
};
pub use wire::{FrameKind, WireMessage};

#[cfg(test)]
mod tests;
