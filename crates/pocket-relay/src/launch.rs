//! Process-level wiring used by the `pocket-relay` binary.

use std::io;
use std::sync::Arc;

use thiserror::Error;
use tokio::runtime::Builder;
use tokio::sync::mpsc::Receiver;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use pocket_config::Config;
use pocket_types::Command;

use crate::bootstrap::{BootstrapError, ConfigLoader, SystemConfigLoader, bootstrap_with};
use crate::health::{HealthReporter, StructuredHealthReporter};
use crate::relay::{Relay, RelayError, StopReason, application_channels};
use crate::transport::WebSocketTransport;

const LAUNCH_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::launch");

/// Errors surfaced while launching the relay process.
#[derive(Debug, Error)]
pub enum LaunchError {
    /// Bootstrap failed.
    #[error(transparent)]
    Bootstrap(#[from] BootstrapError),
    /// The async runtime could not be built.
    #[error("failed to build async runtime: {source}")]
    Runtime {
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },
    /// The relay stopped with an error.
    #[error(transparent)]
    Relay(#[from] RelayError),
}

/// Runs the relay using the production collaborators.
///
/// # Errors
///
/// Returns a [`LaunchError`] when bootstrap, runtime construction or the
/// relay session fails.
pub fn run_relay() -> Result<StopReason, LaunchError> {
    let reporter: Arc<dyn HealthReporter> = Arc::new(StructuredHealthReporter::new());
    run_relay_with(&SystemConfigLoader, reporter)
}

/// Runs the relay with injected collaborators until Ctrl-C or session end.
///
/// # Errors
///
/// See [`run_relay`].
pub fn run_relay_with(
    loader: &dyn ConfigLoader,
    reporter: Arc<dyn HealthReporter>,
) -> Result<StopReason, LaunchError> {
    let config = bootstrap_with(loader, &*reporter)?.into_config();
    let runtime = Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|source| LaunchError::Runtime { source })?;
    let reason = runtime.block_on(serve(config, reporter))?;
    Ok(reason)
}

async fn serve(config: Config, reporter: Arc<dyn HealthReporter>) -> Result<StopReason, RelayError> {
    let cancel = CancellationToken::new();
    tokio::spawn(cancel_on_interrupt(cancel.clone()));

    let (ends, app) = application_channels(config.channel_capacity());
    let consumer = tokio::spawn(log_commands(ends.from_peer));
    // Held for the whole session so the outbound pipe stays open.
    let _to_peer = ends.to_peer;

    let relay = Relay::new(WebSocketTransport::new(config.channel_capacity()), reporter);
    let result = relay.run(config.endpoint(), app, cancel).await;
    if let Err(error) = consumer.await {
        warn!(target: LAUNCH_TARGET, error = %error, "command logger failed");
    }
    result
}

async fn cancel_on_interrupt(cancel: CancellationToken) {
    match tokio::signal::ctrl_c().await {
        Ok(()) => {
            info!(target: LAUNCH_TARGET, "interrupt received, stopping relay");
            cancel.cancel();
        }
        Err(error) => {
            warn!(target: LAUNCH_TARGET, error = %error, "failed to listen for interrupt");
        }
    }
}

async fn log_commands(mut from_peer: Receiver<Command>) {
    while let Some(command) = from_peer.recv().await {
        let envelope = command.envelope();
        info!(
            target: LAUNCH_TARGET,
            tag = command.tag(),
            id = %envelope.id,
            t = envelope.t,
            command = ?command,
            "received command"
        );
    }
}
