//! Structured health reporting for relay lifecycle events.

use std::error::Error;
use std::sync::Arc;

use pocket_config::Config;

use crate::bootstrap::BootstrapError;
use crate::pipe::{Direction, PipeReport};
use crate::relay::RelayState;

const HEALTH_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::health");

/// Observer trait used to surface lifecycle events to telemetry sinks.
pub trait HealthReporter: Send + Sync {
    /// Invoked before configuration loading begins.
    fn bootstrap_starting(&self);

    /// Invoked after bootstrap completes successfully.
    fn bootstrap_succeeded(&self, config: &Config);

    /// Invoked when bootstrap fails.
    fn bootstrap_failed(&self, error: &BootstrapError);

    /// Invoked on every relay state transition.
    fn relay_state_changed(&self, state: RelayState);

    /// Invoked when a pipe drops a message it could not translate.
    fn message_dropped(&self, direction: Direction, error: &dyn Error);

    /// Invoked once per pipe when a session ends.
    fn pipe_finished(&self, direction: Direction, report: PipeReport);
}

impl<T> HealthReporter for Arc<T>
where
    T: HealthReporter + ?Sized,
{
    fn bootstrap_starting(&self) {
        (**self).bootstrap_starting();
    }

    fn bootstrap_succeeded(&self, config: &Config) {
        (**self).bootstrap_succeeded(config);
    }

    fn bootstrap_failed(&self, error: &BootstrapError) {
        (**self).bootstrap_failed(error);
    }

    fn relay_state_changed(&self, state: RelayState) {
        (**self).relay_state_changed(state);
    }

    fn message_dropped(&self, direction: Direction, error: &dyn Error) {
        (**self).message_dropped(direction, error);
    }

    fn pipe_finished(&self, direction: Direction, report: PipeReport) {
        (**self).pipe_finished(direction, report);
    }
}

/// Default reporter that records lifecycle events using `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct StructuredHealthReporter;

impl StructuredHealthReporter {
    /// Builds a new reporter.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl HealthReporter for StructuredHealthReporter {
    fn bootstrap_starting(&self) {
        tracing::info!(
            target: HEALTH_TARGET,
            event = "bootstrap_starting",
            "starting relay bootstrap"
        );
    }

    fn bootstrap_succeeded(&self, config: &Config) {
        tracing::info!(
            target: HEALTH_TARGET,
            event = "bootstrap_succeeded",
            endpoint = %config.endpoint(),
            log_filter = %config.log_filter(),
            log_format = %config.log_format(),
            channel_capacity = config.channel_capacity(),
            "relay bootstrap completed"
        );
    }

    fn bootstrap_failed(&self, error: &BootstrapError) {
        tracing::error!(
            target: HEALTH_TARGET,
            event = "bootstrap_failed",
            error = %error,
            "relay bootstrap failed"
        );
    }

    fn relay_state_changed(&self, state: RelayState) {
        tracing::info!(
            target: HEALTH_TARGET,
            event = "relay_state_changed",
            state = %state,
            "relay state changed"
        );
    }

    fn message_dropped(&self, direction: Direction, error: &dyn Error) {
        tracing::warn!(
            target: HEALTH_TARGET,
            event = "message_dropped",
            direction = %direction,
            error = %error,
            "message dropped"
        );
    }

    fn pipe_finished(&self, direction: Direction, report: PipeReport) {
        tracing::info!(
            target: HEALTH_TARGET,
            event = "pipe_finished",
            direction = %direction,
            exit = ?report.exit,
            forwarded = report.stats.forwarded,
            dropped = report.stats.dropped,
            "pipe finished"
        );
    }
}
