//! Test double for [`HealthReporter`] that records events for assertions.

use std::error::Error;
use std::sync::Mutex;

use pocket_config::Config;

use crate::bootstrap::BootstrapError;
use crate::health::HealthReporter;
use crate::pipe::{Direction, PipeReport};
use crate::relay::RelayState;

/// Structured health events tracked during scenarios.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthEvent {
    BootstrapStarting,
    BootstrapSucceeded,
    BootstrapFailed(String),
    State(RelayState),
    Dropped { direction: Direction, error: String },
    PipeFinished { direction: Direction, report: PipeReport },
}

/// Records health events for assertions.
#[derive(Debug, Default)]
pub struct RecordingHealthReporter {
    events: Mutex<Vec<HealthEvent>>,
}

impl RecordingHealthReporter {
    /// Captures a copy of the recorded events.
    pub fn events(&self) -> Vec<HealthEvent> {
        self.events
            .lock()
            .expect("health reporter mutex poisoned")
            .clone()
    }

    /// Returns the recorded state transitions in order.
    pub fn states(&self) -> Vec<RelayState> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                HealthEvent::State(state) => Some(state),
                _ => None,
            })
            .collect()
    }

    /// Returns the number of drops recorded for `direction`.
    pub fn drops(&self, direction: Direction) -> usize {
        self.events()
            .iter()
            .filter(|event| matches!(event, HealthEvent::Dropped { direction: d, .. } if *d == direction))
            .count()
    }

    fn record(&self, event: HealthEvent) {
        self.events
            .lock()
            .expect("health reporter mutex poisoned")
            .push(event);
    }
}

impl HealthReporter for RecordingHealthReporter {
    fn bootstrap_starting(&self) {
        self.record(HealthEvent::BootstrapStarting);
    }

    fn bootstrap_succeeded(&self, _config: &Config) {
        self.record(HealthEvent::BootstrapSucceeded);
    }

    fn bootstrap_failed(&self, error: &BootstrapError) {
        self.record(HealthEvent::BootstrapFailed(error.to_string()));
    }

    fn relay_state_changed(&self, state: RelayState) {
        self.record(HealthEvent::State(state));
    }

    fn message_dropped(&self, direction: Direction, error: &dyn Error) {
        self.record(HealthEvent::Dropped {
            direction,
            error: error.to_string(),
        });
    }

    fn pipe_finished(&self, direction: Direction, report: PipeReport) {
        self.record(HealthEvent::PipeFinished { direction, report });
    }
}

/// Records like [`RecordingHealthReporter`] but panics when a message is
/// dropped, standing in for a pipe task that dies mid-session.
#[derive(Debug, Default)]
pub struct PanickingHealthReporter {
    inner: RecordingHealthReporter,
}

impl PanickingHealthReporter {
    /// Returns the recorded state transitions in order.
    pub fn states(&self) -> Vec<RelayState> {
        self.inner.states()
    }
}

impl HealthReporter for PanickingHealthReporter {
    fn bootstrap_starting(&self) {
        self.inner.bootstrap_starting();
    }

    fn bootstrap_succeeded(&self, config: &Config) {
        self.inner.bootstrap_succeeded(config);
    }

    fn bootstrap_failed(&self, error: &BootstrapError) {
        self.inner.bootstrap_failed(error);
    }

    fn relay_state_changed(&self, state: RelayState) {
        self.inner.relay_state_changed(state);
    }

    fn message_dropped(&self, direction: Direction, error: &dyn Error) {
        panic!("{direction} pipe dropped a message: {error}");
    }

    fn pipe_finished(&self, direction: Direction, report: PipeReport) {
        self.inner.pipe_finished(direction, report);
    }
}
