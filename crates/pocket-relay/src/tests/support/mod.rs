//! Shared harness utilities for the relay behaviour suites.

mod config_loader;
mod reporter;

use std::time::Duration;

use pocket_config::Endpoint;

pub use config_loader::{FailingConfigLoader, ZeroCapacityConfigLoader};
pub use reporter::{HealthEvent, PanickingHealthReporter, RecordingHealthReporter};

/// Upper bound on any wait that is expected to complete.
pub const SETTLE: Duration = Duration::from_secs(2);

/// Window in which no output is expected.
pub const QUIET: Duration = Duration::from_millis(100);

/// Endpoint used by in-memory sessions.
pub fn memory_endpoint() -> Endpoint {
    "ws://relay.test/ws".parse().expect("test endpoint must parse")
}
