//! Configuration for the Pocket relay.
//!
//! Values are layered by `ortho_config`: built-in defaults, then a TOML file
//! named by `--config-path` (or `POCKET_CONFIG_PATH`), then `POCKET_*`
//! environment variables, then command-line flags.

mod defaults;
mod endpoint;
mod logging;

use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

pub use defaults::{
    DEFAULT_CHANNEL_CAPACITY, DEFAULT_ENDPOINT, DEFAULT_LOG_FILTER, default_channel_capacity,
    default_endpoint, default_log_filter_string, default_log_format,
};
pub use endpoint::{Endpoint, EndpointParseError};
pub use logging::{LogFormat, LogFormatParseError};

/// Relay configuration shared by the binary and its tests.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, OrthoConfig)]
#[ortho_config(prefix = "POCKET")]
pub struct Config {
    /// WebSocket endpoint of the instrument peer.
    #[serde(default = "default_endpoint")]
    #[ortho_config(default = default_endpoint())]
    pub endpoint: Endpoint,
    /// Filter expression passed to the tracing subscriber.
    #[serde(default = "default_log_filter_string")]
    #[ortho_config(default = default_log_filter_string())]
    pub log_filter: String,
    /// Output format for log events.
    #[serde(default = "default_log_format")]
    #[ortho_config(default = default_log_format())]
    pub log_format: LogFormat,
    /// Bound on each relay channel. Zero is rejected at startup.
    #[serde(default = "default_channel_capacity")]
    #[ortho_config(default = default_channel_capacity())]
    pub channel_capacity: usize,
}

impl Config {
    /// Returns the configured endpoint.
    #[must_use]
    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Returns the configured log filter.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        &self.log_filter
    }

    /// Returns the configured log format.
    #[must_use]
    pub fn log_format(&self) -> LogFormat {
        self.log_format
    }

    /// Returns the configured channel capacity.
    #[must_use]
    pub fn channel_capacity(&self) -> usize {
        self.channel_capacity
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            log_filter: default_log_filter_string(),
            log_format: default_log_format(),
            channel_capacity: default_channel_capacity(),
        }
    }
}
