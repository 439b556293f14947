use crate::endpoint::Endpoint;
use crate::logging::LogFormat;

/// Endpoint the relay dials when none is configured.
pub const DEFAULT_ENDPOINT: &str = "ws://127.0.0.1:8888/ws";

/// Default log filter expression used by the binary.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Default bound on each relay channel.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1;

/// Default endpoint of the instrument peer.
#[must_use]
pub fn default_endpoint() -> Endpoint {
    Endpoint::default()
}

/// Owned log filter value used where allocation is required (e.g. serde).
#[must_use]
pub fn default_log_filter_string() -> String {
    DEFAULT_LOG_FILTER.to_string()
}

/// Default logging format for the binary.
#[must_use]
pub fn default_log_format() -> LogFormat {
    LogFormat::Json
}

/// Default relay channel capacity.
#[must_use]
pub fn default_channel_capacity() -> usize {
    DEFAULT_CHANNEL_CAPACITY
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_endpoint_is_plain_websocket() {
        assert_eq!(default_endpoint().as_str(), DEFAULT_ENDPOINT);
        assert!(!default_endpoint().is_secure());
    }
}
