use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::defaults::DEFAULT_ENDPOINT;

/// WebSocket endpoint of the instrument peer.
///
/// Only `ws://` and `wss://` URLs with a host are accepted. The URL is kept in
/// the normalised form produced by [`Url`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(try_from = "String", into = "String")]
pub struct Endpoint {
    text: String,
    secure: bool,
}

impl Endpoint {
    /// Returns the endpoint as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Reports whether the endpoint uses TLS (`wss://`).
    #[must_use]
    pub const fn is_secure(&self) -> bool {
        self.secure
    }
}

impl Default for Endpoint {
    fn default() -> Self {
        Self {
            text: DEFAULT_ENDPOINT.to_owned(),
            secure: false,
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.text)
    }
}

impl FromStr for Endpoint {
    type Err = EndpointParseError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let url = Url::parse(input.trim())?;
        let secure = match url.scheme() {
            "ws" => false,
            "wss" => true,
            other => return Err(EndpointParseError::UnsupportedScheme(other.to_string())),
        };
        if url.host_str().is_none_or(str::is_empty) {
            return Err(EndpointParseError::MissingHost(input.to_string()));
        }
        Ok(Self {
            text: url.into(),
            secure,
        })
    }
}

impl TryFrom<String> for Endpoint {
    type Error = EndpointParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Endpoint> for String {
    fn from(endpoint: Endpoint) -> Self {
        endpoint.text
    }
}

/// Errors encountered while parsing an [`Endpoint`] from text.
#[derive(Debug, Error)]
pub enum EndpointParseError {
    /// Scheme was not `ws` or `wss`.
    #[error("unsupported endpoint scheme '{0}'; expected ws or wss")]
    UnsupportedScheme(String),
    /// Host name was missing.
    #[error("missing host in '{0}'")]
    MissingHost(String),
    /// URL failed to parse.
    #[error(transparent)]
    Url(#[from] url::ParseError),
}
