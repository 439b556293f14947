//! Envelope fields shared by every command variant.

use serde::{Deserialize, Serialize};

use crate::errors::DecodeError;

/// Common header carried by every wire message.
///
/// All three fields are always emitted when encoding, even when they hold
/// their zero values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Envelope {
    /// Session or client identifier.
    #[serde(deserialize_with = "crate::nullable::null_as_default")]
    pub id: String,
    /// Timestamp supplied by the producer.
    #[serde(deserialize_with = "crate::nullable::null_as_default")]
    pub t: i64,
    /// Command tag selecting the variant.
    #[serde(rename = "cmd", deserialize_with = "crate::nullable::null_as_default")]
    pub command: String,
}

impl Envelope {
    /// Builds an envelope carrying only the given command tag.
    #[must_use]
    pub fn tagged(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            ..Self::default()
        }
    }
}

/// Envelope-only view used by the first decode phase.
#[derive(Deserialize)]
struct TagSniff {
    #[serde(default)]
    cmd: Option<String>,
}

/// Extracts the `cmd` tag from a payload without committing to a variant.
///
/// Only the envelope is inspected; every other field is skipped.
///
/// # Errors
///
/// Returns [`DecodeError::Malformed`] when the payload is not a JSON object or
/// `cmd` is not a string, and [`DecodeError::MissingTag`] when `cmd` is absent
/// or blank.
pub fn sniff_tag(payload: &[u8]) -> Result<String, DecodeError> {
    let sniff: TagSniff = serde_json::from_slice(payload).map_err(DecodeError::from_json_error)?;
    match sniff.cmd {
        Some(tag) if !tag.trim().is_empty() => Ok(tag),
        _ => Err(DecodeError::MissingTag),
    }
}
