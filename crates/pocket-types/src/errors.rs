//! Error types for command encoding and decoding.
//!
//! Encoding and decoding failures are per-message: the relay pipes log them
//! and drop the offending value. Each variant identifies one failure mode so
//! logs stay actionable.

use thiserror::Error;

/// Errors surfaced while decoding a wire payload into a [`crate::Command`].
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The payload is not a JSON object with a string `cmd` field.
    #[error("malformed message: {message}")]
    Malformed {
        /// Human-readable description of the failure.
        message: String,
        /// Underlying parser error, when one exists.
        #[source]
        source: Option<serde_json::Error>,
    },

    /// The envelope has no `cmd` field, or the field is empty.
    #[error("message carries no command tag")]
    MissingTag,

    /// The `cmd` value is not present in the command registry.
    #[error("unknown command tag '{tag}'")]
    UnknownTag {
        /// The unrecognised tag.
        tag: String,
    },

    /// The tag is known but the payload does not fit the variant's shape.
    #[error("payload does not match command '{tag}': {source}")]
    Shape {
        /// Tag of the variant selected by the registry.
        tag: &'static str,
        /// Underlying parser error.
        #[source]
        source: serde_json::Error,
    },
}

impl DecodeError {
    /// Creates a malformed-message error from a serde error.
    #[must_use]
    pub fn from_json_error(source: serde_json::Error) -> Self {
        Self::Malformed {
            message: source.to_string(),
            source: Some(source),
        }
    }

    /// Creates a malformed-message error with a custom message.
    #[must_use]
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed {
            message: message.into(),
            source: None,
        }
    }

    /// Creates an unknown-tag error.
    #[must_use]
    pub fn unknown_tag(tag: impl Into<String>) -> Self {
        Self::UnknownTag { tag: tag.into() }
    }

    /// Creates a shape-mismatch error for the given variant tag.
    #[must_use]
    pub const fn shape(tag: &'static str, source: serde_json::Error) -> Self {
        Self::Shape { tag, source }
    }
}

/// Errors surfaced while encoding a [`crate::Command`] for the wire.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// The value's envelope names a different command than its variant.
    #[error("envelope tag '{found}' does not match command '{expected}'")]
    TagMismatch {
        /// Registry tag of the value's variant.
        expected: &'static str,
        /// Tag found in the value's envelope.
        found: String,
    },

    /// The JSON serializer rejected the value (for example a non-finite
    /// float).
    #[error("failed to serialize command: {0}")]
    Json(#[from] serde_json::Error),
}

impl EncodeError {
    /// Creates a tag-mismatch error.
    #[must_use]
    pub fn tag_mismatch(expected: &'static str, found: impl Into<String>) -> Self {
        Self::TagMismatch {
            expected,
            found: found.into(),
        }
    }
}
