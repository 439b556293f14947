//! Command registry mapping protocol tags to variant decoders.
//!
//! The registry is the only place a command variant is introduced to the
//! wire. Each [`CommandEntry`] pairs a tag with the decoder for its variant and
//! a constructor for the variant's zero value. Lookups are pure.
//!
//! Decoding a wire payload is split in two phases: [`crate::sniff_tag`]
//! extracts the `cmd` field, then [`resolve`] selects the entry whose
//! [`CommandEntry::decode`] parses the full payload.

use serde::de::DeserializeOwned;

use crate::command::{Command, FrequencyRangeQuery, SingleQuery};
use crate::errors::DecodeError;

/// Decode and default behaviour for one command variant.
#[derive(Debug)]
pub struct CommandEntry {
    tag: &'static str,
    decode: fn(&[u8]) -> Result<Command, serde_json::Error>,
    zero: fn() -> Command,
}

impl CommandEntry {
    /// Protocol tag handled by this entry.
    #[must_use]
    pub const fn tag(&self) -> &'static str {
        self.tag
    }

    /// Decodes a full payload into this entry's variant.
    ///
    /// Fields absent from the payload take their zero values; unknown fields
    /// are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::Shape`] when the payload does not fit the
    /// variant.
    pub fn decode(&self, payload: &[u8]) -> Result<Command, DecodeError> {
        (self.decode)(payload).map_err(|source| DecodeError::shape(self.tag, source))
    }

    /// Returns the zero value of this entry's variant, tagged.
    #[must_use]
    pub fn zero(&self) -> Command {
        (self.zero)()
    }
}

/// Supported commands. Tags must be unique.
const COMMANDS: &[CommandEntry] = &[
    CommandEntry {
        tag: FrequencyRangeQuery::TAG,
        decode: decode_variant::<FrequencyRangeQuery>,
        zero: || Command::FrequencyRange(FrequencyRangeQuery::new(Default::default())),
    },
    CommandEntry {
        tag: SingleQuery::TAG,
        decode: decode_variant::<SingleQuery>,
        zero: || Command::SingleQuery(SingleQuery::new(0, 0, Default::default())),
    },
];

fn decode_variant<T>(payload: &[u8]) -> Result<Command, serde_json::Error>
where
    T: DeserializeOwned + Into<Command>,
{
    serde_json::from_slice::<T>(payload).map(Into::into)
}

/// Looks up the entry registered for `tag`.
#[must_use]
pub fn resolve(tag: &str) -> Option<&'static CommandEntry> {
    COMMANDS.iter().find(|entry| entry.tag == tag)
}

/// Looks up the entry registered for `tag`, failing for unknown tags.
///
/// # Errors
///
/// Returns [`DecodeError::UnknownTag`] when no entry matches.
pub fn require(tag: &str) -> Result<&'static CommandEntry, DecodeError> {
    resolve(tag).ok_or_else(|| DecodeError::unknown_tag(tag))
}

/// Iterates over every registered tag.
pub fn tags() -> impl Iterator<Item = &'static str> {
    COMMANDS.iter().map(CommandEntry::tag)
}
