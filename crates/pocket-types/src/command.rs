//! Command variants and their canonical wire encoding.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::envelope::Envelope;
use crate::errors::EncodeError;
use crate::measurement::{Range, SParam, SParamSelect};

/// Query for the frequency range the instrument can reasonably sweep.
///
/// Encodes as `{"id":..,"t":..,"cmd":"rr","range":{"Start":..,"End":..}}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrequencyRangeQuery {
    /// Common envelope.
    #[serde(flatten)]
    pub envelope: Envelope,
    /// Range reported by the instrument.
    #[serde(rename = "range", default, deserialize_with = "crate::nullable::null_as_default")]
    pub result: Range,
}

impl FrequencyRangeQuery {
    /// Registry tag of this variant.
    pub const TAG: &'static str = "rr";

    /// Builds a tagged query carrying the given range.
    #[must_use]
    pub fn new(result: Range) -> Self {
        Self {
            envelope: Envelope::tagged(Self::TAG),
            result,
        }
    }
}

/// Single-frequency scattering-parameter measurement.
///
/// The request fields (`freq`, `avg`, `sparam`) select what to measure; the
/// `result` field carries one value per parameter regardless of selection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SingleQuery {
    /// Common envelope.
    #[serde(flatten)]
    pub envelope: Envelope,
    /// Measurement frequency in hertz.
    #[serde(default, deserialize_with = "crate::nullable::null_as_default")]
    pub freq: u64,
    /// Number of readings to average.
    #[serde(default, deserialize_with = "crate::nullable::null_as_default")]
    pub avg: u32,
    /// Parameters requested.
    #[serde(rename = "sparam", default, deserialize_with = "crate::nullable::null_as_default")]
    pub select: SParamSelect,
    /// Measured values.
    #[serde(rename = "result", default, deserialize_with = "crate::nullable::null_as_default")]
    pub result: SParam,
}

impl SingleQuery {
    /// Registry tag of this variant.
    pub const TAG: &'static str = "sq";

    /// Builds a tagged query for one frequency.
    #[must_use]
    pub fn new(freq: u64, avg: u32, select: SParamSelect) -> Self {
        Self {
            envelope: Envelope::tagged(Self::TAG),
            freq,
            avg,
            select,
            result: SParam::default(),
        }
    }
}

/// Every command or result the relay can carry.
///
/// Variants are resolved from the wire through [`crate::registry`]; adding a
/// variant means adding one arm here and one registry entry.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Frequency-range query (`rr`).
    FrequencyRange(FrequencyRangeQuery),
    /// Single-point measurement query (`sq`).
    SingleQuery(SingleQuery),
}

impl Command {
    /// Returns the registry tag of this value's variant.
    #[must_use]
    pub const fn tag(&self) -> &'static str {
        match self {
            Self::FrequencyRange(_) => FrequencyRangeQuery::TAG,
            Self::SingleQuery(_) => SingleQuery::TAG,
        }
    }

    /// Returns the envelope carried by this value.
    #[must_use]
    pub const fn envelope(&self) -> &Envelope {
        match self {
            Self::FrequencyRange(query) => &query.envelope,
            Self::SingleQuery(query) => &query.envelope,
        }
    }

    /// Returns the envelope carried by this value for modification.
    pub const fn envelope_mut(&mut self) -> &mut Envelope {
        match self {
            Self::FrequencyRange(query) => &mut query.envelope,
            Self::SingleQuery(query) => &mut query.envelope,
        }
    }

    /// Encodes this value as a canonical JSON envelope.
    ///
    /// Fields are emitted in the order `id`, `t`, `cmd`, then the variant
    /// fields in declaration order. An empty envelope tag is stamped with the
    /// variant's registry tag.
    ///
    /// # Errors
    ///
    /// Returns [`EncodeError::TagMismatch`] when the envelope names another
    /// command, and [`EncodeError::Json`] when a field cannot be represented
    /// in JSON (for example a non-finite measurement).
    pub fn encode(&self) -> Result<Vec<u8>, EncodeError> {
        let stamped = self.stamped()?;
        let bytes = match &*stamped {
            Self::FrequencyRange(query) => serde_json::to_vec(query)?,
            Self::SingleQuery(query) => serde_json::to_vec(query)?,
        };
        Ok(bytes)
    }

    fn stamped(&self) -> Result<Cow<'_, Self>, EncodeError> {
        let expected = self.tag();
        let found = self.envelope().command.as_str();
        if found == expected {
            return Ok(Cow::Borrowed(self));
        }
        if !found.is_empty() {
            return Err(EncodeError::tag_mismatch(expected, found));
        }
        let mut owned = self.clone();
        owned.envelope_mut().command = expected.to_owned();
        Ok(Cow::Owned(owned))
    }
}

impl From<FrequencyRangeQuery> for Command {
    fn from(query: FrequencyRangeQuery) -> Self {
        Self::FrequencyRange(query)
    }
}

impl From<SingleQuery> for Command {
    fn from(query: SingleQuery) -> Self {
        Self::SingleQuery(query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measurement::Complex;

    fn measured_single_query() -> Command {
        Command::SingleQuery(SingleQuery {
            result: SParam {
                s11: Complex::new(-1.0, 2.0),
                s21: Complex::new(0.34, 0.12),
                ..SParam::default()
            },
            ..SingleQuery::new(
                100_000,
                1,
                SParamSelect {
                    s11: true,
                    s21: true,
                    ..SParamSelect::default()
                },
            )
        })
    }

    fn encode_to_string(command: &Command) -> String {
        let bytes = command.encode().expect("encode command");
        String::from_utf8(bytes).expect("utf8 output")
    }

    #[test]
    fn encodes_frequency_range_query() {
        let command = Command::from(FrequencyRangeQuery::new(Range {
            start: 100_000,
            end: 4_000_000,
        }));
        assert_eq!(
            encode_to_string(&command),
            r#"{"id":"","t":0,"cmd":"rr","range":{"Start":100000,"End":4000000}}"#
        );
    }

    #[test]
    fn encodes_single_query_with_every_parameter() {
        assert_eq!(
            encode_to_string(&measured_single_query()),
            concat!(
                r#"{"id":"","t":0,"cmd":"sq","freq":100000,"avg":1,"#,
                r#""sparam":{"S11":true,"S12":false,"S21":true,"S22":false},"#,
                r#""result":{"S11":{"Real":-1,"Imag":2},"S12":{"Real":0,"Imag":0},"#,
                r#""S21":{"Real":0.34,"Imag":0.12},"S22":{"Real":0,"Imag":0}}}"#
            )
        );
    }

    #[test]
    fn stamps_missing_tag() {
        let command = Command::FrequencyRange(FrequencyRangeQuery::default());
        assert_eq!(
            encode_to_string(&command),
            r#"{"id":"","t":0,"cmd":"rr","range":{"Start":0,"End":0}}"#
        );
    }

    #[test]
    fn keeps_envelope_identity_and_timestamp() {
        let mut command = Command::from(FrequencyRangeQuery::new(Range::default()));
        command.envelope_mut().id = "client-7".to_owned();
        command.envelope_mut().t = 1_700_000_000;
        assert_eq!(
            encode_to_string(&command),
            r#"{"id":"client-7","t":1700000000,"cmd":"rr","range":{"Start":0,"End":0}}"#
        );
    }

    #[test]
    fn rejects_mismatched_tag() {
        let mut command = Command::from(SingleQuery::default());
        command.envelope_mut().command = "rr".to_owned();
        let result = command.encode();
        assert!(matches!(
            result,
            Err(EncodeError::TagMismatch { expected: "sq", .. })
        ));
    }

    #[test]
    fn rejects_non_finite_result() {
        let mut query = SingleQuery::new(1, 1, SParamSelect::default());
        query.result.s22 = Complex::new(f64::NAN, 0.0);
        let result = Command::from(query).encode();
        assert!(matches!(result, Err(EncodeError::Json(_))));
    }

    #[test]
    fn tag_follows_variant() {
        assert_eq!(Command::from(FrequencyRangeQuery::default()).tag(), "rr");
        assert_eq!(Command::from(SingleQuery::default()).tag(), "sq");
    }
}
