//! Measurement payloads carried by command variants.
//!
//! Field names on the wire are `PascalCase` (`Start`, `S11`, `Real`), unlike
//! the lowercase envelope.

use serde::{Deserialize, Serialize, Serializer, ser::Error as _};
use serde_json::value::RawValue;

/// Smallest non-zero magnitude written in plain decimal.
const PLAIN_LOWER: f64 = 1e-6;
/// Magnitude from which values switch to exponent form.
const PLAIN_UPPER: f64 = 1e21;

/// Frequency bounds in hertz.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct Range {
    /// Lower bound.
    #[serde(deserialize_with = "crate::nullable::null_as_default")]
    pub start: u64,
    /// Upper bound.
    #[serde(deserialize_with = "crate::nullable::null_as_default")]
    pub end: u64,
}

/// Selection mask over the four scattering parameters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct SParamSelect {
    /// Reflection at port 1.
    #[serde(deserialize_with = "crate::nullable::null_as_default")]
    pub s11: bool,
    /// Reverse transmission.
    #[serde(deserialize_with = "crate::nullable::null_as_default")]
    pub s12: bool,
    /// Forward transmission.
    #[serde(deserialize_with = "crate::nullable::null_as_default")]
    pub s21: bool,
    /// Reflection at port 2.
    #[serde(deserialize_with = "crate::nullable::null_as_default")]
    pub s22: bool,
}

/// One complex value per scattering parameter.
///
/// Values are present for every parameter whether or not it was selected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct SParam {
    /// Reflection at port 1.
    #[serde(deserialize_with = "crate::nullable::null_as_default")]
    pub s11: Complex,
    /// Reverse transmission.
    #[serde(deserialize_with = "crate::nullable::null_as_default")]
    pub s12: Complex,
    /// Forward transmission.
    #[serde(deserialize_with = "crate::nullable::null_as_default")]
    pub s21: Complex,
    /// Reflection at port 2.
    #[serde(deserialize_with = "crate::nullable::null_as_default")]
    pub s22: Complex,
}

/// Complex number in rectangular form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct Complex {
    /// Real part.
    #[serde(
        serialize_with = "serialize_wire_float",
        deserialize_with = "crate::nullable::null_as_default"
    )]
    pub real: f64,
    /// Imaginary part.
    #[serde(
        serialize_with = "serialize_wire_float",
        deserialize_with = "crate::nullable::null_as_default"
    )]
    pub imag: f64,
}

impl Complex {
    /// Builds a complex value from its parts.
    #[must_use]
    pub const fn new(real: f64, imag: f64) -> Self {
        Self { real, imag }
    }
}

/// Writes a float as the instrument expects it.
///
/// Zero and magnitudes in `[1e-6, 1e21)` use plain decimal with the shortest
/// round-tripping digits (`-1`, `0.000003`, `10000000000000000`). Everything
/// else uses exponent form with an explicit sign (`1e+21`, `1.5e-7`).
/// Non-finite values have no JSON representation and are rejected.
fn serialize_wire_float<S>(value: &f64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let text = wire_float_text(*value)
        .ok_or_else(|| S::Error::custom(format!("unsupported float value {value}")))?;
    let number = RawValue::from_string(text).map_err(S::Error::custom)?;
    number.serialize(serializer)
}

fn wire_float_text(value: f64) -> Option<String> {
    if !value.is_finite() {
        return None;
    }
    let magnitude = value.abs();
    if magnitude == 0.0 || (PLAIN_LOWER..PLAIN_UPPER).contains(&magnitude) {
        return Some(value.to_string());
    }
    let scientific = format!("{value:e}");
    Some(match scientific.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            format!("{mantissa}e+{exponent}")
        }
        _ => scientific,
    })
}
