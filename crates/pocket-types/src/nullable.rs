//! Treats an explicit JSON `null` like an absent field.

use serde::{Deserialize, Deserializer};

/// Deserializes a field, substituting its default when the value is `null`.
///
/// Pair with `#[serde(default)]` so that a missing field behaves the same way.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}
