//! Deserialization helpers for columns the backend may return as `null`.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Treat an explicit `null` like an absent column.
pub(crate) fn null_default<'de, D, T>(d: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(d)?.unwrap_or_default())
}

/// Keep a present column as `Some`, even when its value is `null`,
/// so it is re-emitted exactly as received.
pub(crate) fn present<'de, D>(d: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(d).map(Some)
}
