//! Field readers for request bodies written by loosely typed clients.
//!
//! Browser clients send `null` for fields they never filled in. Those fields
//! are read as their default value, the same way a missing field is.

use serde::{Deserialize, Deserializer};

/// Reads `T`, mapping an explicit `null` to `T::default()`.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}
