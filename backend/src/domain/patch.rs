//! Serde helper for tri-state update fields.
//!
//! JSON updates distinguish an absent key (leave the column alone), an
//! explicit `null` (clear it) and a value (set it). Combined with
//! `#[serde(default)]`, [`double_option`] maps those onto `None`,
//! `Some(None)` and `Some(Some(value))`.

use serde::{Deserialize, Deserializer};

/// Deserialise a present field, including `null`, into `Some(..)`.
///
/// # Errors
/// Propagates the inner deserialiser's error.
pub fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
