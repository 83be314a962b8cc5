//! Serde support for `[T; D]` fields with a const-generic length.
//!
//! serde only provides `Deserialize` for arrays of fixed small sizes, so
//! const-generic array fields round-trip through a sequence instead. Used
//! via `#[serde(with = "crate::serde_arrays")]`.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

pub(crate) fn serialize<S, T, const N: usize>(
    array: &[T; N],
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    S: Serializer,
    T: Serialize,
{
    array.as_slice().serialize(serializer)
}

pub(crate) fn deserialize<'de, D, T, const N: usize>(deserializer: D) -> Result<[T; N], D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    let elements = Vec::<T>::deserialize(deserializer)?;
    let len = elements.len();
    elements
        .try_into()
        .map_err(|_| D::Error::invalid_length(len, &"a sequence of length D"))
}
