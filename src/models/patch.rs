//! Partial update fields and lenient numeric input.
//!
//! Form clients send numbers either as JSON numbers or as text, and an empty
//! text field means "no value". Update payloads only touch the fields they
//! carry, which `Patch` makes explicit.

use serde::{de, Deserialize, Deserializer};

/// A field of a partial update: either left untouched or set to a new value.
///
/// Use with `#[serde(default)]` so a missing key deserializes to `Absent`.
/// For nullable columns `T` is an `Option`, so `null` becomes `Set(None)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Patch<T> {
    Absent,
    Set(T),
}

impl<T> Default for Patch<T> {
    fn default() -> Self {
        Patch::Absent
    }
}

impl<T> Patch<T> {
    pub fn is_set(&self) -> bool {
        matches!(self, Patch::Set(_))
    }

    pub fn as_set(&self) -> Option<&T> {
        match self {
            Patch::Set(value) => Some(value),
            Patch::Absent => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Patch<U> {
        match self {
            Patch::Set(value) => Patch::Set(f(value)),
            Patch::Absent => Patch::Absent,
        }
    }
}

impl<'de, T> Deserialize<'de> for Patch<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        T::deserialize(deserializer).map(Patch::Set)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LooseNumber {
    Int(i64),
    Float(f64),
    Text(String),
}

const INVALID_NUMBER: &str = "Valor numérico no válido";

fn loose_to_int<E: de::Error>(raw: Option<LooseNumber>) -> Result<Option<i32>, E> {
    match raw {
        None => Ok(None),
        Some(LooseNumber::Int(n)) => i32::try_from(n)
            .map(Some)
            .map_err(|_| E::custom(INVALID_NUMBER)),
        Some(LooseNumber::Float(f)) if f.is_finite() => {
            let truncated = f.trunc();
            if truncated < i32::MIN as f64 || truncated > i32::MAX as f64 {
                Err(E::custom(INVALID_NUMBER))
            } else {
                Ok(Some(truncated as i32))
            }
        }
        Some(LooseNumber::Float(_)) => Err(E::custom(INVALID_NUMBER)),
        Some(LooseNumber::Text(text)) => {
            let text = text.trim();
            if text.is_empty() {
                Ok(None)
            } else {
                text.parse::<i32>()
                    .map(Some)
                    .map_err(|_| E::custom(INVALID_NUMBER))
            }
        }
    }
}

/// Nullable integer sent as a number or as text; `""` and `null` are `None`.
pub fn nullable_int<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<LooseNumber>::deserialize(deserializer)?;
    loose_to_int(raw)
}

/// Same as [`nullable_int`] for a partial update field.
pub fn nullable_int_patch<'de, D>(deserializer: D) -> Result<Patch<Option<i32>>, D::Error>
where
    D: Deserializer<'de>,
{
    nullable_int(deserializer).map(Patch::Set)
}

/// Blank optional text is stored as `NULL`.
pub fn blank_to_none(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}
