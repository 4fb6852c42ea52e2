//! Forgiving field decoders for twin records.
//!
//! Upstream feeds mix numbers, numeric strings, blanks and nulls in the same
//! column. A field that cannot be read falls back to its documented default
//! instead of failing the record, so one bad row never aborts a batch. The
//! same holds one level up for whole sections (see [`section`]).

use std::fmt;

use serde::de::{self, DeserializeOwned, IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use super::DEFAULT_STATUS_CODE;

/// Visitor yielding `Some(f64)` for anything that reads as a finite number.
struct NumberVisitor;

impl<'de> Visitor<'de> for NumberVisitor {
    type Value = Option<f64>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a number, a numeric string, or null")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
        Ok(Some(if v { 1.0 } else { 0.0 }))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(Some(v as f64))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(Some(v as f64))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        Ok(v.is_finite().then_some(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        let trimmed = v.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        let parsed = trimmed.parse::<f64>().ok().filter(|n| n.is_finite());
        if parsed.is_none() {
            tracing::warn!(value = trimmed, "unreadable numeric field, using default");
        }
        Ok(parsed)
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_some<D: Deserializer<'de>>(self, de: D) -> Result<Self::Value, D::Error> {
        de.deserialize_any(NumberVisitor)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        while seq.next_element::<IgnoredAny>()?.is_some() {}
        tracing::warn!("array in numeric field, using default");
        Ok(None)
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        while map.next_entry::<IgnoredAny, IgnoredAny>()?.is_some() {}
        tracing::warn!("object in numeric field, using default");
        Ok(None)
    }
}

/// Visitor yielding `Some(String)` for strings and bare numbers.
struct TextVisitor;

impl<'de> Visitor<'de> for TextVisitor {
    type Value = Option<String>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a string, a number, or null")
    }

    fn visit_bool<E: de::Error>(self, _v: bool) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(Some(v.to_string()))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(Some(v.to_string()))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        Ok(Some(v.to_string()))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Ok(Some(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
        Ok(Some(v))
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_some<D: Deserializer<'de>>(self, de: D) -> Result<Self::Value, D::Error> {
        de.deserialize_any(TextVisitor)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        while seq.next_element::<IgnoredAny>()?.is_some() {}
        Ok(None)
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        while map.next_entry::<IgnoredAny, IgnoredAny>()?.is_some() {}
        Ok(None)
    }
}

pub(crate) fn optional_f64<'de, D: Deserializer<'de>>(de: D) -> Result<Option<f64>, D::Error> {
    de.deserialize_any(NumberVisitor)
}

/// Numeric field defaulting to 0.0.
pub fn f64_or_zero<'de, D: Deserializer<'de>>(de: D) -> Result<f64, D::Error> {
    Ok(optional_f64(de)?.unwrap_or(0.0))
}

/// Status code, truncated toward zero; unreadable values become
/// [`DEFAULT_STATUS_CODE`].
pub fn status_code<'de, D: Deserializer<'de>>(de: D) -> Result<i64, D::Error> {
    Ok(optional_f64(de)?
        .map(|v| v.trunc() as i64)
        .unwrap_or(DEFAULT_STATUS_CODE))
}

pub fn optional_string<'de, D: Deserializer<'de>>(de: D) -> Result<Option<String>, D::Error> {
    de.deserialize_any(TextVisitor)
}

pub fn string_or_empty<'de, D: Deserializer<'de>>(de: D) -> Result<String, D::Error> {
    Ok(optional_string(de)?.unwrap_or_default())
}

/// Nested record section (`signals`, `derived`, `meta`).
///
/// `null` reads as missing. A section that is not an object, or whose shape
/// cannot be read at all, falls back to `T::default()` so the rest of the
/// record survives.
pub fn section<'de, D, T>(de: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(de)?;
    match value {
        Value::Null => Ok(T::default()),
        Value::Object(_) => Ok(serde_json::from_value(value).unwrap_or_else(|error| {
            tracing::warn!(%error, "unreadable record section, using defaults");
            T::default()
        })),
        other => {
            tracing::warn!(kind = ?other, "record section is not an object, using defaults");
            Ok(T::default())
        }
    }
}

/// Enum-valued label: unknown or missing labels become `None`.
pub fn optional_label<'de, D, T>(de: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: std::str::FromStr,
{
    Ok(optional_string(de)?.and_then(|raw| raw.trim().parse::<T>().ok()))
}
