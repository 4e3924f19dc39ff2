//! Lenient wire shapes for the API payloads
//!
//! The backend is inconsistent about ids (numbers or strings) and money
//! (JSON numbers or decimal strings), so both are accepted here and turned
//! into one representation before the typed records are built. CSV exports
//! don't go through these: csv infers field types, which would rewrite ids
//! like `007`, so the loader reads those columns as plain strings instead.

use std::fmt;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(f64),
    Text(String),
}

/// Accepts any scalar id and keeps string ids verbatim (trimmed)
struct IdVisitor;

impl<'de> Visitor<'de> for IdVisitor {
    type Value = Option<String>;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a string or numeric id")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        let v = v.trim();
        Ok((!v.is_empty()).then(|| v.to_string()))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(Some(v.to_string()))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(Some(v.to_string()))
    }

    // 1.0 prints as "1", 1.5 as "1.5"
    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        Ok(v.is_finite().then(|| v.to_string()))
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        deserializer.deserialize_any(IdVisitor)
    }
}

/// Deserialize an optional id that may arrive as a string or any JSON number
pub fn optional_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_option(IdVisitor)
}

/// Deserialize an optional amount that may arrive as a number or a decimal string.
/// Text that does not parse is treated as absent.
pub fn optional_amount<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<NumberOrText> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|value| match value {
        NumberOrText::Number(n) => Some(n),
        NumberOrText::Text(s) => parse_amount(&s),
    }))
}

/// Parse a decimal amount from text, `None` if it isn't one
pub fn parse_amount(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok()
}
