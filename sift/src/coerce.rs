//! Conversion of untyped request text into typed literals.
//!
//! Coercion never fails loudly: text that does not fit the target type yields
//! `None` and the caller decides what to skip.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};

use crate::schema::{FieldDescriptor, FieldType, tag_index};
use crate::value::{Literal, Number};

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Convert `text` into a literal of the field's underlying type.
///
/// Nullable fields are already described by their inner type, so a nullable
/// integer coerces exactly like a plain one.
pub fn coerce(text: &str, descriptor: &FieldDescriptor) -> Option<Literal> {
    coerce_to(text, descriptor.field_type)
}

pub fn coerce_to(text: &str, field_type: FieldType) -> Option<Literal> {
    match field_type {
        FieldType::Text => Some(Literal::Text(text.to_string())),
        FieldType::Int32 => parse_number::<i32>(text),
        FieldType::Int64 => parse_number::<i64>(text),
        // widened after parsing so it equals the widened record value
        FieldType::Float32 => parse_number::<f32>(text),
        FieldType::Float64 => parse_number::<f64>(text),
        FieldType::Decimal => parse_number::<Decimal>(text),
        FieldType::Bool => parse_bool(text).map(Literal::Bool),
        FieldType::Timestamp => parse_timestamp(text).map(Literal::Timestamp),
        FieldType::Tag(tags) => tag_index(tags, text).map(Literal::Tag),
    }
}

fn parse_number<T>(text: &str) -> Option<Literal>
where
    T: FromStr + Into<Number>,
{
    text.trim().parse::<T>().ok().map(|n| Literal::Number(n.into()))
}

fn parse_bool(text: &str) -> Option<bool> {
    let text = text.trim();
    if text.eq_ignore_ascii_case("true") {
        Some(true)
    } else if text.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

/// Parse a calendar timestamp.
///
/// Accepts RFC 3339, then `YYYY-MM-DD[T ]HH:MM[:SS[.f]]` read as UTC, then a
/// bare `YYYY-MM-DD` read as midnight UTC.
pub fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
        return Some(parsed.with_timezone(&Utc));
    }
    for format in DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .map(|date| date.and_time(NaiveTime::MIN).and_utc())
}

/// Deserialize an optional timestamp with [`parse_timestamp`], so typed request
/// bounds accept the same text as filter criteria. Blank strings are `None`.
///
/// Use as `#[serde(default, deserialize_with = "sift::coerce::deserialize_timestamp")]`.
pub fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(raw) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };
    let text = raw.trim();
    if text.is_empty() {
        return Ok(None);
    }
    parse_timestamp(text)
        .map(Some)
        .ok_or_else(|| D::Error::custom(format!("'{text}' is not a date or RFC 3339 timestamp")))
}

/// Split a comma-separated list, trimming segments and dropping empty ones.
pub fn split_list(text: &str) -> impl Iterator<Item = &str> {
    text.split(',').map(str::trim).filter(|segment| !segment.is_empty())
}
