//! Runtime values read from records and literals coerced from request text.
//!
//! A [`Value`] borrows from the record it was read from; a [`Literal`] is the
//! owned result of coercing client text against a field's declared type.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

/// Numeric value, kept in the representation of the field it came from.
///
/// Comparisons between different representations widen to a common one:
/// integer and decimal compare as decimal, anything involving a float compares
/// as `f64`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Int(i64),
    Float(f64),
    Decimal(Decimal),
}

impl Number {
    pub fn to_f64(self) -> f64 {
        match self {
            Number::Int(n) => n as f64,
            Number::Float(n) => n,
            Number::Decimal(d) => d.to_f64().unwrap_or(f64::NAN),
        }
    }

    /// Compares two numbers, handling mixed representations.
    pub fn compare(self, other: Number) -> Option<Ordering> {
        match (self, other) {
            (Number::Int(a), Number::Int(b)) => Some(a.cmp(&b)),
            (Number::Float(a), Number::Float(b)) => a.partial_cmp(&b),
            (Number::Decimal(a), Number::Decimal(b)) => Some(a.cmp(&b)),
            (Number::Int(a), Number::Decimal(b)) => Some(Decimal::from(a).cmp(&b)),
            (Number::Decimal(a), Number::Int(b)) => Some(a.cmp(&Decimal::from(b))),
            _ => self.to_f64().partial_cmp(&other.to_f64()),
        }
    }
}

impl From<i32> for Number {
    fn from(n: i32) -> Self {
        Number::Int(i64::from(n))
    }
}

impl From<i64> for Number {
    fn from(n: i64) -> Self {
        Number::Int(n)
    }
}

impl From<f32> for Number {
    fn from(n: f32) -> Self {
        Number::Float(f64::from(n))
    }
}

impl From<f64> for Number {
    fn from(n: f64) -> Self {
        Number::Float(n)
    }
}

impl From<Decimal> for Number {
    fn from(d: Decimal) -> Self {
        Number::Decimal(d)
    }
}

/// Value of one field of one record, as seen by the filter evaluator and the sorter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value<'a> {
    /// Field is a nullable wrapper holding nothing.
    Null,
    Text(&'a str),
    Number(Number),
    Bool(bool),
    Timestamp(DateTime<Utc>),
    /// Index of the variant within the field's closed tag set.
    Tag(u32),
}

impl<'a> Value<'a> {
    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_text(&self) -> Option<&'a str> {
        match self {
            Value::Text(s) => Some(*s),
            _ => None,
        }
    }

    /// Equality against a coerced literal. Text equality is exact.
    pub fn matches_literal(&self, literal: &Literal) -> bool {
        match (self, literal.as_value()) {
            (Value::Text(a), Value::Text(b)) => *a == b,
            (Value::Number(a), Value::Number(b)) => a.compare(b) == Some(Ordering::Equal),
            (Value::Bool(a), Value::Bool(b)) => *a == b,
            (Value::Timestamp(a), Value::Timestamp(b)) => *a == b,
            (Value::Tag(a), Value::Tag(b)) => *a == b,
            _ => false,
        }
    }

    /// Ordering against a coerced literal; only numbers and timestamps are ordered.
    pub fn compare_literal(&self, literal: &Literal) -> Option<Ordering> {
        match (self, literal.as_value()) {
            (Value::Number(a), Value::Number(b)) => a.compare(b),
            (Value::Timestamp(a), Value::Timestamp(b)) => Some(a.cmp(&b)),
            _ => None,
        }
    }

    /// Total order used for sorting records by this value.
    ///
    /// Null sorts before everything else. Pairs that have no meaningful order
    /// (NaN, mismatched kinds) are `Equal` so a stable sort leaves them in place.
    pub fn sort_cmp(&self, other: &Value<'_>) -> Ordering {
        match (self, other) {
            (Value::Null, Value::Null) => Ordering::Equal,
            (Value::Null, _) => Ordering::Less,
            (_, Value::Null) => Ordering::Greater,
            (Value::Text(a), Value::Text(b)) => a.cmp(b),
            (Value::Number(a), Value::Number(b)) => a.compare(*b).unwrap_or(Ordering::Equal),
            (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
            (Value::Timestamp(a), Value::Timestamp(b)) => a.cmp(b),
            (Value::Tag(a), Value::Tag(b)) => a.cmp(b),
            _ => Ordering::Equal,
        }
    }
}

/// Owned value produced by coercing request text against a field type.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Text(String),
    Number(Number),
    Bool(bool),
    Timestamp(DateTime<Utc>),
    Tag(u32),
}

impl Literal {
    pub fn as_value(&self) -> Value<'_> {
        match self {
            Literal::Text(s) => Value::Text(s),
            Literal::Number(n) => Value::Number(*n),
            Literal::Bool(b) => Value::Bool(*b),
            Literal::Timestamp(t) => Value::Timestamp(*t),
            Literal::Tag(i) => Value::Tag(*i),
        }
    }
}
