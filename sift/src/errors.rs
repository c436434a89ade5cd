use std::borrow::Cow;

use thiserror::Error;

use crate::filter::FilterOperator;
use crate::schema::FieldType;

/// Top-level error type for the boundaries around the search core.
///
/// The search pipeline itself never returns this for malformed filter, sort or
/// paging input; those degrade (see [`Degradation`]). It is raised when parsing
/// closed tags at the request boundary, loading configuration, or reading
/// file-backed record sources.
#[derive(Debug, Error)]
pub enum SearchError {
    /// Invalid input supplied at a request boundary.
    #[error("invalid request: {message}")]
    InvalidRequest { message: String },

    /// Reading a record file or config file failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Record file or request body was not valid JSON for the target shape.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration file could not be parsed.
    #[error("config error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("{message}")]
    Other { message: Cow<'static, str> },
}

impl SearchError {
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }
}

/// Reasons a filter, sort or paging directive was softened instead of applied.
///
/// None of these reach the caller of a search. They are logged at debug level
/// and the affected directive becomes a no-op (or, for paging, is clamped).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Degradation {
    #[error("unknown field '{field}'")]
    UnknownField { field: String },

    #[error("operator {operator:?} does not apply to field '{field}' of type {field_type}")]
    UnsupportedOperatorForType {
        field: String,
        operator: FilterOperator,
        field_type: FieldType,
    },

    #[error("value {value:?} is not convertible to {field_type} for field '{field}'")]
    ValueNotConvertible {
        field: String,
        value: String,
        field_type: FieldType,
    },

    #[error("paging request page={page} page_size={page_size} is out of range")]
    OutOfRangePaging { page: i64, page_size: i64 },
}
