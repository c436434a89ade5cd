use std::cmp::Ordering;

use log::debug;
use serde::{Deserialize, Serialize};

#[cfg(feature = "utoipa")]
use utoipa::ToSchema;

use crate::schema::{Field, Schema};

#[cfg_attr(feature = "utoipa", derive(ToSchema))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    #[inline]
    pub const fn as_str(self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }

    /// `Asc` only for the token `asc` in any case; anything else, including
    /// no token at all, is `Desc`.
    pub fn from_token(token: Option<&str>) -> Self {
        match token {
            Some(token) if token.eq_ignore_ascii_case("asc") => SortOrder::Asc,
            _ => SortOrder::Desc,
        }
    }
}

/// Single-field ordering over records of shape `R`.
#[derive(Debug)]
pub struct SortKey<R> {
    pub field: Field<R>,
    pub order: SortOrder,
}

impl<R> Clone for SortKey<R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R> Copy for SortKey<R> {}

impl<R> SortKey<R> {
    #[inline]
    pub fn ascending(&self) -> bool {
        self.order == SortOrder::Asc
    }

    pub fn compare(&self, a: &R, b: &R) -> Ordering {
        let ordering = self.field.get(a).sort_cmp(&self.field.get(b));
        match self.order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    }

    /// Stable sort: records with equal keys keep their relative order.
    pub fn apply(&self, records: &mut [R]) {
        records.sort_by(|a, b| self.compare(a, b));
    }
}

/// Resolve a sort field and direction. A blank or unknown field yields `None`,
/// meaning the source order is kept.
pub fn compile_sort<R>(schema: &Schema<R>, sort_by: Option<&str>, sort_order: Option<&str>) -> Option<SortKey<R>> {
    let name = sort_by.filter(|name| !name.trim().is_empty())?;
    match schema.resolve(name) {
        Some(field) => Some(SortKey {
            field: *field,
            order: SortOrder::from_token(sort_order),
        }),
        None => {
            debug!("{}: unknown sort field '{}'; keeping source order", schema.shape(), name);
            None
        }
    }
}
