//! # Filter criteria and the predicate AST
//!
//! Client filters arrive as untyped `(field, operator, value)` triples. They are
//! compiled once per request against a shape's [`Schema`] into a [`Predicate`],
//! a small tagged tree that one evaluator ([`Predicate::matches`]) interprets
//! for every record.
//!
//! Compilation is lenient. A criterion naming an unknown field, pairing an
//! operator with a field type it does not apply to, or carrying a value that
//! does not coerce is dropped (logged at debug level) and filters nothing.
//!
//! | Operator                                       | Field types       | Null field |
//! |------------------------------------------------|-------------------|------------|
//! | `Equals` / `NotEquals`                         | any               | no match   |
//! | `Contains` / `NotContains` / `StartsWith` / `EndsWith` | text (case-insensitive) | no match |
//! | `GreaterThan[OrEqual]` / `LessThan[OrEqual]`   | numeric, timestamp | no match  |
//! | `In` / `NotIn`                                 | any, comma list   | no match   |
//! | `IsNull` / `IsNotNull`                         | any, no value     | tested     |

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use log::debug;
use serde::{Deserialize, Serialize};

#[cfg(feature = "utoipa")]
use utoipa::ToSchema;

use crate::coerce::{coerce, split_list};
use crate::errors::{Degradation, SearchError};
use crate::schema::{Field, Schema};
use crate::value::Literal;

#[cfg_attr(feature = "utoipa", derive(ToSchema))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum FilterOperator {
    #[default]
    Equals,
    NotEquals,
    Contains,
    NotContains,
    StartsWith,
    EndsWith,
    GreaterThan,
    GreaterThanOrEqual,
    LessThan,
    LessThanOrEqual,
    In,
    NotIn,
    IsNull,
    IsNotNull,
}

/// How an operator is evaluated once its field has been resolved.
#[derive(Debug, Clone, Copy)]
enum OperatorKind {
    Equality { negate: bool },
    Text { op: TextOp, negate: bool },
    Ordered(CmpOp),
    Membership { negate: bool },
    Nullness { negate: bool },
}

impl FilterOperator {
    pub const fn as_str(self) -> &'static str {
        match self {
            FilterOperator::Equals => "Equals",
            FilterOperator::NotEquals => "NotEquals",
            FilterOperator::Contains => "Contains",
            FilterOperator::NotContains => "NotContains",
            FilterOperator::StartsWith => "StartsWith",
            FilterOperator::EndsWith => "EndsWith",
            FilterOperator::GreaterThan => "GreaterThan",
            FilterOperator::GreaterThanOrEqual => "GreaterThanOrEqual",
            FilterOperator::LessThan => "LessThan",
            FilterOperator::LessThanOrEqual => "LessThanOrEqual",
            FilterOperator::In => "In",
            FilterOperator::NotIn => "NotIn",
            FilterOperator::IsNull => "IsNull",
            FilterOperator::IsNotNull => "IsNotNull",
        }
    }

    /// Every operator except the two nullness tests needs a value.
    #[inline]
    pub const fn requires_value(self) -> bool {
        !matches!(self, FilterOperator::IsNull | FilterOperator::IsNotNull)
    }

    const fn kind(self) -> OperatorKind {
        match self {
            FilterOperator::Equals => OperatorKind::Equality { negate: false },
            FilterOperator::NotEquals => OperatorKind::Equality { negate: true },
            FilterOperator::Contains => OperatorKind::Text {
                op: TextOp::Contains,
                negate: false,
            },
            FilterOperator::NotContains => OperatorKind::Text {
                op: TextOp::Contains,
                negate: true,
            },
            FilterOperator::StartsWith => OperatorKind::Text {
                op: TextOp::StartsWith,
                negate: false,
            },
            FilterOperator::EndsWith => OperatorKind::Text {
                op: TextOp::EndsWith,
                negate: false,
            },
            FilterOperator::GreaterThan => OperatorKind::Ordered(CmpOp::Gt),
            FilterOperator::GreaterThanOrEqual => OperatorKind::Ordered(CmpOp::Ge),
            FilterOperator::LessThan => OperatorKind::Ordered(CmpOp::Lt),
            FilterOperator::LessThanOrEqual => OperatorKind::Ordered(CmpOp::Le),
            FilterOperator::In => OperatorKind::Membership { negate: false },
            FilterOperator::NotIn => OperatorKind::Membership { negate: true },
            FilterOperator::IsNull => OperatorKind::Nullness { negate: false },
            FilterOperator::IsNotNull => OperatorKind::Nullness { negate: true },
        }
    }
}

impl fmt::Display for FilterOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterOperator {
    type Err = SearchError;

    /// Parses operator names ignoring case, `_` and `-`, plus the short forms
    /// `eq ne gt gte lt lte nin null notnull`.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let normalized: String = raw
            .trim()
            .chars()
            .filter(|c| !matches!(c, '_' | '-' | ' '))
            .map(|c| c.to_ascii_lowercase())
            .collect();

        let operator = match normalized.as_str() {
            "equals" | "eq" => FilterOperator::Equals,
            "notequals" | "ne" | "neq" => FilterOperator::NotEquals,
            "contains" => FilterOperator::Contains,
            "notcontains" => FilterOperator::NotContains,
            "startswith" => FilterOperator::StartsWith,
            "endswith" => FilterOperator::EndsWith,
            "greaterthan" | "gt" => FilterOperator::GreaterThan,
            "greaterthanorequal" | "gte" | "ge" => FilterOperator::GreaterThanOrEqual,
            "lessthan" | "lt" => FilterOperator::LessThan,
            "lessthanorequal" | "lte" | "le" => FilterOperator::LessThanOrEqual,
            "in" => FilterOperator::In,
            "notin" | "nin" => FilterOperator::NotIn,
            "isnull" | "null" => FilterOperator::IsNull,
            "isnotnull" | "notnull" => FilterOperator::IsNotNull,
            _ => {
                return Err(SearchError::invalid_request(format!(
                    "Unsupported filter operator: {}",
                    raw.trim()
                )));
            }
        };
        Ok(operator)
    }
}

impl TryFrom<String> for FilterOperator {
    type Error = SearchError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// One client-supplied `(field, operator, value)` filter.
#[cfg_attr(feature = "utoipa", derive(ToSchema))]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterCriterion {
    pub field: String,
    #[serde(default)]
    pub operator: FilterOperator,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl FilterCriterion {
    pub fn new(field: impl Into<String>, operator: FilterOperator, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            operator,
            value: Some(value.into()),
        }
    }

    /// A criterion without a value, for `IsNull` / `IsNotNull`.
    pub fn without_value(field: impl Into<String>, operator: FilterOperator) -> Self {
        Self {
            field: field.into(),
            operator,
            value: None,
        }
    }
}

impl fmt::Display for FilterCriterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(value) => write!(f, "{}:{}:{}", self.field, self.operator, value),
            None => write!(f, "{}:{}", self.field, self.operator),
        }
    }
}

impl FromStr for FilterCriterion {
    type Err = SearchError;

    /// Parses `field:operator[:value]`. The value keeps any further colons.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = raw.splitn(3, ':').collect();
        if parts.len() < 2 || parts[0].trim().is_empty() {
            return Err(SearchError::invalid_request(format!("Invalid filter syntax: {}", raw)));
        }

        Ok(Self {
            field: parts[0].trim().to_string(),
            operator: parts[1].parse()?,
            value: parts.get(2).map(|value| value.to_string()),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextOp {
    Contains,
    StartsWith,
    EndsWith,
}

impl TextOp {
    fn test(self, haystack: &str, needle: &str) -> bool {
        match self {
            TextOp::Contains => haystack.contains(needle),
            TextOp::StartsWith => haystack.starts_with(needle),
            TextOp::EndsWith => haystack.ends_with(needle),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    Gt,
    Ge,
    Lt,
    Le,
}

impl CmpOp {
    #[inline]
    pub fn accepts(self, ordering: Ordering) -> bool {
        match self {
            CmpOp::Gt => ordering == Ordering::Greater,
            CmpOp::Ge => ordering != Ordering::Less,
            CmpOp::Lt => ordering == Ordering::Less,
            CmpOp::Le => ordering != Ordering::Greater,
        }
    }
}

/// Boolean condition over a record of shape `R`.
///
/// Leaves pair a resolved [`Field`] with an already-coerced literal; `And` and
/// `Or` combine them. Every leaf except `IsNull` is false for a null field.
///
/// # Examples
///
/// ```
/// use sift::examples::models::User;
/// use sift::filter::{CmpOp, Predicate};
/// use sift::value::{Literal, Number};
///
/// // verified users with id above 100, or users with no recorded address
/// let predicate: Predicate<User> = Predicate::or([
///     Predicate::and([
///         Predicate::eq(User::IS_EMAIL_VERIFIED, Literal::Bool(true)),
///         Predicate::compare(User::ID, CmpOp::Gt, Literal::Number(Number::Int(100))),
///     ]),
///     Predicate::is_null(User::ADDRESS),
/// ]);
/// assert!(!predicate.is_always());
/// ```
#[derive(Debug, Clone)]
pub enum Predicate<R> {
    /// Matches every record.
    Always,
    Eq {
        field: Field<R>,
        value: Literal,
    },
    Neq {
        field: Field<R>,
        value: Literal,
    },
    /// Case-insensitive text test; `needle` is stored lowercased.
    Text {
        field: Field<R>,
        op: TextOp,
        needle: String,
        negate: bool,
    },
    Cmp {
        field: Field<R>,
        op: CmpOp,
        value: Literal,
    },
    In {
        field: Field<R>,
        values: Vec<Literal>,
        negate: bool,
    },
    IsNull {
        field: Field<R>,
        negate: bool,
    },
    And(Vec<Predicate<R>>),
    Or(Vec<Predicate<R>>),
}

impl<R> Predicate<R> {
    // ========== Leaf Constructors ==========

    #[inline]
    pub fn eq(field: Field<R>, value: Literal) -> Self {
        Self::Eq { field, value }
    }

    #[inline]
    pub fn neq(field: Field<R>, value: Literal) -> Self {
        Self::Neq { field, value }
    }

    #[inline]
    pub fn text(field: Field<R>, op: TextOp, needle: &str, negate: bool) -> Self {
        Self::Text {
            field,
            op,
            needle: needle.to_lowercase(),
            negate,
        }
    }

    #[inline]
    pub fn contains(field: Field<R>, needle: &str) -> Self {
        Self::text(field, TextOp::Contains, needle, false)
    }

    #[inline]
    pub fn compare(field: Field<R>, op: CmpOp, value: Literal) -> Self {
        Self::Cmp { field, op, value }
    }

    #[inline]
    pub fn one_of(field: Field<R>, values: impl IntoIterator<Item = Literal>) -> Self {
        Self::In {
            field,
            values: values.into_iter().collect(),
            negate: false,
        }
    }

    #[inline]
    pub fn none_of(field: Field<R>, values: impl IntoIterator<Item = Literal>) -> Self {
        Self::In {
            field,
            values: values.into_iter().collect(),
            negate: true,
        }
    }

    #[inline]
    pub fn is_null(field: Field<R>) -> Self {
        Self::IsNull { field, negate: false }
    }

    #[inline]
    pub fn is_not_null(field: Field<R>) -> Self {
        Self::IsNull { field, negate: true }
    }

    // ========== Composite Constructors ==========

    #[inline]
    pub fn and(predicates: impl IntoIterator<Item = Predicate<R>>) -> Self {
        Self::And(predicates.into_iter().collect())
    }

    #[inline]
    pub fn or(predicates: impl IntoIterator<Item = Predicate<R>>) -> Self {
        Self::Or(predicates.into_iter().collect())
    }

    /// AND the predicates together, dropping `Always` and unwrapping a lone clause.
    pub fn all(predicates: impl IntoIterator<Item = Predicate<R>>) -> Self {
        let mut clauses: Vec<Predicate<R>> = predicates.into_iter().filter(|p| !p.is_always()).collect();
        match clauses.len() {
            0 => Self::Always,
            1 => clauses.pop().unwrap_or(Self::Always),
            _ => Self::And(clauses),
        }
    }

    #[inline]
    pub fn is_always(&self) -> bool {
        matches!(self, Self::Always)
    }

    // ========== Evaluation ==========

    /// Evaluate this predicate against one record.
    pub fn matches(&self, record: &R) -> bool {
        match self {
            Self::Always => true,
            Self::Eq { field, value } => {
                let current = field.get(record);
                !current.is_null() && current.matches_literal(value)
            }
            Self::Neq { field, value } => {
                let current = field.get(record);
                !current.is_null() && !current.matches_literal(value)
            }
            Self::Text {
                field,
                op,
                needle,
                negate,
            } => match field.get(record).as_text() {
                Some(text) => op.test(&text.to_lowercase(), needle) != *negate,
                None => false,
            },
            Self::Cmp { field, op, value } => field
                .get(record)
                .compare_literal(value)
                .is_some_and(|ordering| op.accepts(ordering)),
            Self::In { field, values, negate } => {
                let current = field.get(record);
                if current.is_null() {
                    return false;
                }
                values.iter().any(|value| current.matches_literal(value)) != *negate
            }
            Self::IsNull { field, negate } => field.get(record).is_null() != *negate,
            Self::And(predicates) => predicates.iter().all(|p| p.matches(record)),
            Self::Or(predicates) => predicates.iter().any(|p| p.matches(record)),
        }
    }
}

/// Compile a free-text search term over the named text fields.
///
/// Produces an OR of null-guarded, case-insensitive substring tests. A blank
/// term, or no usable text field, yields [`Predicate::Always`].
pub fn free_text<R>(schema: &Schema<R>, fields: &[&str], term: Option<&str>) -> Predicate<R> {
    let Some(term) = term.filter(|term| !term.trim().is_empty()) else {
        return Predicate::Always;
    };

    let mut clauses: Vec<Predicate<R>> = fields
        .iter()
        .filter_map(|name| match schema.resolve(name) {
            Some(field) if field.field_type().is_text() => Some(Predicate::contains(*field, term)),
            Some(field) => {
                debug!(
                    "{}: free-text field '{}' is {}, not text; skipping",
                    schema.shape(),
                    field.name(),
                    field.field_type()
                );
                None
            }
            None => {
                debug!("{}: unknown free-text field '{}'; skipping", schema.shape(), name);
                None
            }
        })
        .collect();

    match clauses.len() {
        0 => Predicate::Always,
        1 => clauses.pop().unwrap_or(Predicate::Always),
        _ => Predicate::Or(clauses),
    }
}

/// Compile one criterion, or report why it has to be ignored.
pub fn compile_criterion<R>(schema: &Schema<R>, criterion: &FilterCriterion) -> Result<Predicate<R>, Degradation> {
    let field = *schema
        .resolve(&criterion.field)
        .ok_or_else(|| Degradation::UnknownField {
            field: criterion.field.clone(),
        })?;
    let field_type = field.field_type();
    let operator = criterion.operator;

    let unsupported = || Degradation::UnsupportedOperatorForType {
        field: field.name().to_string(),
        operator,
        field_type,
    };
    let not_convertible = |value: &str| Degradation::ValueNotConvertible {
        field: field.name().to_string(),
        value: value.to_string(),
        field_type,
    };
    let raw_value = || {
        criterion
            .value
            .as_deref()
            .filter(|value| !value.trim().is_empty())
            .ok_or_else(|| not_convertible(criterion.value.as_deref().unwrap_or_default()))
    };
    let literal = |text: &str| coerce(text, field.descriptor()).ok_or_else(|| not_convertible(text));

    match operator.kind() {
        OperatorKind::Nullness { negate } => Ok(Predicate::IsNull { field, negate }),
        OperatorKind::Equality { negate } => {
            let value = literal(raw_value()?)?;
            Ok(if negate {
                Predicate::neq(field, value)
            } else {
                Predicate::eq(field, value)
            })
        }
        OperatorKind::Text { op, negate } => {
            if !field_type.is_text() {
                return Err(unsupported());
            }
            Ok(Predicate::text(field, op, raw_value()?, negate))
        }
        OperatorKind::Ordered(op) => {
            if !field_type.is_ordered() {
                return Err(unsupported());
            }
            Ok(Predicate::compare(field, op, literal(raw_value()?)?))
        }
        OperatorKind::Membership { negate } => {
            let raw = raw_value()?;
            let values: Vec<Literal> = split_list(raw)
                .filter_map(|segment| coerce(segment, field.descriptor()))
                .collect();
            if values.is_empty() {
                return Err(not_convertible(raw));
            }
            Ok(Predicate::In { field, values, negate })
        }
    }
}

/// Compile every criterion and AND the results. Criteria that cannot be
/// applied are logged and skipped.
pub fn compile_criteria<R>(schema: &Schema<R>, criteria: &[FilterCriterion]) -> Predicate<R> {
    Predicate::all(
        criteria
            .iter()
            .filter_map(|criterion| match compile_criterion(schema, criterion) {
                Ok(predicate) => Some(predicate),
                Err(reason) => {
                    debug!("{}: ignoring filter '{}': {}", schema.shape(), criterion, reason);
                    None
                }
            }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{FieldType, FieldValue};
    use crate::value::{Number, Value};

    const STATUS_TAGS: &[&str] = &["A", "B", "C"];

    #[derive(Debug, Clone)]
    struct Item {
        value: i32,
        status: u32,
        name: Option<String>,
        score: Option<f64>,
        active: bool,
    }

    fn item(value: i32) -> Item {
        Item {
            value,
            status: (value as u32) % 3,
            name: Some(format!("Item {value}")),
            score: Some(f64::from(value) / 2.0),
            active: value % 2 == 0,
        }
    }

    fn schema() -> Schema<Item> {
        fn value(i: &Item) -> Value<'_> {
            i.value.to_value()
        }
        fn status(i: &Item) -> Value<'_> {
            Value::Tag(i.status)
        }
        fn name(i: &Item) -> Value<'_> {
            i.name.to_value()
        }
        fn score(i: &Item) -> Value<'_> {
            i.score.to_value()
        }
        fn active(i: &Item) -> Value<'_> {
            i.active.to_value()
        }
        Schema::new(
            "items",
            [
                Field::new("value", FieldType::Int32, false, value),
                Field::new("status", FieldType::Tag(STATUS_TAGS), false, status),
                Field::new("name", FieldType::Text, true, name),
                Field::new("score", FieldType::Float64, true, score),
                Field::new("active", FieldType::Bool, false, active),
            ],
        )
    }

    fn items() -> Vec<Item> {
        (1..=10).map(item).collect()
    }

    fn apply(criteria: &[FilterCriterion], records: &[Item]) -> Vec<i32> {
        let predicate = compile_criteria(&schema(), criteria);
        records.iter().filter(|r| predicate.matches(r)).map(|r| r.value).collect()
    }

    fn criterion(field: &str, operator: FilterOperator, value: &str) -> FilterCriterion {
        FilterCriterion::new(field, operator, value)
    }

    // ==========================================================================
    // Operator parsing
    // ==========================================================================

    #[test]
    fn operator_parses_names_and_short_forms() {
        assert_eq!("GreaterThan".parse::<FilterOperator>().ok(), Some(FilterOperator::GreaterThan));
        assert_eq!("greater_than_or_equal".parse::<FilterOperator>().ok(), Some(FilterOperator::GreaterThanOrEqual));
        assert_eq!("NOTIN".parse::<FilterOperator>().ok(), Some(FilterOperator::NotIn));
        assert_eq!("lte".parse::<FilterOperator>().ok(), Some(FilterOperator::LessThanOrEqual));
        assert_eq!("is-not-null".parse::<FilterOperator>().ok(), Some(FilterOperator::IsNotNull));
        assert!(matches!(
            "between".parse::<FilterOperator>(),
            Err(SearchError::InvalidRequest { .. })
        ));
    }

    #[test]
    fn operator_deserializes_ignoring_case() {
        let operator: FilterOperator = serde_json::from_str("\"startsWith\"").expect("operator should parse");
        assert_eq!(operator, FilterOperator::StartsWith);
        assert!(serde_json::from_str::<FilterOperator>("\"Like\"").is_err());
    }

    #[test]
    fn criterion_defaults_to_equals() {
        let parsed: FilterCriterion = serde_json::from_str(r#"{"field":"name","value":"x"}"#).expect("criterion should parse");
        assert_eq!(parsed.operator, FilterOperator::Equals);
        assert_eq!(parsed.value.as_deref(), Some("x"));
    }

    #[test]
    fn criterion_string_keeps_colons_in_value() {
        let parsed: FilterCriterion = "createdAt:gte:2024-01-01T10:00:00Z".parse().expect("criterion should parse");
        assert_eq!(parsed.field, "createdAt");
        assert_eq!(parsed.operator, FilterOperator::GreaterThanOrEqual);
        assert_eq!(parsed.value.as_deref(), Some("2024-01-01T10:00:00Z"));

        let null_check: FilterCriterion = "address:isnull".parse().expect("criterion should parse");
        assert_eq!(null_check.value, None);
        assert!("address".parse::<FilterCriterion>().is_err());
        assert!(":eq:1".parse::<FilterCriterion>().is_err());
    }

    // ==========================================================================
    // Criteria semantics
    // ==========================================================================

    #[test]
    fn greater_than_selects_upper_half() {
        let result = apply(&[criterion("value", FilterOperator::GreaterThan, "5")], &items());
        assert_eq!(result, vec![6, 7, 8, 9, 10]);
    }

    #[test]
    fn ordered_operators_are_inclusive_or_exclusive() {
        let records = items();
        assert_eq!(
            apply(&[criterion("value", FilterOperator::GreaterThanOrEqual, "9")], &records),
            vec![9, 10]
        );
        assert_eq!(apply(&[criterion("value", FilterOperator::LessThan, "3")], &records), vec![1, 2]);
        assert_eq!(
            apply(&[criterion("VALUE", FilterOperator::LessThanOrEqual, "2")], &records),
            vec![1, 2]
        );
    }

    #[test]
    fn criteria_are_anded() {
        let result = apply(
            &[
                criterion("value", FilterOperator::GreaterThan, "2"),
                criterion("active", FilterOperator::Equals, "true"),
            ],
            &items(),
        );
        assert_eq!(result, vec![4, 6, 8, 10]);
    }

    #[test]
    fn in_drops_invalid_segments() {
        let result = apply(&[criterion("status", FilterOperator::In, "A, B, z")], &items());
        // status is value % 3: A=0, B=1
        assert_eq!(result, vec![1, 3, 4, 6, 7, 9, 10]);
    }

    #[test]
    fn not_in_is_the_complement() {
        let result = apply(&[criterion("status", FilterOperator::NotIn, "a,b")], &items());
        assert_eq!(result, vec![2, 5, 8]);
    }

    #[test]
    fn in_with_no_valid_segment_is_ignored() {
        let records = items();
        let result = apply(&[criterion("status", FilterOperator::In, "x, y")], &records);
        assert_eq!(result.len(), records.len());
        assert!(matches!(
            compile_criterion(&schema(), &criterion("status", FilterOperator::In, "x, y")),
            Err(Degradation::ValueNotConvertible { .. })
        ));
    }

    #[test]
    fn text_operators_ignore_case() {
        let records = items();
        assert_eq!(apply(&[criterion("name", FilterOperator::Contains, "EM 1")], &records), vec![1, 10]);
        assert_eq!(apply(&[criterion("name", FilterOperator::StartsWith, "item 7")], &records), vec![7]);
        assert_eq!(apply(&[criterion("name", FilterOperator::EndsWith, " 5")], &records), vec![5]);
        assert_eq!(
            apply(&[criterion("name", FilterOperator::NotContains, "1")], &records),
            vec![2, 3, 4, 5, 6, 7, 8, 9]
        );
    }

    #[test]
    fn equals_on_text_is_exact() {
        let records = items();
        assert_eq!(apply(&[criterion("name", FilterOperator::Equals, "Item 3")], &records), vec![3]);
        assert!(apply(&[criterion("name", FilterOperator::Equals, "item 3")], &records).is_empty());
    }

    #[test]
    fn null_field_only_satisfies_null_tests() {
        let mut records = items();
        records[0].name = None;
        records[0].score = None;

        let null_value_ids = |operator: FilterOperator, field: &str, value: &str| -> bool {
            apply(&[criterion(field, operator, value)], &records[..1]).contains(&1)
        };

        assert!(!null_value_ids(FilterOperator::Equals, "name", "Item 1"));
        assert!(!null_value_ids(FilterOperator::NotEquals, "name", "anything"));
        assert!(!null_value_ids(FilterOperator::Contains, "name", "item"));
        assert!(!null_value_ids(FilterOperator::NotContains, "name", "zzz"));
        assert!(!null_value_ids(FilterOperator::GreaterThan, "score", "-100"));
        assert!(!null_value_ids(FilterOperator::LessThan, "score", "100"));
        assert!(!null_value_ids(FilterOperator::In, "name", "Item 1"));
        assert!(!null_value_ids(FilterOperator::NotIn, "name", "Item 2"));

        assert_eq!(
            apply(&[FilterCriterion::without_value("name", FilterOperator::IsNull)], &records),
            vec![1]
        );
        assert_eq!(
            apply(&[FilterCriterion::without_value("score", FilterOperator::IsNotNull)], &records).len(),
            9
        );
    }

    // ==========================================================================
    // Degradation
    // ==========================================================================

    #[test]
    fn unknown_field_is_ignored() {
        let records = items();
        assert_eq!(apply(&[criterion("missing", FilterOperator::Equals, "1")], &records).len(), 10);
        assert_eq!(
            compile_criterion(&schema(), &criterion("", FilterOperator::Equals, "1")).err(),
            Some(Degradation::UnknownField { field: String::new() })
        );
    }

    #[test]
    fn operator_type_mismatch_is_ignored() {
        let records = items();
        assert_eq!(apply(&[criterion("value", FilterOperator::StartsWith, "1")], &records).len(), 10);
        assert_eq!(apply(&[criterion("name", FilterOperator::GreaterThan, "a")], &records).len(), 10);
        assert_eq!(apply(&[criterion("active", FilterOperator::LessThan, "true")], &records).len(), 10);
        assert!(matches!(
            compile_criterion(&schema(), &criterion("status", FilterOperator::Contains, "A")),
            Err(Degradation::UnsupportedOperatorForType {
                operator: FilterOperator::Contains,
                field_type: FieldType::Tag(_),
                ..
            })
        ));
    }

    #[test]
    fn unconvertible_or_missing_value_is_ignored() {
        let records = items();
        assert_eq!(apply(&[criterion("value", FilterOperator::Equals, "five")], &records).len(), 10);
        assert_eq!(
            apply(&[FilterCriterion::without_value("value", FilterOperator::Equals)], &records).len(),
            10
        );
        assert_eq!(apply(&[criterion("name", FilterOperator::Contains, "  ")], &records).len(), 10);
    }

    #[test]
    fn ignored_criteria_do_not_disable_valid_ones() {
        let result = apply(
            &[
                criterion("missing", FilterOperator::Equals, "1"),
                criterion("value", FilterOperator::LessThanOrEqual, "3"),
                criterion("value", FilterOperator::Equals, "three"),
            ],
            &items(),
        );
        assert_eq!(result, vec![1, 2, 3]);
    }

    // ==========================================================================
    // Free text
    // ==========================================================================

    #[test]
    fn free_text_ors_over_text_fields() {
        let schema = schema();
        let mut records = items();
        records[2].name = None;

        let predicate = free_text(&schema, &["name", "value", "missing"], Some("ITEM"));
        let hits: Vec<i32> = records.iter().filter(|r| predicate.matches(r)).map(|r| r.value).collect();
        assert_eq!(hits, vec![1, 2, 4, 5, 6, 7, 8, 9, 10]);
    }

    #[test]
    fn blank_term_or_no_fields_matches_everything() {
        let schema = schema();
        assert!(free_text(&schema, &["name"], None).is_always());
        assert!(free_text(&schema, &["name"], Some("   ")).is_always());
        assert!(free_text(&schema, &[], Some("item")).is_always());
        assert!(free_text(&schema, &["value"], Some("item")).is_always());
    }

    // ==========================================================================
    // Composition
    // ==========================================================================

    #[test]
    fn all_simplifies() {
        let schema = schema();
        let field = *schema.resolve("value").expect("value field");
        assert!(Predicate::<Item>::all([Predicate::Always, Predicate::Always]).is_always());
        assert!(matches!(
            Predicate::all([Predicate::Always, Predicate::is_null(field)]),
            Predicate::IsNull { negate: false, .. }
        ));
        assert!(matches!(
            Predicate::all([Predicate::is_null(field), Predicate::is_not_null(field)]),
            Predicate::And(ref clauses) if clauses.len() == 2
        ));
    }

    #[test]
    fn nested_or_within_and() {
        let schema = schema();
        let value = *schema.resolve("value").expect("value field");
        let active = *schema.resolve("active").expect("active field");

        let predicate = Predicate::and([
            Predicate::or([
                Predicate::eq(value, Literal::Number(Number::Int(3))),
                Predicate::eq(value, Literal::Number(Number::Int(4))),
            ]),
            Predicate::eq(active, Literal::Bool(true)),
        ]);

        let hits: Vec<i32> = items().iter().filter(|r| predicate.matches(r)).map(|r| r.value).collect();
        assert_eq!(hits, vec![4]);
    }

    #[test]
    fn empty_or_matches_nothing() {
        let predicate = Predicate::<Item>::or([]);
        assert!(!predicate.matches(&item(1)));
        assert!(Predicate::<Item>::and([]).matches(&item(1)));
    }
}
