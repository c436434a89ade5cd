//! Record shapes: typed field tables and case-insensitive field resolution.
//!
//! Every searchable shape owns one [`Schema`], built the first time it is
//! asked for and kept for the life of the process. A schema is a list of
//! [`Field`]s, each pairing a [`FieldDescriptor`] with a plain function that
//! reads the field out of a record. No runtime reflection is involved: the
//! table is produced by `#[derive(Searchable)]`.

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;

use crate::registry::{ShapeDescriptor, register_shape};
use crate::value::{Number, Value};

/// Declared type of a field, after unwrapping any nullable wrapper.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Text,
    Int32,
    Int64,
    Float32,
    Float64,
    Decimal,
    Bool,
    Timestamp,
    /// Closed tag set; the slice lists tag names in index order.
    Tag(&'static [&'static str]),
}

impl FieldType {
    /// Whether substring/prefix/suffix operators apply.
    #[inline]
    pub const fn is_text(self) -> bool {
        matches!(self, FieldType::Text)
    }

    /// Whether the ordering operators apply.
    #[inline]
    pub const fn is_ordered(self) -> bool {
        matches!(
            self,
            FieldType::Int32
                | FieldType::Int64
                | FieldType::Float32
                | FieldType::Float64
                | FieldType::Decimal
                | FieldType::Timestamp
        )
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Int32 => "int32",
            FieldType::Int64 => "int64",
            FieldType::Float32 => "float32",
            FieldType::Float64 => "float64",
            FieldType::Decimal => "decimal",
            FieldType::Bool => "bool",
            FieldType::Timestamp => "timestamp",
            FieldType::Tag(_) => "tag",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolved metadata for one named field of a record shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub name: &'static str,
    pub field_type: FieldType,
    pub nullable: bool,
}

/// Reads one field out of a record.
pub type Accessor<R> = for<'a> fn(&'a R) -> Value<'a>;

/// A field descriptor together with its typed accessor.
pub struct Field<R> {
    descriptor: FieldDescriptor,
    accessor: Accessor<R>,
}

impl<R> Field<R> {
    pub const fn new(name: &'static str, field_type: FieldType, nullable: bool, accessor: Accessor<R>) -> Self {
        Self {
            descriptor: FieldDescriptor {
                name,
                field_type,
                nullable,
            },
            accessor,
        }
    }

    #[inline]
    pub const fn name(&self) -> &'static str {
        self.descriptor.name
    }

    #[inline]
    pub const fn field_type(&self) -> FieldType {
        self.descriptor.field_type
    }

    #[inline]
    pub const fn descriptor(&self) -> &FieldDescriptor {
        &self.descriptor
    }

    /// Read this field from `record`.
    #[inline]
    pub fn get<'a>(&self, record: &'a R) -> Value<'a> {
        (self.accessor)(record)
    }
}

impl<R> Clone for Field<R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R> Copy for Field<R> {}

impl<R> fmt::Debug for Field<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("name", &self.descriptor.name)
            .field("field_type", &self.descriptor.field_type)
            .field("nullable", &self.descriptor.nullable)
            .finish()
    }
}

/// Ordered field table of one record shape.
#[derive(Debug)]
pub struct Schema<R> {
    shape: &'static str,
    fields: Vec<Field<R>>,
}

impl<R> Schema<R> {
    pub fn new(shape: &'static str, fields: impl IntoIterator<Item = Field<R>>) -> Self {
        Self {
            shape,
            fields: fields.into_iter().collect(),
        }
    }

    #[inline]
    pub fn shape(&self) -> &'static str {
        self.shape
    }

    #[inline]
    pub fn fields(&self) -> &[Field<R>] {
        &self.fields
    }

    pub fn descriptors(&self) -> impl Iterator<Item = &FieldDescriptor> + '_ {
        self.fields.iter().map(Field::descriptor)
    }

    /// Look a field up by name, ignoring ASCII case. The first match wins.
    pub fn resolve(&self, name: &str) -> Option<&Field<R>> {
        self.fields.iter().find(|field| field.name().eq_ignore_ascii_case(name))
    }
}

/// Implemented by record shapes that can be searched.
///
/// Normally derived with `#[derive(Searchable)]`, which generates one
/// `pub const` [`Field`] per struct field and a `schema()` backed by a
/// `OnceLock`.
pub trait Searchable: Sized + 'static {
    /// Shape name used for registry lookups and log output.
    const SHAPE: &'static str;

    /// The shape's field table, built once per process.
    fn schema() -> &'static Schema<Self>;

    /// Fields matched by the free-text search term.
    fn text_search_fields() -> &'static [&'static str] {
        &[]
    }

    /// Sort field used when a request does not name one.
    fn default_sort() -> Option<&'static str> {
        None
    }
}

/// Build a shape's schema and record its descriptor in the shape registry.
///
/// Called from the `OnceLock` initializer that `#[derive(Searchable)]` emits.
pub fn build_schema<R: Searchable>(fields: impl IntoIterator<Item = Field<R>>) -> Schema<R> {
    let schema = Schema::new(R::SHAPE, fields);
    register_shape(ShapeDescriptor {
        shape: R::SHAPE,
        fields: schema.descriptors().copied().collect(),
        text_search_fields: R::text_search_fields(),
        default_sort: R::default_sort(),
    });
    schema
}

/// Rust types that can back a searchable field.
///
/// `Option<T>` reports the inner type with `NULLABLE = true`; that is the one
/// place a nullable wrapper is unwrapped.
pub trait FieldValue {
    const FIELD_TYPE: FieldType;
    const NULLABLE: bool = false;

    fn to_value(&self) -> Value<'_>;
}

impl FieldValue for String {
    const FIELD_TYPE: FieldType = FieldType::Text;

    fn to_value(&self) -> Value<'_> {
        Value::Text(self.as_str())
    }
}

macro_rules! numeric_field_value {
    ($($ty:ty => $field_type:ident),* $(,)?) => {
        $(
            impl FieldValue for $ty {
                const FIELD_TYPE: FieldType = FieldType::$field_type;

                fn to_value(&self) -> Value<'_> {
                    Value::Number(Number::from(*self))
                }
            }
        )*
    };
}

numeric_field_value! {
    i32 => Int32,
    i64 => Int64,
    f32 => Float32,
    f64 => Float64,
    Decimal => Decimal,
}

impl FieldValue for bool {
    const FIELD_TYPE: FieldType = FieldType::Bool;

    fn to_value(&self) -> Value<'_> {
        Value::Bool(*self)
    }
}

impl FieldValue for DateTime<Utc> {
    const FIELD_TYPE: FieldType = FieldType::Timestamp;

    fn to_value(&self) -> Value<'_> {
        Value::Timestamp(*self)
    }
}

impl FieldValue for NaiveDate {
    const FIELD_TYPE: FieldType = FieldType::Timestamp;

    fn to_value(&self) -> Value<'_> {
        Value::Timestamp(self.and_time(NaiveTime::MIN).and_utc())
    }
}

impl<T: FieldValue> FieldValue for Option<T> {
    const FIELD_TYPE: FieldType = T::FIELD_TYPE;
    const NULLABLE: bool = true;

    fn to_value(&self) -> Value<'_> {
        match self {
            Some(inner) => inner.to_value(),
            None => Value::Null,
        }
    }
}

/// Closed set of named tags, stored on records as a Rust enum.
///
/// Derived with `#[derive(SearchTag)]` on unit-only enums. Tag names are
/// matched without regard to ASCII case.
pub trait SearchTag: Sized + 'static {
    /// Tag names in index order.
    const TAGS: &'static [&'static str];

    fn index(&self) -> u32;

    fn from_index(index: u32) -> Option<Self>;

    fn tag(&self) -> &'static str {
        Self::TAGS.get(self.index() as usize).copied().unwrap_or_default()
    }

    fn parse_tag(name: &str) -> Option<Self> {
        tag_index(Self::TAGS, name).and_then(Self::from_index)
    }
}

/// Position of `name` in `tags`, ignoring ASCII case and surrounding whitespace.
pub fn tag_index(tags: &[&str], name: &str) -> Option<u32> {
    let name = name.trim();
    tags.iter()
        .position(|tag| tag.eq_ignore_ascii_case(name))
        .and_then(|index| u32::try_from(index).ok())
}
