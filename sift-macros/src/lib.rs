use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod case;
mod searchable;
mod tag;

use searchable::ParsedShape;
use tag::ParsedTag;

/// Derive `sift::Searchable` for a struct with named fields.
///
/// Generates one `pub const` field handle per searchable field (named after
/// the field in SCREAMING_SNAKE_CASE) and a schema built once per process.
///
/// Container options: `shape = "..."`, `rename_all = "camelCase" | "PascalCase"
/// | "snake_case"`, `default_sort = "..."`.
/// Field options: `text` (include in free-text search), `skip`, `rename = "..."`.
///
/// ```text
/// #[derive(Searchable)]
/// #[search(shape = "users", rename_all = "camelCase", default_sort = "createdAt")]
/// struct User {
///     id: i32,
///     #[search(text)]
///     full_name: String,
///     #[search(skip)]
///     password_hash: String,
///     created_at: DateTime<Utc>,
/// }
///
/// // Generated:
/// // - User::ID, User::FULL_NAME, User::CREATED_AT
/// // - impl Searchable for User
/// ```
#[proc_macro_derive(Searchable, attributes(search))]
pub fn derive_searchable(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match ParsedShape::from_input(&input) {
        Ok(parsed) => parsed.emit().into(),
        Err(err) => err.to_compile_error().into(),
    }
}

/// Derive `sift::SearchTag` for a unit-only enum, along with `FieldValue`,
/// case-insensitive `FromStr` and `Display`.
///
/// Variants use their own name as the tag unless `#[search(rename = "...")]`
/// says otherwise.
#[proc_macro_derive(SearchTag, attributes(search))]
pub fn derive_search_tag(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match ParsedTag::from_input(&input) {
        Ok(parsed) => parsed.emit().into(),
        Err(err) => err.to_compile_error().into(),
    }
}
