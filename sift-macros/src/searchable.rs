use proc_macro2::{Span, TokenStream as TokenStream2};
use quote::{format_ident, quote};
use syn::ext::IdentExt;
use syn::{Attribute, Data, DeriveInput, Error, Fields, Ident, LitStr, Result, Type};

use crate::case::{RenameRule, is_string_like, to_snake_plural};

pub(crate) struct ParsedShape {
    name: Ident,
    shape: String,
    default_sort: Option<LitStr>,
    fields: Vec<ParsedField>,
}

struct ParsedField {
    ident: Ident,
    ty: Type,
    search_name: String,
    text: bool,
}

#[derive(Default)]
struct FieldOptions {
    text: bool,
    skip: bool,
    rename: Option<String>,
}

impl ParsedShape {
    pub(crate) fn from_input(input: &DeriveInput) -> Result<Self> {
        if !input.generics.params.is_empty() {
            return Err(Error::new_spanned(
                &input.generics,
                "Searchable cannot be derived for generic types",
            ));
        }

        let mut shape: Option<String> = None;
        let mut rename_all = RenameRule::None;
        let mut default_sort: Option<LitStr> = None;

        for attr in &input.attrs {
            if attr.path().is_ident("search") {
                attr.parse_nested_meta(|meta| {
                    if meta.path.is_ident("shape") {
                        let value: LitStr = meta.value()?.parse()?;
                        shape = Some(value.value());
                    } else if meta.path.is_ident("rename_all") {
                        let value: LitStr = meta.value()?.parse()?;
                        rename_all = RenameRule::parse(&value)?;
                    } else if meta.path.is_ident("default_sort") {
                        default_sort = Some(meta.value()?.parse()?);
                    } else {
                        return Err(meta.error("unknown search option, expected `shape`, `rename_all` or `default_sort`"));
                    }
                    Ok(())
                })?;
            }
        }

        let named = match &input.data {
            Data::Struct(data) => match &data.fields {
                Fields::Named(named) => &named.named,
                _ => return Err(Error::new(input.ident.span(), "Searchable requires named fields")),
            },
            _ => return Err(Error::new(input.ident.span(), "Searchable can only be derived for structs")),
        };

        let mut fields = Vec::new();
        for field in named {
            let Some(ident) = field.ident.clone() else {
                continue;
            };
            let options = parse_field_options(&field.attrs)?;
            if options.skip {
                if options.text {
                    return Err(Error::new(ident.span(), "a skipped field cannot also be `text`"));
                }
                continue;
            }
            if options.text && !is_string_like(&field.ty) {
                return Err(Error::new_spanned(
                    &field.ty,
                    "#[search(text)] requires a `String` or `Option<String>` field",
                ));
            }

            let rust_name = ident.unraw().to_string();
            fields.push(ParsedField {
                search_name: options.rename.unwrap_or_else(|| rename_all.apply(&rust_name)),
                ident,
                ty: field.ty.clone(),
                text: options.text,
            });
        }

        if let Some(sort) = &default_sort {
            let wanted = sort.value();
            if !fields.iter().any(|f| f.search_name.eq_ignore_ascii_case(&wanted)) {
                return Err(Error::new(
                    sort.span(),
                    format!("default_sort `{wanted}` does not name a searchable field"),
                ));
            }
        }

        Ok(Self {
            shape: shape.unwrap_or_else(|| to_snake_plural(&input.ident.to_string())),
            name: input.ident.clone(),
            default_sort,
            fields,
        })
    }

    pub(crate) fn emit(&self) -> TokenStream2 {
        let name = &self.name;
        let shape = LitStr::new(&self.shape, Span::call_site());

        let mut consts = Vec::new();
        let mut accessors = Vec::new();
        let mut const_idents = Vec::new();

        for field in &self.fields {
            let ident = &field.ident;
            let ty = &field.ty;
            let rust_name = ident.unraw().to_string();
            let const_ident = format_ident!("{}", rust_name.to_uppercase());
            let accessor_ident = format_ident!("__sift_value_{}", rust_name);
            let search_name = LitStr::new(&field.search_name, Span::call_site());

            accessors.push(quote! {
                #[doc(hidden)]
                fn #accessor_ident(record: &Self) -> ::sift::Value<'_> {
                    ::sift::FieldValue::to_value(&record.#ident)
                }
            });
            consts.push(quote! {
                pub const #const_ident: ::sift::Field<Self> = ::sift::Field::new(
                    #search_name,
                    <#ty as ::sift::FieldValue>::FIELD_TYPE,
                    <#ty as ::sift::FieldValue>::NULLABLE,
                    Self::#accessor_ident,
                );
            });
            const_idents.push(const_ident);
        }

        let text_fields = self
            .fields
            .iter()
            .filter(|f| f.text)
            .map(|f| LitStr::new(&f.search_name, Span::call_site()));

        let default_sort = match &self.default_sort {
            Some(sort) => quote! { ::core::option::Option::Some(#sort) },
            None => quote! { ::core::option::Option::None },
        };

        quote! {
            impl #name {
                #(#consts)*
                #(#accessors)*
            }

            impl ::sift::Searchable for #name {
                const SHAPE: &'static str = #shape;

                fn schema() -> &'static ::sift::Schema<Self> {
                    static SCHEMA: ::std::sync::OnceLock<::sift::Schema<#name>> = ::std::sync::OnceLock::new();
                    SCHEMA.get_or_init(|| ::sift::schema::build_schema([#(Self::#const_idents),*]))
                }

                fn text_search_fields() -> &'static [&'static str] {
                    &[#(#text_fields),*]
                }

                fn default_sort() -> ::core::option::Option<&'static str> {
                    #default_sort
                }
            }
        }
    }
}

fn parse_field_options(attrs: &[Attribute]) -> Result<FieldOptions> {
    let mut options = FieldOptions::default();
    for attr in attrs {
        if attr.path().is_ident("search") {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("text") {
                    options.text = true;
                } else if meta.path.is_ident("skip") {
                    options.skip = true;
                } else if meta.path.is_ident("rename") {
                    let value: LitStr = meta.value()?.parse()?;
                    options.rename = Some(value.value());
                } else {
                    return Err(meta.error("unknown search field option, expected `text`, `skip` or `rename`"));
                }
                Ok(())
            })?;
        }
    }
    Ok(options)
}
