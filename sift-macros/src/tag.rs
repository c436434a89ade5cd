use proc_macro2::{Span, TokenStream as TokenStream2};
use quote::quote;
use syn::{Data, DeriveInput, Error, Fields, Ident, LitStr, Result};

pub(crate) struct ParsedTag {
    name: Ident,
    variants: Vec<(Ident, String)>,
}

impl ParsedTag {
    pub(crate) fn from_input(input: &DeriveInput) -> Result<Self> {
        if !input.generics.params.is_empty() {
            return Err(Error::new_spanned(
                &input.generics,
                "SearchTag cannot be derived for generic types",
            ));
        }

        let data = match &input.data {
            Data::Enum(data) => data,
            _ => return Err(Error::new(input.ident.span(), "SearchTag can only be derived for enums")),
        };
        if data.variants.is_empty() {
            return Err(Error::new(input.ident.span(), "SearchTag requires at least one variant"));
        }

        let mut variants = Vec::new();
        for variant in &data.variants {
            if !matches!(variant.fields, Fields::Unit) {
                return Err(Error::new_spanned(variant, "SearchTag variants must be unit variants"));
            }

            let mut tag = variant.ident.to_string();
            for attr in &variant.attrs {
                if attr.path().is_ident("search") {
                    attr.parse_nested_meta(|meta| {
                        if meta.path.is_ident("rename") {
                            let value: LitStr = meta.value()?.parse()?;
                            tag = value.value();
                            Ok(())
                        } else {
                            Err(meta.error("unknown search option, expected `rename`"))
                        }
                    })?;
                }
            }

            if variants.iter().any(|(_, existing): &(Ident, String)| existing.eq_ignore_ascii_case(&tag)) {
                return Err(Error::new_spanned(
                    variant,
                    format!("tag `{tag}` collides with another variant (tags ignore case)"),
                ));
            }
            variants.push((variant.ident.clone(), tag));
        }

        Ok(Self {
            name: input.ident.clone(),
            variants,
        })
    }

    pub(crate) fn emit(&self) -> TokenStream2 {
        let name = &self.name;
        let type_name = name.to_string();
        let tags: Vec<LitStr> = self
            .variants
            .iter()
            .map(|(_, tag)| LitStr::new(tag, Span::call_site()))
            .collect();
        let idents: Vec<&Ident> = self.variants.iter().map(|(ident, _)| ident).collect();
        let indices: Vec<u32> = (0..self.variants.len()).map(|i| i as u32).collect();

        quote! {
            impl ::sift::SearchTag for #name {
                const TAGS: &'static [&'static str] = &[#(#tags),*];

                fn index(&self) -> u32 {
                    match self {
                        #(Self::#idents => #indices,)*
                    }
                }

                fn from_index(index: u32) -> ::core::option::Option<Self> {
                    match index {
                        #(#indices => ::core::option::Option::Some(Self::#idents),)*
                        _ => ::core::option::Option::None,
                    }
                }
            }

            impl ::sift::FieldValue for #name {
                const FIELD_TYPE: ::sift::FieldType =
                    ::sift::FieldType::Tag(<Self as ::sift::SearchTag>::TAGS);

                fn to_value(&self) -> ::sift::Value<'_> {
                    ::sift::Value::Tag(::sift::SearchTag::index(self))
                }
            }

            impl ::core::str::FromStr for #name {
                type Err = ::sift::SearchError;

                fn from_str(s: &str) -> ::core::result::Result<Self, Self::Err> {
                    <Self as ::sift::SearchTag>::parse_tag(s).ok_or_else(|| {
                        ::sift::SearchError::invalid_request(::std::format!(
                            "unknown {} '{}', expected one of: {}",
                            #type_name,
                            s,
                            <Self as ::sift::SearchTag>::TAGS.join(", ")
                        ))
                    })
                }
            }

            impl ::core::fmt::Display for #name {
                fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                    f.write_str(::sift::SearchTag::tag(self))
                }
            }
        }
    }
}
