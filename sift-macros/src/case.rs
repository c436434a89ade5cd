use syn::{Error, Result, Type};

#[derive(Clone, Copy, PartialEq, Eq)]
pub(crate) enum RenameRule {
    None,
    CamelCase,
    PascalCase,
    SnakeCase,
}

impl RenameRule {
    pub(crate) fn parse(lit: &syn::LitStr) -> Result<Self> {
        match lit.value().as_str() {
            "camelCase" => Ok(Self::CamelCase),
            "PascalCase" => Ok(Self::PascalCase),
            "snake_case" => Ok(Self::SnakeCase),
            other => Err(Error::new(
                lit.span(),
                format!("unknown rename_all rule `{other}`, expected one of: camelCase, PascalCase, snake_case"),
            )),
        }
    }

    /// Apply the rule to a snake_case Rust field name.
    pub(crate) fn apply(self, field: &str) -> String {
        match self {
            Self::None | Self::SnakeCase => field.to_string(),
            Self::CamelCase => to_camel_case(field),
            Self::PascalCase => to_pascal_case(field),
        }
    }
}

fn to_pascal_case(snake: &str) -> String {
    snake
        .split('_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect()
}

fn to_camel_case(snake: &str) -> String {
    let pascal = to_pascal_case(snake);
    let mut chars = pascal.chars();
    match chars.next() {
        Some(first) => first.to_ascii_lowercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}

/// Converts a PascalCase identifier to snake_case
pub(crate) fn to_snake_case(name: &str) -> String {
    let mut result = String::new();
    for (i, ch) in name.chars().enumerate() {
        if ch.is_uppercase() {
            if i > 0 {
                result.push('_');
            }
            result.push(ch.to_ascii_lowercase());
        } else {
            result.push(ch);
        }
    }
    result
}

/// "ContactMessage" -> "contact_messages"
pub(crate) fn to_snake_plural(name: &str) -> String {
    let snake = to_snake_case(name);
    if snake.ends_with('s') || snake.ends_with('x') || snake.ends_with("ch") || snake.ends_with("sh") {
        format!("{snake}es")
    } else if let Some(stem) = snake.strip_suffix('y')
        && !stem.ends_with(['a', 'e', 'i', 'o', 'u'])
    {
        format!("{stem}ies")
    } else {
        format!("{snake}s")
    }
}

pub(crate) fn unwrap_option(ty: &Type) -> Option<&Type> {
    match ty {
        Type::Path(path) if last_ident_str(path).as_deref() == Some("Option") => {
            match &path.path.segments.last()?.arguments {
                syn::PathArguments::AngleBracketed(args) => args.args.first().and_then(|arg| match arg {
                    syn::GenericArgument::Type(inner) => Some(inner),
                    _ => None,
                }),
                _ => None,
            }
        }
        _ => None,
    }
}

pub(crate) fn last_ident_str(path: &syn::TypePath) -> Option<String> {
    path.path.segments.last().map(|seg| seg.ident.to_string())
}

/// `String` or `Option<String>`, judged by the last path segment.
pub(crate) fn is_string_like(ty: &Type) -> bool {
    let inner = unwrap_option(ty).unwrap_or(ty);
    matches!(inner, Type::Path(path) if last_ident_str(path).as_deref() == Some("String"))
}
