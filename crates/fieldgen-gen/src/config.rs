//! Shared generator configuration.

use proc_macro2::TokenStream;
use quote::quote;

use fieldgen_ir::prelude::{sanitize_ident, to_camel_case, to_screaming_snake_case, to_snake_case};

/// Whether generated items are exported from their module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    #[default]
    Export,
    Private,
}

impl Visibility {
    pub fn tokens(self) -> TokenStream {
        match self {
            Visibility::Export => quote!(pub),
            Visibility::Private => TokenStream::new(),
        }
    }
}

/// Casing applied to generated constant names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConstCasing {
    #[default]
    Screaming,
    Camel,
}

impl ConstCasing {
    /// Joins name parts into one identifier in this casing.
    pub fn apply(self, parts: &[String]) -> String {
        match self {
            ConstCasing::Screaming => parts
                .iter()
                .map(|p| to_screaming_snake_case(sanitize_ident(p)))
                .collect::<Vec<_>>()
                .join("_"),
            ConstCasing::Camel => parts
                .iter()
                .map(|p| to_camel_case(to_snake_case(sanitize_ident(p))))
                .collect(),
        }
    }
}

/// How a map key is derived from a tag value.
///
/// The source corpus has both conventions; the choice is explicit
/// configuration, never implied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyPolicy {
    /// Use the tag value up to its first `,`: `"id,omitempty"` keys as `"id"`.
    #[default]
    StripOptions,
    /// Use the tag value verbatim.
    Raw,
}

impl KeyPolicy {
    pub fn apply(self, tag_value: &str) -> &str {
        match self {
            KeyPolicy::StripOptions => tag_value.split(',').next().unwrap_or(tag_value),
            KeyPolicy::Raw => tag_value,
        }
    }
}
