//! Parsing of the `#[tags(...)]` field attribute.
//!
//! A field declares its tags as ordered name/value pairs, with bare paths
//! acting as flag tags:
//!
//! ```ignore
//! #[tags(json = "id,omitempty", db = "id", readonly)]
//! id: i64,
//! ```
//!
//! The `embed` flag is structural (it marks the field as embedded) and is
//! reported separately instead of entering the tag map.

use indexmap::IndexMap;

use crate::error::TagError;

/// Tag name → tag value, in declaration order.
pub type TagMap = IndexMap<String, String>;

/// Result of scanning one field's attributes.
#[derive(Debug, Default, Clone)]
pub struct ParsedTags {
    pub embedded: bool,
    pub tags: TagMap,
}

const TAGS_ATTR: &str = "tags";
const EMBED_FLAG: &str = "embed";

pub fn parse_field_tags(attrs: &[syn::Attribute]) -> Result<ParsedTags, TagError> {
    let mut parsed = ParsedTags::default();

    for attr in attrs {
        if !attr.path().is_ident(TAGS_ATTR) {
            continue;
        }
        let syn::Meta::List(_) = &attr.meta else {
            return Err(TagError::Malformed(syn::Error::new_spanned(
                attr,
                "expected `#[tags(name = \"value\", ...)]`",
            )));
        };
        attr.parse_nested_meta(|meta| {
            let Some(ident) = meta.path.get_ident() else {
                return Err(meta.error("tag name must be a plain identifier"));
            };
            let name = ident.to_string();
            if meta.input.peek(syn::Token![=]) {
                if name == EMBED_FLAG {
                    return Err(meta.error("`embed` is a flag and takes no value"));
                }
                let value: syn::LitStr = meta.value()?.parse()?;
                // repeated tag names keep the first value
                parsed.tags.entry(name).or_insert_with(|| value.value());
            } else if name == EMBED_FLAG {
                parsed.embedded = true;
            } else {
                parsed.tags.entry(name).or_default();
            }
            Ok(())
        })?;
    }

    Ok(parsed)
}
