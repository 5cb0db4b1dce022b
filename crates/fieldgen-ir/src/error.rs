use thiserror::Error;

/// Failure while reading a field's `#[tags(...)]` attribute.
#[derive(Debug, Error)]
pub enum TagError {
    #[error("malformed `tags` attribute: {0}")]
    Malformed(#[from] syn::Error),
}

/// Failure while building the structural model of a type.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("type `{0}` not found in the given sources")]
    TypeNotFound(String),

    #[error("type `{0}` is not a struct with named fields")]
    NotAStruct(String),

    #[error("field `{field}` of `{type_name}`: {source}")]
    Tag {
        type_name: String,
        field: String,
        source: TagError,
    },
}
