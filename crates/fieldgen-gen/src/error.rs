use fieldgen_expr::ExprError;
use thiserror::Error;

/// Failure while synthesizing generated code.
///
/// Duplicate names are always fatal here: colliding identifiers would make
/// the generated source fail to compile.
#[derive(Debug, Error)]
pub enum GenError {
    #[error("duplicate constant name `{name}` (fields `{first}` and `{second}`)")]
    DuplicateConstName {
        name: String,
        first: String,
        second: String,
    },

    #[error("duplicate constant value `{value}` (constants `{first}` and `{second}`)")]
    DuplicateConstValue {
        value: String,
        first: String,
        second: String,
    },

    #[error("duplicate symbol `{0}` in generated output")]
    DuplicateSymbol(String),

    #[error("malformed rewrite rule `{rule}`: {reason}")]
    BadRewriteRule { rule: String, reason: String },

    #[error("rewritten expression `{expr}` is not valid Rust: {source}")]
    BadRewriteOutput {
        expr: String,
        #[source]
        source: syn::Error,
    },

    #[error("field `{field}`: {source}")]
    Template {
        field: String,
        #[source]
        source: ExprError,
    },

    #[error("field `{0}` not found on the model")]
    UnknownField(String),

    #[error("no constants of type `{0}` found in the given sources")]
    NoConstants(String),
}

impl GenError {
    pub(crate) fn template(field: &str, source: ExprError) -> Self {
        GenError::Template {
            field: field.to_string(),
            source,
        }
    }
}
